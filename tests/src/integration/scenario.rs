//! # End-to-End Ride Scenario
//!
//! One ride driven entirely through the round executor:
//!
//! ```text
//! round 1: CreateRequest, three driver commits
//! round 2: matching pass pairs the lowest eligible ETA
//! round 3: both drivers/riders publish keys, rider reveals pickup + dropoff
//! round 4: driver posts an encrypted envelope
//! round 5: rider completes, deposit paid to the driver
//! ```

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use primitive_types::U256;
    use rc_04_session_manager::SessionStatus;
    use rc_05_envelope_validator::{envelope_hash, EnvelopeHeader};
    use ride_node::{Operation, OperationOutcome, TxResult};
    use shared_types::{commitment, BlockContext, RideEvent};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn publish_keys(seed: u8, expires_at: u64) -> Operation {
        Operation::PublishKeys {
            identity_dh_key: [seed; 32],
            identity_sign_key: [seed.wrapping_add(1); 32],
            signed_pre_key: [seed.wrapping_add(2); 32],
            signature: vec![seed; 64],
            expires_at,
        }
    }

    fn applied(result: &TxResult) -> &OperationOutcome {
        match result {
            TxResult::Applied { outcome } => outcome,
            TxResult::Rejected { error } => panic!("unexpected rejection: {error}"),
        }
    }

    // =========================================================================
    // INTEGRATION TESTS: FULL RIDE
    // =========================================================================

    #[test]
    fn test_full_ride_from_request_to_completion() {
        let config = config();
        let mut node = funded_executor(&config);

        // Round 1: request and commits.
        let receipt = node
            .execute_round(
                BlockContext::new(1, 1_000),
                vec![
                    create_request(20, 10),
                    driver_commit(DRIVER_A, 1, 7),
                    driver_commit(DRIVER_B, 1, 4),
                    driver_commit(DRIVER_C, 1, 12),
                ],
            )
            .unwrap();
        assert!(receipt.results.iter().all(TxResult::is_applied));
        assert_eq!(
            applied(&receipt.results[0]),
            &OperationOutcome::RequestCreated { request_id: 1 }
        );
        assert_eq!(receipt.matching.deferred, vec![1]);
        assert_eq!(node.state().escrow.balance_of(&RIDER), U256::from(RIDER_FUNDS - DEPOSIT));
        assert_eq!(node.state().escrow.escrowed(), U256::from(DEPOSIT));

        // Round 2: the window closes and the fastest eligible driver wins.
        let receipt = node
            .execute_round(BlockContext::new(2, 1_012), Vec::new())
            .unwrap();
        assert_eq!(receipt.matching.matched.len(), 1);
        let record = &receipt.matching.matched[0];
        assert_eq!((record.request_id, record.session_id), (1, 1));
        assert_eq!(record.driver, DRIVER_B);
        assert_eq!(record.eta, 4);
        assert_eq!(
            receipt.events,
            vec![RideEvent::Matched {
                session_id: 1,
                request_id: 1,
                rider: RIDER,
                driver: DRIVER_B,
            }]
        );

        // Round 3: keys, then reveals.
        let mut txs = vec![
            tx(RIDER, publish_keys(0x10, 0)),
            tx(DRIVER_B, publish_keys(0x20, 5_000)),
        ];
        txs.extend(reveal_both(1));
        let receipt = node
            .execute_round(BlockContext::new(3, 1_024), txs)
            .unwrap();
        assert_eq!(
            applied(&receipt.results[2]),
            &OperationOutcome::LocationRevealed {
                session_id: 1,
                active: false
            }
        );
        assert_eq!(
            applied(&receipt.results[3]),
            &OperationOutcome::LocationRevealed {
                session_id: 1,
                active: true
            }
        );
        assert!(receipt
            .events
            .contains(&RideEvent::SessionActivated { session_id: 1 }));

        let session = node.state().sessions.get(1).unwrap();
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.pickup_coord.as_deref(), Some(PICKUP.0));
        assert_eq!(session.dropoff_coord.as_deref(), Some(DROPOFF.0));
        assert_eq!(node.state().keys.get(&DRIVER_B).updated_at, 1_024);

        // Round 4: driver messages the rider.
        let header = EnvelopeHeader::new([0x20; 32], 0, 0, [0x99; 32]).to_bytes();
        let receipt = node
            .execute_round(
                BlockContext::new(4, 1_036),
                vec![tx(
                    DRIVER_B,
                    Operation::PostMessage {
                        session_id: 1,
                        header: header.to_vec(),
                        ciphertext: b"arriving in 4".to_vec(),
                    },
                )],
            )
            .unwrap();
        let expected_hash = envelope_hash(&header, b"arriving in 4");
        assert_eq!(
            applied(&receipt.results[0]),
            &OperationOutcome::MessagePosted {
                envelope_hash: expected_hash
            }
        );
        let session = node.state().sessions.get(1).unwrap();
        assert_eq!(session.message_count, 1);
        assert_eq!(session.last_envelope_hash, Some(expected_hash));

        // Round 5: completion releases the deposit to the driver.
        let receipt = node
            .execute_round(
                BlockContext::new(5, 1_048),
                vec![tx(RIDER, Operation::Complete { session_id: 1 })],
            )
            .unwrap();
        assert_eq!(
            receipt.events,
            vec![RideEvent::SessionCompleted { session_id: 1 }]
        );
        let state = node.state();
        assert_eq!(state.sessions.get(1).unwrap().status, SessionStatus::Completed);
        assert_eq!(state.escrow.balance_of(&DRIVER_B), U256::from(DEPOSIT));
        assert_eq!(state.escrow.balance_of(&RIDER), U256::from(RIDER_FUNDS - DEPOSIT));
        assert_eq!(state.escrow.escrowed(), U256::zero());
    }

    #[test]
    fn test_two_driver_commit_reveal_scenario() {
        let config = config();
        let mut node = funded_executor(&config);
        let request = tx(
            RIDER,
            Operation::CreateRequest {
                cell_topic: vec![0xC0; 32],
                region_topic: vec![0xD0; 32],
                params_hash: vec![0x50; 32],
                pickup_commit: commitment(b"P1", b"saltA").to_vec(),
                dropoff_commit: commitment(b"P2", b"saltB").to_vec(),
                max_driver_eta: 10,
                ttl: 100,
                deposit: U256::from(DEPOSIT),
            },
        );

        node.execute_round(
            BlockContext::new(1, 0),
            vec![
                request,
                driver_commit(DRIVER_A, 1, 5),
                driver_commit(DRIVER_B, 1, 3),
            ],
        )
        .unwrap();
        let receipt = node.execute_round(BlockContext::new(2, 0), Vec::new()).unwrap();
        assert_eq!(receipt.matching.matched[0].driver, DRIVER_B);
        assert_eq!(node.state().sessions.get(1).unwrap().status, SessionStatus::Pending);

        fn reveal(pickup: bool, coord: &[u8], salt: &[u8]) -> ride_node::Transaction {
            let (coord, salt) = (coord.to_vec(), salt.to_vec());
            let op = if pickup {
                Operation::RevealPickup { session_id: 1, coord, salt }
            } else {
                Operation::RevealDropoff { session_id: 1, coord, salt }
            };
            tx(RIDER, op)
        }

        node.execute_round(BlockContext::new(3, 0), vec![reveal(true, b"P1", b"saltA")])
            .unwrap();
        let session = node.state().sessions.get(1).unwrap();
        assert!(session.pickup_revealed() && !session.dropoff_revealed());
        assert_eq!(session.status, SessionStatus::Pending);

        node.execute_round(BlockContext::new(4, 0), vec![reveal(false, b"P2", b"saltB")])
            .unwrap();
        assert_eq!(node.state().sessions.get(1).unwrap().status, SessionStatus::Active);

        let header = EnvelopeHeader::new([0x7E; 32], 0, 0, [0; 32]).to_bytes();
        let receipt = node
            .execute_round(
                BlockContext::new(5, 0),
                vec![tx(
                    RIDER,
                    Operation::PostMessage {
                        session_id: 1,
                        header: header.to_vec(),
                        ciphertext: vec![1, 2, 3],
                    },
                )],
            )
            .unwrap();
        assert_eq!(
            applied(&receipt.results[0]),
            &OperationOutcome::MessagePosted {
                envelope_hash: envelope_hash(&header, &[1, 2, 3])
            }
        );
    }

    #[test]
    fn test_losing_drivers_cannot_touch_session() {
        let config = config();
        let mut node = funded_executor(&config);
        node.execute_round(
            BlockContext::new(1, 0),
            vec![
                create_request(20, 10),
                driver_commit(DRIVER_A, 1, 7),
                driver_commit(DRIVER_B, 1, 4),
            ],
        )
        .unwrap();
        // Reveals run before the matching pass, so the session does not exist yet.
        let receipt = node
            .execute_round(BlockContext::new(2, 0), reveal_both(1))
            .unwrap();
        assert!(receipt.results.iter().all(|r| !r.is_applied()));
        assert_eq!(receipt.matching.matched.len(), 1);

        let receipt = node
            .execute_round(
                BlockContext::new(3, 0),
                vec![
                    tx(DRIVER_A, Operation::Cancel { session_id: 1 }),
                    tx(STRANGER, Operation::Cancel { session_id: 1 }),
                ],
            )
            .unwrap();

        for result in &receipt.results {
            match result {
                TxResult::Rejected { error } => assert!(error.contains("not authorized")),
                TxResult::Applied { .. } => panic!("non-participant was applied"),
            }
        }
        assert_eq!(node.state().sessions.get(1).unwrap().status, SessionStatus::Pending);
    }
}
