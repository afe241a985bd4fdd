//! # Request Expiry
//!
//! A request created at height `h` with `ttl` expires at exactly `h + ttl`,
//! whether the matching pass or an explicit `ExpireRequest` gets there first.
//! Expiry refunds once and never touches a matched request.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use primitive_types::U256;
    use proptest::prelude::*;
    use rc_01_request_registry::RequestStatus;
    use ride_node::{Operation, OperationOutcome, TxResult};
    use shared_types::{BlockContext, RideEvent};

    // =========================================================================
    // PROPERTY TESTS: MONOTONICITY
    // =========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_expiry_happens_once_at_deadline(ttl in 1u64..40) {
            let config = config();
            let mut node = funded_executor(&config);
            node.execute_round(BlockContext::new(1, 0), vec![create_request(ttl, 10)])
                .unwrap();
            let deadline = 1 + ttl;

            let mut refunds = 0;
            for height in 2..=deadline + 3 {
                let receipt = node
                    .execute_round(BlockContext::new(height, 0), Vec::new())
                    .unwrap();
                let status = node.state().requests.get(1).unwrap().status;

                if height < deadline {
                    prop_assert_eq!(status, RequestStatus::Open);
                    prop_assert!(receipt.matching.expired.is_empty());
                } else {
                    prop_assert_eq!(status, RequestStatus::Expired);
                }
                if height == deadline {
                    prop_assert_eq!(&receipt.matching.expired, &vec![1]);
                }
                refunds += receipt
                    .events
                    .iter()
                    .filter(|e| matches!(e, RideEvent::RequestExpired { .. }))
                    .count();
            }

            prop_assert_eq!(refunds, 1);
            prop_assert_eq!(node.state().escrow.balance_of(&RIDER), U256::from(RIDER_FUNDS));
        }
    }

    // =========================================================================
    // INTEGRATION TESTS: EXPLICIT EXPIRY
    // =========================================================================

    #[test]
    fn test_anyone_can_expire_after_deadline() {
        let config = config();
        let mut node = funded_executor(&config);
        node.execute_round(BlockContext::new(1, 0), vec![create_request(3, 10)])
            .unwrap();

        let early = node
            .execute_round(
                BlockContext::new(3, 0),
                vec![tx(STRANGER, Operation::ExpireRequest { request_id: 1 })],
            )
            .unwrap();
        assert_eq!(
            early.results[0],
            TxResult::Applied {
                outcome: OperationOutcome::RequestExpiry { expired: false }
            }
        );

        let receipt = node
            .execute_round(
                BlockContext::new(4, 0),
                vec![
                    tx(STRANGER, Operation::ExpireRequest { request_id: 1 }),
                    tx(STRANGER, Operation::ExpireRequest { request_id: 1 }),
                ],
            )
            .unwrap();
        assert_eq!(
            receipt.results,
            vec![
                TxResult::Applied {
                    outcome: OperationOutcome::RequestExpiry { expired: true }
                },
                TxResult::Applied {
                    outcome: OperationOutcome::RequestExpiry { expired: false }
                },
            ]
        );
        assert_eq!(receipt.events, vec![RideEvent::RequestExpired { request_id: 1 }]);
        assert!(receipt.matching.expired.is_empty());
        assert_eq!(node.state().escrow.balance_of(&STRANGER), U256::zero());
        assert_eq!(node.state().escrow.balance_of(&RIDER), U256::from(RIDER_FUNDS));
    }

    #[test]
    fn test_commit_rejected_at_deadline() {
        let config = config();
        let mut node = funded_executor(&config);
        node.execute_round(BlockContext::new(1, 0), vec![create_request(3, 10)])
            .unwrap();

        let receipt = node
            .execute_round(BlockContext::new(4, 0), vec![driver_commit(DRIVER_A, 1, 2)])
            .unwrap();

        assert_eq!(
            receipt.results[0],
            TxResult::Rejected {
                error: "request 1 has expired".to_string()
            }
        );
        assert!(node.state().commits.is_empty());
        assert!(node.state().sessions.is_empty());
    }

    #[test]
    fn test_matched_request_never_expires() {
        let config = config();
        let mut node = funded_executor(&config);
        node.execute_round(
            BlockContext::new(1, 0),
            vec![create_request(3, 10), driver_commit(DRIVER_A, 1, 2)],
        )
        .unwrap();
        node.execute_round(BlockContext::new(2, 0), Vec::new())
            .unwrap();

        let receipt = node
            .execute_round(
                BlockContext::new(10, 0),
                vec![tx(STRANGER, Operation::ExpireRequest { request_id: 1 })],
            )
            .unwrap();

        assert_eq!(
            receipt.results[0],
            TxResult::Applied {
                outcome: OperationOutcome::RequestExpiry { expired: false }
            }
        );
        assert_eq!(node.state().requests.get(1).unwrap().status, RequestStatus::Matched);
        assert_eq!(node.state().escrow.escrowed(), U256::from(DEPOSIT));
    }

    #[test]
    fn test_unknown_request_rejected() {
        let config = config();
        let mut node = funded_executor(&config);

        let receipt = node
            .execute_round(
                BlockContext::new(1, 0),
                vec![tx(STRANGER, Operation::ExpireRequest { request_id: 42 })],
            )
            .unwrap();

        assert!(!receipt.results[0].is_applied());
    }
}
