//! # Envelope Invariants
//!
//! The session path (`PostMessage`) and the stateless precompile path must
//! agree on which envelopes are structurally valid and on their hash.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use alloy_core::primitives::{Bytes, FixedBytes, U256};
    use alloy_core::sol_types::{SolCall, SolValue};
    use proptest::prelude::*;
    use rc_05_envelope_validator::{
        associated_data_hash, envelope_hash, validate_envelope, EnvelopeHeader, EnvelopeLimits,
        HEADER_LEN,
    };
    use ride_node::container::ENVELOPE_PRECOMPILE;
    use ride_node::precompiles::interface::validateEnvelopeCall;
    use ride_node::{NodeConfig, Operation, OperationOutcome, RoundExecutor, TxResult};
    use shared_types::{Address, BlockContext};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Session 1 Active between RIDER and DRIVER_A after round 3.
    fn active(config: &NodeConfig) -> RoundExecutor {
        let mut node = funded_executor(config);
        node.execute_round(
            BlockContext::new(1, 0),
            vec![create_request(20, 10), driver_commit(DRIVER_A, 1, 3)],
        )
        .unwrap();
        node.execute_round(BlockContext::new(2, 0), Vec::new())
            .unwrap();
        node.execute_round(BlockContext::new(3, 0), reveal_both(1))
            .unwrap();
        node
    }

    fn post(sender: Address, header: &[u8], ciphertext: &[u8]) -> ride_node::Transaction {
        tx(
            sender,
            Operation::PostMessage {
                session_id: 1,
                header: header.to_vec(),
                ciphertext: ciphertext.to_vec(),
            },
        )
    }

    fn header_with(version: u8, ad_hash: [u8; 32]) -> Vec<u8> {
        let mut header = EnvelopeHeader::new([0x5A; 32], 1, 9, ad_hash).to_bytes();
        header[0] = version;
        header.to_vec()
    }

    fn precompile_call(header: &[u8], ciphertext: &[u8]) -> Operation {
        Operation::PrecompileCall {
            address: ENVELOPE_PRECOMPILE,
            input: validateEnvelopeCall {
                header: Bytes::copy_from_slice(header),
                ciphertext: Bytes::copy_from_slice(ciphertext),
                maxHeader: U256::ZERO,
                maxCiphertext: U256::ZERO,
            }
            .abi_encode(),
            gas_limit: 1_000_000,
        }
    }

    // =========================================================================
    // INTEGRATION TESTS: SESSION PATH
    // =========================================================================

    #[test]
    fn test_malformed_envelopes_leave_session_untouched() {
        let config = config();
        let mut node = active(&config);
        let oversized = vec![0xFF; config.sessions.envelope_limits.max_ciphertext_bytes + 1];

        let receipt = node
            .execute_round(
                BlockContext::new(4, 0),
                vec![
                    post(RIDER, &[1; HEADER_LEN - 1], b"x"),
                    post(RIDER, &[1; HEADER_LEN + 1], b"x"),
                    post(RIDER, &header_with(2, [0; 32]), b"x"),
                    post(RIDER, &header_with(1, [0; 32]), b""),
                    post(RIDER, &header_with(1, [0; 32]), &oversized),
                ],
            )
            .unwrap();

        let errors: Vec<&str> = receipt
            .results
            .iter()
            .map(|r| match r {
                TxResult::Rejected { error } => error.as_str(),
                TxResult::Applied { .. } => "applied",
            })
            .collect();
        assert_eq!(
            errors,
            vec![
                "invalid envelope: invalid header length: expected 73, got 72",
                "invalid envelope: invalid header length: expected 73, got 74",
                "invalid envelope: unsupported envelope version 2",
                "invalid envelope: empty ciphertext",
                "invalid envelope: ciphertext too large: 65537 > 65536",
            ]
        );
        let session = node.state().sessions.get(1).unwrap();
        assert_eq!(session.message_count, 0);
        assert_eq!(session.last_envelope_hash, None);
        assert!(receipt.events.is_empty());
    }

    #[test]
    fn test_both_directions_accepted_and_counted() {
        let config = config();
        let mut node = active(&config);
        let header = header_with(1, [0x11; 32]);

        let receipt = node
            .execute_round(
                BlockContext::new(4, 0),
                vec![
                    post(RIDER, &header, b"on my way down"),
                    post(DRIVER_A, &header, b"blue sedan"),
                    post(STRANGER, &header, b"hello"),
                ],
            )
            .unwrap();

        assert!(receipt.results[0].is_applied());
        assert!(receipt.results[1].is_applied());
        assert!(!receipt.results[2].is_applied());
        let session = node.state().sessions.get(1).unwrap();
        assert_eq!(session.message_count, 2);
        assert_eq!(
            session.last_envelope_hash,
            Some(envelope_hash(&header, b"blue sedan"))
        );
    }

    #[test]
    fn test_ad_binding_enforces_direction() {
        let mut config = config();
        config.sessions.require_ad_binding = true;
        let mut node = active(&config);
        let chain_id = config.sessions.chain_id;
        let rider_to_driver = associated_data_hash(chain_id, 1, &RIDER, &DRIVER_A);

        let receipt = node
            .execute_round(
                BlockContext::new(4, 0),
                vec![
                    post(RIDER, &header_with(1, rider_to_driver), b"bound"),
                    post(DRIVER_A, &header_with(1, rider_to_driver), b"reflected"),
                ],
            )
            .unwrap();

        assert!(receipt.results[0].is_applied());
        assert_eq!(
            receipt.results[1],
            TxResult::Rejected {
                error: "associated data hash mismatch for session 1".to_string()
            }
        );
    }

    // =========================================================================
    // INTEGRATION TESTS: PRECOMPILE PATH
    // =========================================================================

    #[test]
    fn test_precompile_and_session_agree_on_hash() {
        let config = config();
        let mut node = active(&config);
        let header = header_with(1, [0x22; 32]);

        let receipt = node
            .execute_round(
                BlockContext::new(4, 0),
                vec![
                    tx(STRANGER, precompile_call(&header, b"payload")),
                    post(DRIVER_A, &header, b"payload"),
                ],
            )
            .unwrap();

        let TxResult::Applied {
            outcome: OperationOutcome::PrecompileReturned { output, gas_used },
        } = &receipt.results[0]
        else {
            panic!("precompile call failed: {:?}", receipt.results[0]);
        };
        let TxResult::Applied {
            outcome: OperationOutcome::MessagePosted { envelope_hash: posted },
        } = &receipt.results[1]
        else {
            panic!("post failed: {:?}", receipt.results[1]);
        };

        let (valid, hash) = <(bool, FixedBytes<32>)>::abi_decode_params(&output[..64]).unwrap();
        assert!(valid);
        assert_eq!(&hash.0, posted);
        assert!(*gas_used >= 3_000);
    }

    #[test]
    fn test_precompile_reverts_with_validator_message() {
        let config = config();
        let mut node = funded_executor(&config);

        let receipt = node
            .execute_round(
                BlockContext::new(1, 0),
                vec![tx(STRANGER, precompile_call(&[0; 10], b"x"))],
            )
            .unwrap();

        assert_eq!(
            receipt.results[0],
            TxResult::Rejected {
                error: "reverted: invalid header length: expected 73, got 10".to_string()
            }
        );
    }

    // =========================================================================
    // PROPERTY TESTS: VALIDATOR
    // =========================================================================

    proptest! {
        #[test]
        fn prop_only_exact_header_length_accepted(
            header in prop::collection::vec(any::<u8>(), 0..160),
            ciphertext in prop::collection::vec(any::<u8>(), 1..256),
        ) {
            let result = validate_envelope(&header, &ciphertext, EnvelopeLimits::unbounded());
            let well_formed = header.len() == HEADER_LEN && header[0] == 1;
            prop_assert_eq!(result.is_ok(), well_formed);
            if let Ok(envelope) = result {
                prop_assert_eq!(envelope.envelope_hash, envelope_hash(&header, &ciphertext));
            }
        }

        #[test]
        fn prop_version_byte_mutation_invalidates(
            version in any::<u8>().prop_filter("not version 1", |v| *v != 1),
            ciphertext in prop::collection::vec(any::<u8>(), 1..64),
        ) {
            let good = header_with(1, [0x33; 32]);
            prop_assert!(validate_envelope(&good, &ciphertext, EnvelopeLimits::default()).is_ok());

            let mutated = header_with(version, [0x33; 32]);
            let result = validate_envelope(&mutated, &ciphertext, EnvelopeLimits::default());
            prop_assert!(result.is_err());
        }
    }
}
