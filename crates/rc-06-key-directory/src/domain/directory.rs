//! # Key Directory
//!
//! `owner → KeyBundle`, single active bundle per owner. Republishing replaces
//! every field; nothing of the previous bundle survives.

use super::entities::{Address, KeyBundle, PublishKeysParams, Timestamp, MAX_SIGNATURE_LEN};
use super::errors::KeyDirectoryError;
use serde::{Deserialize, Serialize};
use shared_types::{is_zero_address, short_hex, EventSink, RideEvent};
use std::collections::BTreeMap;
use tracing::info;

/// Key bundle table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDirectory {
    bundles: BTreeMap<Address, KeyBundle>,
}

impl KeyDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identities with a published bundle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Returns true if nobody has published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Publishes (or replaces) `owner`'s bundle.
    ///
    /// # Errors
    /// `InvalidAddress`, `EmptyKey`, `InvalidSignatureLength`, `InvalidExpiry`,
    /// checked in that order.
    pub fn publish(
        &mut self,
        owner: Address,
        params: PublishKeysParams,
        now: Timestamp,
        events: &mut dyn EventSink,
    ) -> Result<(), KeyDirectoryError> {
        if is_zero_address(&owner) {
            return Err(KeyDirectoryError::InvalidAddress);
        }
        for (field, key) in [
            ("identity_dh_key", &params.identity_dh_key),
            ("identity_sign_key", &params.identity_sign_key),
            ("signed_pre_key", &params.signed_pre_key),
        ] {
            if *key == [0u8; 32] {
                return Err(KeyDirectoryError::EmptyKey { field });
            }
        }
        if params.signature.is_empty() || params.signature.len() > MAX_SIGNATURE_LEN {
            return Err(KeyDirectoryError::InvalidSignatureLength {
                actual: params.signature.len(),
            });
        }

        let bundle = KeyBundle {
            identity_dh_key: params.identity_dh_key,
            identity_sign_key: params.identity_sign_key,
            signed_pre_key: params.signed_pre_key,
            signature: params.signature,
            expires_at: params.expires_at,
            updated_at: now,
        };
        if bundle.is_expired_at(now) {
            return Err(KeyDirectoryError::InvalidExpiry {
                expires_at: bundle.expires_at,
                now,
            });
        }

        let replaced = self.bundles.insert(owner, bundle).is_some();

        info!(owner = %short_hex(&owner), replaced, "Key bundle published");
        events.emit(RideEvent::KeysPublished { owner });
        Ok(())
    }

    /// Returns `owner`'s bundle, or the zero bundle if none was published.
    #[must_use]
    pub fn get(&self, owner: &Address) -> KeyBundle {
        self.bundles.get(owner).cloned().unwrap_or_default()
    }
}
