use crate::domain::errors::KeyError;
use crate::ports::SignatureVerifier;
use ed25519_dalek::{Signature, VerifyingKey, PUBLIC_KEY_LENGTH};
use tracing::trace;

/// Production verifier: ed25519 signature over the block hash under the
/// ledger public key.
#[derive(Debug, Clone)]
pub struct Ed25519SignatureVerifier {
    ledger_key: VerifyingKey,
}

impl Ed25519SignatureVerifier {
    #[must_use]
    pub fn new(ledger_key: VerifyingKey) -> Self {
        Self { ledger_key }
    }

    /// # Errors
    ///
    /// `KeyError::InvalidLength` or `KeyError::InvalidKey`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; PUBLIC_KEY_LENGTH] =
            bytes.try_into().map_err(|_| KeyError::InvalidLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: bytes.len(),
            })?;
        let key = VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidKey)?;
        Ok(Self::new(key))
    }

    /// Parse a hex encoded public key, as found in configuration.
    ///
    /// # Errors
    ///
    /// `KeyError::InvalidHex` plus the errors of [`Self::from_bytes`].
    pub fn from_hex(encoded: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(encoded.trim())?;
        Self::from_bytes(&bytes)
    }

    #[must_use]
    pub fn ledger_key(&self) -> &VerifyingKey {
        &self.ledger_key
    }
}

impl SignatureVerifier for Ed25519SignatureVerifier {
    fn verify_signature(&self, hash: &[u8], signature: &[u8]) -> bool {
        let Ok(signature) = Signature::from_slice(signature) else {
            trace!(length = signature.len(), "Malformed signature");
            return false;
        };
        self.ledger_key.verify_strict(hash, &signature).is_ok()
    }
}
