//! # Outbound Ports
//!
//! The verification capability. Production and deterministic variants are
//! interchangeable behind this trait and chosen at construction time.

/// Checks a block proof signature against a block hash.
pub trait SignatureVerifier: Send + Sync + 'static {
    /// `true` only if `signature` is valid for `hash`. Malformed input is
    /// `false`, never an error.
    fn verify_signature(&self, hash: &[u8], signature: &[u8]) -> bool;
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for std::sync::Arc<V> {
    fn verify_signature(&self, hash: &[u8], signature: &[u8]) -> bool {
        (**self).verify_signature(hash, signature)
    }
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for Box<V> {
    fn verify_signature(&self, hash: &[u8], signature: &[u8]) -> bool {
        (**self).verify_signature(hash, signature)
    }
}
