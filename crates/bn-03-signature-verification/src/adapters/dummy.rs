use crate::ports::SignatureVerifier;
use shared_types::sha384;

/// Deterministic verifier for fixtures: a signature is valid when it equals
/// `SHA-384(hash)`.
///
/// Not a security boundary. Anyone can produce a "valid" signature.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignatureVerifierDummy;

impl SignatureVerifier for SignatureVerifierDummy {
    fn verify_signature(&self, hash: &[u8], signature: &[u8]) -> bool {
        sha384(hash) == signature
    }
}
