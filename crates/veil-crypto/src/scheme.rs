//! # Blind-Token Scheme Trait
//!
//! Abstract interface for the blind-signature exchange. All
//! implementations must satisfy this trait; the credential flow is
//! generic over it.
//!
//! ## Contract
//!
//! - `blind` is pure and deterministic given [`SeedMaterial::Fixed`];
//!   with [`SeedMaterial::Random`] the output is cryptographically
//!   randomized.
//! - `unblind` is all-or-nothing: it either returns one unblinded value
//!   per signed token, in order, or fails with a [`CryptoError`] and
//!   returns nothing. There is no partial output.
//!
//! The trait requires `Send + Sync` for safe concurrent use. Both
//! operations are CPU-bound pure functions with no side effects.

use veil_core::CryptoError;

/// Seed material for blinded-token generation.
#[derive(Debug, Clone)]
pub enum SeedMaterial {
    /// Draw token secrets from the operating system's CSPRNG.
    Random,
    /// Derive token secrets deterministically from a fixed seed.
    /// Used by tests and fixtures that need reproducible batches.
    Fixed([u8; 32]),
}

/// Output of the blinding step: blinding secrets and the blinded tokens
/// derived from them, in matching order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlindedBatch {
    /// The blinding secrets. Persisted with the batch; required to
    /// unblind the signed tokens later.
    pub tokens: Vec<String>,
    /// The blinded token strings submitted to the signer.
    pub blinded_creds: Vec<String>,
}

/// Abstract interface for a blind-token scheme.
pub trait BlindTokenScheme: Send + Sync {
    /// Generate `count` blinded tokens from the given seed material.
    ///
    /// # Errors
    ///
    /// `count == 0` is rejected as malformed input.
    fn blind(&self, count: usize, seed: &SeedMaterial) -> Result<BlindedBatch, CryptoError>;

    /// Unblind `signed_creds` using the stored blinding `secrets`,
    /// verifying `batch_proof` against the signer `public_key` first.
    ///
    /// # Errors
    ///
    /// Fails if the proof does not verify or the inputs are malformed
    /// (length mismatch, empty batch). Never returns a partial result.
    fn unblind(
        &self,
        secrets: &[String],
        signed_creds: &[String],
        batch_proof: &str,
        public_key: &str,
    ) -> Result<Vec<String>, CryptoError>;
}
