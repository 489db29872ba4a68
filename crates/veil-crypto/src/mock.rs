//! # Mock Unblinding
//!
//! Deterministic unblinding that bypasses the batch-proof check. Used
//! when the consuming flow is explicitly configured for testing —
//! selection is always a configuration decision, never inferred from the
//! data being processed.
//!
//! ## Security Notice
//!
//! `unblind_unchecked` performs NO proof verification. Tokens produced
//! through this path are derived from the blinding secrets alone and
//! carry no unforgeability guarantee.

use veil_core::CryptoError;

use crate::digest::sha256_hex;
use crate::scheme::{BlindTokenScheme, BlindedBatch, SeedMaterial};

const MOCK_TAG: &[u8] = b"veil/mock/v1";

/// Deterministically derive one unblinded value per blinding secret,
/// skipping proof verification entirely.
///
/// # Errors
///
/// An empty secret list is malformed — there is nothing to unblind.
pub fn unblind_unchecked(secrets: &[String]) -> Result<Vec<String>, CryptoError> {
    if secrets.is_empty() {
        return Err(CryptoError::MalformedInput(
            "no blinding secrets to unblind with".into(),
        ));
    }
    Ok(secrets
        .iter()
        .map(|secret| sha256_hex(&[MOCK_TAG, secret.as_bytes()]))
        .collect())
}

/// Mock scheme: deterministic blinding, proof-free unblinding.
///
/// Satisfies [`BlindTokenScheme`] so test harnesses can swap it in for
/// the production scheme at compile time.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockTokenScheme;

impl BlindTokenScheme for MockTokenScheme {
    fn blind(&self, count: usize, seed: &SeedMaterial) -> Result<BlindedBatch, CryptoError> {
        // Random seeds collapse to a fixed one so mock output is always
        // reproducible.
        let fixed = match seed {
            SeedMaterial::Fixed(s) => *s,
            SeedMaterial::Random => [0u8; 32],
        };
        crate::hashed::HashedTokenScheme.blind(count, &SeedMaterial::Fixed(fixed))
    }

    fn unblind(
        &self,
        secrets: &[String],
        signed_creds: &[String],
        _batch_proof: &str,
        _public_key: &str,
    ) -> Result<Vec<String>, CryptoError> {
        if secrets.len() != signed_creds.len() {
            return Err(CryptoError::MalformedInput(format!(
                "secret/signed length mismatch: {} vs {}",
                secrets.len(),
                signed_creds.len()
            )));
        }
        unblind_unchecked(secrets)
    }
}
