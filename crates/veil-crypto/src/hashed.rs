//! # Hashed Token Scheme
//!
//! SHA-256 transcript implementation of [`BlindTokenScheme`].
//!
//! Token secrets are 32 random bytes (or derived from a fixed seed);
//! blinded tokens are domain-separated digests of the secrets. The batch
//! proof binds the signer public key to the exact sequence of signed
//! tokens, so any substitution or reordering of the signed batch fails
//! verification before a single token is unblinded.
//!
//! Domain separation tags keep the three derivations disjoint: a blinded
//! token can never collide with an unblinded value for the same secret.

use rand::RngCore;
use zeroize::Zeroize;

use veil_core::CryptoError;

use crate::digest::sha256_hex;
use crate::scheme::{BlindTokenScheme, BlindedBatch, SeedMaterial};

const BLIND_TAG: &[u8] = b"veil/blind/v1";
const UNBLIND_TAG: &[u8] = b"veil/unblind/v1";
const PROOF_TAG: &[u8] = b"veil/proof/v1";

/// SHA-256 transcript blind-token scheme.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashedTokenScheme;

impl HashedTokenScheme {
    /// Compute the batch proof binding `public_key` to `signed_creds`.
    ///
    /// This is the signer-side transcript; it is exposed so stub signers
    /// and test fixtures can produce batches that verify.
    pub fn batch_proof(public_key: &str, signed_creds: &[String]) -> String {
        let mut parts: Vec<&[u8]> = vec![PROOF_TAG, public_key.as_bytes()];
        for signed in signed_creds {
            parts.push(signed.as_bytes());
        }
        sha256_hex(&parts)
    }

    fn secret_bytes(seed: &SeedMaterial, index: usize) -> [u8; 32] {
        match seed {
            SeedMaterial::Random => {
                let mut bytes = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut bytes);
                bytes
            }
            SeedMaterial::Fixed(seed) => {
                let index_bytes = (index as u64).to_le_bytes();
                let hex = sha256_hex(&[seed, &index_bytes]);
                // The hex digest is 64 chars; fold it back into raw bytes.
                let mut bytes = [0u8; 32];
                for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
                    let hi = (chunk[0] as char).to_digit(16).unwrap_or(0) as u8;
                    let lo = (chunk[1] as char).to_digit(16).unwrap_or(0) as u8;
                    bytes[i] = (hi << 4) | lo;
                }
                bytes
            }
        }
    }
}

impl BlindTokenScheme for HashedTokenScheme {
    fn blind(&self, count: usize, seed: &SeedMaterial) -> Result<BlindedBatch, CryptoError> {
        if count == 0 {
            return Err(CryptoError::MalformedInput(
                "cannot blind an empty batch".into(),
            ));
        }

        let mut tokens = Vec::with_capacity(count);
        let mut blinded_creds = Vec::with_capacity(count);
        for index in 0..count {
            let mut secret = Self::secret_bytes(seed, index);
            let secret_hex: String = secret.iter().map(|b| format!("{b:02x}")).collect();
            let blinded = sha256_hex(&[BLIND_TAG, secret_hex.as_bytes()]);
            secret.zeroize();

            tokens.push(secret_hex);
            blinded_creds.push(blinded);
        }

        Ok(BlindedBatch {
            tokens,
            blinded_creds,
        })
    }

    fn unblind(
        &self,
        secrets: &[String],
        signed_creds: &[String],
        batch_proof: &str,
        public_key: &str,
    ) -> Result<Vec<String>, CryptoError> {
        if secrets.is_empty() {
            return Err(CryptoError::MalformedInput(
                "no blinding secrets to unblind with".into(),
            ));
        }
        if secrets.len() != signed_creds.len() {
            return Err(CryptoError::MalformedInput(format!(
                "secret/signed length mismatch: {} vs {}",
                secrets.len(),
                signed_creds.len()
            )));
        }

        let expected = Self::batch_proof(public_key, signed_creds);
        if expected != batch_proof {
            return Err(CryptoError::ProofVerification(
                "batch proof does not match signed tokens and public key".into(),
            ));
        }

        Ok(secrets
            .iter()
            .zip(signed_creds)
            .map(|(secret, signed)| {
                sha256_hex(&[UNBLIND_TAG, secret.as_bytes(), signed.as_bytes()])
            })
            .collect())
    }
}
