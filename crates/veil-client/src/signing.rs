//! # Request Signing
//!
//! Ed25519 signing for mutating promotion server requests. The server
//! authenticates a request by verifying the signature over the payload
//! digest against the wallet's registered public key.
//!
//! The signing key is never serialized or logged; [`RequestSigner`]
//! does not implement `Serialize` and exposes only the public half.

use ed25519_dalek::{Signer, SigningKey};
use sha2::{Digest, Sha256};

/// Signs request payloads with an Ed25519 key.
pub struct RequestSigner {
    signing_key: SigningKey,
    key_id: String,
}

impl RequestSigner {
    /// Build a signer from raw secret key bytes.
    pub fn from_secret_bytes(secret: [u8; 32], key_id: impl Into<String>) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&secret),
            key_id: key_id.into(),
        }
    }

    /// Generate a signer with a fresh random key.
    pub fn generate(key_id: impl Into<String>) -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::rngs::OsRng),
            key_id: key_id.into(),
        }
    }

    /// The key id sent alongside signatures.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Hex encoding of the public verification key.
    pub fn public_key_hex(&self) -> String {
        self.signing_key
            .verifying_key()
            .to_bytes()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// Produce the `digest` and `signature` header values for a request
    /// body.
    ///
    /// The digest is `SHA-256=<hex>` over the body; the signature is an
    /// Ed25519 signature over the digest line, tagged with the key id.
    pub fn sign_body(&self, body: &[u8]) -> SignedHeaders {
        let digest = Sha256::digest(body);
        let digest_hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        let digest_header = format!("SHA-256={digest_hex}");

        let signing_payload = format!("digest: {digest_header}");
        let signature = self.signing_key.sign(signing_payload.as_bytes());
        let signature_hex: String = signature
            .to_bytes()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();

        SignedHeaders {
            digest: digest_header,
            signature: format!(
                "keyId=\"{}\",algorithm=\"ed25519\",signature=\"{signature_hex}\"",
                self.key_id
            ),
        }
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret key must never surface in debug output.
        f.debug_struct("RequestSigner")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

/// Header values produced by [`RequestSigner::sign_body`].
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    /// `digest` header value.
    pub digest: String,
    /// `signature` header value.
    pub signature: String,
}
