//! # Shared Error Types
//!
//! Low-level errors shared across the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Cryptographic errors fail loudly with full context and are never
//! silently partial — an unblinding that cannot verify its proof yields
//! an error and no tokens.

use thiserror::Error;

/// Error in blind-token cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The batch proof did not verify against the signed tokens and
    /// signer public key.
    #[error("batch proof verification failed: {0}")]
    ProofVerification(String),

    /// Inputs are structurally invalid (length mismatch, empty batch,
    /// undecodable token material).
    #[error("malformed credential material: {0}")]
    MalformedInput(String),

    /// Key generation or parsing failed.
    #[error("key error: {0}")]
    KeyError(String),
}

/// Error from the credential store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A record required by the operation does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A token in a spend set is already spent. The whole spend is
    /// rejected — no partial spend is applied.
    #[error("token already spent: {token_id}")]
    AlreadySpent {
        /// The offending token.
        token_id: String,
    },

    /// The operation conflicts with existing state.
    #[error("store conflict: {0}")]
    Conflict(String),
}
