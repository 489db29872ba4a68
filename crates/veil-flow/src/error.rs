//! # Flow Outcomes and Errors
//!
//! The error taxonomy the pipeline exposes to callers:
//!
//! - **FAILED** — any [`FlowError`]. Terminal for this attempt; the
//!   caller may retry the whole operation later.
//! - **RETRY** — [`Resolution::Retry`]. Protocol-level signal: re-drive
//!   soon, resuming from persisted state.
//!
//! Cryptographic verification failures (bad proof, signer key not on
//! the allow-list) are always FAILED, never auto-retried — retrying
//! without operator intervention cannot succeed. Storage errors are
//! always FAILED. Transport errors surface as RETRY or FAILED according
//! to the transport's own classification, which the flow honors without
//! reinterpretation.

use thiserror::Error;

use veil_client::ClientError;
use veil_core::{CryptoError, StoreError};

/// Successful outcome of a drive cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The batch reached its finished state; tokens are ready.
    Finished,
    /// Re-invoke after a delay; the flow resumes from persisted status.
    Retry,
}

/// Terminal failure of a drive cycle or redemption.
#[derive(Error, Debug)]
pub enum FlowError {
    /// The store failed or rejected a read/write.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Cryptographic operation failed (blinding, proof verification,
    /// unblinding).
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The transport failed with a non-retryable error.
    #[error("transport error: {0}")]
    Transport(#[from] ClientError),

    /// The signer public key is not on the promotion's allow-list —
    /// a compromised channel or protocol version mismatch.
    #[error("signer public key {public_key:?} is not trusted by the promotion")]
    PublicKeyRejected {
        /// The rejected key.
        public_key: String,
    },

    /// No batch is persisted for the trigger where one is required.
    #[error("no credential batch for trigger {trigger}")]
    MissingBatch {
        /// The trigger being driven.
        trigger: String,
    },

    /// No promotion record backs the trigger.
    #[error("no promotion record for trigger {trigger}")]
    MissingPromotion {
        /// The trigger being driven.
        trigger: String,
    },

    /// Batch data failed structural validation with no safe earlier
    /// status to reset to.
    #[error("credential batch corrupted: {0}")]
    CorruptedBatch(String),

    /// The redemption request failed a precondition.
    #[error("invalid redemption request: {0}")]
    InvalidRedeem(&'static str),

    /// The flow was shut down by its owner; no further effects are
    /// applied.
    #[error("credential flow is shut down")]
    Shutdown,
}
