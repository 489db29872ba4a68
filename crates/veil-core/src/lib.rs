//! # veil-core — Foundational Types for the Veil Token Pipeline
//!
//! This crate is the bedrock of the Veil stack. It defines the domain
//! model for blinded-credential batches and the primitives every other
//! crate builds on. Every other crate in the workspace depends on
//! `veil-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `TriggerId`, `ClaimId`,
//!    `CredsId`, `TokenId`, `DrainId` — no bare strings or UUIDs cross a
//!    component boundary. You cannot pass a claim id where a trigger id
//!    is expected.
//!
//! 2. **One status enum, explicit rank.** `BatchStatus` encodes the
//!    protocol order `None → Blinded → Claimed → Signed → Finished` with
//!    `Corrupted` as a sink. Forward progress is checkable, not implied.
//!
//! 3. **UTC-only timestamps.** Token expiry uses the `Timestamp` type:
//!    UTC, seconds precision, RFC 3339 `Z` rendering.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `veil-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod domain;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use domain::{
    BatchStatus, CredentialBatch, CredentialTrigger, CredentialsRedeem, Promotion, PromotionKind,
    RedeemKind, TriggerKind, UnblindedToken,
};
pub use error::{CryptoError, StoreError};
pub use identity::{ClaimId, CredsId, DrainId, TokenId, TriggerId};
pub use temporal::Timestamp;
