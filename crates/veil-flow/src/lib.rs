//! # veil-flow — Credential State Machine & Redemption Engine
//!
//! The orchestrator of the blinded-credential protocol. A drive cycle
//! takes a credential batch through
//!
//! ```text
//! None ──▶ Blinded ──▶ Claimed ──▶ Signed ──▶ Finished
//! ```
//!
//! persisting after every transition, so a cycle interrupted by process
//! death simply resumes from the last persisted status on the next
//! invocation. Completed cryptographic work is never redone.
//!
//! ## Outcomes
//!
//! Callers receive one of three outcomes:
//!
//! - `Ok(Resolution::Finished)` — the batch is done; tokens are ready.
//! - `Ok(Resolution::Retry)` — re-invoke after a delay; the flow resumes
//!   from the persisted status. Scheduling and backoff are the caller's
//!   responsibility; the flow performs none itself.
//! - `Err(FlowError)` — terminal for this attempt.
//!
//! ## Capabilities
//!
//! Each component depends only on narrow injected capabilities: the
//! credential store, the promotion transport, the blind-token scheme,
//! and the tokens-ready observer. Nothing holds a back-reference to a
//! wider engine.

pub mod error;
pub mod machine;
pub mod observer;
pub mod redeem;

pub use error::{FlowError, Resolution};
pub use machine::{CredentialFlow, FlowOptions};
pub use observer::{NoopObserver, TokensReadyObserver};
pub use redeem::RedemptionEngine;
