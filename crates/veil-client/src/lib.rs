//! # veil-client — Promotion Server Transport
//!
//! Typed Rust HTTP client for the promotion server: token claim,
//! signed-credential fetch, and the two redemption endpoints (spend and
//! drain).
//!
//! ## Architecture
//!
//! [`HttpPromotionClient`] wraps a `reqwest::Client` with the configured
//! base URL, per-request timeout, and optional ed25519 request signing.
//! It is `Send + Sync` and designed to be shared via `Arc` across async
//! tasks. The [`PromotionTransport`] trait is the seam the credential
//! flow depends on; test harnesses substitute scripted fakes.
//!
//! ## Error Handling
//!
//! Every error carries the endpoint, and — for API rejections — the
//! HTTP status and a body excerpt. [`ClientError::is_retryable`] is the
//! transport's own retry classification; callers honor it without
//! reinterpretation.
//!
//! ## Timeout & Retry
//!
//! Connection-level failures are retried with exponential backoff
//! inside the client (`retry` module). Protocol-level retry — the
//! server answering "credentials not ready yet" — is surfaced as a
//! retryable [`ClientError::NotReady`] for the caller to schedule.

pub mod error;
pub mod http;
pub mod signing;
pub mod transport;
pub mod types;

mod retry;

pub use error::ClientError;
pub use http::{ClientConfig, HttpPromotionClient};
pub use signing::RequestSigner;
pub use transport::PromotionTransport;
pub use types::{ClaimRequest, ClaimResponse, DrainResponse, RedeemRequest, SignedBatchResponse};
