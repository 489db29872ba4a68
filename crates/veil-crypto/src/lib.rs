//! # veil-crypto — Blind-Token Capability
//!
//! The cryptographic capability the credential pipeline drives:
//! generate blinded tokens from seed material, and unblind signed tokens
//! after verifying the signer's batch proof.
//!
//! ## Design
//!
//! - [`BlindTokenScheme`] is the abstract interface. Implementations are
//!   pure functions with no side effects and are interchangeable at
//!   compile time.
//! - [`HashedTokenScheme`] is the production implementation: a SHA-256
//!   transcript construction whose unblinding is all-or-nothing — a
//!   proof that does not verify yields an error and zero tokens, never a
//!   partial batch.
//! - The `mock` module (feature `mock`, on by default) provides
//!   deterministic unblinding that bypasses the proof check. It is only
//!   reachable through an explicit testing flag on the consuming flow —
//!   never selected based on data.

pub mod hashed;
#[cfg(feature = "mock")]
pub mod mock;
pub mod scheme;

mod digest;

pub use digest::sha256_hex;
pub use hashed::HashedTokenScheme;
#[cfg(feature = "mock")]
pub use mock::MockTokenScheme;
pub use scheme::{BlindTokenScheme, BlindedBatch, SeedMaterial};
