//! # veil-store — Credential Persistence Contract
//!
//! The keyed store the credential pipeline persists its state into.
//! The pipeline never assumes a write succeeded without an explicit
//! success result, and it persists after every protocol transition —
//! that is what makes a drive cycle resumable after process death.
//!
//! ## Contract
//!
//! - All operations are `async` and return `Result<_, StoreError>`.
//! - Re-applying the same status via [`CredentialStore::update_status`]
//!   is a no-op success (idempotent under retry of the same transition).
//! - The backend provides per-key atomicity: a get-then-update on one
//!   trigger key behaves as if serialized.
//! - [`CredentialStore::mark_tokens_spent`] is atomic over its token
//!   set: all listed tokens become spent or none do.
//!
//! [`MemoryStore`] is the reference backend; embedding applications
//! provide their own implementation over whatever engine they use.

pub mod memory;
pub mod store;

pub use memory::MemoryStore;
pub use store::CredentialStore;
