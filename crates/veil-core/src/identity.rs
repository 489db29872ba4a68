//! # Identifier Newtypes
//!
//! Newtype wrappers for the identifiers that travel through the
//! credential pipeline. Type-level distinction prevents cross-namespace
//! confusion — a server-issued claim id can never be substituted for a
//! locally generated batch id.
//!
//! Server-issued identifiers (`TriggerId`, `ClaimId`, `DrainId`) are
//! string-backed and opaque. Locally generated correlation ids
//! (`CredsId`, `TokenId`) are UUIDs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of the entity a credential batch is acquired for
/// (for promotion-claim triggers this is the promotion id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerId(pub String);

/// Server-issued correlation id returned by the claim step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimId(pub String);

/// Internal correlation id for a credential batch, generated locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredsId(pub Uuid);

/// Identifier for an unblinded token, generated locally when a batch
/// reaches its finished state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(pub Uuid);

/// Server-issued correlation id returned by a drain (transfer) redemption.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrainId(pub String);

impl TriggerId {
    /// Wrap a raw trigger identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ClaimId {
    /// Wrap a raw claim identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A claim id the server returned as an empty string carries no
    /// claim — the claim step has to be redone.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl CredsId {
    /// Generate a new random batch correlation id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl TokenId {
    /// Generate a new random token identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl DrainId {
    /// Wrap a raw drain identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CredsId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for TokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TriggerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for CredsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "creds:{}", self.0)
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "token:{}", self.0)
    }
}

impl std::fmt::Display for DrainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
