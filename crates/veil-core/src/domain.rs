//! # Credential Pipeline Domain Model
//!
//! The types that a credential batch carries through the acquisition
//! protocol, plus the promotion and token records that surround it.
//!
//! ## Batch lifecycle
//!
//! ```text
//! None ──▶ Blinded ──▶ Claimed ──▶ Signed ──▶ Finished
//!            │            │           │
//!            └────────────┴───────────┴──▶ Corrupted (sink)
//! ```
//!
//! Status only advances forward in the order above. A batch whose
//! persisted payload fails a structural check is either reset to the
//! last safe earlier status by the state machine (and re-driven) or, if
//! no safe status exists, moved to `Corrupted` — a terminal sink.

use serde::{Deserialize, Serialize};

use crate::identity::{ClaimId, CredsId, TokenId, TriggerId};
use crate::temporal::Timestamp;

// ─── Trigger ─────────────────────────────────────────────────────────

/// Why credentials are being acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Claiming a promotion grant.
    Promotion,
    /// Acquiring credentials to redeem a contribution.
    Contribution,
    /// Claiming earnings granted for viewing ads.
    AdGrant,
}

impl TriggerKind {
    /// String representation of this trigger kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Promotion => "promotion",
            Self::Contribution => "contribution",
            Self::AdGrant => "ad_grant",
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one credential acquisition: the originating entity and the
/// reason. Immutable; passed by value through the pipeline. The pair
/// `(id, kind)` is the unit of single-flight serialization and the key
/// under which the batch is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialTrigger {
    /// Stable identifier of the originating entity (e.g. promotion id).
    pub id: TriggerId,
    /// The reason credentials are requested.
    pub kind: TriggerKind,
}

impl CredentialTrigger {
    /// Build a trigger from its parts.
    pub fn new(id: TriggerId, kind: TriggerKind) -> Self {
        Self { id, kind }
    }
}

impl std::fmt::Display for CredentialTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

// ─── Batch status ────────────────────────────────────────────────────

/// Lifecycle status of a credential batch.
///
/// Ordering is protocol order; [`BatchStatus::rank`] exposes it for
/// monotonicity checks. `Corrupted` has no rank — it is a sink, not a
/// protocol step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// No protocol work done yet.
    None,
    /// Blinded tokens generated and persisted.
    Blinded,
    /// Claim submitted; server-issued claim id stored on the promotion.
    Claimed,
    /// Signed tokens received from the server and persisted.
    Signed,
    /// Tokens unblinded and ready to spend (terminal).
    Finished,
    /// Batch data failed a validity check with no safe earlier status
    /// (terminal).
    Corrupted,
}

impl BatchStatus {
    /// Position in the forward protocol order, if this status is a
    /// protocol step.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Self::None => Some(0),
            Self::Blinded => Some(1),
            Self::Claimed => Some(2),
            Self::Signed => Some(3),
            Self::Finished => Some(4),
            Self::Corrupted => None,
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Corrupted)
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::None => "NONE",
            Self::Blinded => "BLINDED",
            Self::Claimed => "CLAIMED",
            Self::Signed => "SIGNED",
            Self::Finished => "FINISHED",
            Self::Corrupted => "CORRUPTED",
        };
        f.write_str(s)
    }
}

// ─── Credential batch ────────────────────────────────────────────────

/// The unit of protocol state: one batch of credentials tied to one
/// trigger.
///
/// Owned by the credential store; the state machine holds only transient
/// copies during a single drive cycle. `creds` holds the blinding
/// secrets in the same order as `blinded_creds`; `signed_creds` must
/// match that length whenever status is `Signed` or later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialBatch {
    /// Internal correlation id for this batch.
    pub creds_id: CredsId,
    /// The trigger this batch belongs to.
    pub trigger_id: TriggerId,
    /// The trigger kind this batch belongs to.
    pub trigger_kind: TriggerKind,
    /// Current lifecycle status.
    pub status: BatchStatus,
    /// Ordered blinding secrets, parallel to `blinded_creds`.
    pub creds: Vec<String>,
    /// Ordered blinded token strings sent to the server.
    pub blinded_creds: Vec<String>,
    /// Ordered signed token strings returned by the server; parallel to
    /// `blinded_creds` once present.
    pub signed_creds: Vec<String>,
    /// The server signing key that produced `signed_creds`.
    pub public_key: String,
    /// Opaque batch-correctness proof from the signer.
    pub batch_proof: String,
}

impl CredentialBatch {
    /// Start a fresh batch for a trigger, before any protocol work.
    pub fn new(trigger: &CredentialTrigger) -> Self {
        Self {
            creds_id: CredsId::new(),
            trigger_id: trigger.id.clone(),
            trigger_kind: trigger.kind,
            status: BatchStatus::None,
            creds: Vec::new(),
            blinded_creds: Vec::new(),
            signed_creds: Vec::new(),
            public_key: String::new(),
            batch_proof: String::new(),
        }
    }

    /// The trigger this batch is keyed under.
    pub fn trigger(&self) -> CredentialTrigger {
        CredentialTrigger::new(self.trigger_id.clone(), self.trigger_kind)
    }

    /// Token count invariant: whenever status is `Signed` or later, the
    /// signed and blinded sequences must have equal length. A batch that
    /// violates this must transition to `Corrupted`.
    pub fn counts_consistent(&self) -> bool {
        match self.status.rank() {
            Some(r) if r >= 3 => self.signed_creds.len() == self.blinded_creds.len(),
            _ => true,
        }
    }
}

// ─── Promotion ───────────────────────────────────────────────────────

/// Kind of server-side promotion campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionKind {
    /// A user grant promotion; tokens expire with the promotion.
    Grant,
    /// Ad-earnings promotion. Tokens minted for these promotions carry
    /// no expiry.
    Ads,
}

/// Server-side campaign record. Read-only from the pipeline's
/// perspective except `claim_id`, written once by the claim step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    /// The promotion id (the trigger id for promotion-claim triggers).
    pub id: TriggerId,
    /// Campaign kind.
    pub kind: PromotionKind,
    /// Claim correlation id; absent until the claim step completes.
    pub claim_id: Option<ClaimId>,
    /// Allow-list of signer public keys this promotion trusts.
    pub public_keys: Vec<String>,
    /// Total approximate value of the promotion.
    pub approximate_value: f64,
    /// Number of suggestions (tokens) the promotion divides into.
    pub suggestions: u64,
    /// When the promotion (and its tokens) expire.
    pub expires_at: Option<Timestamp>,
}

impl Promotion {
    /// The claim id, if the claim step has completed with a non-empty id.
    ///
    /// An empty string from the server carries no claim.
    pub fn effective_claim_id(&self) -> Option<&ClaimId> {
        self.claim_id.as_ref().filter(|c| !c.is_empty())
    }

    /// Per-token value: `approximate_value / suggestions`.
    ///
    /// `None` when `suggestions` is zero — such a promotion is corrupted
    /// and must not mint tokens.
    pub fn token_value(&self) -> Option<f64> {
        if self.suggestions == 0 {
            return None;
        }
        Some(self.approximate_value / self.suggestions as f64)
    }

    /// Expiry to stamp on tokens minted from this promotion.
    ///
    /// Ads promotions are exempt from expiry — their tokens never
    /// expire. All other kinds use the promotion's stated expiry.
    pub fn token_expiry(&self) -> Option<Timestamp> {
        match self.kind {
            PromotionKind::Ads => None,
            _ => self.expires_at,
        }
    }
}

// ─── Unblinded token ─────────────────────────────────────────────────

/// The redeemable artifact: one unblinded, spendable token.
///
/// `spent` is set exactly once by the redemption engine and never unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnblindedToken {
    /// Token identifier.
    pub token_id: TokenId,
    /// Opaque unblinded token value, cryptographically derived.
    pub unblinded_value: String,
    /// The signer public key the token verifies under.
    pub public_key: String,
    /// Numeric worth of this token.
    pub value: f64,
    /// When the token expires, if ever.
    pub expires_at: Option<Timestamp>,
    /// Whether the token has been spent.
    pub spent: bool,
}

// ─── Redemption request ──────────────────────────────────────────────

/// What a set of tokens is being redeemed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedeemKind {
    /// Automatic contribution to publishers.
    Contribution,
    /// A direct tip to a publisher.
    Tip,
    /// Transfer of token value out of the wallet (drain path).
    Transfer,
}

impl RedeemKind {
    /// String representation of this redemption kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contribution => "contribution",
            Self::Tip => "tip",
            Self::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for RedeemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ephemeral request to spend a set of unblinded tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialsRedeem {
    /// Redemption kind; `Transfer` uses the drain path.
    pub kind: RedeemKind,
    /// The tokens to spend. Must be non-empty.
    pub token_list: Vec<UnblindedToken>,
    /// Destination publisher key; required unless `kind` is `Transfer`.
    pub publisher_key: Option<String>,
    /// Optional correlation id attributing the spend to a contribution.
    pub contribution_id: Option<String>,
}

impl CredentialsRedeem {
    /// The ids of every token in the request, in order.
    pub fn token_ids(&self) -> Vec<TokenId> {
        self.token_list.iter().map(|t| t.token_id).collect()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
