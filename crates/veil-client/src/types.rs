//! # Wire Types for the Promotion Server
//!
//! Request and response bodies, one struct per endpoint shape. These
//! are transport shapes only — the domain model lives in `veil-core`
//! and is mapped at the client boundary.

use serde::{Deserialize, Serialize};

use veil_core::{CredentialsRedeem, RedeemKind};

/// Body of the claim request: the blinded tokens for one trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRequest {
    /// Ordered blinded token strings.
    pub blinded_creds: Vec<String>,
}

/// Response to a claim request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimResponse {
    /// Server-issued claim correlation id.
    pub claim_id: String,
}

/// Response carrying the signed credential batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedBatchResponse {
    /// Ordered signed token strings, parallel to the submitted
    /// blinded tokens.
    pub signed_creds: Vec<String>,
    /// The signing key the server used.
    pub public_key: String,
    /// Batch-correctness proof over the signed tokens.
    pub batch_proof: String,
}

/// One spendable credential inside a redemption request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPayload {
    /// The unblinded token value.
    pub unblinded_value: String,
    /// The signer key the token verifies under.
    pub public_key: String,
}

/// Body of a redemption (spend or drain) request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemRequest {
    /// What the tokens are redeemed for.
    pub kind: RedeemKind,
    /// The credentials being spent.
    pub credentials: Vec<TokenPayload>,
    /// Destination publisher key; absent for transfers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_key: Option<String>,
    /// Correlation id attributing the spend to a contribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribution_id: Option<String>,
}

impl From<&CredentialsRedeem> for RedeemRequest {
    fn from(redeem: &CredentialsRedeem) -> Self {
        Self {
            kind: redeem.kind,
            credentials: redeem
                .token_list
                .iter()
                .map(|t| TokenPayload {
                    unblinded_value: t.unblinded_value.clone(),
                    public_key: t.public_key.clone(),
                })
                .collect(),
            publisher_key: redeem.publisher_key.clone(),
            contribution_id: redeem.contribution_id.clone(),
        }
    }
}

/// Response to a drain request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrainResponse {
    /// Correlation id for the transfer.
    pub drain_id: String,
}
