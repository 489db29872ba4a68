//! # Promotion Transport Trait
//!
//! The seam between the credential pipeline and the promotion server.
//! The pipeline depends only on these request/response contracts and on
//! [`ClientError::is_retryable`] — it never inspects HTTP details.
//!
//! [`ClientError`]: crate::error::ClientError

use veil_core::{ClaimId, CredentialsRedeem, DrainId, TriggerId};

use crate::error::ClientError;
use crate::types::SignedBatchResponse;

/// Signed requests against the promotion server.
#[allow(async_fn_in_trait)]
pub trait PromotionTransport: Send + Sync {
    /// Submit blinded tokens to claim a promotion. Returns the
    /// server-issued claim id.
    async fn claim(
        &self,
        trigger_id: &TriggerId,
        blinded_creds: &[String],
    ) -> Result<ClaimId, ClientError>;

    /// Fetch the signed credential batch for a completed claim.
    ///
    /// Resolves to [`ClientError::NotReady`] while the server is still
    /// signing — a retryable condition.
    async fn fetch_signed_batch(
        &self,
        trigger_id: &TriggerId,
        claim_id: &ClaimId,
    ) -> Result<SignedBatchResponse, ClientError>;

    /// Submit a token redemption (contribution or tip).
    async fn submit_redemption(&self, redeem: &CredentialsRedeem) -> Result<(), ClientError>;

    /// Submit a drain (transfer) redemption. Returns the drain
    /// correlation id.
    async fn submit_drain(&self, redeem: &CredentialsRedeem) -> Result<DrainId, ClientError>;
}
