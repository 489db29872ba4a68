//! # Credential Store Trait
//!
//! The persistence capability the credential flow and redemption engine
//! depend on. Implementations own the records; callers hold only
//! transient copies during a single drive cycle.

use veil_core::{
    BatchStatus, ClaimId, CredentialBatch, CredentialTrigger, Promotion, RedeemKind, StoreError,
    TokenId, TriggerId, UnblindedToken,
};

/// Keyed persistence for credential batches, promotions, and unblinded
/// tokens.
///
/// Every operation suspends and reports success explicitly. Writes must
/// be durable before the call resolves — the flow persists each
/// transition before starting the next step.
#[allow(async_fn_in_trait)]
pub trait CredentialStore: Send + Sync {
    /// Fetch the batch for a trigger, if one exists.
    async fn get_batch(
        &self,
        trigger: &CredentialTrigger,
    ) -> Result<Option<CredentialBatch>, StoreError>;

    /// Insert or replace the batch stored under its trigger key.
    async fn save_batch(&self, batch: CredentialBatch) -> Result<(), StoreError>;

    /// Set the batch's lifecycle status.
    ///
    /// Idempotent: re-applying the current status succeeds without
    /// effect. Fails with [`StoreError::NotFound`] when no batch exists
    /// for the trigger.
    async fn update_status(
        &self,
        trigger: &CredentialTrigger,
        status: BatchStatus,
    ) -> Result<(), StoreError>;

    /// Record the server-issued claim id on the promotion.
    async fn save_claim_id(
        &self,
        promotion_id: &TriggerId,
        claim_id: ClaimId,
    ) -> Result<(), StoreError>;

    /// Persist the signed payload (`signed_creds`, `public_key`,
    /// `batch_proof`) and advance the stored status to
    /// [`BatchStatus::Signed`].
    async fn save_signed_batch(&self, batch: CredentialBatch) -> Result<(), StoreError>;

    /// Terminal bookkeeping: mark the batch finished.
    async fn mark_batch_finished(&self, trigger: &CredentialTrigger) -> Result<(), StoreError>;

    /// Fetch the promotion record backing a trigger, if any.
    async fn get_promotion(&self, id: &TriggerId) -> Result<Option<Promotion>, StoreError>;

    /// Persist freshly unblinded tokens.
    async fn save_unblinded_tokens(&self, tokens: Vec<UnblindedToken>) -> Result<(), StoreError>;

    /// Mark every listed token as spent, attributed to `redeem_id`.
    ///
    /// Atomic over the set: if any token is unknown or already spent,
    /// the whole call fails and no token is marked.
    async fn mark_tokens_spent(
        &self,
        token_ids: &[TokenId],
        kind: RedeemKind,
        redeem_id: &str,
    ) -> Result<(), StoreError>;
}
