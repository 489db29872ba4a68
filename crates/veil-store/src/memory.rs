//! # In-Memory Store Backend
//!
//! Reference implementation of [`CredentialStore`]: `DashMap`-keyed
//! batch and promotion tables, and a single write-locked token table so
//! multi-token spends are atomic.
//!
//! Cheaply cloneable via `Arc` — all clones share the same data.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

use veil_core::{
    BatchStatus, ClaimId, CredentialBatch, CredentialTrigger, Promotion, RedeemKind, StoreError,
    Timestamp, TokenId, TriggerId, UnblindedToken,
};

use crate::store::CredentialStore;

/// A stored token plus its spend attribution.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    /// The token itself; `token.spent` tracks spend state.
    pub token: UnblindedToken,
    /// What kind of redemption spent the token.
    pub redeem_kind: Option<RedeemKind>,
    /// Correlation id of the spend (contribution id, or empty).
    pub redeem_id: Option<String>,
    /// When the token was spent.
    pub redeemed_at: Option<Timestamp>,
}

struct Inner {
    batches: DashMap<CredentialTrigger, CredentialBatch>,
    promotions: DashMap<TriggerId, Promotion>,
    tokens: RwLock<HashMap<TokenId, TokenRecord>>,
}

/// In-memory [`CredentialStore`] backend.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                batches: DashMap::new(),
                promotions: DashMap::new(),
                tokens: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Seed a promotion record (test and embedding helper).
    pub fn insert_promotion(&self, promotion: Promotion) {
        self.inner.promotions.insert(promotion.id.clone(), promotion);
    }

    /// Fetch one token record, if present.
    pub fn token(&self, id: &TokenId) -> Option<TokenRecord> {
        self.inner.tokens.read().get(id).cloned()
    }

    /// All tokens that are not yet spent.
    pub fn spendable_tokens(&self) -> Vec<UnblindedToken> {
        self.inner
            .tokens
            .read()
            .values()
            .filter(|r| !r.token.spent)
            .map(|r| r.token.clone())
            .collect()
    }

    /// Count of stored tokens, spent or not.
    pub fn token_count(&self) -> usize {
        self.inner.tokens.read().len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryStore {
    async fn get_batch(
        &self,
        trigger: &CredentialTrigger,
    ) -> Result<Option<CredentialBatch>, StoreError> {
        Ok(self.inner.batches.get(trigger).map(|b| b.clone()))
    }

    async fn save_batch(&self, batch: CredentialBatch) -> Result<(), StoreError> {
        self.inner.batches.insert(batch.trigger(), batch);
        Ok(())
    }

    async fn update_status(
        &self,
        trigger: &CredentialTrigger,
        status: BatchStatus,
    ) -> Result<(), StoreError> {
        let mut batch = self
            .inner
            .batches
            .get_mut(trigger)
            .ok_or_else(|| StoreError::NotFound(format!("batch for trigger {trigger}")))?;
        if batch.status == status {
            // Retried transition; already applied.
            return Ok(());
        }
        tracing::debug!(%trigger, from = %batch.status, to = %status, "batch status update");
        batch.status = status;
        Ok(())
    }

    async fn save_claim_id(
        &self,
        promotion_id: &TriggerId,
        claim_id: ClaimId,
    ) -> Result<(), StoreError> {
        let mut promotion = self
            .inner
            .promotions
            .get_mut(promotion_id)
            .ok_or_else(|| StoreError::NotFound(format!("promotion {promotion_id}")))?;
        promotion.claim_id = Some(claim_id);
        Ok(())
    }

    async fn save_signed_batch(&self, batch: CredentialBatch) -> Result<(), StoreError> {
        let trigger = batch.trigger();
        let mut stored = self
            .inner
            .batches
            .get_mut(&trigger)
            .ok_or_else(|| StoreError::NotFound(format!("batch for trigger {trigger}")))?;
        stored.signed_creds = batch.signed_creds;
        stored.public_key = batch.public_key;
        stored.batch_proof = batch.batch_proof;
        stored.status = BatchStatus::Signed;
        Ok(())
    }

    async fn mark_batch_finished(&self, trigger: &CredentialTrigger) -> Result<(), StoreError> {
        let mut batch = self
            .inner
            .batches
            .get_mut(trigger)
            .ok_or_else(|| StoreError::NotFound(format!("batch for trigger {trigger}")))?;
        batch.status = BatchStatus::Finished;
        Ok(())
    }

    async fn get_promotion(&self, id: &TriggerId) -> Result<Option<Promotion>, StoreError> {
        Ok(self.inner.promotions.get(id).map(|p| p.clone()))
    }

    async fn save_unblinded_tokens(&self, tokens: Vec<UnblindedToken>) -> Result<(), StoreError> {
        let mut table = self.inner.tokens.write();
        for token in tokens {
            table.insert(
                token.token_id,
                TokenRecord {
                    token,
                    redeem_kind: None,
                    redeem_id: None,
                    redeemed_at: None,
                },
            );
        }
        Ok(())
    }

    async fn mark_tokens_spent(
        &self,
        token_ids: &[TokenId],
        kind: RedeemKind,
        redeem_id: &str,
    ) -> Result<(), StoreError> {
        let mut table = self.inner.tokens.write();

        // Validate the whole set before touching anything, so a bad
        // token leaves every other token unspent.
        for id in token_ids {
            match table.get(id) {
                None => return Err(StoreError::NotFound(format!("token {id}"))),
                Some(record) if record.token.spent => {
                    return Err(StoreError::AlreadySpent {
                        token_id: id.to_string(),
                    })
                }
                Some(_) => {}
            }
        }

        let now = Timestamp::now();
        for id in token_ids {
            if let Some(record) = table.get_mut(id) {
                record.token.spent = true;
                record.redeem_kind = Some(kind);
                record.redeem_id = Some(redeem_id.to_string());
                record.redeemed_at = Some(now);
            }
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
