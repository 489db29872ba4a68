//! # Credential State Machine
//!
//! Drives a credential batch through the blind → claim → sign → unblind
//! protocol. Each arm of the drive loop persists its result before the
//! next step begins; the loop then re-reads the persisted status, so
//! the same code path handles both fresh progress and resumption after
//! a crash.
//!
//! ## Corruption self-healing
//!
//! When persisted data fails a structural check with a safe earlier
//! status, the batch is reset to that status and the caller gets
//! `Retry` rather than a propagated failure:
//!
//! - `Blinded` with no blinded tokens → reset to `None`.
//! - `Claimed` with no claim id on the promotion → reset to `Blinded`.
//!
//! When no safe earlier status exists — a signed batch whose token
//! counts disagree — the batch transitions to `Corrupted`, a terminal
//! sink.
//!
//! ## Concurrency
//!
//! At most one drive cycle is in flight per `(trigger_id, kind)` pair:
//! concurrent callers serialize on a per-trigger async mutex, and the
//! later caller observes whatever status the earlier one persisted.
//! Distinct triggers drive concurrently; the store provides per-key
//! atomicity.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use veil_client::PromotionTransport;
use veil_core::{
    BatchStatus, CredentialBatch, CredentialTrigger, Promotion, TokenId, UnblindedToken,
};
use veil_crypto::{BlindTokenScheme, SeedMaterial};
use veil_store::CredentialStore;

use crate::error::{FlowError, Resolution};
use crate::observer::TokensReadyObserver;

/// Flow configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowOptions {
    /// When set, unblinding uses the deterministic mock that bypasses
    /// the batch-proof check, and blinding seeds are derived from the
    /// trigger so batches are reproducible. This is a configuration
    /// decision made at construction — never inferred from data.
    pub is_testing: bool,
}

/// What a drive step produced.
enum Step {
    /// The step persisted a forward transition; keep driving.
    Advanced,
    /// The cycle is over with this outcome.
    Resolve(Resolution),
}

/// The credential acquisition orchestrator.
pub struct CredentialFlow<S, T, C> {
    store: S,
    transport: T,
    scheme: C,
    observer: Arc<dyn TokensReadyObserver>,
    options: FlowOptions,
    inflight: DashMap<CredentialTrigger, Arc<Mutex<()>>>,
    closed: AtomicBool,
}

impl<S, T, C> CredentialFlow<S, T, C>
where
    S: CredentialStore,
    T: PromotionTransport,
    C: BlindTokenScheme,
{
    /// Assemble a flow from its capabilities.
    pub fn new(
        store: S,
        transport: T,
        scheme: C,
        observer: Arc<dyn TokensReadyObserver>,
        options: FlowOptions,
    ) -> Self {
        Self {
            store,
            transport,
            scheme,
            observer,
            options,
            inflight: DashMap::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Invalidate the flow on owner teardown. In-flight and future
    /// cycles stop at their next transition boundary without applying
    /// further effects.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Ensure credentials exist for `trigger`, driving the persisted
    /// batch as far forward as the protocol allows right now.
    ///
    /// Returns `Finished` when tokens are ready, `Retry` when the
    /// caller should re-invoke after a delay, and an error when this
    /// attempt failed terminally.
    pub async fn ensure_credentials(
        &self,
        trigger: &CredentialTrigger,
    ) -> Result<Resolution, FlowError> {
        let guard = self
            .inflight
            .entry(trigger.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _cycle = guard.lock().await;
        self.drive(trigger).await
    }

    async fn drive(&self, trigger: &CredentialTrigger) -> Result<Resolution, FlowError> {
        loop {
            self.check_open()?;

            let status = self
                .store
                .get_batch(trigger)
                .await?
                .map(|batch| batch.status)
                .unwrap_or(BatchStatus::None);

            tracing::debug!(%trigger, %status, "driving credential batch");

            let step = match status {
                BatchStatus::None => self.blind(trigger).await?,
                BatchStatus::Blinded => self.claim(trigger).await?,
                BatchStatus::Claimed => self.fetch_signed(trigger).await?,
                BatchStatus::Signed => self.finish(trigger).await?,
                BatchStatus::Finished => Step::Resolve(Resolution::Finished),
                BatchStatus::Corrupted => {
                    return Err(FlowError::CorruptedBatch(
                        "batch was previously marked corrupted".into(),
                    ))
                }
            };

            if let Step::Resolve(resolution) = step {
                return Ok(resolution);
            }
        }
    }

    /// `None` → generate blinded tokens and persist the batch.
    async fn blind(&self, trigger: &CredentialTrigger) -> Result<Step, FlowError> {
        let promotion = self.require_promotion(trigger).await?;

        let seed = if self.options.is_testing {
            SeedMaterial::Fixed(seed_from_trigger(trigger))
        } else {
            SeedMaterial::Random
        };
        let blinded = self.scheme.blind(promotion.suggestions as usize, &seed)?;

        let mut batch = CredentialBatch::new(trigger);
        batch.status = BatchStatus::Blinded;
        batch.creds = blinded.tokens;
        batch.blinded_creds = blinded.blinded_creds;

        tracing::debug!(%trigger, count = batch.blinded_creds.len(), "persisting blinded batch");
        self.store.save_batch(batch).await?;
        Ok(Step::Advanced)
    }

    /// `Blinded` → submit the claim; heal empty blinded data by
    /// resetting to `None`.
    async fn claim(&self, trigger: &CredentialTrigger) -> Result<Step, FlowError> {
        let batch = self.require_batch(trigger).await?;

        if batch.blinded_creds.is_empty() {
            tracing::warn!(%trigger, "blinded creds are corrupted; resetting to blind again");
            self.store
                .update_status(trigger, BatchStatus::None)
                .await?;
            return Ok(Step::Resolve(Resolution::Retry));
        }

        match self.transport.claim(&trigger.id, &batch.blinded_creds).await {
            Ok(claim_id) => {
                self.store.save_claim_id(&trigger.id, claim_id).await?;
                self.store
                    .update_status(trigger, BatchStatus::Claimed)
                    .await?;
                Ok(Step::Advanced)
            }
            Err(e) if e.is_retryable() => {
                tracing::warn!(%trigger, error = %e, "claim deferred by transport");
                Ok(Step::Resolve(Resolution::Retry))
            }
            Err(e) => {
                tracing::error!(%trigger, error = %e, "claim rejected");
                Err(e.into())
            }
        }
    }

    /// `Claimed` → fetch the signed batch; heal a missing claim id by
    /// resetting to `Blinded`.
    async fn fetch_signed(&self, trigger: &CredentialTrigger) -> Result<Step, FlowError> {
        let promotion = self.require_promotion(trigger).await?;

        let claim_id = match promotion.effective_claim_id() {
            Some(claim_id) => claim_id.clone(),
            None => {
                tracing::warn!(%trigger, "claim id is empty; retrying the claim step");
                self.store
                    .update_status(trigger, BatchStatus::Blinded)
                    .await?;
                return Ok(Step::Resolve(Resolution::Retry));
            }
        };

        let signed = match self.transport.fetch_signed_batch(&trigger.id, &claim_id).await {
            Ok(signed) => signed,
            // The transport's short-retry ("not signed yet") and any
            // other transient condition coalesce into one retry signal.
            Err(e) if e.is_retryable() => {
                tracing::warn!(%trigger, error = %e, "signed creds not available yet");
                return Ok(Step::Resolve(Resolution::Retry));
            }
            Err(e) => {
                tracing::error!(%trigger, error = %e, "signed creds fetch rejected");
                return Err(e.into());
            }
        };

        let mut batch = self.require_batch(trigger).await?;
        if signed.signed_creds.len() != batch.blinded_creds.len() {
            return self
                .corrupt(
                    trigger,
                    format!(
                        "signed/blinded count mismatch: {} vs {}",
                        signed.signed_creds.len(),
                        batch.blinded_creds.len()
                    ),
                )
                .await;
        }

        batch.signed_creds = signed.signed_creds;
        batch.public_key = signed.public_key;
        batch.batch_proof = signed.batch_proof;
        self.store.save_signed_batch(batch).await?;
        Ok(Step::Advanced)
    }

    /// `Signed` → verify the signer key, unblind, persist tokens, and
    /// notify.
    async fn finish(&self, trigger: &CredentialTrigger) -> Result<Step, FlowError> {
        let batch = self.require_batch(trigger).await?;
        let promotion = self.require_promotion(trigger).await?;

        if promotion.public_keys.is_empty()
            || !promotion.public_keys.contains(&batch.public_key)
        {
            tracing::error!(%trigger, public_key = %batch.public_key, "signer key not on allow-list");
            return Err(FlowError::PublicKeyRejected {
                public_key: batch.public_key,
            });
        }

        if !batch.counts_consistent() {
            return self
                .corrupt(
                    trigger,
                    format!(
                        "signed/blinded count mismatch: {} vs {}",
                        batch.signed_creds.len(),
                        batch.blinded_creds.len()
                    ),
                )
                .await;
        }

        let unblinded = if self.options.is_testing {
            veil_crypto::mock::unblind_unchecked(&batch.creds)?
        } else {
            self.scheme.unblind(
                &batch.creds,
                &batch.signed_creds,
                &batch.batch_proof,
                &batch.public_key,
            )?
        };

        let value = promotion.token_value().ok_or_else(|| {
            FlowError::CorruptedBatch("promotion divides into zero suggestions".into())
        })?;
        let expires_at = promotion.token_expiry();

        let tokens: Vec<UnblindedToken> = unblinded
            .into_iter()
            .map(|unblinded_value| UnblindedToken {
                token_id: TokenId::new(),
                unblinded_value,
                public_key: batch.public_key.clone(),
                value,
                expires_at,
                spent: false,
            })
            .collect();

        tracing::debug!(%trigger, count = tokens.len(), value, "persisting unblinded tokens");
        self.store.save_unblinded_tokens(tokens).await?;
        self.store.mark_batch_finished(trigger).await?;
        self.observer.tokens_ready();
        Ok(Step::Advanced)
    }

    /// Move the batch to the corrupted sink and fail the cycle.
    async fn corrupt(
        &self,
        trigger: &CredentialTrigger,
        reason: String,
    ) -> Result<Step, FlowError> {
        tracing::error!(%trigger, %reason, "batch corrupted");
        self.store
            .update_status(trigger, BatchStatus::Corrupted)
            .await?;
        Err(FlowError::CorruptedBatch(reason))
    }

    async fn require_batch(
        &self,
        trigger: &CredentialTrigger,
    ) -> Result<CredentialBatch, FlowError> {
        self.store
            .get_batch(trigger)
            .await?
            .ok_or_else(|| FlowError::MissingBatch {
                trigger: trigger.to_string(),
            })
    }

    async fn require_promotion(
        &self,
        trigger: &CredentialTrigger,
    ) -> Result<Promotion, FlowError> {
        self.store
            .get_promotion(&trigger.id)
            .await?
            .ok_or_else(|| FlowError::MissingPromotion {
                trigger: trigger.to_string(),
            })
    }

    fn check_open(&self) -> Result<(), FlowError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(FlowError::Shutdown);
        }
        Ok(())
    }
}

/// Fold a trigger id into a 32-byte blinding seed for reproducible
/// test batches.
fn seed_from_trigger(trigger: &CredentialTrigger) -> [u8; 32] {
    let mut seed = [0u8; 32];
    for (i, byte) in trigger.id.as_str().bytes().enumerate() {
        seed[i % 32] ^= byte;
    }
    seed
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::{TriggerId, TriggerKind};

    #[test]
    fn seed_is_stable_per_trigger() {
        let a = CredentialTrigger::new(TriggerId::new("promo-1"), TriggerKind::Promotion);
        let b = CredentialTrigger::new(TriggerId::new("promo-2"), TriggerKind::Promotion);
        assert_eq!(seed_from_trigger(&a), seed_from_trigger(&a));
        assert_ne!(seed_from_trigger(&a), seed_from_trigger(&b));
    }
}
