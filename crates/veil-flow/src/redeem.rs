//! # Token Redemption Engine
//!
//! Spends finished, unblinded tokens: contribution and tip redemptions
//! go through [`RedemptionEngine::redeem`]; transfers use the drain
//! path via [`RedemptionEngine::drain`].
//!
//! ## Spend ordering
//!
//! Tokens are marked spent only after the transport accepts the
//! redemption, and the mark is atomic over the submitted set — a
//! transport failure leaves every token unspent, and a store failure
//! after submission fails the operation without a partial spend.
//! Any transport failure here is terminal for the attempt; redemption
//! has no protocol-level retry channel.

use veil_client::PromotionTransport;
use veil_core::{CredentialsRedeem, DrainId, RedeemKind};
use veil_store::CredentialStore;

use crate::error::FlowError;

/// Spends unblinded tokens against the promotion server.
pub struct RedemptionEngine<S, T> {
    store: S,
    transport: T,
}

impl<S, T> RedemptionEngine<S, T>
where
    S: CredentialStore,
    T: PromotionTransport,
{
    /// Assemble an engine from its capabilities.
    pub fn new(store: S, transport: T) -> Self {
        Self { store, transport }
    }

    /// Redeem tokens for a contribution or tip.
    ///
    /// Preconditions: a non-transfer kind, a non-empty token list, and
    /// a non-empty publisher key. On success every submitted token is
    /// marked spent, attributed to the contribution id when present.
    pub async fn redeem(&self, redeem: &CredentialsRedeem) -> Result<(), FlowError> {
        if redeem.kind == RedeemKind::Transfer {
            return Err(FlowError::InvalidRedeem(
                "transfer redemptions use the drain path",
            ));
        }
        if redeem.token_list.is_empty() {
            return Err(FlowError::InvalidRedeem("token list is empty"));
        }
        let publisher_present = redeem
            .publisher_key
            .as_deref()
            .is_some_and(|key| !key.is_empty());
        if !publisher_present {
            return Err(FlowError::InvalidRedeem("publisher key is empty"));
        }

        if let Err(e) = self.transport.submit_redemption(redeem).await {
            tracing::error!(kind = %redeem.kind, error = %e, "redemption submit failed");
            return Err(e.into());
        }

        let redeem_id = redeem.contribution_id.clone().unwrap_or_default();
        self.store
            .mark_tokens_spent(&redeem.token_ids(), redeem.kind, &redeem_id)
            .await?;
        Ok(())
    }

    /// Drain tokens: transfer their value out of the wallet.
    ///
    /// Requires a transfer kind and a non-empty token list. Returns the
    /// server-issued drain id; if marking the tokens spent fails, the
    /// whole operation fails even though the drain id was obtained.
    pub async fn drain(&self, redeem: &CredentialsRedeem) -> Result<DrainId, FlowError> {
        if redeem.kind != RedeemKind::Transfer {
            return Err(FlowError::InvalidRedeem(
                "drain requires a transfer redemption",
            ));
        }
        if redeem.token_list.is_empty() {
            return Err(FlowError::InvalidRedeem("token list is empty"));
        }

        let drain_id = match self.transport.submit_drain(redeem).await {
            Ok(drain_id) => drain_id,
            Err(e) => {
                tracing::error!(error = %e, "drain submit failed");
                return Err(e.into());
            }
        };

        let redeem_id = redeem.contribution_id.clone().unwrap_or_default();
        self.store
            .mark_tokens_spent(&redeem.token_ids(), RedeemKind::Transfer, &redeem_id)
            .await?;
        Ok(drain_id)
    }
}
