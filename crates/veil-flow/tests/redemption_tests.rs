//! # Redemption Engine Scenarios
//!
//! Spend and drain paths over the in-memory store and scripted
//! transport: precondition rejection, atomic spends, and the
//! no-partial-spend guarantees around transport and store failures.

mod common;

use common::{init_tracing, redeem_request, token, FakeTransport};
use veil_core::{RedeemKind, StoreError, UnblindedToken};
use veil_flow::{FlowError, RedemptionEngine};
use veil_store::{CredentialStore, MemoryStore};

type TestEngine = RedemptionEngine<MemoryStore, FakeTransport>;

struct Harness {
    store: MemoryStore,
    transport: FakeTransport,
    engine: TestEngine,
}

fn harness() -> Harness {
    init_tracing();
    let store = MemoryStore::new();
    let transport = FakeTransport::new();
    let engine = RedemptionEngine::new(store.clone(), transport.clone());
    Harness {
        store,
        transport,
        engine,
    }
}

async fn seed_tokens(store: &MemoryStore, count: usize) -> Vec<UnblindedToken> {
    let tokens: Vec<UnblindedToken> = (0..count).map(|_| token(0.25)).collect();
    store.save_unblinded_tokens(tokens.clone()).await.unwrap();
    tokens
}

// ── Preconditions ────────────────────────────────────────────────────

#[tokio::test]
async fn redeem_rejects_empty_token_list() {
    let h = harness();
    let request = redeem_request(RedeemKind::Tip, Vec::new());

    let err = h.engine.redeem(&request).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidRedeem(_)));
    assert_eq!(h.transport.redeem_calls(), 0);
}

#[tokio::test]
async fn redeem_rejects_transfer_kind() {
    let h = harness();
    let tokens = seed_tokens(&h.store, 1).await;
    let request = redeem_request(RedeemKind::Transfer, tokens);

    let err = h.engine.redeem(&request).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidRedeem(_)));
}

#[tokio::test]
async fn redeem_rejects_missing_publisher_key() {
    let h = harness();
    let tokens = seed_tokens(&h.store, 1).await;
    let mut request = redeem_request(RedeemKind::Tip, tokens);
    request.publisher_key = None;

    let err = h.engine.redeem(&request).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidRedeem(_)));

    request.publisher_key = Some(String::new());
    let err = h.engine.redeem(&request).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidRedeem(_)));
}

#[tokio::test]
async fn drain_requires_transfer_kind() {
    let h = harness();
    let tokens = seed_tokens(&h.store, 1).await;
    let request = redeem_request(RedeemKind::Tip, tokens);

    let err = h.engine.drain(&request).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidRedeem(_)));
    assert_eq!(h.transport.drain_calls(), 0);
}

#[tokio::test]
async fn drain_rejects_empty_token_list() {
    let h = harness();
    let request = redeem_request(RedeemKind::Transfer, Vec::new());

    let err = h.engine.drain(&request).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidRedeem(_)));
}

// ── Spend semantics ──────────────────────────────────────────────────

#[tokio::test]
async fn redeem_marks_every_token_spent_with_attribution() -> anyhow::Result<()> {
    let h = harness();
    let tokens = seed_tokens(&h.store, 3).await;
    let mut request = redeem_request(RedeemKind::Contribution, tokens.clone());
    request.contribution_id = Some("contrib-9".to_string());

    h.engine.redeem(&request).await?;

    assert_eq!(h.transport.redeem_calls(), 1);
    for t in &tokens {
        let record = h.store.token(&t.token_id).unwrap();
        assert!(record.token.spent);
        assert_eq!(record.redeem_kind, Some(RedeemKind::Contribution));
        assert_eq!(record.redeem_id.as_deref(), Some("contrib-9"));
    }
    assert!(h.store.spendable_tokens().is_empty());
    Ok(())
}

#[tokio::test]
async fn redeem_without_contribution_id_attributes_empty_id() -> anyhow::Result<()> {
    let h = harness();
    let tokens = seed_tokens(&h.store, 1).await;
    let request = redeem_request(RedeemKind::Tip, tokens.clone());

    h.engine.redeem(&request).await?;

    let record = h.store.token(&tokens[0].token_id).unwrap();
    assert_eq!(record.redeem_id.as_deref(), Some(""));
    Ok(())
}

#[tokio::test]
async fn transport_failure_spends_nothing() {
    let h = harness();
    let tokens = seed_tokens(&h.store, 2).await;
    h.transport.set_redeem_status(500);

    let err = h
        .engine
        .redeem(&redeem_request(RedeemKind::Tip, tokens))
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Transport(_)));

    // The submit failed before any mark: both tokens still spendable.
    assert_eq!(h.store.spendable_tokens().len(), 2);
}

#[tokio::test]
async fn already_spent_token_fails_the_whole_batch() {
    let h = harness();
    let tokens = seed_tokens(&h.store, 2).await;
    h.store
        .mark_tokens_spent(&[tokens[0].token_id], RedeemKind::Tip, "")
        .await
        .unwrap();

    let err = h
        .engine
        .redeem(&redeem_request(RedeemKind::Tip, tokens))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FlowError::Store(StoreError::AlreadySpent { .. })
    ));

    // No partial spend: the fresh token is still spendable.
    assert_eq!(h.store.spendable_tokens().len(), 1);
}

// ── Drain semantics ──────────────────────────────────────────────────

#[tokio::test]
async fn drain_returns_drain_id_and_spends_tokens() -> anyhow::Result<()> {
    let h = harness();
    let tokens = seed_tokens(&h.store, 2).await;
    let request = redeem_request(RedeemKind::Transfer, tokens.clone());

    let drain_id = h.engine.drain(&request).await?;
    assert_eq!(drain_id.as_str(), "d1");

    for t in &tokens {
        let record = h.store.token(&t.token_id).unwrap();
        assert!(record.token.spent);
        assert_eq!(record.redeem_kind, Some(RedeemKind::Transfer));
    }
    Ok(())
}

#[tokio::test]
async fn drain_mark_spent_failure_fails_despite_obtained_drain_id() {
    let h = harness();
    // One token is never persisted, so the mark-spent step must fail.
    let persisted = seed_tokens(&h.store, 1).await;
    let mut tokens = persisted.clone();
    tokens.push(token(0.25));

    let err = h
        .engine
        .drain(&redeem_request(RedeemKind::Transfer, tokens))
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Store(_)));

    // The drain request itself was submitted.
    assert_eq!(h.transport.drain_calls(), 1);
    // Nothing was spent.
    assert_eq!(h.store.spendable_tokens().len(), 1);
    assert!(!h.store.token(&persisted[0].token_id).unwrap().token.spent);
}

#[tokio::test]
async fn drain_transport_failure_spends_nothing() {
    let h = harness();
    let tokens = seed_tokens(&h.store, 2).await;
    h.transport.set_drain_status(400);

    let err = h
        .engine
        .drain(&redeem_request(RedeemKind::Transfer, tokens))
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Transport(_)));
    assert_eq!(h.store.spendable_tokens().len(), 2);
}
