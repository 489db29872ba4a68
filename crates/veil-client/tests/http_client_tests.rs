//! # Integration Tests for the Promotion Server HTTP Client
//!
//! Runs [`HttpPromotionClient`] against wiremock servers to verify
//! request construction, response parsing, retry classification, and
//! the credentials-not-ready path — without a live promotion server.

use veil_client::{
    ClientConfig, ClientError, HttpPromotionClient, PromotionTransport, RequestSigner,
};
use veil_core::{ClaimId, CredentialsRedeem, RedeemKind, TokenId, TriggerId, UnblindedToken};
use wiremock::matchers::{body_partial_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HttpPromotionClient {
    HttpPromotionClient::new(ClientConfig::new(server.uri())).expect("client build")
}

fn signed_client(server: &MockServer) -> HttpPromotionClient {
    let config = ClientConfig::new(server.uri())
        .with_signer(RequestSigner::from_secret_bytes([9u8; 32], "wallet-1"));
    HttpPromotionClient::new(config).expect("client build")
}

fn redeem(kind: RedeemKind) -> CredentialsRedeem {
    CredentialsRedeem {
        kind,
        token_list: vec![UnblindedToken {
            token_id: TokenId::new(),
            unblinded_value: "unblinded-1".into(),
            public_key: "pk-a".into(),
            value: 0.25,
            expires_at: None,
            spent: false,
        }],
        publisher_key: Some("publisher.example".into()),
        contribution_id: Some("contrib-1".into()),
    }
}

// ── Claim ────────────────────────────────────────────────────────────

#[tokio::test]
async fn claim_posts_blinded_creds_and_parses_claim_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/promotions/promo-1/claims"))
        .and(body_partial_json(serde_json::json!({
            "blinded_creds": ["b1", "b2"]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "claim_id": "c1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let claim_id = client(&server)
        .claim(
            &TriggerId::new("promo-1"),
            &["b1".to_string(), "b2".to_string()],
        )
        .await
        .expect("claim");
    assert_eq!(claim_id.as_str(), "c1");
}

#[tokio::test]
async fn claim_rejection_is_not_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/promotions/promo-1/claims"))
        .respond_with(ResponseTemplate::new(410).set_body_string("promotion over"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .claim(&TriggerId::new("promo-1"), &["b1".to_string()])
        .await
        .expect_err("must fail");
    assert!(!err.is_retryable());
    assert!(matches!(err, ClientError::Api { status: 410, .. }));
}

#[tokio::test]
async fn claim_server_error_is_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/promotions/promo-1/claims"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server)
        .claim(&TriggerId::new("promo-1"), &["b1".to_string()])
        .await
        .expect_err("must fail");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn signed_claim_carries_signature_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/promotions/promo-1/claims"))
        .and(header_exists("digest"))
        .and(header_exists("signature"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "claim_id": "c1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    signed_client(&server)
        .claim(&TriggerId::new("promo-1"), &["b1".to_string()])
        .await
        .expect("signed claim");
}

// ── Signed batch fetch ───────────────────────────────────────────────

#[tokio::test]
async fn fetch_signed_batch_parses_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/promotions/promo-1/claims/c1/credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "signed_creds": ["s1", "s2"],
            "public_key": "pk-a",
            "batch_proof": "proof-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let batch = client(&server)
        .fetch_signed_batch(&TriggerId::new("promo-1"), &ClaimId::new("c1"))
        .await
        .expect("fetch");
    assert_eq!(batch.signed_creds, vec!["s1", "s2"]);
    assert_eq!(batch.public_key, "pk-a");
    assert_eq!(batch.batch_proof, "proof-1");
}

#[tokio::test]
async fn accepted_status_surfaces_as_retryable_not_ready() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/promotions/promo-1/claims/c1/credentials"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_signed_batch(&TriggerId::new("promo-1"), &ClaimId::new("c1"))
        .await
        .expect_err("not ready");
    assert!(matches!(err, ClientError::NotReady { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn undecodable_signed_batch_is_terminal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/promotions/promo-1/claims/c1/credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_signed_batch(&TriggerId::new("promo-1"), &ClaimId::new("c1"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, ClientError::Deserialization { .. }));
    assert!(!err.is_retryable());
}

// ── Redemption ───────────────────────────────────────────────────────

#[tokio::test]
async fn redemption_posts_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/redemptions"))
        .and(body_partial_json(serde_json::json!({
            "kind": "tip",
            "publisher_key": "publisher.example",
            "contribution_id": "contrib-1"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .submit_redemption(&redeem(RedeemKind::Tip))
        .await
        .expect("redeem");
}

#[tokio::test]
async fn drain_returns_drain_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/redemptions/drain"))
        .and(body_partial_json(serde_json::json!({ "kind": "transfer" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "drain_id": "d1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let drain_id = client(&server)
        .submit_drain(&redeem(RedeemKind::Transfer))
        .await
        .expect("drain");
    assert_eq!(drain_id.as_str(), "d1");
}

#[tokio::test]
async fn drain_failure_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/redemptions/drain"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let err = client(&server)
        .submit_drain(&redeem(RedeemKind::Transfer))
        .await
        .expect_err("must fail");
    match err {
        ClientError::Api { status, body, .. } => {
            assert_eq!(status, 400);
            assert_eq!(body, "bad credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
