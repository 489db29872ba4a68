//! Shared fixtures for the flow and redemption integration tests:
//! a scripted fake transport, a counting observer, and promotion
//! builders.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Once};

use veil_client::{ClientError, PromotionTransport, SignedBatchResponse};
use veil_core::{
    ClaimId, CredentialsRedeem, DrainId, Promotion, PromotionKind, RedeemKind, Timestamp, TokenId,
    TriggerId, UnblindedToken,
};
use veil_flow::TokensReadyObserver;

/// Success for a scripted endpoint.
pub const OK: u16 = 0;

static INIT: Once = Once::new();

/// Install a test tracing subscriber once per process.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

// ── Fake transport ───────────────────────────────────────────────────

#[derive(Default)]
struct Inner {
    claim_status: AtomicU16,
    fetch_status: AtomicU16,
    redeem_status: AtomicU16,
    drain_status: AtomicU16,
    claim_id: Mutex<String>,
    drain_id: Mutex<String>,
    signed: Mutex<Option<SignedBatchResponse>>,
    claim_calls: AtomicU32,
    fetch_calls: AtomicU32,
    redeem_calls: AtomicU32,
    drain_calls: AtomicU32,
}

/// Scripted in-memory [`PromotionTransport`]. Endpoint behavior is a
/// status code: [`OK`] succeeds, `202` is the not-ready signal, any
/// other value becomes an API error with that status.
#[derive(Clone)]
pub struct FakeTransport {
    inner: Arc<Inner>,
}

impl FakeTransport {
    pub fn new() -> Self {
        let transport = Self {
            inner: Arc::new(Inner::default()),
        };
        *transport.inner.claim_id.lock().unwrap() = "c1".to_string();
        *transport.inner.drain_id.lock().unwrap() = "d1".to_string();
        transport
    }

    pub fn set_claim_status(&self, status: u16) {
        self.inner.claim_status.store(status, Ordering::SeqCst);
    }

    pub fn set_fetch_status(&self, status: u16) {
        self.inner.fetch_status.store(status, Ordering::SeqCst);
    }

    pub fn set_redeem_status(&self, status: u16) {
        self.inner.redeem_status.store(status, Ordering::SeqCst);
    }

    pub fn set_drain_status(&self, status: u16) {
        self.inner.drain_status.store(status, Ordering::SeqCst);
    }

    pub fn set_signed(&self, signed: SignedBatchResponse) {
        *self.inner.signed.lock().unwrap() = Some(signed);
    }

    pub fn claim_calls(&self) -> u32 {
        self.inner.claim_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> u32 {
        self.inner.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn redeem_calls(&self) -> u32 {
        self.inner.redeem_calls.load(Ordering::SeqCst)
    }

    pub fn drain_calls(&self) -> u32 {
        self.inner.drain_calls.load(Ordering::SeqCst)
    }

    fn scripted_error(endpoint: &str, status: u16) -> ClientError {
        if status == 202 {
            ClientError::NotReady {
                endpoint: endpoint.to_string(),
            }
        } else {
            ClientError::Api {
                endpoint: endpoint.to_string(),
                status,
                body: String::new(),
            }
        }
    }
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl PromotionTransport for FakeTransport {
    async fn claim(
        &self,
        _trigger_id: &TriggerId,
        _blinded_creds: &[String],
    ) -> Result<ClaimId, ClientError> {
        self.inner.claim_calls.fetch_add(1, Ordering::SeqCst);
        match self.inner.claim_status.load(Ordering::SeqCst) {
            OK => Ok(ClaimId::new(self.inner.claim_id.lock().unwrap().clone())),
            status => Err(Self::scripted_error("/claims", status)),
        }
    }

    async fn fetch_signed_batch(
        &self,
        _trigger_id: &TriggerId,
        _claim_id: &ClaimId,
    ) -> Result<SignedBatchResponse, ClientError> {
        self.inner.fetch_calls.fetch_add(1, Ordering::SeqCst);
        match self.inner.fetch_status.load(Ordering::SeqCst) {
            OK => Ok(self
                .inner
                .signed
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(SignedBatchResponse {
                    signed_creds: Vec::new(),
                    public_key: String::new(),
                    batch_proof: String::new(),
                })),
            status => Err(Self::scripted_error("/credentials", status)),
        }
    }

    async fn submit_redemption(&self, _redeem: &CredentialsRedeem) -> Result<(), ClientError> {
        self.inner.redeem_calls.fetch_add(1, Ordering::SeqCst);
        match self.inner.redeem_status.load(Ordering::SeqCst) {
            OK => Ok(()),
            status => Err(Self::scripted_error("/redemptions", status)),
        }
    }

    async fn submit_drain(&self, _redeem: &CredentialsRedeem) -> Result<DrainId, ClientError> {
        self.inner.drain_calls.fetch_add(1, Ordering::SeqCst);
        match self.inner.drain_status.load(Ordering::SeqCst) {
            OK => Ok(DrainId::new(self.inner.drain_id.lock().unwrap().clone())),
            status => Err(Self::scripted_error("/redemptions/drain", status)),
        }
    }
}

// ── Counting observer ────────────────────────────────────────────────

/// Observer that counts its notifications.
#[derive(Default)]
pub struct CountingObserver {
    count: AtomicU32,
}

impl CountingObserver {
    pub fn notifications(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }
}

impl TokensReadyObserver for CountingObserver {
    fn tokens_ready(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────

/// A promotion trusting keys `pk-a` and `pk-b`, expiring in 2027.
pub fn promotion(
    id: &str,
    kind: PromotionKind,
    approximate_value: f64,
    suggestions: u64,
) -> Promotion {
    Promotion {
        id: TriggerId::new(id),
        kind,
        claim_id: None,
        public_keys: vec!["pk-a".to_string(), "pk-b".to_string()],
        approximate_value,
        suggestions,
        expires_at: Some(Timestamp::parse("2027-06-01T00:00:00Z").unwrap()),
    }
}

/// An unspent token worth `value`.
pub fn token(value: f64) -> UnblindedToken {
    UnblindedToken {
        token_id: TokenId::new(),
        unblinded_value: format!("unblinded-{}", TokenId::new().as_uuid()),
        public_key: "pk-a".to_string(),
        value,
        expires_at: None,
        spent: false,
    }
}

/// A redemption request over `tokens`.
pub fn redeem_request(kind: RedeemKind, tokens: Vec<UnblindedToken>) -> CredentialsRedeem {
    CredentialsRedeem {
        kind,
        token_list: tokens,
        publisher_key: Some("publisher.example".to_string()),
        contribution_id: None,
    }
}
