//! # HTTP Promotion Client
//!
//! `reqwest`-backed implementation of [`PromotionTransport`] against a
//! configured promotion server base URL.
//!
//! Endpoints:
//!
//! ```text
//! POST /v1/promotions/{trigger_id}/claims                       claim blinded tokens
//! GET  /v1/promotions/{trigger_id}/claims/{claim_id}/credentials  fetch signed batch (202 = not ready)
//! POST /v1/redemptions                                           spend tokens
//! POST /v1/redemptions/drain                                     drain tokens
//! ```
//!
//! Mutating requests carry `digest`/`signature` headers when a
//! [`RequestSigner`] is configured.

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;

use veil_core::{ClaimId, CredentialsRedeem, DrainId, TriggerId};

use crate::error::ClientError;
use crate::retry::send_with_backoff;
use crate::signing::RequestSigner;
use crate::transport::PromotionTransport;
use crate::types::{ClaimRequest, ClaimResponse, DrainResponse, RedeemRequest, SignedBatchResponse};

/// How much response body to keep in error diagnostics.
const BODY_EXCERPT_LEN: usize = 256;

/// Configuration for [`HttpPromotionClient`].
#[derive(Debug)]
pub struct ClientConfig {
    /// Base URL of the promotion server
    /// (e.g., `https://grant.rewards.example`).
    pub base_url: String,
    /// Per-request timeout in seconds (default: 30).
    pub timeout_secs: u64,
    /// Signer for mutating requests; unsigned when absent.
    pub signer: Option<RequestSigner>,
}

impl ClientConfig {
    /// Create a configuration with the default timeout and no signer.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
            signer: None,
        }
    }

    /// Attach a request signer.
    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP client for the promotion server.
#[derive(Debug)]
pub struct HttpPromotionClient {
    client: reqwest::Client,
    base_url: String,
    signer: Option<RequestSigner>,
}

impl HttpPromotionClient {
    /// Build a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        url::Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base url {:?}: {e}", config.base_url)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            signer: config.signer,
        })
    }

    fn encode<T: Serialize>(endpoint: &str, body: &T) -> Result<Vec<u8>, ClientError> {
        serde_json::to_vec(body).map_err(|source| ClientError::Encode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Send one request with transport-level retry, mapping connection
    /// failures to [`ClientError::Http`].
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, method = %method, "promotion server request");

        send_with_backoff(|| {
            let mut request = self.client.request(method.clone(), &url);
            if let Some(bytes) = &body {
                request = request
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(bytes.clone());
                if let Some(signer) = &self.signer {
                    let signed = signer.sign_body(bytes);
                    request = request
                        .header("digest", signed.digest)
                        .header("signature", signed.signature);
                }
            }
            request.send()
        })
        .await
        .map_err(|source| ClientError::Http {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn api_error(endpoint: &str, resp: reqwest::Response) -> ClientError {
        let status = resp.status().as_u16();
        let body: String = resp
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(BODY_EXCERPT_LEN)
            .collect();
        ClientError::Api {
            endpoint: endpoint.to_string(),
            status,
            body,
        }
    }
}

impl PromotionTransport for HttpPromotionClient {
    async fn claim(
        &self,
        trigger_id: &TriggerId,
        blinded_creds: &[String],
    ) -> Result<ClaimId, ClientError> {
        let endpoint = format!("/v1/promotions/{trigger_id}/claims");
        let body = Self::encode(
            &endpoint,
            &ClaimRequest {
                blinded_creds: blinded_creds.to_vec(),
            },
        )?;

        let resp = self.send(Method::POST, &endpoint, Some(body)).await?;
        if !resp.status().is_success() {
            return Err(Self::api_error(&endpoint, resp).await);
        }

        let parsed: ClaimResponse =
            resp.json()
                .await
                .map_err(|source| ClientError::Deserialization {
                    endpoint: endpoint.clone(),
                    source,
                })?;
        Ok(ClaimId::new(parsed.claim_id))
    }

    async fn fetch_signed_batch(
        &self,
        trigger_id: &TriggerId,
        claim_id: &ClaimId,
    ) -> Result<SignedBatchResponse, ClientError> {
        let endpoint = format!("/v1/promotions/{trigger_id}/claims/{claim_id}/credentials");

        let resp = self.send(Method::GET, &endpoint, None).await?;
        if resp.status() == reqwest::StatusCode::ACCEPTED {
            // The server is still signing the batch.
            return Err(ClientError::NotReady { endpoint });
        }
        if !resp.status().is_success() {
            return Err(Self::api_error(&endpoint, resp).await);
        }

        resp.json()
            .await
            .map_err(|source| ClientError::Deserialization { endpoint, source })
    }

    async fn submit_redemption(&self, redeem: &CredentialsRedeem) -> Result<(), ClientError> {
        let endpoint = "/v1/redemptions".to_string();
        let body = Self::encode(&endpoint, &RedeemRequest::from(redeem))?;

        let resp = self.send(Method::POST, &endpoint, Some(body)).await?;
        if !resp.status().is_success() {
            return Err(Self::api_error(&endpoint, resp).await);
        }
        Ok(())
    }

    async fn submit_drain(&self, redeem: &CredentialsRedeem) -> Result<DrainId, ClientError> {
        let endpoint = "/v1/redemptions/drain".to_string();
        let body = Self::encode(&endpoint, &RedeemRequest::from(redeem))?;

        let resp = self.send(Method::POST, &endpoint, Some(body)).await?;
        if !resp.status().is_success() {
            return Err(Self::api_error(&endpoint, resp).await);
        }

        let parsed: DrainResponse =
            resp.json()
                .await
                .map_err(|source| ClientError::Deserialization { endpoint, source })?;
        Ok(DrainId::new(parsed.drain_id))
    }
}
