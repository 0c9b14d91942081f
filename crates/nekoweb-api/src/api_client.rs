//! HTTP client for the Nekoweb API.
//!
//! Wraps `reqwest::Client` with raw-token `Authorization` injection (the API
//! takes the bare key, no `Bearer` prefix) and folds transport and HTTP
//! failures into [`NekowebError`]. One attempt per call, no retries.

use crate::credentials::Credential;
use crate::diagnostics::Diagnostics;
use crate::error::{NekowebError, NekowebErrorCode, NekowebResult};
use crate::types::NekowebConfig;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Low-level Nekoweb HTTP client bound to one credential.
#[derive(Clone)]
pub struct NekowebClient {
    http: reqwest::Client,
    config: NekowebConfig,
    credential: Credential,
    diagnostics: Arc<dyn Diagnostics>,
    requests: Arc<AtomicUsize>,
}

impl fmt::Debug for NekowebClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NekowebClient")
            .field("api_base_url", &self.config.api_base_url)
            .field("token_preview", &self.credential.masked_token())
            .finish()
    }
}

impl NekowebClient {
    /// Create a new client. An empty credential is accepted here; the
    /// authenticated calls reject it before touching the network.
    pub fn new(
        config: NekowebConfig,
        credential: Credential,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> NekowebResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.connect_timeout_sec {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| NekowebError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            credential,
            diagnostics,
            requests: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn config(&self) -> &NekowebConfig {
        &self.config
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn diagnostics(&self) -> &Arc<dyn Diagnostics> {
        &self.diagnostics
    }

    /// Number of requests actually dispatched by this client (and its clones).
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Full URL for an endpoint path, always under the API base.
    ///
    /// Absolute URLs are not accepted here: every URL built by this method
    /// receives the token.
    pub fn url(&self, path: &str) -> NekowebResult<String> {
        if path.contains("://") {
            return Err(NekowebError::new(
                NekowebErrorCode::InvalidRequest,
                format!("Expected an API path, got an absolute URL: {}", path),
            ));
        }
        Ok(format!(
            "{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }

    fn auth_headers(&self) -> NekowebResult<HeaderMap> {
        let token = self.credential.require_token()?;
        let mut value = HeaderValue::from_str(token).map_err(|_| {
            NekowebError::new(
                NekowebErrorCode::InvalidRequest,
                "Authorization token contains characters not allowed in a header",
            )
        })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    // ── GET ─────────────────────────────────────────────────────────

    /// Authenticated GET with optional query parameters, JSON response.
    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> NekowebResult<serde_json::Value> {
        let params: serde_json::Map<String, serde_json::Value> = query
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect();
        self.diagnostics.debug(&format!(
            "making API call to {} with params {}",
            path,
            serde_json::Value::Object(params)
        ));

        let result = self.send_get(path, query).await;
        match &result {
            Ok(body) => self.diagnostics.debug(&format!("API response: {}", body)),
            Err(e) => self.diagnostics.warn(&format!("API call to {} failed: {}", path, e)),
        }
        result
    }

    /// [`get`](Self::get) decoded into `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> NekowebResult<T> {
        let value = self.get(path, query).await?;
        serde_json::from_value(value).map_err(|e| {
            NekowebError::serialization(format!("Unexpected response from {}: {}", path, e))
        })
    }

    async fn send_get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> NekowebResult<serde_json::Value> {
        let headers = self.auth_headers()?;
        let url = self.url(path)?;

        self.requests.fetch_add(1, Ordering::SeqCst);
        let resp = self
            .http
            .get(&url)
            .headers(headers)
            .query(query)
            .send()
            .await
            .map_err(NekowebError::from)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(NekowebError::from)?;

        if !(200..300).contains(&status) {
            return Err(NekowebError::from_api_response(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&body).map_err(NekowebError::from)
    }

    // ── Multipart POST ──────────────────────────────────────────────

    /// Authenticated multipart POST. The response may be JSON or plain
    /// text; text comes back as a JSON string.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> NekowebResult<serde_json::Value> {
        let headers = self.auth_headers()?;
        let url = self.url(path)?;
        self.diagnostics.debug(&format!("POST multipart {}", path));

        self.requests.fetch_add(1, Ordering::SeqCst);
        let resp = self
            .http
            .post(&url)
            .headers(headers)
            .multipart(form)
            .send()
            .await
            .map_err(NekowebError::from)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(NekowebError::from)?;

        if !(200..300).contains(&status) {
            return Err(NekowebError::from_api_response(status, &body));
        }
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }

    // ── Streamed GET ────────────────────────────────────────────────

    /// Unauthenticated GET whose body is left unread for streaming.
    /// Public site files need no token.
    pub async fn open_stream(&self, url: &str) -> NekowebResult<reqwest::Response> {
        self.diagnostics.debug(&format!("GET (stream) {}", url));

        self.requests.fetch_add(1, Ordering::SeqCst);
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(NekowebError::from)?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(NekowebError::from_api_response(status, &body));
        }
        Ok(resp)
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════
