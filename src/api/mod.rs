//! HTTP client for the dashboard API.
//!
//! One `reqwest` round-trip per operation: no retries, no backpressure.
//! Callers decide what a failure means for their screen (mock fallback,
//! apology message, or a surfaced error).
//!
//! Protected endpoints attach the stored bearer token; calling one while
//! logged out fails fast with [`ApiError::NotLoggedIn`] instead of sending
//! an empty `Authorization` header.

pub mod types;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, trace};

use crate::models::{ChatStatistics, Deadline, LearningProgress, Recommendation, UserProfile};
use types::{
    AuthData, ChatReplyData, ChatRequest, DashboardData, DeadlineList, DomainCatalog, Envelope,
    ErrorBody, LoginRequest, NewDeadlineRequest, RegisterRequest,
};

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("server rejected the request: {0}")]
    Rejected(String),
    #[error("not logged in — run `login` first")]
    NotLoggedIn,
}

impl ApiError {
    /// `true` when the server could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Transport { .. } | ApiError::Client(_))
    }
}

// ── Endpoint paths ────────────────────────────────────────────────────────────

pub mod paths {
    pub const LOGIN: &str = "/api/auth/login";
    pub const REGISTER: &str = "/api/auth/register";
    pub const PROFILE: &str = "/api/auth/profile";
    pub const CHAT_MESSAGE: &str = "/api/chatbot/message";
    pub const CHAT_TEST: &str = "/api/chatbot/test";
    pub const CHAT_STATISTICS: &str = "/api/chatbot/statistics";
    pub const CHAT_DOMAINS: &str = "/api/chatbot/domains";
    pub const STUDENT_DASHBOARD: &str = "/api/student/dashboard";
    pub const LEARNING_PROGRESS: &str = "/api/student/learning-progress";
    pub const RECOMMENDATIONS: &str = "/api/student/recommendations";
    pub const DEADLINES: &str = "/api/deadlines";
}

// ── Client ────────────────────────────────────────────────────────────────────

/// Dashboard API client.
///
/// Cheap to clone: `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url, token: None })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::NotLoggedIn)?;
        Ok(req.bearer_auth(token))
    }

    // ── Auth ──────────────────────────────────────────────────────────────

    pub async fn login(&self, body: &LoginRequest) -> Result<AuthData, ApiError> {
        let req = self.client.post(self.url(paths::LOGIN)).json(body);
        self.send_enveloped(req, paths::LOGIN).await
    }

    pub async fn register(&self, body: &RegisterRequest) -> Result<AuthData, ApiError> {
        let req = self.client.post(self.url(paths::REGISTER)).json(body);
        self.send_enveloped(req, paths::REGISTER).await
    }

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        let req = self.authorized(self.client.get(self.url(paths::PROFILE)))?;
        self.send_enveloped(req, paths::PROFILE).await
    }

    // ── Chatbot ───────────────────────────────────────────────────────────

    /// Open development endpoint; no token required.
    pub async fn chat_test(&self, message: &str, domain: &str) -> Result<ChatReplyData, ApiError> {
        let req = self
            .client
            .post(self.url(paths::CHAT_TEST))
            .json(&ChatRequest { message, domain });
        self.send_enveloped(req, paths::CHAT_TEST).await
    }

    /// Token-protected chat endpoint; the server records the exchange.
    pub async fn chat_message(&self, message: &str, domain: &str) -> Result<ChatReplyData, ApiError> {
        let req = self.authorized(
            self.client
                .post(self.url(paths::CHAT_MESSAGE))
                .json(&ChatRequest { message, domain }),
        )?;
        self.send_enveloped(req, paths::CHAT_MESSAGE).await
    }

    pub async fn statistics(&self) -> Result<ChatStatistics, ApiError> {
        let req = self.authorized(self.client.get(self.url(paths::CHAT_STATISTICS)))?;
        self.send_enveloped(req, paths::CHAT_STATISTICS).await
    }

    pub async fn domains(&self) -> Result<DomainCatalog, ApiError> {
        let req = self.client.get(self.url(paths::CHAT_DOMAINS));
        self.send_enveloped(req, paths::CHAT_DOMAINS).await
    }

    // ── Student ───────────────────────────────────────────────────────────

    pub async fn dashboard(&self) -> Result<DashboardData, ApiError> {
        let req = self.authorized(self.client.get(self.url(paths::STUDENT_DASHBOARD)))?;
        self.send_enveloped(req, paths::STUDENT_DASHBOARD).await
    }

    pub async fn learning_progress(&self) -> Result<LearningProgress, ApiError> {
        let req = self.authorized(self.client.get(self.url(paths::LEARNING_PROGRESS)))?;
        self.send_enveloped(req, paths::LEARNING_PROGRESS).await
    }

    pub async fn recommendations(&self, domain: &str) -> Result<Vec<Recommendation>, ApiError> {
        let req = self.authorized(
            self.client
                .get(self.url(paths::RECOMMENDATIONS))
                .query(&[("domain", domain)]),
        )?;
        self.send_enveloped(req, paths::RECOMMENDATIONS).await
    }

    // ── Deadlines ─────────────────────────────────────────────────────────

    pub async fn deadlines(&self) -> Result<Vec<Deadline>, ApiError> {
        let req = self.authorized(self.client.get(self.url(paths::DEADLINES)))?;
        let list: DeadlineList = self.send_json(req, paths::DEADLINES).await?;
        Ok(list.deadlines)
    }

    pub async fn create_deadline(&self, body: &NewDeadlineRequest) -> Result<(), ApiError> {
        let req = self.authorized(self.client.post(self.url(paths::DEADLINES)).json(body))?;
        let _: serde_json::Value = self.send_json(req, paths::DEADLINES).await?;
        Ok(())
    }

    // ── Plumbing ──────────────────────────────────────────────────────────

    /// Send and unwrap the `{ success, data }` envelope.
    async fn send_enveloped<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        let envelope: Envelope<T> = self.send_json(req, path).await?;
        if !envelope.success {
            let reason = envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| "request unsuccessful".to_string());
            return Err(ApiError::Rejected(reason));
        }
        envelope.data.ok_or_else(|| ApiError::Decode {
            url: self.url(path),
            message: "missing `data` field".to_string(),
        })
    }

    /// Send, check status, and decode the body as `T`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "api request");

        let response = req.send().await.map_err(|e| {
            error!(%url, error = %e, "api request failed (transport)");
            ApiError::Transport { url: url.clone(), message: e.to_string() }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Transport {
            url: url.clone(),
            message: format!("failed to read body: {e}"),
        })?;
        trace!(%url, %status, body = %body, "api response");

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.or(b.message))
                .unwrap_or(body);
            error!(%url, %status, %message, "api returned HTTP error");
            return Err(ApiError::Status { status: status.as_u16(), message });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(%url, error = %e, "failed to decode api response");
            ApiError::Decode { url, message: e.to_string() }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let c = ApiClient::new("http://localhost:5000/", 1).unwrap();
        assert_eq!(c.base_url(), "http://localhost:5000");
        assert_eq!(c.url(paths::LOGIN), "http://localhost:5000/api/auth/login");
    }

    #[tokio::test]
    async fn protected_endpoint_without_token_fails_fast() {
        let c = ApiClient::new("http://127.0.0.1:9", 1).unwrap();
        let err = c.statistics().await.unwrap_err();
        assert!(matches!(err, ApiError::NotLoggedIn));
        assert!(!err.is_unreachable());
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        // Port 9 (discard) is closed on test hosts; the connect fails immediately.
        let c = ApiClient::new("http://127.0.0.1:9", 1).unwrap();
        let err = c.chat_test("hi", "general").await.unwrap_err();
        assert!(err.is_unreachable(), "unexpected error: {err}");
    }

    #[test]
    fn token_management() {
        let mut c = ApiClient::new("http://x", 1).unwrap().with_token(Some("t".into()));
        assert!(c.has_token());
        c.set_token(None);
        assert!(!c.has_token());
    }
}
