//! Identity-provider client — the session store the app authenticates against.
//!
//! DESIGN
//! ======
//! The identity provider is an external black box reached over HTTP. The
//! rest of the app consumes it through the [`SessionStore`] trait so the
//! login flow and page handlers can be exercised against in-memory fakes.
//! Response parsing is split into pure helpers, which keeps the HTTP
//! surface thin and the mapping testable without a network.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

/// Identity of the signed-in user as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
}

/// Proof of authentication issued by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    /// Absent when the session was re-derived from an access token alone.
    pub refresh_token: Option<String>,
    pub user: SessionUser,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    /// The provider rejected the request; the message is shown to the user.
    #[error("{0}")]
    Rejected(String),
    /// The provider could not be reached or answered with garbage.
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

/// Operations this app consumes from the identity provider.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SessionStoreError>;

    /// Look up the session behind an access token. `Ok(None)` means the
    /// token is unknown or expired.
    async fn current_session(&self, access_token: &str) -> Result<Option<Session>, SessionStoreError>;
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Identity-provider connection settings loaded from environment.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl IdentityConfig {
    /// Load from `IDENTITY_URL` and the optional `IDENTITY_API_KEY`.
    /// Returns `None` when the URL is missing (startup-fatal in `main`).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("IDENTITY_URL").ok()?;
        let api_key = std::env::var("IDENTITY_API_KEY").ok();
        Some(Self { base_url: normalize_base_url(&base_url), api_key })
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// Production [`SessionStore`] backed by the identity provider's HTTP API.
pub struct HttpSessionStore {
    config: IdentityConfig,
    client: reqwest::Client,
}

impl HttpSessionStore {
    #[must_use]
    pub fn new(config: IdentityConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    fn with_api_key(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => req.header("apikey", key),
            None => req,
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for HttpSessionStore {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SessionStoreError> {
        let url = format!("{}/token?grant_type=password", self.config.base_url);
        let req = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }));
        let resp = self
            .with_api_key(req)
            .send()
            .await
            .map_err(|e| SessionStoreError::Unavailable(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| SessionStoreError::Unavailable(e.to_string()))?;
        if !status.is_success() {
            return Err(SessionStoreError::Rejected(parse_error_message(status, &body)));
        }
        parse_session_response(&body)
    }

    async fn current_session(&self, access_token: &str) -> Result<Option<Session>, SessionStoreError> {
        let url = format!("{}/user", self.config.base_url);
        let req = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {access_token}"));
        let resp = self
            .with_api_key(req)
            .send()
            .await
            .map_err(|e| SessionStoreError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(None);
        }
        let body = resp
            .text()
            .await
            .map_err(|e| SessionStoreError::Unavailable(e.to_string()))?;
        if !status.is_success() {
            return Err(SessionStoreError::Unavailable(format!("{status}: {body}")));
        }

        let user: SessionUser = serde_json::from_str(&body)
            .map_err(|_| SessionStoreError::Unavailable(format!("unexpected response: {body}")))?;
        Ok(Some(Session {
            access_token: access_token.to_owned(),
            refresh_token: None,
            user,
        }))
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    user: SessionUser,
}

fn parse_session_response(body: &str) -> Result<Session, SessionStoreError> {
    let parsed: TokenResponse = serde_json::from_str(body)
        .map_err(|_| SessionStoreError::Unavailable(format!("unexpected response: {body}")))?;
    Ok(Session {
        access_token: parsed.access_token,
        refresh_token: parsed.refresh_token,
        user: parsed.user,
    })
}

/// Pull a human-readable message out of a provider error body. Providers
/// disagree on the field name; fall back to the status line.
fn parse_error_message(status: reqwest::StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error_description: Option<String>,
        message: Option<String>,
        error: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error_description.or(b.message).or(b.error))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("sign-in failed ({status})"))
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
