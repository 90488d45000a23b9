//! Identity provider client and session types.
//!
//! Talks to the hosted auth service over its REST surface (`/auth/v1`)
//! using the project API key for public endpoints and the user's access
//! token where one is required. Front ends never hold raw tokens; they
//! observe sessions through [`crate::session::SessionHandle`].

use std::fmt;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::{compact_text, is_http_url, normalize_text_option, unix_timestamp_now};

/// Sessions are treated as expired this many seconds early so a request
/// started near the boundary does not fly with a dead token.
const EXPIRY_SKEW_SECONDS: i64 = 60;

/// Errors that can occur during authentication
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse auth response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Error reported by the identity provider itself
    #[error("Auth API error: {0}")]
    Api(AuthApiError),

    /// Successful status but the payload is missing required fields
    #[error("Malformed auth response: {0}")]
    MalformedResponse(String),

    #[error("Secure storage unavailable: {0}")]
    SecureStorage(String),
}

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Provider-reported account errors, keyed by the provider's error code.
///
/// Known codes map to fixed user-facing messages; everything else keeps
/// the provider's own message and HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthApiError {
    #[error("Email address is invalid")]
    InvalidEmail,
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("No account exists for this email")]
    UserNotFound,
    #[error("An account with this email already exists")]
    EmailExists,
    #[error("Password is too weak")]
    WeakPassword,
    #[error("{message} ({status})")]
    Other {
        code: Option<String>,
        message: String,
        status: u16,
    },
}

/// An authenticated session for one user.
///
/// `expires_at` is unix seconds as reported by the provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub access_token: String,
    pub expires_at: i64,
}

impl Session {
    /// Whether the access token is expired or about to expire.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= unix_timestamp_now() + EXPIRY_SKEW_SECONDS
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Durable storage for the session between process runs.
pub trait SessionPersistence: Send + Sync {
    fn load_session(&self) -> AuthResult<Option<Session>>;
    fn save_session(&self, session: &Session) -> AuthResult<()>;
    fn clear_session(&self) -> AuthResult<()>;
}

/// Narrow seam over the hosted identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges credentials for a session.
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Session>;

    /// Registers a new account.
    ///
    /// Returns `Ok(None)` when the provider withholds the session until
    /// the email address has been confirmed.
    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<Option<Session>>;

    /// Revokes the session behind `access_token` on the provider side.
    async fn sign_out(&self, access_token: &str) -> AuthResult<()>;
}

/// HTTP client for the hosted identity provider.
#[derive(Debug, Clone)]
pub struct AuthClient {
    auth_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AuthClient {
    /// Creates a client for the auth surface of `backend_url`.
    pub fn new(backend_url: &str, api_key: &str) -> AuthResult<Self> {
        let auth_url = normalize_auth_url(backend_url)?;
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "API key is empty".to_string(),
            ));
        }
        Ok(Self {
            auth_url,
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        })
    }

    /// Applies the headers public auth endpoints expect.
    fn public_request(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn read_session_payload(response: Response) -> AuthResult<SessionPayload> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::Api(classify_api_error(status, &body)));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl IdentityProvider for AuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Session> {
        let url = format!("{}/token?grant_type=password", self.auth_url);
        tracing::debug!("Signing in via {url}");
        let response = self
            .public_request(self.client.post(url))
            .json(&CredentialsPayload { email, password })
            .send()
            .await?;
        let payload = Self::read_session_payload(response).await?;
        payload.into_session()?.ok_or_else(|| {
            AuthError::MalformedResponse("sign-in answered without a session".to_string())
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<Option<Session>> {
        let url = format!("{}/signup", self.auth_url);
        tracing::debug!("Signing up via {url}");
        let response = self
            .public_request(self.client.post(url))
            .json(&CredentialsPayload { email, password })
            .send()
            .await?;
        let payload = Self::read_session_payload(response).await?;
        payload.into_session()
    }

    async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let url = format!("{}/logout", self.auth_url);
        let response = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status();
        // An already-revoked token answers 401; treat that as signed out.
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        let body = response.text().await?;
        Err(AuthError::Api(classify_api_error(status, &body)))
    }
}

#[derive(Debug, Serialize)]
struct CredentialsPayload<'a> {
    email: &'a str,
    password: &'a str,
}

/// Tolerant session payload: providers answer sign-up either with a flat
/// session, a session nested one level down, or a bare user record when
/// address confirmation is still pending.
#[derive(Debug, Deserialize)]
struct SessionPayload {
    access_token: Option<String>,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: Option<WireUser>,
    session: Option<NestedSession>,
}

#[derive(Debug, Deserialize)]
struct NestedSession {
    access_token: Option<String>,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: Option<WireUser>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireUser {
    id: String,
    email: Option<String>,
}

impl SessionPayload {
    fn into_session(self) -> AuthResult<Option<Session>> {
        let (nested_token, nested_at, nested_in, nested_user) = match self.session {
            Some(nested) => (
                nested.access_token,
                nested.expires_at,
                nested.expires_in,
                nested.user,
            ),
            None => (None, None, None, None),
        };
        let access_token = self.access_token.or(nested_token);
        let expires_at = self.expires_at.or(nested_at).or_else(|| {
            self.expires_in
                .or(nested_in)
                .map(|seconds| unix_timestamp_now() + seconds)
        });
        let user = self.user.or(nested_user);

        match (access_token, user) {
            (Some(access_token), Some(user)) => {
                let expires_at = expires_at.ok_or_else(|| {
                    AuthError::MalformedResponse("session has no expiry".to_string())
                })?;
                Ok(Some(Session {
                    user_id: user.id,
                    email: user.email,
                    access_token,
                    expires_at,
                }))
            }
            (None, Some(_)) => Ok(None),
            _ => Err(AuthError::MalformedResponse(
                "missing access token and user".to_string(),
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    error_code: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

/// Maps a provider error response to a typed [`AuthApiError`].
fn classify_api_error(status: StatusCode, body: &str) -> AuthApiError {
    let payload: ErrorPayload = serde_json::from_str(body).unwrap_or_default();
    let code = payload.error_code.or(payload.error);
    match code.as_deref() {
        Some("invalid_email" | "email_address_invalid") => return AuthApiError::InvalidEmail,
        Some("invalid_credentials" | "invalid_grant") => return AuthApiError::InvalidCredentials,
        Some("user_not_found") => return AuthApiError::UserNotFound,
        Some("email_exists" | "user_already_exists") => return AuthApiError::EmailExists,
        Some("weak_password") => return AuthApiError::WeakPassword,
        _ => {}
    }
    let message = payload
        .error_description
        .or(payload.msg)
        .or(payload.message)
        .map(|message| compact_text(&message))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    AuthApiError::Other {
        code,
        message,
        status: status.as_u16(),
    }
}

/// Normalizes a backend URL into its auth endpoint base.
fn normalize_auth_url(raw: &str) -> AuthResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AuthError::InvalidConfiguration(
            "Backend URL is empty".to_string(),
        ));
    }
    if !is_http_url(trimmed) {
        return Err(AuthError::InvalidConfiguration(
            "Backend URL must start with http:// or https://".to_string(),
        ));
    }
    if trimmed.ends_with("/auth/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/auth/v1"))
    }
}

/// Resolves an optional backend endpoint from its two config parts.
///
/// Returns `Ok(None)` when neither part is set and an error when only
/// one of them is.
pub fn resolve_optional_backend_config(
    url: Option<String>,
    api_key: Option<String>,
) -> AuthResult<Option<(String, String)>> {
    let url = normalize_text_option(url);
    let api_key = normalize_text_option(api_key);
    match (url, api_key) {
        (Some(url), Some(api_key)) => Ok(Some((url, api_key))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(AuthError::InvalidConfiguration(
            "Backend URL is set but the API key is missing".to_string(),
        )),
        (None, Some(_)) => Err(AuthError::InvalidConfiguration(
            "API key is set but the backend URL is missing".to_string(),
        )),
    }
}
