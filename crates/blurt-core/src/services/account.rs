//! Account use cases: sign-up, sign-in, sign-out.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::auth::{IdentityProvider, Session};
use crate::error::{Error, Result};
use crate::models::UserProfile;
use crate::session::SessionHandle;
use crate::store::{DocumentStore, ProfileRepository};

const MIN_PASSWORD_CHARS: usize = 6;

/// Result of an account creation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The provider issued a session right away and the profile was
    /// written.
    SignedIn(UserProfile),
    /// The provider wants the email address confirmed first; nothing was
    /// stored and the user must sign in afterwards.
    ConfirmationRequired,
}

/// Orchestrates the identity provider, profile records, and the shared
/// session.
#[derive(Clone)]
pub struct AccountService {
    provider: Arc<dyn IdentityProvider>,
    profiles: ProfileRepository,
    sessions: SessionHandle,
}

impl AccountService {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        sessions: SessionHandle,
    ) -> Self {
        Self {
            provider,
            profiles: ProfileRepository::new(store),
            sessions,
        }
    }

    /// Signs in with email and password.
    ///
    /// On success the session is established and the user's profile
    /// record is rewritten with a fresh `last_login`.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile> {
        let credentials = validate_credentials(email, password)?;
        let session = self
            .provider
            .sign_in(&credentials.email, &credentials.password)
            .await
            .map_err(Error::SignInFailed)?;
        tracing::info!("Signed in as user {}", session.user_id);
        self.sessions
            .establish(session.clone())
            .map_err(Error::SignInFailed)?;
        self.write_profile(&session, &credentials.email).await
    }

    /// Creates an account with email and password.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome> {
        let credentials = validate_credentials(email, password)?;
        let outcome = self
            .provider
            .sign_up(&credentials.email, &credentials.password)
            .await
            .map_err(Error::SignUpFailed)?;
        match outcome {
            Some(session) => {
                tracing::info!("Signed up as user {}", session.user_id);
                self.sessions
                    .establish(session.clone())
                    .map_err(Error::SignUpFailed)?;
                let profile = self.write_profile(&session, &credentials.email).await?;
                Ok(SignUpOutcome::SignedIn(profile))
            }
            None => {
                tracing::info!("Sign-up accepted; email confirmation pending");
                Ok(SignUpOutcome::ConfirmationRequired)
            }
        }
    }

    /// Signs out, revoking the session with the provider and clearing it
    /// locally. A no-op when already signed out.
    pub async fn sign_out(&self) -> Result<()> {
        if let Some(session) = self.sessions.current() {
            self.provider
                .sign_out(&session.access_token)
                .await
                .map_err(Error::SignOutFailed)?;
            tracing::info!("Signed out user {}", session.user_id);
        }
        self.sessions.clear().map_err(Error::SignOutFailed)
    }

    /// The current session, if a valid one exists.
    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        self.sessions.current()
    }

    /// Loads the signed-in user's profile record; `Ok(None)` when signed
    /// out.
    pub async fn current_profile(&self) -> Result<Option<UserProfile>> {
        let Some(session) = self.sessions.current() else {
            return Ok(None);
        };
        self.profiles
            .get(&session.user_id, &session)
            .await
            .map_err(Error::ProfileLoadFailed)
    }

    /// Rewrites the profile record for `session`'s user.
    ///
    /// A failed write tears the just-established session back down so
    /// the caller is never left signed in without a profile.
    async fn write_profile(&self, session: &Session, fallback_email: &str) -> Result<UserProfile> {
        let email = session
            .email
            .clone()
            .unwrap_or_else(|| fallback_email.to_string());
        let profile = UserProfile::new(session.user_id.clone(), email);
        if let Err(error) = self.profiles.save(&profile, session).await {
            if let Err(clear_error) = self.sessions.clear() {
                tracing::warn!("Failed to clear session after profile write error: {clear_error}");
            }
            return Err(Error::ProfileSaveFailed(error));
        }
        Ok(profile)
    }
}

struct Credentials {
    email: String,
    password: String,
}

/// Validates credentials without touching the backend. Checks run in a
/// fixed order and the first failure wins: email presence, password
/// presence, email shape, password length.
fn validate_credentials(email: &str, password: &str) -> Result<Credentials> {
    let email = email.trim();
    let password = password.trim();
    if email.is_empty() {
        return Err(Error::InvalidInput("Email is required".to_string()));
    }
    if password.is_empty() {
        return Err(Error::InvalidInput("Password is required".to_string()));
    }
    if !email_pattern().is_match(email) {
        return Err(Error::InvalidInput(
            "Email address is not valid".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(Error::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// `local@domain.tld` shape; anything stricter is the provider's call.
fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"))
}
