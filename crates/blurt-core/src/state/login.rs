//! Login screen state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::services::{AccountService, SignUpOutcome};

const CONFIRMATION_NOTICE: &str = "Check your inbox to confirm the address, then sign in.";

/// Where the login screen is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginPhase {
    #[default]
    Idle,
    Submitting,
    Authenticated,
}

/// Snapshot of the login screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub phase: LoginPhase,
    /// User-facing message from the last failed attempt; cleared when a
    /// new attempt starts.
    pub error: Option<String>,
}

impl LoginState {
    /// True while a submission is in flight; the UI disables its
    /// controls on this.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, LoginPhase::Submitting)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.phase, LoginPhase::Authenticated)
    }
}

/// Drives the login screen against [`AccountService`].
///
/// Both submit paths run one full round trip: enter `Submitting`, call
/// the service, then land in `Authenticated` or back in `Idle` with an
/// error message. The password is dropped from the state as soon as it
/// is no longer needed.
pub struct LoginFlow {
    accounts: Arc<AccountService>,
    state: watch::Sender<LoginState>,
}

impl LoginFlow {
    #[must_use]
    pub fn new(accounts: Arc<AccountService>) -> Self {
        Self {
            accounts,
            state: watch::Sender::new(LoginState::default()),
        }
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoginState> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    #[must_use]
    pub fn snapshot(&self) -> LoginState {
        self.state.borrow().clone()
    }

    pub fn set_email(&self, email: impl Into<String>) {
        let email = email.into();
        self.state.send_modify(|state| state.email = email);
    }

    pub fn set_password(&self, password: impl Into<String>) {
        let password = password.into();
        self.state.send_modify(|state| state.password = password);
    }

    /// Submits the entered credentials for sign-in.
    pub async fn submit_sign_in(&self) {
        let (email, password) = self.begin_submit();
        let result = self.accounts.sign_in(&email, &password).await;
        self.state.send_modify(|state| match result {
            Ok(_) => {
                state.phase = LoginPhase::Authenticated;
                state.password.clear();
            }
            Err(error) => {
                state.phase = LoginPhase::Idle;
                state.error = Some(error.to_string());
            }
        });
    }

    /// Submits the entered credentials for account creation.
    pub async fn submit_sign_up(&self) {
        let (email, password) = self.begin_submit();
        let result = self.accounts.sign_up(&email, &password).await;
        self.state.send_modify(|state| match result {
            Ok(SignUpOutcome::SignedIn(_)) => {
                state.phase = LoginPhase::Authenticated;
                state.password.clear();
            }
            Ok(SignUpOutcome::ConfirmationRequired) => {
                state.phase = LoginPhase::Idle;
                state.password.clear();
                state.error = Some(CONFIRMATION_NOTICE.to_string());
            }
            Err(error) => {
                state.phase = LoginPhase::Idle;
                state.error = Some(error.to_string());
            }
        });
    }

    fn begin_submit(&self) -> (String, String) {
        let mut email = String::new();
        let mut password = String::new();
        self.state.send_modify(|state| {
            state.error = None;
            state.phase = LoginPhase::Submitting;
            email.clone_from(&state.email);
            password.clone_from(&state.password);
        });
        (email, password)
    }
}
