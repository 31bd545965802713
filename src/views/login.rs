//! Login view
//!
//! Collects credentials, calls `POST /login`, persists the returned token and
//! username, and sends the user to the dashboard. On failure the session
//! store is left untouched and the error is shown inline for retry.

use super::{Transition, LOGIN_FAILED};
use crate::client::{ApiClient, Credentials};
use crate::router::Route;
use crate::session::{self, Session};

/// Login form state
#[derive(Debug, Default, Clone)]
pub struct LoginView {
    pub username: String,
    pub password: String,
    error: Option<String>,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inline error from the last failed attempt
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    /// Submit the form
    pub async fn submit(&mut self, client: &ApiClient) -> Transition {
        let outcome = login(client, &self.credentials()).await;
        self.apply(outcome)
    }

    /// Apply the outcome of a login call
    pub fn apply(&mut self, outcome: Result<Session, String>) -> Transition {
        match outcome {
            Ok(_) => {
                self.error = None;
                Transition::Navigate(Route::Dashboard)
            }
            Err(message) => {
                self.error = Some(message);
                Transition::Stay
            }
        }
    }

    /// Plain-text rendering for the terminal front-end
    pub fn render(&self) -> String {
        let mut out = String::from("== Login ==\n");
        if let Some(error) = &self.error {
            out.push_str(&format!("! {}\n", error));
        }
        out.push_str("Don't have an account? Type `register`.\n");
        out
    }
}

/// Call `/login` and persist the session on success
///
/// Returns the user-facing error message on failure. The store is written
/// only after a successful response has been fully decoded.
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<Session, String> {
    let response = client.login(credentials).await.map_err(|e| {
        tracing::warn!(username = %credentials.username, "Login failed: {}", e);
        e.user_message(LOGIN_FAILED)
    })?;

    let session = Session {
        token: response.access_token,
        username: response
            .username
            .unwrap_or_else(|| credentials.username.clone()),
    };

    session::save_session(client.store().as_ref(), &session).map_err(|e| {
        tracing::warn!("Failed to persist session: {}", e);
        LOGIN_FAILED.to_string()
    })?;

    tracing::info!(username = %session.username, "Logged in");
    Ok(session)
}
