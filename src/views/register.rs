//! Register view
//!
//! Calls `POST /register`, shows a status message and, on success, sends the
//! user to the login view after [`REGISTER_REDIRECT_DELAY`]. Registration
//! never creates a session.

use super::{Transition, REGISTER_FAILED, REGISTER_REDIRECT_DELAY};
use crate::client::{ApiClient, Credentials};
use crate::router::Route;

/// Confirmation shown after a successful registration
pub const REGISTERED_MESSAGE: &str = "Registered. You can now login.";

/// Register form state
#[derive(Debug, Default, Clone)]
pub struct RegisterView {
    pub username: String,
    pub password: String,
    message: Option<String>,
}

impl RegisterView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status message from the last attempt (confirmation or error)
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Submit the form
    pub async fn submit(&mut self, client: &ApiClient) -> Transition {
        let credentials = Credentials::new(self.username.clone(), self.password.clone());
        let outcome = register(client, &credentials).await;
        self.apply(outcome)
    }

    /// Apply the outcome of a register call
    pub fn apply(&mut self, outcome: Result<(), String>) -> Transition {
        match outcome {
            Ok(()) => {
                self.message = Some(REGISTERED_MESSAGE.to_string());
                Transition::NavigateAfter(Route::Login, REGISTER_REDIRECT_DELAY)
            }
            Err(message) => {
                self.message = Some(message);
                Transition::Stay
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("== Register ==\n");
        if let Some(message) = &self.message {
            out.push_str(message);
            out.push('\n');
        }
        out.push_str("Have an account? Type `login`.\n");
        out
    }
}

/// Call `/register`, returning the user-facing error message on failure
pub async fn register(client: &ApiClient, credentials: &Credentials) -> Result<(), String> {
    client.register(credentials).await.map_err(|e| {
        tracing::warn!(username = %credentials.username, "Registration failed: {}", e);
        e.user_message(REGISTER_FAILED)
    })?;
    tracing::info!(username = %credentials.username, "Registered");
    Ok(())
}
