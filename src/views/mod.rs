//! Views
//!
//! Form state and submit handlers for the three screens. Views own only
//! transient state (field values, the last message or result). The session
//! lives in the shared [`SessionStore`](crate::session::SessionStore) and all
//! network access goes through the shared [`ApiClient`](crate::client::ApiClient).
//!
//! Submit handlers return a [`Transition`] instead of navigating themselves;
//! the shell (terminal front-end or tests) applies it to the router.
//!
//! Each submit is also available as a free function (`login`, `register`,
//! `predict`) plus an `apply` step, so a shell can run overlapping requests
//! and apply outcomes in completion order. There is no in-flight guard: the
//! last outcome applied wins.

pub mod dashboard;
pub mod login;
pub mod register;

pub use dashboard::{
    format_pct, parse_issue_price, predict, DashboardView, PredictionForm, PredictionOutcome,
};
pub use login::{login, LoginView};
pub use register::{register, RegisterView, REGISTERED_MESSAGE};

use crate::router::Route;
use std::time::Duration;

/// Delay between a successful registration and the redirect to login
pub const REGISTER_REDIRECT_DELAY: Duration = Duration::from_millis(800);

/// Fallback message when login fails without a server detail
pub const LOGIN_FAILED: &str = "Login failed";
/// Fallback message when registration fails without a server detail
pub const REGISTER_FAILED: &str = "Register failed";
/// Fallback message when prediction fails without a server detail
pub const PREDICTION_FAILED: &str = "Prediction failed";

/// What the shell should do after a view handled an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Stay on the current view
    Stay,
    /// Navigate immediately
    Navigate(Route),
    /// Navigate once the delay has elapsed
    NavigateAfter(Route, Duration),
}

impl Transition {
    /// Destination route, if any
    pub fn target(&self) -> Option<&Route> {
        match self {
            Transition::Stay => None,
            Transition::Navigate(route) | Transition::NavigateAfter(route, _) => Some(route),
        }
    }
}
