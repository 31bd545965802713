//! # IPO Client
//!
//! Client for the IPO first-day prediction service: user registration, login,
//! and a dashboard form that submits IPO attributes to the remote prediction
//! endpoint and shows the returned percentage.
//!
//! All business logic (authentication, the prediction model, storage) lives
//! in the external service. This crate implements the client side of the
//! contract: which requests go out, what gets persisted, and which screen the
//! user ends up on.
//!
//! ## Modules
//!
//! - [`session`]: persisted session storage (token + username)
//! - [`client`]: HTTP client wrapper attaching the bearer token
//! - [`views`]: login, register and dashboard form state and submit handlers
//! - [`router`]: routes and the dashboard route guard
//! - [`app`]: composition of router and views for the terminal front-end
//! - [`batch`]: CSV import of prediction items
//! - [`config`]: configuration from TOML files and the environment
//! - [`logging`]: tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ipo_client::client::{ApiClient, Credentials, PredictRequest};
//! use ipo_client::session::MemoryStore;
//! use ipo_client::views::{self, PredictionForm, PredictionOutcome};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new("http://localhost:8000", Arc::new(MemoryStore::new()));
//!
//!     // Persists the token; later requests carry `Authorization: Bearer ..`
//!     views::login(&client, &Credentials::new("alice", "secret")).await?;
//!
//!     let form = PredictionForm {
//!         ticker: "ABC".into(),
//!         issue_price: "120".into(),
//!         listing_date: "2024-01-01".into(),
//!         exchange: "NSE".into(),
//!         sector: "TECH".into(),
//!     };
//!     let request = PredictRequest::single(form.to_item());
//!
//!     if let PredictionOutcome::Success(p) = views::predict(&client, &request).await {
//!         println!("{}: {:.2}%", p.ticker, p.predicted_firstday_pct);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod batch;
pub mod client;
pub mod config;
pub mod logging;
pub mod router;
pub mod session;
pub mod views;

#[cfg(test)]
mod mock_api;

// Re-export top-level types for convenience
pub use app::{App, Screen};

pub use client::{ApiClient, ClientError, ClientResult, Credentials, PredictItem, Prediction};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, SessionConfig};

pub use router::{Resolution, Route, Router};

pub use session::{FileStore, MemoryStore, Session, SessionError, SessionStore, SharedStore};

pub use views::{DashboardView, LoginView, PredictionOutcome, RegisterView, Transition};
