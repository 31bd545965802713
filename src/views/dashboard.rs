//! Dashboard view
//!
//! Collects the five IPO attributes, submits them to `POST /predict` as a
//! single-element batch and shows the first result. Also owns logout.

use super::{Transition, PREDICTION_FAILED};
use crate::client::{ApiClient, ClientError, PredictItem, PredictRequest, Prediction};
use crate::router::Route;
use crate::session::{self, SharedStore};

/// Raw dashboard form fields, exactly as typed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PredictionForm {
    pub ticker: String,
    /// Free text; parsed on submit
    pub issue_price: String,
    /// Free text, expected YYYY-MM-DD
    pub listing_date: String,
    pub exchange: String,
    pub sector: String,
}

impl PredictionForm {
    /// Build the request item. No field is validated.
    pub fn to_item(&self) -> PredictItem {
        PredictItem {
            ticker: self.ticker.clone(),
            issue_price: parse_issue_price(&self.issue_price),
            listing_date: self.listing_date.clone(),
            exchange: self.exchange.clone(),
            sector: self.sector.clone(),
        }
    }
}

/// Parse free-text issue price the lenient way a browser's `parseFloat` does
///
/// Leading whitespace is skipped and the longest numeric prefix is used
/// (`"120abc"` is 120). Input without a numeric prefix yields NaN, which is
/// sent as JSON `null`.
pub fn parse_issue_price(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    // Exponent only counts when at least one digit follows
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// What the result card shows
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Success(Prediction),
    Failure(String),
}

impl PredictionOutcome {
    /// Predicted first-day change with two decimals, e.g. `12.35%`
    pub fn percentage(&self) -> Option<String> {
        match self {
            PredictionOutcome::Success(p) => Some(format_pct(p.predicted_firstday_pct)),
            PredictionOutcome::Failure(_) => None,
        }
    }
}

/// Format a percentage with two decimals and a `%` suffix
pub fn format_pct(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Dashboard state
pub struct DashboardView {
    store: SharedStore,
    pub form: PredictionForm,
    result: Option<PredictionOutcome>,
}

impl DashboardView {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            form: PredictionForm::default(),
            result: None,
        }
    }

    /// Persisted username for the header, empty when absent
    pub fn username(&self) -> String {
        session::username(self.store.as_ref()).unwrap_or_default()
    }

    /// Outcome of the most recently applied submission
    pub fn result(&self) -> Option<&PredictionOutcome> {
        self.result.as_ref()
    }

    /// Submit the form
    pub async fn submit(&mut self, client: &ApiClient) -> Transition {
        let request = PredictRequest::single(self.form.to_item());
        let outcome = predict(client, &request).await;
        self.apply(outcome);
        Transition::Stay
    }

    /// Replace the displayed result
    pub fn apply(&mut self, outcome: PredictionOutcome) {
        self.result = Some(outcome);
    }

    /// Clear the session and go back to login. Always navigates.
    pub fn logout(&mut self) -> Transition {
        if let Err(e) = session::clear_session(self.store.as_ref()) {
            tracing::warn!("Failed to clear session on logout: {}", e);
        }
        self.result = None;
        tracing::info!("Logged out");
        Transition::Navigate(Route::Login)
    }

    pub fn render(&self) -> String {
        let mut out = format!("== Dashboard ==  [{}]\n", self.username());
        out.push_str("-- Result --\n");
        match &self.result {
            None => out.push_str("No predictions yet\n"),
            Some(PredictionOutcome::Failure(message)) => {
                out.push_str(&format!("! {}\n", message));
            }
            Some(PredictionOutcome::Success(prediction)) => {
                out.push_str(&format!("Ticker: {}\n", prediction.ticker));
                out.push_str(&format!(
                    "Predicted first-day %: {}\n",
                    format_pct(prediction.predicted_firstday_pct)
                ));
            }
        }
        out
    }
}

/// Call `/predict` and reduce the response to what the result card shows
///
/// Only `results[0]` is consumed.
pub async fn predict(client: &ApiClient, request: &PredictRequest) -> PredictionOutcome {
    let outcome = client.predict(request).await.and_then(|response| {
        response
            .results
            .into_iter()
            .next()
            .ok_or(ClientError::Empty("no prediction results"))
    });

    match outcome {
        Ok(prediction) => {
            tracing::debug!(ticker = %prediction.ticker, "Prediction received");
            PredictionOutcome::Success(prediction)
        }
        Err(e) => {
            tracing::warn!("Prediction failed: {}", e);
            PredictionOutcome::Failure(e.user_message(PREDICTION_FAILED))
        }
    }
}
