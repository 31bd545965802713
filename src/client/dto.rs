//! Request/Response DTOs for the prediction API

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Username/password pair sent to `/login` and `/register`
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful `/login` response
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Some deployments only return the token
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// One IPO to score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictItem {
    pub ticker: String,
    /// NaN serializes as JSON `null`
    pub issue_price: f64,
    /// Expected as YYYY-MM-DD; not validated client-side
    pub listing_date: String,
    pub exchange: String,
    pub sector: String,
}

/// Body of `/predict` and `/explain`
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub items: Vec<PredictItem>,
}

impl PredictRequest {
    /// Single-element batch, as the dashboard submits
    pub fn single(item: PredictItem) -> Self {
        Self { items: vec![item] }
    }
}

/// One scored IPO
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub ticker: String,
    pub predicted_firstday_pct: f64,
    /// Encoded feature vector echoed by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<HashMap<String, serde_json::Value>>,
}

/// Successful `/predict` response
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub results: Vec<Prediction>,
}

/// Successful `/explain` response: feature contributions per item
#[derive(Debug, Clone, Deserialize)]
pub struct ExplainResponse {
    #[serde(default)]
    pub explanations: Vec<HashMap<String, f64>>,
}

/// A past prediction recorded by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user: String,
    pub time: String,
    pub result: Prediction,
}

impl HistoryEntry {
    /// Recorded time, if it parses as an ISO timestamp
    pub fn timestamp(&self) -> Option<chrono::NaiveDateTime> {
        chrono::NaiveDateTime::parse_from_str(&self.time, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| chrono::NaiveDateTime::parse_from_str(&self.time, "%Y-%m-%dT%H:%M:%S"))
            .ok()
    }
}

/// Successful `/history` response
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// `/health` response
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub ok: bool,
}

/// Error body returned by the API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Human-readable detail
    ///
    /// Plain strings are returned verbatim. Validation error lists
    /// (`[{"msg": ..}, ..]`) are flattened into their messages.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(entries) => {
                let msgs: Vec<&str> = entries
                    .iter()
                    .filter_map(|e| e.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if msgs.is_empty() {
                    None
                } else {
                    Some(msgs.join("; "))
                }
            }
            _ => None,
        }
    }
}
