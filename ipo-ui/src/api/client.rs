//! HTTP API Client
//!
//! Functions for calling the prediction API. Every request carries
//! `Authorization: Bearer <token>` when a token is stored at send time.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::state::session;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// API base URL, fixed when the bundle is built
pub fn api_base() -> String {
    normalize_base(option_env!("IPO_API_URL"))
}

fn normalize_base(configured: Option<&str>) -> String {
    configured
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_BASE)
        .trim_end_matches('/')
        .to_string()
}

// ============ Request/Response Types ============

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictItem {
    pub ticker: String,
    /// NaN serializes as JSON `null`
    pub issue_price: f64,
    pub listing_date: String,
    pub exchange: String,
    pub sector: String,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    items: &'a [PredictItem],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    pub ticker: String,
    pub predicted_firstday_pct: f64,
}

#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub results: Vec<Prediction>,
}

/// A failed call, with the server's detail when it sent one
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub detail: Option<String>,
}

impl ApiError {
    /// Text to show the user: the detail, or the action's fallback
    pub fn message(&self, fallback: &str) -> String {
        self.detail.clone().unwrap_or_else(|| fallback.to_string())
    }
}

/// Pull a readable message out of an error body
///
/// A string `detail` is used as-is; a validation list contributes its `msg`
/// fields joined with `"; "`.
pub fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.clone()),
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

// ============ Transport ============

/// `Authorization` value for a stored token, used verbatim
pub fn auth_header(token: Option<&str>) -> Option<String> {
    token.map(|token| format!("Bearer {}", token))
}

fn with_auth(request: RequestBuilder) -> RequestBuilder {
    match auth_header(session::token().as_deref()) {
        Some(value) => request.header("Authorization", &value),
        None => request,
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    web_sys::console::warn_1(&format!("API error {}: {}", response.status(), body).into());
    Err(ApiError {
        detail: detail_message(&body),
    })
}

async fn post<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiError> {
    let response = post_raw(path, body).await?;
    response.json().await.map_err(|e| {
        web_sys::console::warn_1(&format!("Parse error: {}", e).into());
        ApiError { detail: None }
    })
}

async fn post_raw<B: Serialize>(path: &str, body: &B) -> Result<Response, ApiError> {
    let request = with_auth(Request::post(&format!("{}{}", api_base(), path)))
        .json(body)
        .map_err(|_| ApiError { detail: None })?;

    let response = request.send().await.map_err(|e| {
        web_sys::console::warn_1(&format!("Network error: {}", e).into());
        ApiError { detail: None }
    })?;

    check(response).await
}

// ============ API Functions ============

/// `POST /login`
pub async fn login(username: &str, password: &str) -> Result<LoginResponse, ApiError> {
    post("/login", &Credentials { username, password }).await
}

/// `POST /register`; the success body is ignored
pub async fn register(username: &str, password: &str) -> Result<(), ApiError> {
    post_raw("/register", &Credentials { username, password }).await?;
    Ok(())
}

/// `POST /predict` with a single item
pub async fn predict(item: PredictItem) -> Result<PredictResponse, ApiError> {
    post("/predict", &PredictRequest { items: &[item] }).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base(None), "http://localhost:8000");
        assert_eq!(normalize_base(Some("")), "http://localhost:8000");
        assert_eq!(normalize_base(Some("https://api.example.com/")), "https://api.example.com");
    }

    #[test]
    fn test_auth_header() {
        assert_eq!(auth_header(None), None);
        assert_eq!(auth_header(Some("eyJ.abc.def")).as_deref(), Some("Bearer eyJ.abc.def"));
        assert_eq!(auth_header(Some(" spaced ")).as_deref(), Some("Bearer  spaced "));
    }

    #[test]
    fn test_detail_message() {
        assert_eq!(
            detail_message(r#"{"detail": "Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(
            detail_message(r#"{"detail": [{"msg": "a"}, {"msg": "b"}]}"#).as_deref(),
            Some("a; b")
        );
        assert_eq!(detail_message(r#"{"error": "x"}"#), None);
        assert_eq!(detail_message("Internal Server Error"), None);
    }

    #[test]
    fn test_error_fallback() {
        let err = ApiError { detail: None };
        assert_eq!(err.message("Login failed"), "Login failed");

        let err = ApiError {
            detail: Some("Username exists".to_string()),
        };
        assert_eq!(err.message("Register failed"), "Username exists");
    }

    #[test]
    fn test_nan_price_is_null() {
        let item = PredictItem {
            ticker: "ABC".to_string(),
            issue_price: f64::NAN,
            listing_date: "2024-01-01".to_string(),
            exchange: "NSE".to_string(),
            sector: "TECH".to_string(),
        };
        let body = serde_json::to_value(PredictRequest { items: &[item] }).unwrap();
        assert!(body["items"][0]["issue_price"].is_null());
    }
}
