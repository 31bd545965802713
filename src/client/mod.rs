//! Prediction API Client
//!
//! HTTP client for the external IPO prediction service. Every outgoing
//! request passes through [`ApiClient::authorize`], which attaches
//! `Authorization: Bearer <token>` when the session store holds a token.
//!
//! No retries, no timeouts and no response interception: failures propagate
//! to the calling view as [`ClientError`].

mod dto;
mod error;

pub use dto::{
    Credentials, ErrorBody, ExplainResponse, HealthResponse, HistoryEntry, HistoryResponse,
    LoginResponse, PredictItem, PredictRequest, PredictResponse, Prediction,
};
pub use error::{ClientError, ClientResult};

use crate::config::ApiConfig;
use crate::session::{self, SharedStore};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Configured request dispatcher shared by all views
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: SharedStore,
}

impl ApiClient {
    /// Create a client for `base_url` reading tokens from `store`
    pub fn new(base_url: impl Into<String>, store: SharedStore) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: normalize_base(&base_url),
            store,
        }
    }

    /// Create a client from the `[api]` config section
    pub fn from_config(config: &ApiConfig, store: SharedStore) -> Self {
        Self::new(config.base_url.clone(), store)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session store this client reads tokens from
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Request interceptor: attach the bearer token if one is persisted
    ///
    /// The store is read at dispatch time so a login or logout between two
    /// requests is picked up immediately.
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match session::token(self.store.as_ref()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> ClientResult<Response> {
        let request = self.authorize(request);
        tracing::debug!(%method, path, "Dispatching API request");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, path, "API request failed: {}", e);
            ClientError::Request(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: ErrorBody = response.json().await.unwrap_or_default();
        let detail = body.message();
        tracing::warn!(
            %method,
            path,
            status = status.as_u16(),
            detail = detail.as_deref().unwrap_or(""),
            "API returned error"
        );
        Err(ClientError::Api {
            status: status.as_u16(),
            detail,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// POST a JSON body and decode a JSON response
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.dispatch(Method::POST, path, request).await?;
        Self::decode(response).await
    }

    /// GET and decode a JSON response
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.client.get(self.url(path));
        let response = self.dispatch(Method::GET, path, request).await?;
        Self::decode(response).await
    }

    /// `POST /login`
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<LoginResponse> {
        self.post("/login", credentials).await
    }

    /// `POST /register`. The response body is not used.
    pub async fn register(&self, credentials: &Credentials) -> ClientResult<()> {
        let request = self.client.post(self.url("/register")).json(credentials);
        self.dispatch(Method::POST, "/register", request).await?;
        Ok(())
    }

    /// `POST /predict`
    pub async fn predict(&self, request: &PredictRequest) -> ClientResult<PredictResponse> {
        self.post("/predict", request).await
    }

    /// `POST /explain`
    pub async fn explain(&self, request: &PredictRequest) -> ClientResult<ExplainResponse> {
        self.post("/explain", request).await
    }

    /// `GET /history`
    pub async fn history(&self) -> ClientResult<Vec<HistoryEntry>> {
        let response: HistoryResponse = self.get("/history").await?;
        Ok(response.history)
    }

    /// `GET /health`
    pub async fn health(&self) -> ClientResult<bool> {
        let response: HealthResponse = self.get("/health").await?;
        Ok(response.ok)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn normalize_base(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_api::MockApi;
    use crate::session::{MemoryStore, SessionStore, TOKEN_KEY};
    use serde_json::json;
    use std::sync::Arc;

    fn sample_item() -> PredictItem {
        PredictItem {
            ticker: "ABC".to_string(),
            issue_price: 120.0,
            listing_date: "2024-01-01".to_string(),
            exchange: "NSE".to_string(),
            sector: "TECH".to_string(),
        }
    }

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("http://api:9000/"), "http://api:9000");
        assert_eq!(normalize_base("  "), DEFAULT_API_BASE);
    }

    #[test]
    fn test_url_join() {
        let client = ApiClient::new("http://h:1/", Arc::new(MemoryStore::new()));
        assert_eq!(client.url("/login"), "http://h:1/login");
        assert_eq!(client.url("predict"), "http://h:1/predict");
    }

    #[tokio::test]
    async fn test_bearer_header_attached_when_token_present() {
        let mock = MockApi::start().await;
        mock.respond("/predict", 200, json!({"results": []}));

        let store = Arc::new(MemoryStore::with_values([(TOKEN_KEY, "tok.en-123")]));
        let client = ApiClient::new(mock.base_url(), store);

        client.predict(&PredictRequest::single(sample_item())).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].authorization.as_deref(), Some("Bearer tok.en-123"));
    }

    #[tokio::test]
    async fn test_no_header_without_token() {
        let mock = MockApi::start().await;
        mock.respond("/register", 201, json!({"ok": true}));

        let client = ApiClient::new(mock.base_url(), Arc::new(MemoryStore::new()));
        client
            .register(&Credentials::new("erin", "pw"))
            .await
            .unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].authorization, None);
        assert_eq!(calls[0].body, json!({"username": "erin", "password": "pw"}));
    }

    #[tokio::test]
    async fn test_token_read_at_dispatch_time() {
        let mock = MockApi::start().await;
        mock.respond("/health", 200, json!({"ok": true}));

        let store = Arc::new(MemoryStore::new());
        let client = ApiClient::new(mock.base_url(), store.clone());

        assert!(client.health().await.unwrap());
        store.set(TOKEN_KEY, "later").unwrap();
        assert!(client.health().await.unwrap());

        let calls = mock.calls();
        assert_eq!(calls[0].authorization, None);
        assert_eq!(calls[1].authorization.as_deref(), Some("Bearer later"));
    }

    #[tokio::test]
    async fn test_error_detail_extracted() {
        let mock = MockApi::start().await;
        mock.respond("/predict", 400, json!({"detail": "bad ticker"}));

        let client = ApiClient::new(mock.base_url(), Arc::new(MemoryStore::new()));
        let err = client
            .predict(&PredictRequest::single(sample_item()))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.detail(), Some("bad ticker"));
    }

    #[tokio::test]
    async fn test_error_without_json_body() {
        let mock = MockApi::start().await;
        mock.respond_text("/login", 502, "upstream down");

        let client = ApiClient::new(mock.base_url(), Arc::new(MemoryStore::new()));
        let err = client
            .login(&Credentials::new("a", "b"))
            .await
            .unwrap_err();

        assert_eq!(err.detail(), None);
        assert_eq!(err.user_message("Login failed"), "Login failed");
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = ApiClient::new("http://127.0.0.1:1", Arc::new(MemoryStore::new()));
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ClientError::Request(_)));
    }

    #[tokio::test]
    async fn test_history_and_explain() {
        let mock = MockApi::start().await;
        mock.respond(
            "/history",
            200,
            json!({"history": [{"user": "u", "time": "2024-01-02T03:04:05",
                "result": {"ticker": "ABC", "predicted_firstday_pct": 3.0}}]}),
        );
        mock.respond(
            "/explain",
            200,
            json!({"explanations": [{"issue_price": 0.4, "sector_code": 0.1}]}),
        );

        let client = ApiClient::new(mock.base_url(), Arc::new(MemoryStore::new()));

        let history = client.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].result.ticker, "ABC");

        let explain = client
            .explain(&PredictRequest::single(sample_item()))
            .await
            .unwrap();
        assert_eq!(explain.explanations[0]["issue_price"], 0.4);
    }

    #[tokio::test]
    async fn test_decode_error() {
        let mock = MockApi::start().await;
        mock.respond("/login", 200, json!({"unexpected": true}));

        let client = ApiClient::new(mock.base_url(), Arc::new(MemoryStore::new()));
        let err = client
            .login(&Credentials::new("a", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
