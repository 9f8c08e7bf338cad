//! Mock transport for testing
//!
//! Serves queued JSON responses keyed by method and path so the pagination
//! walker, windowed search and services can be exercised without a server.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tokio::sync::Mutex;

use super::ApiTransport;
use crate::error::{ApiError, Result};

/// Mock API transport for testing.
///
/// # Example
/// ```ignore
/// let mock = MockTransport::new()
///     .with_response("GET", "/api/v2/Alerts", json!({ "data": [] }))
///     .await;
///
/// let alerts = AlertsService::new(&mock).list().await?;
/// ```
#[derive(Default)]
pub struct MockTransport {
    /// Responses queued per "METHOD path", served in order
    responses: Arc<Mutex<HashMap<String, VecDeque<Value>>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Captured requests for test assertions
    captured_requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// A captured API request for test assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

fn key(method: &str, path: &str) -> String {
    format!("{} {}", method.to_uppercase(), path)
}

impl MockTransport {
    /// Create a new mock with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method path`. Repeated calls queue further pages.
    pub async fn with_response(self, method: &str, path: &str, body: Value) -> Self {
        self.responses
            .lock()
            .await
            .entry(key(method, path))
            .or_default()
            .push_back(body);
        self
    }

    /// Configure an error to return on the next request.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Number of requests issued so far.
    pub async fn call_count(&self) -> usize {
        self.captured_requests.lock().await.len()
    }

    /// Get all captured requests for test assertions.
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.captured_requests.lock().await.clone()
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        self.captured_requests.lock().await.push(CapturedRequest {
            method: method.to_string(),
            path: path.to_string(),
            body: body.cloned(),
        });

        if let Some(err) = self.error.lock().await.take() {
            return Err(err.into());
        }

        self.responses
            .lock()
            .await
            .get_mut(&key(method.as_str(), path))
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| {
                ApiError::NotFound(format!("no mock response for {method} {path}")).into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_serves_responses_in_order() {
        let mock = MockTransport::new()
            .with_response("POST", "/api/v2/Inventory/search", json!({ "data": [] }))
            .await
            .with_response("POST", "/api/v2/Inventory/search", json!({ "data": [1] }))
            .await;

        let body = json!({ "csp": "AWS" });
        let first = mock
            .request(Method::POST, "/api/v2/Inventory/search", Some(&body))
            .await
            .unwrap();
        let second = mock
            .request(Method::POST, "/api/v2/Inventory/search", Some(&body))
            .await
            .unwrap();

        assert_eq!(first, json!({ "data": [] }));
        assert_eq!(second, json!({ "data": [1] }));

        let requests = mock.captured_requests().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].body, Some(body));
    }

    #[tokio::test]
    async fn test_mock_error_is_consumed() {
        let mock = MockTransport::new()
            .with_error(ApiError::Unauthorized)
            .await
            .with_response("GET", "/api/v2/Alerts", json!({ "data": [] }))
            .await;

        assert!(mock.request(Method::GET, "/api/v2/Alerts", None).await.is_err());
        assert!(mock.request(Method::GET, "/api/v2/Alerts", None).await.is_ok());
        assert_eq!(mock.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_mock_unknown_path_is_not_found() {
        let mock = MockTransport::new();
        let err = mock
            .request(Method::GET, "/api/v2/Unknown", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/api/v2/Unknown"));
    }
}
