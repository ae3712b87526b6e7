//! Raw request/response transport
//!
//! The [`Transport`] trait is the seam between the intercepting client and
//! the network. [`HttpTransport`] is the reqwest implementation used by the
//! application; tests substitute scripted transports.

use super::error::ApiError;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// An outbound API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the server URL, e.g. `/api/datasets/list`
    pub path: String,
    pub body: Option<Value>,
    /// Bearer credential; filled in by the client just before sending
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn get(path: &str) -> Self {
        Self {
            method: Method::GET,
            path: path.to_string(),
            body: None,
            bearer: None,
        }
    }

    pub fn post(path: &str, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.to_string(),
            body: Some(body),
            bearer: None,
        }
    }
}

/// Status and decoded body of a response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `message` field of the node's response envelope, if any
    pub fn message(&self) -> Option<String> {
        match &self.body {
            Value::Object(map) => map.get("message").and_then(Value::as_str).map(str::to_string),
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// reqwest-backed transport bound to one node URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("invalid server URL '{}': {}", base_url, e)))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::from)?;
        Ok(Self { http, base_url })
    }

    fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        // Keep any path prefix the node is mounted under
        let joined = format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        );
        Url::parse(&joined).map_err(|e| ApiError::Transport(format!("invalid URL '{}': {}", joined, e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url_for(&request.path)?;
        let mut builder = self.http.request(request.method.clone(), url);

        if let Some(token) = &request.bearer {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::Transport(format!("invalid token: {}", e)))?;
            builder = builder.header(AUTHORIZATION, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::trace!(method = %request.method, path = %request.path, "sending request");
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        tracing::debug!(method = %request.method, path = %request.path, status, "response");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_sends_bearer_and_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/datasets/list"))
            .and(header("authorization", "Bearer abc"))
            .and(body_json(json!({"search": ""})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "result": [], "message": "ok"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let mut request = ApiRequest::post("/api/datasets/list", json!({"search": ""}));
        request.bearer = Some("abc".to_string());

        let response = transport.send(&request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.message().as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_keeps_non_json_error_body_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/config/node-environ"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let response = transport
            .send(&ApiRequest::get("/api/config/node-environ"))
            .await
            .unwrap();
        assert_eq!(response.status, 502);
        assert!(!response.is_success());
        assert_eq!(response.message().as_deref(), Some("Bad Gateway"));
    }

    #[tokio::test]
    async fn test_base_url_prefix_is_preserved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/node/api/token/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let base = format!("{}/node/", server.uri());
        let transport = HttpTransport::new(&base, Duration::from_secs(5)).unwrap();
        let response = transport
            .send(&ApiRequest::get("/api/token/refresh"))
            .await
            .unwrap();
        assert!(response.is_success());
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = HttpTransport::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
