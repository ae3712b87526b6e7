//! Intercepting API client
//!
//! Every call goes through [`ApiClient::execute`], which attaches the access
//! token and recovers from 401 responses:
//!
//! - no token held: redirect to login, unless already on the login page
//! - token held and still valid: privilege failure, alert and go back
//! - token held but expired: refresh once (shared by all concurrent
//!   failures) and replay the request exactly once
//! - the refresh call itself rejected: the session is over, redirect to login
//! - the refresh call failing otherwise: one alert per refresh, however
//!   many requests were waiting on it
//!
//! 404 and every other status are propagated to the caller untouched.

use super::endpoints::REFRESH_TOKEN;
use super::error::ApiError;
use super::session::{Session, TokenPair};
use super::transport::{ApiRequest, ApiResponse, Transport};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const SESSION_EXPIRED_MESSAGE: &str = "Error 401: session expired, please login again";
pub const INSUFFICIENT_PRIVILEGES_MESSAGE: &str = "Insufficient privileges";

/// UI side effects the client needs while recovering from a 401
pub trait Navigator: Send + Sync {
    /// Whether the user is currently looking at the login page
    fn on_login_page(&self) -> bool;
    /// Show a blocking message to the user
    fn alert(&self, message: &str);
    /// Go back one step in navigation history
    fn back(&self);
    /// Tokens are gone; show `message` and send the user to the login page
    fn session_expired(&self, message: &str);
}

type RefreshFlight = Shared<BoxFuture<'static, Result<TokenPair, ApiError>>>;

struct Inner {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    navigator: Arc<dyn Navigator>,
    /// Refresh currently in flight, joined by every request that needs it
    pending_refresh: Mutex<Option<RefreshFlight>>,
}

/// Cheaply cloneable handle to the node API
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("session", &self.inner.session)
            .finish()
    }
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<Session>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                session,
                navigator,
                pending_refresh: Mutex::new(None),
            }),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    /// GET `path` and decode the `result` field of the response envelope
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call(ApiRequest::get(path)).await
    }

    /// POST `body` to `path` and decode the `result` field of the response envelope
    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        self.call(ApiRequest::post(path, body)).await
    }

    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        serde_json::from_value(envelope_result(response.body)).map_err(ApiError::from)
    }

    /// Send `request`, recovering from 401 as described in the module docs
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let (response, sent_with) = self.send(request.clone()).await?;

        match response.status {
            200..=299 => Ok(response),
            401 => {
                self.recover_unauthorized(&request, &response, sent_with).await?;
                tracing::debug!(path = %request.path, "replaying request after token refresh");
                let (replayed, _) = self.send(request).await?;
                if replayed.is_success() {
                    Ok(replayed)
                } else {
                    Err(failure(&replayed))
                }
            }
            _ => Err(failure(&response)),
        }
    }

    /// Attach credentials and hand the request to the transport.
    ///
    /// Returns the access token the request carried, if any.
    async fn send(&self, mut request: ApiRequest) -> Result<(ApiResponse, Option<String>), ApiError> {
        if request.path != REFRESH_TOKEN {
            request.bearer = self.inner.session.access_token();
        }
        let sent_with = if request.path == REFRESH_TOKEN {
            None
        } else {
            request.bearer.clone()
        };
        let response = self.inner.transport.send(&request).await?;
        Ok((response, sent_with))
    }

    /// Decide what a 401 means. `Ok(())` means the request should be replayed.
    async fn recover_unauthorized(
        &self,
        request: &ApiRequest,
        response: &ApiResponse,
        sent_with: Option<String>,
    ) -> Result<(), ApiError> {
        let message = response.message();
        let navigator = &self.inner.navigator;

        let Some(current) = self.inner.session.access_token() else {
            if navigator.on_login_page() {
                return Err(ApiError::Unauthorized {
                    message: message.unwrap_or_else(|| "Unauthorized".to_string()),
                });
            }
            return Err(self.expire_session(message));
        };

        if self.inner.session.is_access_token_active() {
            // Sent with a token that a concurrent refresh has since replaced
            if sent_with.as_ref().is_some_and(|sent| *sent != current) {
                return Ok(());
            }
            tracing::warn!(path = %request.path, "request rejected with a valid token");
            navigator.alert(INSUFFICIENT_PRIVILEGES_MESSAGE);
            navigator.back();
            return Err(ApiError::InsufficientPrivileges);
        }

        if request.path == REFRESH_TOKEN {
            return Err(self.expire_session(message));
        }

        match self.refresh_tokens(sent_with.as_deref(), message).await {
            Ok(()) => Ok(()),
            // Already alerted or redirected by the refresh itself
            Err(err @ ApiError::SessionExpired { .. }) => Err(err),
            Err(err) => Err(ApiError::RefreshFailed(Box::new(err))),
        }
    }

    /// Refresh the session, joining a refresh that is already in flight.
    ///
    /// `Ok(())` once the session holds a token other than `sent_with`.
    async fn refresh_tokens(
        &self,
        sent_with: Option<&str>,
        message: Option<String>,
    ) -> Result<(), ApiError> {
        let flight = {
            let mut pending = self.inner.pending_refresh.lock().await;
            // A refresh finished between our 401 and taking the lock
            let current = self.inner.session.access_token();
            if sent_with.is_some() && current.is_some() && current.as_deref() != sent_with {
                tracing::debug!("token already refreshed, replaying");
                return Ok(());
            }
            match pending.as_ref() {
                Some(flight) => {
                    tracing::debug!("joining in-flight token refresh");
                    flight.clone()
                }
                None => {
                    let client = self.clone();
                    let flight = async move { client.refresh_flight(message).await }
                        .boxed()
                        .shared();
                    *pending = Some(flight.clone());
                    flight
                }
            }
        };

        let result = flight.clone().await;

        let mut pending = self.inner.pending_refresh.lock().await;
        if pending.as_ref().is_some_and(|p| p.ptr_eq(&flight)) {
            *pending = None;
        }
        result.map(|_| ())
    }

    /// Body of a shared refresh; failures are reported here, once.
    ///
    /// `message` is the 401 message of the request that started the refresh.
    async fn refresh_flight(&self, message: Option<String>) -> Result<TokenPair, ApiError> {
        let result = self.request_new_tokens().await;
        match &result {
            Ok(_) | Err(ApiError::SessionExpired { .. }) => {}
            Err(err) => {
                let text = message.unwrap_or_else(|| err.user_message());
                self.inner.navigator.alert(&text);
            }
        }
        result
    }

    async fn request_new_tokens(&self) -> Result<TokenPair, ApiError> {
        let Some(refresh_token) = self.inner.session.refresh_token() else {
            return Err(self.expire_session(None));
        };

        tracing::info!("access token expired, requesting a new one");
        let mut request = ApiRequest::get(REFRESH_TOKEN);
        request.bearer = Some(refresh_token);

        let (response, _) = self.send(request).await?;
        match response.status {
            200..=299 => {
                let tokens: TokenPair = serde_json::from_value(envelope_result(response.body))?;
                self.inner.session.store(tokens.clone());
                tracing::info!("session refreshed");
                Ok(tokens)
            }
            // The refresh token is no longer accepted either
            401 => Err(self.expire_session(response.message())),
            _ => Err(failure(&response)),
        }
    }

    fn expire_session(&self, message: Option<String>) -> ApiError {
        let message = message.unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string());
        tracing::warn!(%message, "session expired, redirecting to login");
        self.inner.session.clear();
        self.inner.navigator.session_expired(&message);
        ApiError::SessionExpired { message }
    }
}

/// Pull `result` out of the `{success, result, message}` envelope
fn envelope_result(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Map a non-2xx response to an error without any recovery
fn failure(response: &ApiResponse) -> ApiError {
    let message = response
        .message()
        .unwrap_or_else(|| format!("request failed with status {}", response.status));
    match response.status {
        404 => ApiError::NotFound { message },
        401 => ApiError::Unauthorized { message },
        status => ApiError::Status { status, message },
    }
}
