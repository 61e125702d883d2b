//! Request gateway
//!
//! Every backend call goes through [`ApiClient::request`]. It attaches the
//! session token, turns every outcome into a [`RequestResult`], raises a toast
//! for each failure and ends the session when the backend answers 401.

use std::sync::Arc;

use common::PortalConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

pub use reqwest::Method;

use crate::error::{GatewayError, GatewayResult};
use crate::notify::{Navigator, Notifier};
use crate::session::SessionManager;

/// Notification shown when no response reached the client
pub const NETWORK_ERROR: &str = "Network error";

/// Outcome of a gateway call: exactly one of data or error.
///
/// A `status` of `0` means the request never got an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestResult<T> {
    Success { data: T, status: u16 },
    Failure { error: String, status: u16 },
}

impl<T> RequestResult<T> {
    pub fn status(&self) -> u16 {
        match self {
            RequestResult::Success { status, .. } | RequestResult::Failure { status, .. } => *status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestResult::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestResult::Success { data, .. } => Some(data),
            RequestResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestResult::Success { .. } => None,
            RequestResult::Failure { error, .. } => Some(error),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            RequestResult::Success { data, .. } => Some(data),
            RequestResult::Failure { .. } => None,
        }
    }

    /// Transform the payload of a successful result
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RequestResult<U> {
        match self {
            RequestResult::Success { data, status } => RequestResult::Success {
                data: f(data),
                status,
            },
            RequestResult::Failure { error, status } => RequestResult::Failure { error, status },
        }
    }

    /// Convert into a `Result` for callers that prefer `?`
    pub fn into_result(self) -> GatewayResult<T> {
        match self {
            RequestResult::Success { data, .. } => Ok(data),
            RequestResult::Failure { error, status: 0 } => Err(GatewayError::Transport(error)),
            RequestResult::Failure { error, status } => Err(GatewayError::Http {
                status,
                message: error,
            }),
        }
    }
}

/// Error body shape the backend uses
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for the booking backend
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: PortalConfig,
    session: SessionManager,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a new client
    pub fn new(
        config: PortalConfig,
        session: SessionManager,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            session,
            notifier,
            navigator,
        }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Issue a request and fold every outcome into a [`RequestResult`].
    ///
    /// Never panics and never returns early with an error: transport,
    /// status and decoding failures all come back as `Failure`.
    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> RequestResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.config.endpoint_url(path);
        debug!("{} {}", method, url);

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = body {
            match serde_json::to_vec(body) {
                Ok(bytes) => builder = builder.body(bytes),
                Err(e) => {
                    let message = format!("Invalid request body: {}", e);
                    error!("API Error: {} {}: {}", method, url, message);
                    self.notifier.error(&message);
                    return RequestResult::Failure {
                        error: message,
                        status: 0,
                    };
                }
            }
        }

        match builder.send().await {
            Ok(response) => self.handle_response(response).await,
            Err(e) => {
                error!("API Error: {} {}: {}", method, url, e);
                self.notifier.error(NETWORK_ERROR);
                RequestResult::Failure {
                    error: format!("{}: {}", NETWORK_ERROR, e),
                    status: 0,
                }
            }
        }
    }

    pub async fn get<T>(&self, path: &str) -> RequestResult<T>
    where
        T: DeserializeOwned,
    {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> RequestResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> RequestResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T, B>(&self, path: &str, body: Option<&B>) -> RequestResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::DELETE, path, body).await
    }

    async fn handle_response<T>(&self, response: Response) -> RequestResult<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let code = status.as_u16();

        if status.is_success() {
            let decoded = match response.bytes().await {
                Ok(bytes) => {
                    decode_body::<T>(&bytes).map_err(|e| format!("Invalid response body: {}", e))
                }
                Err(e) => Err(format!("{}: {}", NETWORK_ERROR, e)),
            };

            return match decoded {
                Ok(data) => RequestResult::Success { data, status: code },
                Err(message) => {
                    warn!("Response with status {} not usable: {}", code, message);
                    self.notifier.error(&message);
                    RequestResult::Failure {
                        error: message,
                        status: code,
                    }
                }
            };
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!("Request failed with status {}: {}", code, message);

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
        }

        self.notifier.error(&message);
        RequestResult::Failure {
            error: message,
            status: code,
        }
    }

    fn expire_session(&self) {
        if let Err(e) = self.session.clear_session() {
            error!("Failed to clear session after 401: {}", e);
        }
        self.navigator.navigate(&self.config.login_route);
    }
}

/// Decode a 2xx body; an empty body is read as JSON `null`.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice(b"null")
    } else {
        serde_json::from_slice(bytes)
    }
}

/// Message for a non-2xx response: the body's `message` field, else the
/// status text.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("Error: {}", reason),
            None => format!("Error: {}", status.as_u16()),
        })
}
