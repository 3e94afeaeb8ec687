//! REST API Bindings
//!
//! One configurable client (`ApiClient`) over a swappable `Transport`, plus
//! thin per-resource wrappers organized by domain.

mod transport;
mod resource;
mod auth;
mod template;
mod expense;

#[cfg(test)]
pub mod fake;

use std::sync::Arc;

use log::{debug, error};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::session::Session;

pub use transport::{ApiRequest, Method, Transport};
use transport::ReqwestTransport;
#[cfg(test)]
use transport::RawResponse;
pub use resource::{Resource, ResourceClient};
pub use auth::AuthClient;
pub use template::{TemplateClient, Templates};
pub use expense::{ExpenseClient, Expenses};

/// Envelope code the server uses for success
pub const CODE_OK: u16 = 200;

/// Response body convention: `{ code?, data?, message? }`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: Option<u16>,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// `data`, or a decode error when the server left it out
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::Decode("response has no data".to_string()))
    }
}

/// Shared HTTP client: base URL, session and transport
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    session: Session,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(base_url: Url, session: Session, transport: Arc<dyn Transport>) -> Self {
        Self { base_url, session, transport }
    }

    /// Production client speaking HTTP through reqwest
    pub fn http(base_url: Url, session: Session) -> Self {
        Self::new(base_url, session, Arc::new(ReqwestTransport::new()))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Send one request and parse the JSON body. Failures are logged and
    /// returned unchanged; there is no retry.
    pub async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid path {path:?}: {e}")))?;

        let request = ApiRequest {
            method,
            url: url.to_string(),
            path: path.to_string(),
            body,
            bearer: self.session.get(),
        };

        debug!("[API] {} {}", method, path);
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                error!("[API] {} {} failed: {}", method, path, e);
                return Err(e);
            }
        };

        if !response.is_success() {
            let detail = if response.body.is_empty() {
                format!("HTTP {}", response.status)
            } else {
                response.body.clone()
            };
            error!("[API] {} {} failed: {}", method, path, detail);
            return Err(ApiError::Status {
                status: response.status,
                body: response.body,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| {
            error!("[API] {} {} returned malformed JSON: {}", method, path, e);
            ApiError::from(e)
        })
    }

    /// Send and read the body as an envelope, treating a non-200 `code` as a
    /// failure.
    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_value).transpose()?;
        let value = self.send(method, path, body).await?;
        let envelope: Envelope<T> = match value {
            Value::Null => Envelope { code: None, data: None, message: None },
            value => serde_json::from_value(value).map_err(|e| {
                error!("[API] {} {} returned an unexpected shape: {}", method, path, e);
                ApiError::from(e)
            })?,
        };

        match envelope.code {
            Some(code) if code != CODE_OK => {
                let message = envelope.message.clone().unwrap_or_default();
                error!("[API] {} {} rejected with code {}: {}", method, path, code, message);
                Err(ApiError::Rejected { code, message })
            }
            _ => Ok(envelope),
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeBackend;
    use serde_json::json;

    fn client(backend: &Arc<FakeBackend>) -> ApiClient {
        ApiClient::new(
            Url::parse("http://api.test/v1/").unwrap(),
            Session::in_memory(),
            backend.clone(),
        )
    }

    #[tokio::test]
    async fn test_bearer_attached_only_with_token() {
        let backend = Arc::new(FakeBackend::new());
        let api = client(&backend);

        api.send(Method::Get, "template", None).await.unwrap();
        api.session().set("T");
        api.send(Method::Get, "template", None).await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests[0].bearer, None);
        assert_eq!(requests[1].bearer.as_deref(), Some("T"));
        assert_eq!(requests[1].url, "http://api.test/v1/template");
    }

    #[tokio::test]
    async fn test_non_2xx_becomes_status_error() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail_next(500, r#"{"message":"boom"}"#);
        let api = client(&backend);

        let err = api.send(Method::Get, "expense", None).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status { status: 500, body: r#"{"message":"boom"}"#.to_string() }
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_returned() {
        let backend = Arc::new(FakeBackend::new());
        backend.go_offline();
        let api = client(&backend);

        let err = api.send(Method::Get, "expense", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn test_envelope_code_other_than_200_is_rejected() {
        let backend = Arc::new(FakeBackend::new());
        backend.respond_next(200, &json!({ "code": 403, "message": "forbidden" }));
        let api = client(&backend);

        let err = api
            .request::<Value, Value>(Method::Get, "expense", None)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Rejected { code: 403, message: "forbidden".to_string() });
    }

    #[tokio::test]
    async fn test_envelope_without_code_is_accepted() {
        let backend = Arc::new(FakeBackend::new());
        backend.respond_next(200, &json!({ "data": [1, 2] }));
        let api = client(&backend);

        let envelope = api
            .request::<Vec<u8>, Value>(Method::Get, "template", None)
            .await
            .unwrap();
        assert_eq!(envelope.into_data().unwrap(), vec![1, 2]);
    }
}
