//! Session-aware request pipeline.
//!
//! Every call to the drive API goes through [`ApiGateway::send`]:
//!
//! 1. Before sending, the session token is attached as a bearer credential
//!    unless the path is exactly the login or register endpoint.
//! 2. After receiving, a 401 clears the session, publishes
//!    [`UiEvent::SessionExpired`] and is returned to the caller as
//!    [`DriveError::SessionExpired`]. Nothing is retried.
//! 3. Any other non-success status becomes [`DriveError::Api`] carrying the
//!    server's `message` when the body has one.

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::endpoints;
use super::types::{ErrorResponse, TokenResponse, UploadFile};
use crate::app::events::{EventBus, UiEvent};
use crate::auth::session::AuthState;
use crate::auth::validation::Credentials;
use crate::config::ApiConfig;
use crate::error::{DriveError, Result};

/// Body of an outbound request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// JSON body.
    Json(serde_json::Value),
    /// Multipart body with the file under the `file` field.
    Multipart(UploadFile),
}

/// An outbound API request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`.
    pub path: String,
    /// Request body.
    pub body: RequestBody,
}

impl ApiRequest {
    /// Create a request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
        }
    }

    /// `GET path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path` with a JSON body.
    pub fn post_json<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Self::new(Method::POST, path).with_json(body)
    }

    /// `PUT path` with a JSON body.
    pub fn put_json<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Self::new(Method::PUT, path).with_json(body)
    }

    /// `POST path` with a multipart file upload.
    pub fn upload(path: impl Into<String>, file: UploadFile) -> Self {
        Self {
            body: RequestBody::Multipart(file),
            ..Self::new(Method::POST, path)
        }
    }

    /// Replace the body with a JSON encoding of `body`.
    pub fn with_json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| DriveError::Validation(format!("unencodable request body: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Whether this request gets the bearer token.
    pub fn requires_auth(&self) -> bool {
        endpoints::requires_auth(&self.path)
    }
}

/// HTTP gateway bound to one session.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: Client,
    base_url: String,
    auth: Arc<AuthState>,
    events: EventBus,
}

impl ApiGateway {
    /// Create a gateway from configuration.
    pub fn new(config: &ApiConfig, auth: Arc<AuthState>, events: EventBus) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| DriveError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.base_url, auth, events))
    }

    /// Create a gateway around an existing client.
    pub fn with_client(
        client: Client,
        base_url: &str,
        auth: Arc<AuthState>,
        events: EventBus,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            events,
        }
    }

    /// The session this gateway authenticates with.
    pub fn auth(&self) -> &Arc<AuthState> {
        &self.auth
    }

    /// The bus session expiry is published on.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Absolute URL for an API path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request through the pipeline and return the successful response.
    pub async fn send(&self, request: ApiRequest) -> Result<Response> {
        let token = if request.requires_auth() {
            self.auth.token().await
        } else {
            None
        };

        let mut builder = self
            .client
            .request(request.method.clone(), self.url_for(&request.path));
        if let Some(token) = &token {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(file) => builder.multipart(multipart_form(file)?),
        };

        debug!(
            method = %request.method,
            path = %request.path,
            authorized = token.is_some(),
            "sending api request"
        );

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let message = error_message(response).await;
            warn!(path = %request.path, "unauthorized response, ending session");
            self.auth.expire().await;
            self.events.publish(UiEvent::SessionExpired);
            return Err(DriveError::SessionExpired(message));
        }

        if !status.is_success() {
            let message = error_message(response).await;
            debug!(path = %request.path, status = status.as_u16(), "api request failed");
            return Err(DriveError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Send a request and decode a JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| DriveError::Decode(format!("unexpected response body: {}", e)))
    }

    /// Send a request whose success body is informational.
    ///
    /// A 2xx with an empty body, or with a body that is not a `T`, is still
    /// a success and yields `Ok(None)`.
    pub async fn send_optional_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Option<T>> {
        let path = request.path.clone();
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                debug!(path = %path, "ignoring unrecognized success body: {}", e);
                Ok(None)
            }
        }
    }

    /// Send a request and return the raw response body.
    pub async fn send_bytes(&self, request: ApiRequest) -> Result<Vec<u8>> {
        let response = self.send(request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Exchange credentials for a token at `path` (login or register).
    pub async fn authenticate(&self, path: &str, credentials: &Credentials) -> Result<String> {
        let response: TokenResponse = self
            .send_json(ApiRequest::post_json(path, credentials)?)
            .await?;
        if response.token.is_empty() {
            return Err(DriveError::Decode("server returned an empty token".to_string()));
        }
        Ok(response.token)
    }
}

fn multipart_form(file: UploadFile) -> Result<Form> {
    let content_type = file.content_type();
    let part = Part::bytes(file.content)
        .file_name(file.file_name)
        .mime_str(&content_type)
        .map_err(|e| DriveError::Validation(format!("invalid MIME type {}: {}", content_type, e)))?;
    Ok(Form::new().part("file", part))
}

/// The `message` field of a failed response's JSON body, if there is one.
async fn error_message(response: Response) -> Option<String> {
    let bytes = response.bytes().await.ok()?;
    serde_json::from_slice::<ErrorResponse>(&bytes)
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.is_empty())
}
