use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use monitor_logging::{monitor_debug, monitor_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;

use crate::{ApiError, ApiFailureKind, ApiSettings, TokenStore};

const JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_reqwest().as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Sent as-is with its own content type; no JSON content type is added.
    Binary { bytes: Bytes, content_type: String },
}

/// One call against the backend. `endpoint` is the path and query below the base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: String,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Post, endpoint)
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn with_binary(mut self, bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        self.body = RequestBody::Binary {
            bytes: bytes.into(),
            content_type: content_type.into(),
        };
        self
    }
}

/// The single HTTP boundary every component talks through.
///
/// Resolves with the parsed JSON body (`Value::Null` for an empty 2xx body).
/// A 401 fails with [`ApiFailureKind::AuthRequired`]; any other non-2xx fails
/// with [`ApiFailureKind::HttpStatus`] carrying the body text or status reason.
#[async_trait::async_trait]
pub trait ApiTransport: Send + Sync {
    async fn call(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

/// Login flow collaborator, notified whenever the backend rejects the token.
pub trait LoginRedirect: Send + Sync {
    fn login_required(&self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoLoginRedirect;

impl LoginRedirect for NoLoginRedirect {
    fn login_required(&self) {
        monitor_debug!("Login required; no login flow configured");
    }
}

pub struct ReqwestApiClient {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    login: Arc<dyn LoginRedirect>,
}

impl ReqwestApiClient {
    pub fn new(
        settings: &ApiSettings,
        tokens: Arc<dyn TokenStore>,
        login: Arc<dyn LoginRedirect>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiFailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            tokens,
            login,
        })
    }

    fn url_for(&self, endpoint: &str) -> Result<reqwest::Url, ApiError> {
        let endpoint = if endpoint.starts_with('/') {
            endpoint.to_string()
        } else {
            format!("/{endpoint}")
        };
        reqwest::Url::parse(&format!("{}{}", self.base_url, endpoint))
            .map_err(|err| ApiError::new(ApiFailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ApiTransport for ReqwestApiClient {
    async fn call(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url_for(&request.endpoint)?;
        monitor_debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.as_reqwest(), url)
            .header(ACCEPT, JSON);

        builder = match request.body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, JSON),
            RequestBody::Json(body) => {
                let payload = serde_json::to_vec(&body)
                    .map_err(|err| ApiError::new(ApiFailureKind::InvalidBody, err.to_string()))?;
                builder.header(CONTENT_TYPE, JSON).body(payload)
            }
            RequestBody::Binary {
                bytes,
                content_type,
            } => builder.header(CONTENT_TYPE, content_type).body(bytes),
        };

        match self.tokens.token() {
            Some(token) => builder = builder.bearer_auth(token),
            None => monitor_debug!("No auth token stored; sending request without Authorization"),
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            monitor_warn!("Authentication required for {}", request.endpoint);
            self.login.login_required();
            return Err(ApiError::new(
                ApiFailureKind::AuthRequired,
                "login required",
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body).trim().to_string();
            let message = if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                text
            };
            monitor_warn!("{} {} failed with {}: {}", request.method, request.endpoint, status, message);
            return Err(ApiError::new(
                ApiFailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(ApiFailureKind::InvalidBody, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(ApiFailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(ApiFailureKind::Network, err.to_string())
}
