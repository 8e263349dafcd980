//! HTTP request client for the DriveShare backend.
//!
//! Issues GET/POST/PUT/DELETE calls against `base_url + endpoint` with a
//! cookie jar attached, so the session credential rides on every call.
//! Payloads are serialized as JSON and bodies parsed as JSON. Failure
//! signaling follows the backend contract exactly; see [`error`] for the
//! taxonomy.

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub mod error;

pub use error::{
    ClientError, ClientErrorKind, ClientResult, GetResponse, HttpRejection, WriteOutcome,
};

/// Standard User-Agent header for driveshare requests.
pub const USER_AGENT: &str = concat!("driveshare/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper around [`reqwest::Client`] bound to a single base URL.
///
/// The session cookie issued by `login` lives in the client's cookie store,
/// so one `RequestClient` holds one user's credentials for its lifetime.
pub struct RequestClient {
    base_url: String,
    http: reqwest::Client,
}

impl RequestClient {
    /// Creates a client for the given base URL.
    ///
    /// The base URL is expected to end with `/`; endpoint suffixes are
    /// appended verbatim (see `config::resolve_base_url` for normalization).
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Creates a client with an optional whole-request timeout.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::new(ClientErrorKind::Transport, e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// GET the endpoint and return `{status, data}`.
    ///
    /// A non-2xx status is not a failure: it yields the status with
    /// `data: None`. Only transport problems and undecodable 2xx bodies
    /// reach the failure channel.
    ///
    /// # Errors
    /// Returns an error on transport failure, or when a successful response
    /// body is not valid JSON.
    pub async fn get(&self, endpoint: &str) -> ClientResult<GetResponse> {
        let url = self.url(endpoint);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .header("accept", "application/json")
            .header("user-agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            warn!(%url, status, "GET returned non-success status");
            return Ok(GetResponse { status, data: None });
        }

        let data: Value = response.json().await.map_err(|e| {
            ClientError::parse(format!("failed to decode response body: {e}"))
        })?;
        Ok(GetResponse {
            status,
            data: Some(data),
        })
    }

    /// POST the payload as JSON and return the parsed body.
    ///
    /// # Errors
    /// Returns an error on transport failure only; a non-2xx status comes
    /// back as [`WriteOutcome::HttpError`].
    pub async fn post<T>(&self, endpoint: &str, payload: &T) -> ClientResult<WriteOutcome>
    where
        T: Serialize + ?Sized,
    {
        self.write(Method::POST, endpoint, Some(payload)).await
    }

    /// POST with no body, for endpoints that carry their argument in the
    /// path. The JSON content type is still set to match the backend
    /// contract.
    ///
    /// # Errors
    /// Returns an error on transport failure only; a non-2xx status comes
    /// back as [`WriteOutcome::HttpError`].
    pub async fn post_empty(&self, endpoint: &str) -> ClientResult<WriteOutcome> {
        self.write::<Value>(Method::POST, endpoint, None).await
    }

    /// PUT the payload as JSON and return the parsed body.
    ///
    /// # Errors
    /// Returns an error on transport failure only; a non-2xx status comes
    /// back as [`WriteOutcome::HttpError`].
    pub async fn put<T>(&self, endpoint: &str, payload: &T) -> ClientResult<WriteOutcome>
    where
        T: Serialize + ?Sized,
    {
        self.write(Method::PUT, endpoint, Some(payload)).await
    }

    /// DELETE the endpoint and return the parsed body.
    ///
    /// No payload is sent, but the JSON content type is still set to match
    /// the backend contract.
    ///
    /// # Errors
    /// Returns an error on transport failure only; a non-2xx status comes
    /// back as [`WriteOutcome::HttpError`].
    pub async fn delete(&self, endpoint: &str) -> ClientResult<WriteOutcome> {
        self.write::<Value>(Method::DELETE, endpoint, None).await
    }

    async fn write<T>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&T>,
    ) -> ClientResult<WriteOutcome>
    where
        T: Serialize + ?Sized,
    {
        let url = self.url(endpoint);
        debug!(%url, %method, "write request");
        let mut builder = self
            .http
            .request(method, &url)
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .header("user-agent", USER_AGENT);
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), "write returned non-success status");
            return Ok(WriteOutcome::HttpError(HttpRejection::new(
                status.as_u16(),
                body,
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            ClientError::parse(format!("failed to decode response body: {e}"))
        })?;
        Ok(WriteOutcome::Success(body))
    }
}

fn classify_reqwest_error(e: &reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::timeout(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        ClientError::connect(format!("Connection failed: {e}"))
    } else if e.is_decode() {
        ClientError::parse(format!("Failed to decode response: {e}"))
    } else {
        ClientError::new(ClientErrorKind::Transport, format!("Network error: {e}"))
    }
}
