//! HTTP client for the Wikitude Cloud Manager API.
//!
//! This module provides [`ManagerClient`], the main entry point for interacting
//! with the Cloud Manager. The client handles authentication headers, HTTP
//! transport and response classification. Asynchronous jobs are polled with
//! the methods in [`crate::job`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use wikitude_manager_core::client::ManagerClient;
//! use wikitude_manager_core::auth::ManagerToken;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ManagerClient::builder()
//!     .token(ManagerToken::new("your-manager-token"))
//!     .api_version(3)
//!     .poll_interval(std::time::Duration::from_secs(5))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::auth::ManagerToken;
use crate::endpoint::{Endpoint, PathParams};
use crate::error::{ManagerError, ManagerResult};
use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use std::time::Duration;

/// The endpoint where the Cloud Manager API resides.
pub const DEFAULT_ENDPOINT: &str = "https://api.wikitude.com";

/// Environment variable consulted when no endpoint is configured.
pub const ENDPOINT_ENV_VAR: &str = "WIKITUDE_MANAGER_ENDPOINT";

/// Default API version sent in the `X-Version` header.
pub const DEFAULT_API_VERSION: u32 = 3;

/// Default interval between status checks of asynchronous jobs (10 seconds).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Header carrying the Manager API token.
pub const HEADER_TOKEN: &str = "X-Token";

/// Header carrying the API version.
pub const HEADER_VERSION: &str = "X-Version";

/// The only content type treated as a JSON document.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Payload placeholder for requests without a body.
pub const NO_PAYLOAD: Option<&'static ()> = None;

/// Returns `true` for the status codes the service uses to signal success:
/// 200 OK, 202 Accepted and 204 No Content.
#[inline]
pub fn is_success_status(status: u16) -> bool {
    matches!(status, 200 | 202 | 204)
}

/// Returns `true` if the headers announce a non-empty JSON document.
///
/// `Content-Type` must be exactly `application/json` and `Content-Length`
/// must be present and not `"0"`.
pub fn has_json_content(headers: &HeaderMap) -> bool {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let content_length = headers.get(CONTENT_LENGTH).and_then(|v| v.to_str().ok());

    content_type == Some(CONTENT_TYPE_JSON) && matches!(content_length, Some(len) if len != "0")
}

/// A fully read response from the Cloud Manager API.
#[derive(Debug, Clone)]
pub struct ManagerResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    path: String,
}

impl ManagerResponse {
    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw response body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The request path this response answers.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the response carries a JSON document.
    pub fn has_json_content(&self) -> bool {
        has_json_content(&self.headers)
    }

    /// The `Location` header, pointing at the status resource of an
    /// asynchronous job.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
    }

    /// The body as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the JSON document.
    ///
    /// Fails with [`ManagerError::MissingBody`] if the response carries no
    /// JSON content.
    pub fn json<T: DeserializeOwned>(&self) -> ManagerResult<T> {
        self.json_opt()?.ok_or_else(|| ManagerError::MissingBody {
            path: self.path.clone(),
        })
    }

    /// Deserialize the JSON document if there is one.
    pub fn json_opt<T: DeserializeOwned>(&self) -> ManagerResult<Option<T>> {
        if !self.has_json_content() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&self.body)?))
    }
}

/// JSON error document returned by the service.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    code: i64,
    reason: String,
    message: String,
}

/// The client for the Wikitude Cloud Manager API.
///
/// The configuration is immutable after [`ManagerClientBuilder::build`].
/// The client is cheaply cloneable and can be shared across threads.
#[derive(Debug, Clone)]
pub struct ManagerClient {
    pub(crate) http: HttpClient,
    pub(crate) endpoint: Url,
    pub(crate) token: ManagerToken,
    pub(crate) api_version: u32,
    pub(crate) poll_interval: Duration,
    pub(crate) poll_timeout: Option<Duration>,
}

/// Builder for constructing a [`ManagerClient`].
///
/// Use [`ManagerClient::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct ManagerClientBuilder {
    endpoint: Option<String>,
    token: Option<ManagerToken>,
    api_version: Option<u32>,
    poll_interval: Option<Duration>,
    poll_timeout: Option<Duration>,
    http_client: Option<HttpClient>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl ManagerClient {
    /// Create a new builder for configuring a `ManagerClient`.
    pub fn builder() -> ManagerClientBuilder {
        ManagerClientBuilder::default()
    }

    /// Get the API root URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the API version sent in `X-Version`.
    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Get the interval between job status checks.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Get the overall job polling timeout, if any.
    pub fn poll_timeout(&self) -> Option<Duration> {
        self.poll_timeout
    }

    /// Build the absolute URL for a path.
    ///
    /// Relative paths are appended to the API root. An absolute URL (as some
    /// `Location` headers carry) is used unchanged only if it has the same
    /// scheme, host and port as the API root.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::InvalidEndpoint`] for an absolute URL on
    /// another origin.
    pub fn url(&self, path: &str) -> ManagerResult<Url> {
        if let Ok(absolute) = Url::parse(path) {
            if absolute.origin() != self.endpoint.origin() {
                tracing::warn!(
                    location = %absolute,
                    "refusing to send the API token to a foreign origin"
                );
                return Err(ManagerError::invalid_endpoint(format!(
                    "URL {absolute} is not on the API origin {}",
                    self.endpoint.origin().ascii_serialization()
                )));
            }
            return Ok(absolute);
        }

        let root = self.endpoint.as_str().trim_end_matches('/');
        let separator = if path.starts_with('/') { "" } else { "/" };
        Url::parse(&format!("{root}{separator}{path}"))
            .map_err(|e| ManagerError::invalid_endpoint_with_source("failed to construct URL", e))
    }

    /// Send a request to the API and classify the response.
    ///
    /// Adds the `X-Token` and `X-Version` headers. A payload is serialized as
    /// JSON and sent with `Content-Type: application/json`. Responses with a
    /// status other than 200, 202 or 204 become a [`ManagerError::Service`]
    /// when they carry a JSON error document, otherwise a
    /// [`ManagerError::Api`] with the raw body as message.
    ///
    /// # Tracing
    ///
    /// Emits a span named `wikitude::client::dispatch` with fields `method`
    /// and `path`.
    #[tracing::instrument(
        name = "wikitude::client::dispatch",
        skip(self, payload),
        fields(method = %method, path = %path)
    )]
    pub async fn dispatch<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&T>,
    ) -> ManagerResult<ManagerResponse> {
        let url = self.url(path)?;

        let mut request = self
            .http
            .request(method, url)
            .header(HEADER_TOKEN, self.token.header_value())
            .header(HEADER_VERSION, self.api_version.to_string());

        if let Some(payload) = payload {
            let body = serde_json::to_vec(payload)?;
            request = request
                .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
                .header(CONTENT_LENGTH, body.len())
                .body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        tracing::debug!(status = status.as_u16(), "response received");

        let response = ManagerResponse {
            status,
            headers,
            body,
            path: path.to_string(),
        };

        if is_success_status(status.as_u16()) {
            Ok(response)
        } else {
            Err(Self::read_error(&response))
        }
    }

    /// Resolve an endpoint's path template and dispatch the request.
    pub async fn execute<T: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        params: &PathParams<'_>,
        payload: Option<&T>,
    ) -> ManagerResult<ManagerResponse> {
        let path = endpoint.path(params)?;
        self.dispatch(endpoint.method(), &path, payload).await
    }

    /// Build the error for an unsuccessful response.
    fn read_error(response: &ManagerResponse) -> ManagerError {
        if response.has_json_content() {
            match serde_json::from_slice::<ServiceErrorBody>(response.body()) {
                Ok(error) => ManagerError::Service {
                    code: error.code,
                    reason: error.reason,
                    message: error.message,
                },
                Err(e) => ManagerError::Serialization(e),
            }
        } else {
            ManagerError::Api {
                status: response.status().as_u16(),
                message: response.text(),
            }
        }
    }
}

impl ManagerClientBuilder {
    /// Set the API root URL.
    ///
    /// If not set, the builder checks the `WIKITUDE_MANAGER_ENDPOINT`
    /// environment variable and falls back to [`DEFAULT_ENDPOINT`].
    /// Plain `http://` roots are accepted but the token then travels in
    /// clear text.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the Manager API token.
    ///
    /// If not set, the builder uses [`ManagerToken::from_env()`].
    pub fn token(mut self, token: ManagerToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Set the API version.
    ///
    /// Defaults to [`DEFAULT_API_VERSION`].
    pub fn api_version(mut self, version: u32) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Set the interval between job status checks.
    ///
    /// Defaults to [`DEFAULT_POLL_INTERVAL`].
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Bound the total time spent polling a single job.
    ///
    /// Without a timeout, polling continues until the job reports
    /// `COMPLETED` or a request fails.
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = Some(timeout);
        self
    }

    /// Set a custom HTTP client.
    ///
    /// **Note:** If you provide a custom HTTP client, any timeout configuration
    /// via [`connect_timeout`](Self::connect_timeout) and
    /// [`read_timeout`](Self::read_timeout) is ignored.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout for a single request/response cycle.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Build the `ManagerClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No token is provided and `WIKITUDE_MANAGER_TOKEN` is not set
    /// - The endpoint URL is invalid or not `http`/`https`
    /// - The HTTP client cannot be constructed
    pub fn build(self) -> ManagerResult<ManagerClient> {
        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .connect_timeout(self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT))
                .timeout(self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT))
                .build()?,
        };

        let endpoint_str = self
            .endpoint
            .or_else(|| std::env::var(ENDPOINT_ENV_VAR).ok())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let endpoint = Url::parse(&endpoint_str)
            .map_err(|e| ManagerError::invalid_endpoint_with_source("invalid endpoint URL", e))?;

        match endpoint.scheme() {
            "https" => {}
            "http" => tracing::warn!(
                endpoint = %endpoint,
                "using plain HTTP, the API token is transmitted in clear text"
            ),
            other => {
                return Err(ManagerError::invalid_endpoint(format!(
                    "unsupported scheme `{other}`, expected http or https"
                )))
            }
        }

        let token = self.token.map(Ok).unwrap_or_else(ManagerToken::from_env)?;

        Ok(ManagerClient {
            http,
            endpoint,
            token,
            api_version: self.api_version.unwrap_or(DEFAULT_API_VERSION),
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            poll_timeout: self.poll_timeout,
        })
    }
}
