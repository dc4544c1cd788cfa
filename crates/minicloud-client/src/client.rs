//! MiniCloud request gateway
//!
//! Every call to the backend goes through [`ImageClient::request`], which
//! resolves the path against the configured base URL, injects the
//! `x-api-key` header when asked to, serializes query parameters and maps
//! the outcome to either a [`ResponseBody`] or a [`ClientError`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use minicloud_client::client::ImageClient;
//! use minicloud_core::config::{ConfigProvider, RequestConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ConfigProvider::new(RequestConfig::new("http://localhost:3000", "secret"));
//! let client = ImageClient::new(config);
//! let metadata = client.get_metadata("cat.jpg").await?;
//! println!("{metadata}");
//! # Ok(())
//! # }
//! ```

use minicloud_core::config::ConfigProvider;
use minicloud_core::domain::{build_image_url, resolve_endpoint, ListResponse, TransformParams};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use crate::signing::SignedUrlResponse;
use crate::upload::UploadReceipt;
use crate::ClientError;

/// Header carrying the API key on authenticated calls
pub const API_KEY_HEADER: &str = "x-api-key";

/// Default lifetime requested for signed URLs, in seconds
pub const DEFAULT_SIGNED_URL_EXPIRY_SECS: u64 = 3600;

/// Maximum number of characters of an error body kept in [`ClientError::Http`]
const ERROR_BODY_LIMIT: usize = 512;

// ============================================================================
// Request / response shapes
// ============================================================================

/// Payload attached to a request
#[derive(Debug)]
pub enum RequestBody {
    Multipart(Form),
    Json(Value),
}

/// Per-call options for [`ImageClient::request`]
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// Attach the `x-api-key` header
    pub auth: bool,
    /// Extra headers, sent verbatim
    pub headers: Vec<(String, String)>,
    /// Query parameters; `None` values are skipped
    pub query: Vec<(String, Option<String>)>,
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    /// Options for a call that needs the API key
    pub fn authenticated() -> Self {
        Self {
            auth: true,
            ..Self::default()
        }
    }

    pub fn query(mut self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        self.query.push((name.into(), value.map(|v| v.to_string())));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// A successful response, split on its declared content type
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// The body as JSON; text bodies become a JSON string
    pub fn into_json(self) -> Value {
        match self {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => Value::String(text),
        }
    }
}

fn is_json_content_type(value: &str) -> bool {
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

fn truncate_body(text: &str) -> String {
    match text.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

// ============================================================================
// ImageClient
// ============================================================================

/// HTTP gateway to the MiniCloud backend
///
/// Reads the base URL and API key from the shared [`ConfigProvider`] on
/// every call, so configuration changes apply to the next request.
#[derive(Debug, Clone)]
pub struct ImageClient {
    /// The underlying HTTP client
    client: Client,
    /// Source of base URL and API key
    config: ConfigProvider,
}

impl ImageClient {
    /// Creates a gateway reading its settings from `config`
    pub fn new(config: ConfigProvider) -> Self {
        Self::with_http_client(config, Client::new())
    }

    /// Creates a gateway around a preconfigured reqwest client
    pub fn with_http_client(config: ConfigProvider, client: Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ConfigProvider {
        &self.config
    }

    /// Builds the request without sending it
    ///
    /// Returns the builder and the encoded path used in error messages.
    fn prepare(
        &self,
        method: Method,
        segments: &[&str],
        options: RequestOptions,
    ) -> Result<(RequestBuilder, String), ClientError> {
        let settings = self.config.snapshot();
        if !settings.has_base_url() {
            return Err(ClientError::Config("Base URL is not set".to_string()));
        }

        let mut url = resolve_endpoint(&settings.base_url, segments)?;
        let pairs: Vec<(String, String)> = options
            .query
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        let path = url.path().to_string();

        debug!(method = %method, url = %url, auth = options.auth, "Preparing backend request");

        let mut builder = self.client.request(method, url);
        if options.auth {
            builder = builder.header(API_KEY_HEADER, settings.api_key);
        }
        for (name, value) in options.headers {
            builder = builder.header(name, value);
        }
        builder = match options.body {
            Some(RequestBody::Multipart(form)) => builder.multipart(form),
            Some(RequestBody::Json(value)) => builder.json(&value),
            None => builder,
        };

        Ok((builder, path))
    }

    /// Executes one call against the backend
    ///
    /// # Errors
    /// - [`ClientError::Config`] when no base URL is configured (no request is sent)
    /// - [`ClientError::Http`] for non-success statuses
    /// - [`ClientError::Network`] for transport failures
    /// - [`ClientError::InvalidResponse`] when a JSON body does not parse
    pub async fn request(
        &self,
        method: Method,
        segments: &[&str],
        options: RequestOptions,
    ) -> Result<ResponseBody, ClientError> {
        let method_name = method.to_string();
        let (builder, path) = self.prepare(method, segments, options)?;

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .ok()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .map(|t| truncate_body(&t));
            warn!(method = %method_name, path = %path, status = status.as_u16(), "Backend returned error status");
            return Err(ClientError::Http {
                method: method_name,
                path,
                status: status.as_u16(),
                body,
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(is_json_content_type)
            .unwrap_or(false);

        let text = response.text().await?;
        if is_json {
            let value = serde_json::from_str(&text).map_err(|e| {
                ClientError::InvalidResponse(format!("{method_name} {path}: {e}"))
            })?;
            Ok(ResponseBody::Json(value))
        } else {
            Ok(ResponseBody::Text(text))
        }
    }

    /// Uploads a multipart form (`POST /upload`)
    pub async fn upload(&self, form: Form) -> Result<UploadReceipt, ClientError> {
        let body = self
            .request(
                Method::POST,
                &["upload"],
                RequestOptions::authenticated().body(RequestBody::Multipart(form)),
            )
            .await?;
        Ok(UploadReceipt::from(body))
    }

    /// Fetches metadata for `key` (`GET /metadata/{key}`)
    pub async fn get_metadata(&self, key: &str) -> Result<Value, ClientError> {
        debug!(key, "Fetching metadata");
        let body = self
            .request(Method::GET, &["metadata", key], RequestOptions::authenticated())
            .await?;
        Ok(body.into_json())
    }

    /// Requests a signed URL for `key` valid for `expires` seconds
    /// (`GET /sign/{key}?expires=N`)
    pub async fn get_signed_url(
        &self,
        key: &str,
        expires: u64,
    ) -> Result<SignedUrlResponse, ClientError> {
        debug!(key, expires, "Requesting signed URL");
        let body = self
            .request(
                Method::GET,
                &["sign", key],
                RequestOptions::authenticated().query("expires", Some(expires)),
            )
            .await?;
        Ok(SignedUrlResponse::from(body))
    }

    /// Fetches the image listing (`GET /list`)
    pub async fn list(&self) -> Result<ListResponse, ClientError> {
        let body = self
            .request(Method::GET, &["list"], RequestOptions::authenticated())
            .await?;

        let listing = match body {
            ResponseBody::Json(value) => ListResponse::from_json(&value),
            ResponseBody::Text(_) => ListResponse::Unrecognized,
        };
        if listing == ListResponse::Unrecognized {
            warn!("Unrecognized /list response shape, treating as empty");
        } else {
            debug!(shape = listing.shape(), "Fetched image listing");
        }
        Ok(listing)
    }

    /// Builds the public transform URL for `key`; performs no I/O
    pub fn build_image_url(
        &self,
        key: &str,
        params: &TransformParams,
    ) -> Result<String, ClientError> {
        let settings = self.config.snapshot();
        Ok(build_image_url(&settings.base_url, key, params)?)
    }
}
