//! HTTP client for the DataForSEO v3 REST API.
//!
//! Wraps `reqwest` with Basic auth, typed envelope deserialization, and the
//! transport error contract: a non-2xx status is always an error carrying the
//! raw body, while a 2xx with a failing embedded status is left for the
//! orchestrators to turn into a [`crate::TaskOutcome`].

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bizlookup_core::{AppConfig, Credentials};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DataForSeoError;

pub const DEFAULT_BASE_URL: &str = "https://api.dataforseo.com/";

/// Timing of the reviews readiness loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Unconditional wait between task submission and the first readiness check.
    pub initial_wait: Duration,
    /// Wait between consecutive readiness checks.
    pub poll_interval: Duration,
    /// Wall-clock budget for the readiness loop, measured from the first check.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_wait: Duration::from_secs(5),
            poll_interval: Duration::from_secs(3),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Everything besides credentials needed to build a [`DataForSeoClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub language_code: String,
    pub language_name: String,
    pub poll: PollConfig,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: "bizlookup/0.1 (business-lookup)".to_string(),
            language_code: "en".to_string(),
            language_name: "English".to_string(),
            poll: PollConfig::default(),
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            language_code: config.language_code.clone(),
            language_name: config.language_name.clone(),
            poll: PollConfig {
                initial_wait: Duration::from_millis(config.reviews_initial_wait_ms),
                poll_interval: Duration::from_millis(config.reviews_poll_interval_ms),
                timeout: Duration::from_millis(config.reviews_timeout_ms),
            },
        }
    }
}

/// Client for the DataForSEO API.
///
/// The Basic-auth header is derived once at construction and attached to
/// every request as a default header. Nothing is mutated after
/// construction, so one client can be shared across tasks behind an `Arc`.
pub struct DataForSeoClient {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) language_code: String,
    pub(crate) language_name: String,
    pub(crate) poll: PollConfig,
}

impl DataForSeoClient {
    /// Builds a client from explicit credentials and options.
    ///
    /// # Errors
    ///
    /// Returns [`DataForSeoError::InvalidConfig`] if `base_url` is not a valid
    /// URL or the credentials cannot form a header value, or
    /// [`DataForSeoError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(credentials: &Credentials, options: ClientOptions) -> Result<Self, DataForSeoError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, basic_auth_header(credentials)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(options.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // `Url::join` appends endpoint paths instead of replacing the last
        // segment.
        let normalised = format!("{}/", options.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            DataForSeoError::InvalidConfig(format!("invalid base URL '{}': {e}", options.base_url))
        })?;

        Ok(Self {
            client,
            base_url,
            language_code: options.language_code,
            language_name: options.language_name,
            poll: options.poll,
        })
    }

    /// Builds a client from an already-loaded [`AppConfig`].
    ///
    /// # Errors
    ///
    /// See [`DataForSeoClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, DataForSeoError> {
        Self::new(&config.credentials, ClientOptions::from_app_config(config))
    }

    /// Loads `.env` and the process environment, then builds a client.
    ///
    /// Fails at startup, before any request is made, when either
    /// `DATAFORSEO_LOGIN` or `DATAFORSEO_PASSWORD` is missing.
    ///
    /// # Errors
    ///
    /// Returns [`DataForSeoError::Config`] for missing or invalid settings, or
    /// any error from [`DataForSeoClient::new`].
    pub fn from_env() -> Result<Self, DataForSeoError> {
        let config = bizlookup_core::load_app_config()?;
        Self::from_app_config(&config)
    }

    #[must_use]
    pub fn poll_config(&self) -> PollConfig {
        self.poll
    }

    /// Sends one request to `endpoint` (relative to the base URL), asserts a
    /// 2xx HTTP status, and parses the body as `T`.
    ///
    /// Never retries.
    ///
    /// # Errors
    ///
    /// - [`DataForSeoError::Status`] for a non-2xx status, with the raw body.
    /// - [`DataForSeoError::Http`] on network failure.
    /// - [`DataForSeoError::Deserialize`] if the body does not match `T`.
    pub(crate) async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, DataForSeoError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!(%method, endpoint, "sending DataForSEO request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(DataForSeoError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_owned(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| DataForSeoError::Deserialize {
            context: endpoint.to_owned(),
            source: e,
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, DataForSeoError> {
        self.request::<T, ()>(Method::GET, endpoint, None).await
    }

    pub(crate) async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, DataForSeoError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, DataForSeoError> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| DataForSeoError::InvalidConfig(format!("invalid endpoint '{endpoint}': {e}")))
    }
}

/// Encodes `login:password` as an HTTP Basic `Authorization` value, marked
/// sensitive so it is never printed by `reqwest`'s debug output.
fn basic_auth_header(credentials: &Credentials) -> Result<HeaderValue, DataForSeoError> {
    let encoded = STANDARD.encode(format!(
        "{}:{}",
        credentials.login(),
        credentials.password()
    ));
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|e| DataForSeoError::InvalidConfig(format!("invalid credentials: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
