use thiserror::Error;

/// Errors returned by the DataForSEO client.
///
/// These cover requests that failed outright. A 2xx response whose embedded
/// status code signals a business failure is not an error; it is reported
/// through [`crate::TaskOutcome`].
#[derive(Debug, Error)]
pub enum DataForSeoError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx HTTP status.
    #[error("DataForSEO returned HTTP {status} for {endpoint}: {body}")]
    Status {
        status: u16,
        endpoint: String,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL or credentials cannot form a valid request.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Config(#[from] bizlookup_core::ConfigError),
}
