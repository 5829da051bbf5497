use thiserror::Error;

/// Failure of a single provider call.
///
/// These never leave the pipeline: [`crate::GeocodePipeline::resolve`] logs
/// them and moves on to the next provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, TLS or body-read failure.
    #[error("{provider}: network error: {source}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The call did not complete within the configured per-call timeout.
    #[error("{provider}: request timed out")]
    Timeout { provider: &'static str },

    /// The provider answered with a non-2xx status.
    #[error("{provider}: unexpected HTTP status {code}")]
    HttpStatus { provider: &'static str, code: u16 },

    /// The body did not match the provider's schema, or a candidate carried
    /// coordinates that are not finite in-range numbers.
    #[error("{provider}: could not parse response: {reason}")]
    Parse {
        provider: &'static str,
        reason: String,
    },
}

impl ProviderError {
    pub(crate) fn from_reqwest(provider: &'static str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { provider }
        } else {
            Self::Network { provider, source }
        }
    }

    /// Short machine-readable name of the failure kind, used in log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Timeout { .. } => "timeout",
            Self::HttpStatus { .. } => "http_status",
            Self::Parse { .. } => "parse",
        }
    }
}

/// Errors raised while building provider clients.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
