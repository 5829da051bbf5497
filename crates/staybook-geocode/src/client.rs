//! Provider dispatch and the HTTP plumbing shared by all providers.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use staybook_core::Coordinate;

use crate::error::{GeocodeError, ProviderError};
use crate::nominatim::NominatimClient;
use crate::opencage::OpenCageClient;

/// Connection settings for one provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Upper bound on a single provider call, connect through body read.
    pub timeout: Duration,
    pub result_limit: u32,
    pub user_agent: String,
}

/// A configured geocoding provider.
///
/// Providers differ only in URL template, credentials and response schema;
/// adding one means adding a variant here.
#[derive(Debug)]
pub enum GeocodeProvider {
    Nominatim(NominatimClient),
    OpenCage(OpenCageClient),
}

impl GeocodeProvider {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nominatim(_) => crate::nominatim::PROVIDER,
            Self::OpenCage(_) => crate::opencage::PROVIDER,
        }
    }

    /// Resolves `query` to the first candidate coordinate.
    ///
    /// `Ok(None)` means the provider answered but found nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] for network failures, timeouts, non-2xx
    /// statuses and unparseable bodies.
    pub async fn resolve(&self, query: &str) -> Result<Option<Coordinate>, ProviderError> {
        match self {
            Self::Nominatim(client) => client.resolve(query).await,
            Self::OpenCage(client) => client.resolve(query).await,
        }
    }
}

impl From<NominatimClient> for GeocodeProvider {
    fn from(client: NominatimClient) -> Self {
        Self::Nominatim(client)
    }
}

impl From<OpenCageClient> for GeocodeProvider {
    fn from(client: OpenCageClient) -> Self {
        Self::OpenCage(client)
    }
}

pub(crate) fn build_http_client(settings: &ProviderSettings) -> Result<Client, GeocodeError> {
    let client = Client::builder()
        .timeout(settings.timeout)
        .connect_timeout(settings.timeout.min(Duration::from_secs(10)))
        .user_agent(settings.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// Parses `base_url` so that relative joins append to its path.
///
/// `Url::join` replaces the last path segment unless the base ends in a
/// slash, so exactly one trailing slash is enforced here.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, GeocodeError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

/// Sends a GET request, requires a 2xx status and deserializes the body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: Url,
    provider: &'static str,
) -> Result<T, ProviderError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::HttpStatus {
            provider,
            code: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, e))?;

    serde_json::from_str(&body).map_err(|e| ProviderError::Parse {
        provider,
        reason: e.to_string(),
    })
}

/// Converts parsed numbers into a [`Coordinate`], treating out-of-range or
/// non-finite values as a parse failure.
pub(crate) fn checked_coordinate(
    provider: &'static str,
    latitude: f64,
    longitude: f64,
) -> Result<Coordinate, ProviderError> {
    Coordinate::new(latitude, longitude).map_err(|e| ProviderError::Parse {
        provider,
        reason: e.to_string(),
    })
}
