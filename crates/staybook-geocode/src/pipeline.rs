//! Ordered provider fallback with a configured default coordinate.

use std::time::Duration;

use serde::Serialize;
pub use staybook_core::Provenance;
use staybook_core::{Coordinate, GeocodeConfig};

use crate::client::{GeocodeProvider, ProviderSettings};
use crate::error::GeocodeError;
use crate::nominatim::NominatimClient;
use crate::opencage::OpenCageClient;

/// Outcome of one resolution. Always carries a usable coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub coordinate: Coordinate,
    pub provenance: Provenance,
}

/// Resolves free-text locations by trying providers strictly in order.
///
/// Providers are called one at a time; the first coordinate wins. Provider
/// errors and empty answers are logged and fall through to the next
/// provider, and finally to the default coordinate. [`Self::resolve`]
/// cannot fail.
#[derive(Debug)]
pub struct GeocodePipeline {
    providers: Vec<GeocodeProvider>,
    default_coordinate: Coordinate,
}

impl GeocodePipeline {
    #[must_use]
    pub fn new(providers: Vec<GeocodeProvider>, default_coordinate: Coordinate) -> Self {
        Self {
            providers,
            default_coordinate,
        }
    }

    /// Builds the production chain: Nominatim, then OpenCage.
    ///
    /// OpenCage is left out when no API key is configured, which leaves a
    /// single-provider chain.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if a provider client cannot be constructed.
    pub fn from_config(config: &GeocodeConfig) -> Result<Self, GeocodeError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let settings = |base_url: &str, api_key: Option<&String>| ProviderSettings {
            base_url: base_url.to_owned(),
            api_key: api_key.cloned(),
            timeout,
            result_limit: config.result_limit,
            user_agent: config.user_agent.clone(),
        };

        let mut providers: Vec<GeocodeProvider> = vec![NominatimClient::new(&settings(
            &config.primary_base_url,
            config.primary_api_key.as_ref(),
        ))?
        .into()];

        if config.fallback_api_key.is_some() {
            providers.push(
                OpenCageClient::new(&settings(
                    &config.fallback_base_url,
                    config.fallback_api_key.as_ref(),
                ))?
                .into(),
            );
        } else {
            tracing::warn!(
                "no fallback geocoding API key configured; unresolved locations go straight to the default coordinate"
            );
        }

        Ok(Self::new(providers, config.default_coordinate))
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(GeocodeProvider::name).collect()
    }

    #[must_use]
    pub fn default_coordinate(&self) -> Coordinate {
        self.default_coordinate
    }

    /// Resolves `query`, never failing.
    ///
    /// Blank queries skip every provider.
    pub async fn resolve(&self, query: &str) -> GeocodeResult {
        let query = query.trim();
        if query.is_empty() {
            tracing::info!("blank location query; using default coordinate");
            return self.default_result();
        }

        for (position, provider) in self.providers.iter().enumerate() {
            let name = provider.name();
            match provider.resolve(query).await {
                Ok(Some(coordinate)) => {
                    let provenance = if position == 0 {
                        Provenance::Primary
                    } else {
                        Provenance::Fallback
                    };
                    tracing::debug!(
                        provider = name,
                        %provenance,
                        latitude = coordinate.latitude(),
                        longitude = coordinate.longitude(),
                        "location resolved"
                    );
                    return GeocodeResult {
                        coordinate,
                        provenance,
                    };
                }
                Ok(None) => {
                    tracing::debug!(provider = name, query, "provider found no match");
                }
                Err(e) => {
                    tracing::warn!(
                        provider = name,
                        kind = e.kind(),
                        error = %e,
                        "geocoding provider failed"
                    );
                }
            }
        }

        tracing::warn!(
            query,
            providers = self.providers.len(),
            "no provider resolved location; using default coordinate"
        );
        self.default_result()
    }

    fn default_result(&self) -> GeocodeResult {
        GeocodeResult {
            coordinate: self.default_coordinate,
            provenance: Provenance::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(fallback_api_key: Option<&str>) -> GeocodeConfig {
        GeocodeConfig {
            primary_base_url: "https://nominatim.openstreetmap.org".to_owned(),
            primary_api_key: None,
            fallback_base_url: "https://api.opencagedata.com/geocode/v1".to_owned(),
            fallback_api_key: fallback_api_key.map(str::to_owned),
            timeout_secs: 5,
            result_limit: 1,
            user_agent: "staybook-test/0.1".to_owned(),
            default_coordinate: Coordinate::new(0.0, 0.0).unwrap(),
        }
    }

    #[test]
    fn from_config_orders_primary_before_fallback() {
        let pipeline = GeocodePipeline::from_config(&config(Some("oc-key"))).unwrap();
        assert_eq!(pipeline.provider_names(), vec!["nominatim", "opencage"]);
    }

    #[test]
    fn from_config_without_fallback_key_is_single_provider() {
        let pipeline = GeocodePipeline::from_config(&config(None)).unwrap();
        assert_eq!(pipeline.provider_names(), vec!["nominatim"]);
    }

    #[tokio::test]
    async fn empty_pipeline_returns_default() {
        let default = Coordinate::new(12.5, -7.25).unwrap();
        let pipeline = GeocodePipeline::new(Vec::new(), default);
        let result = pipeline.resolve("Anywhere").await;
        assert_eq!(result.provenance, Provenance::Default);
        assert_eq!(result.coordinate, default);
    }
}
