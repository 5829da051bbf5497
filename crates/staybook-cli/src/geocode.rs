//! `geocode` command: run the resolution pipeline once and print the result.

use staybook_geocode::{GeocodePipeline, GeocodeResult};

/// Resolves `query` with the configured provider chain.
///
/// # Errors
///
/// Returns an error if a provider client cannot be built. Resolution itself
/// never fails.
pub(crate) async fn run_geocode(
    config: &staybook_core::AppConfig,
    query: &str,
    json: bool,
) -> anyhow::Result<()> {
    let pipeline = GeocodePipeline::from_config(&config.geocode)?;
    tracing::debug!(providers = ?pipeline.provider_names(), "pipeline built");

    let result = pipeline.resolve(query).await;
    println!("{}", render(&result, json)?);
    Ok(())
}

fn render(result: &GeocodeResult, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(result)?);
    }
    Ok(format!(
        "{:.6}, {:.6} ({})",
        result.coordinate.latitude(),
        result.coordinate.longitude(),
        result.provenance
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use staybook_core::Coordinate;
    use staybook_geocode::Provenance;

    fn paris() -> GeocodeResult {
        GeocodeResult {
            coordinate: Coordinate::new(48.8566, 2.3522).unwrap(),
            provenance: Provenance::Primary,
        }
    }

    #[test]
    fn renders_plain_text_with_provenance() {
        assert_eq!(
            render(&paris(), false).unwrap(),
            "48.856600, 2.352200 (primary)"
        );
    }

    #[test]
    fn renders_json() {
        let value: serde_json::Value =
            serde_json::from_str(&render(&paris(), true).unwrap()).unwrap();
        assert_eq!(value["provenance"], "primary");
        assert_eq!(value["coordinate"]["latitude"], 48.8566);
    }
}
