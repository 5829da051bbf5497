//! `listings` command handlers: read-only views over stored listings.

use clap::{Subcommand, ValueEnum};
use staybook_core::Provenance;
use staybook_db::ListingRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProvenanceFilter {
    Primary,
    Fallback,
    Default,
}

impl From<ProvenanceFilter> for Provenance {
    fn from(filter: ProvenanceFilter) -> Self {
        match filter {
            ProvenanceFilter::Primary => Self::Primary,
            ProvenanceFilter::Fallback => Self::Fallback,
            ProvenanceFilter::Default => Self::Default,
        }
    }
}

/// Sub-commands available under `listings`.
#[derive(Debug, Subcommand)]
pub enum ListingsCommands {
    /// List the newest listings
    List {
        /// Only show listings whose coordinate came from this stage
        #[arg(long, value_enum)]
        provenance: Option<ProvenanceFilter>,
        /// Maximum number of listings to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

pub(crate) async fn run_listings(
    pool: &sqlx::PgPool,
    command: ListingsCommands,
) -> anyhow::Result<()> {
    match command {
        ListingsCommands::List { provenance, limit } => {
            let limit = limit.clamp(1, 500);
            let rows = match provenance {
                Some(filter) => {
                    staybook_db::list_listings_by_provenance(pool, filter.into(), limit).await?
                }
                None => staybook_db::list_listings(pool, limit).await?,
            };

            if rows.is_empty() {
                println!("no listings found");
                return Ok(());
            }
            for row in &rows {
                println!("{}", format_row(row));
            }
        }
    }
    Ok(())
}

fn format_row(row: &ListingRow) -> String {
    let [longitude, latitude] = row.geometry.0.coordinates;
    format!(
        "{}  {:<32}  {:<24}  {:>10.5},{:>11.5}  {}",
        row.id,
        truncate(&row.title, 32),
        truncate(&row.location, 24),
        latitude,
        longitude,
        row.geocode_provenance
    )
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_owned();
    }
    let mut out: String = value.chars().take(max.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}
