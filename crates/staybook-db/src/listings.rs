//! Database operations for the `listings` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use staybook_core::{Geometry, ImageRef, Listing, ListingUpdate, NewListing, Provenance};
use uuid::Uuid;

use crate::DbError;

const LISTING_COLUMNS: &str = "id, owner, title, description, price, location, country, \
     image_url, image_filename, geometry, geocode_provenance, created_at, updated_at";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `listings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListingRow {
    pub id: Uuid,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub location: String,
    pub country: String,
    pub image_url: Option<String>,
    pub image_filename: Option<String>,
    pub geometry: Json<Geometry>,
    #[sqlx(try_from = "String")]
    pub geocode_provenance: Provenance,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        let image = match (row.image_url, row.image_filename) {
            (Some(url), Some(filename)) => Some(ImageRef { url, filename }),
            _ => None,
        };
        Self {
            id: row.id,
            owner: row.owner,
            title: row.title,
            description: row.description,
            price: row.price,
            location: row.location,
            country: row.country,
            image,
            geometry: row.geometry.0,
            geocode_provenance: row.geocode_provenance,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a listing and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including check-constraint
/// violations.
pub async fn insert_listing(pool: &PgPool, listing: &NewListing) -> Result<ListingRow, DbError> {
    let (image_url, image_filename) = split_image(listing.image.as_ref());
    let row = sqlx::query_as::<_, ListingRow>(&format!(
        "INSERT INTO listings \
             (id, owner, title, description, price, location, country, \
              image_url, image_filename, geometry, geocode_provenance) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {LISTING_COLUMNS}"
    ))
    .bind(listing.id)
    .bind(&listing.owner)
    .bind(&listing.title)
    .bind(&listing.description)
    .bind(listing.price)
    .bind(&listing.location)
    .bind(&listing.country)
    .bind(image_url)
    .bind(image_filename)
    .bind(Json(&listing.geometry))
    .bind(listing.geocode_provenance.as_str())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns a listing by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_listing(pool: &PgPool, id: Uuid) -> Result<Option<ListingRow>, DbError> {
    let row = sqlx::query_as::<_, ListingRow>(&format!(
        "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the newest listings first, up to `limit` rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_listings(pool: &PgPool, limit: i64) -> Result<Vec<ListingRow>, DbError> {
    let rows = sqlx::query_as::<_, ListingRow>(&format!(
        "SELECT {LISTING_COLUMNS} FROM listings \
         ORDER BY created_at DESC, id \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the newest listings whose coordinate came from `provenance`,
/// up to `limit` rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_listings_by_provenance(
    pool: &PgPool,
    provenance: Provenance,
    limit: i64,
) -> Result<Vec<ListingRow>, DbError> {
    let rows = sqlx::query_as::<_, ListingRow>(&format!(
        "SELECT {LISTING_COLUMNS} FROM listings \
         WHERE geocode_provenance = $1 \
         ORDER BY created_at DESC, id \
         LIMIT $2"
    ))
    .bind(provenance.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Applies the `Some` fields of `update` and bumps `updated_at`.
///
/// Returns `None` if no listing has `id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn update_listing(
    pool: &PgPool,
    id: Uuid,
    update: &ListingUpdate,
) -> Result<Option<ListingRow>, DbError> {
    let (image_url, image_filename) = split_image(update.image.as_ref());
    let row = sqlx::query_as::<_, ListingRow>(&format!(
        "UPDATE listings SET \
             title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             price = COALESCE($4, price), \
             location = COALESCE($5, location), \
             country = COALESCE($6, country), \
             image_url = COALESCE($7, image_url), \
             image_filename = COALESCE($8, image_filename), \
             geometry = COALESCE($9, geometry), \
             geocode_provenance = COALESCE($10, geocode_provenance), \
             updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {LISTING_COLUMNS}"
    ))
    .bind(id)
    .bind(update.title.as_deref())
    .bind(update.description.as_deref())
    .bind(update.price)
    .bind(update.location.as_deref())
    .bind(update.country.as_deref())
    .bind(image_url)
    .bind(image_filename)
    .bind(update.geometry.as_ref().map(Json))
    .bind(update.geocode_provenance.map(Provenance::as_str))
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Deletes a listing.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no listing has `id`, or [`DbError::Sqlx`]
/// if the delete fails.
pub async fn delete_listing(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM listings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

fn split_image(image: Option<&ImageRef>) -> (Option<&str>, Option<&str>) {
    image.map_or((None, None), |image| {
        (Some(image.url.as_str()), Some(image.filename.as_str()))
    })
}
