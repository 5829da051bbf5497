//! Listing handlers: index, show, create, update, delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use staybook_core::{Geometry, ImageRef, Listing, ListingDraft, ListingPatch, Provenance};
use uuid::Uuid;

use crate::middleware::{Owner, RequestId};

use super::{
    map_db_error, map_listing_error, normalize_limit, ApiError, ApiResponse, AppState,
    ResponseMeta,
};

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct CreateListingRequest {
    pub listing: ListingDraft,
    pub image: Option<ImageRef>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateListingRequest {
    #[serde(default)]
    pub listing: ListingPatch,
    pub image: Option<ImageRef>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListingQuery {
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct ListingItem {
    id: Uuid,
    owner: String,
    title: String,
    description: String,
    price: Decimal,
    location: String,
    country: String,
    image: Option<ImageItem>,
    geometry: Geometry,
    geocode_provenance: Provenance,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct ImageItem {
    url: String,
    filename: String,
    thumbnail_url: String,
}

impl From<Listing> for ListingItem {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id,
            owner: listing.owner,
            title: listing.title,
            description: listing.description,
            price: listing.price,
            location: listing.location,
            country: listing.country,
            image: listing.image.map(|image| ImageItem {
                thumbnail_url: image.thumbnail_url(),
                url: image.url,
                filename: image.filename,
            }),
            geometry: listing.geometry,
            geocode_provenance: listing.geocode_provenance,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}

fn parse_listing_id(req_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        ApiError::new(
            req_id,
            "validation_error",
            format!("'{raw}' is not a valid listing id"),
        )
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/listings: newest first.
pub(super) async fn list_listings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ApiResponse<Vec<ListingItem>>>, ApiError> {
    let rows = staybook_db::list_listings(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| ListingItem::from(Listing::from(row)))
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/listings/:id
pub(super) async fn get_listing(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ListingItem>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_listing_id(rid, &id)?;

    let row = staybook_db::get_listing(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "listing not found"))?;

    Ok(Json(ApiResponse {
        data: Listing::from(row).into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/listings: geocode the location and store a new listing.
pub(super) async fn create_listing(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(owner): Extension<Owner>,
    Json(body): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ListingItem>>), ApiError> {
    let listing = state
        .listings
        .create_listing(&owner.0, body.listing, body.image)
        .await
        .map_err(|e| map_listing_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: listing.into(),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PATCH /api/v1/listings/:id: sparse update; a new location is re-geocoded.
pub(super) async fn update_listing(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<UpdateListingRequest>,
) -> Result<Json<ApiResponse<ListingItem>>, ApiError> {
    let id = parse_listing_id(&req_id.0, &id)?;

    let listing = state
        .listings
        .update_listing(id, body.listing, body.image)
        .await
        .map_err(|e| map_listing_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: listing.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/listings/:id
pub(super) async fn delete_listing(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_listing_id(rid, &id)?;

    staybook_db::delete_listing(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(listing_id = %id, "listing deleted");
    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
