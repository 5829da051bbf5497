use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use staybook_core::Geometry;
use staybook_geocode::Provenance;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub(super) struct GeocodeItem {
    latitude: f64,
    longitude: f64,
    provenance: Provenance,
    geometry: Geometry,
}

/// GET /api/v1/geocode?q=: run the pipeline without storing anything.
///
/// Always succeeds; an unresolvable query reports `"default"` provenance.
pub(super) async fn resolve_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<GeocodeQuery>,
) -> Json<ApiResponse<GeocodeItem>> {
    let result = state.listings.pipeline().resolve(&query.q).await;

    Json(ApiResponse {
        data: GeocodeItem {
            latitude: result.coordinate.latitude(),
            longitude: result.coordinate.longitude(),
            provenance: result.provenance,
            geometry: Geometry::point(result.coordinate),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
