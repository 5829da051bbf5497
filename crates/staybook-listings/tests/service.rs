//! Listing creation and update against mocked geocoders and an in-memory store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use staybook_core::{
    Coordinate, ImageRef, ImageStorageConfig, Listing, ListingDraft, ListingPatch, ListingUpdate,
    NewListing, Provenance,
};
use staybook_geocode::{GeocodePipeline, NominatimClient, OpenCageClient, ProviderSettings};
use staybook_listings::{ListingError, ListingService, ListingStore};
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
#[error("store unavailable")]
struct StoreDown;

#[derive(Default)]
struct MemoryStore {
    rows: Mutex<Vec<Listing>>,
    inserts: AtomicUsize,
    fail: bool,
}

impl MemoryStore {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn rows(&self) -> Vec<Listing> {
        self.rows.lock().unwrap().clone()
    }
}

impl ListingStore for MemoryStore {
    type Error = StoreDown;

    async fn insert_listing(&self, listing: &NewListing) -> Result<Listing, StoreDown> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreDown);
        }
        let now = Utc::now();
        let row = Listing {
            id: listing.id,
            owner: listing.owner.clone(),
            title: listing.title.clone(),
            description: listing.description.clone(),
            price: listing.price,
            location: listing.location.clone(),
            country: listing.country.clone(),
            image: listing.image.clone(),
            geometry: listing.geometry.clone(),
            geocode_provenance: listing.geocode_provenance,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn get_listing(&self, id: Uuid) -> Result<Option<Listing>, StoreDown> {
        Ok(self.rows.lock().unwrap().iter().find(|l| l.id == id).cloned())
    }

    async fn update_listing(
        &self,
        id: Uuid,
        update: &ListingUpdate,
    ) -> Result<Option<Listing>, StoreDown> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &update.title {
            row.title.clone_from(title);
        }
        if let Some(description) = &update.description {
            row.description.clone_from(description);
        }
        if let Some(price) = update.price {
            row.price = price;
        }
        if let Some(location) = &update.location {
            row.location.clone_from(location);
        }
        if let Some(country) = &update.country {
            row.country.clone_from(country);
        }
        if update.image.is_some() {
            row.image.clone_from(&update.image);
        }
        if let Some(geometry) = &update.geometry {
            row.geometry = geometry.clone();
        }
        if let Some(provenance) = update.geocode_provenance {
            row.geocode_provenance = provenance;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn default_coordinate() -> Coordinate {
    Coordinate::new(0.0, 0.0).expect("valid default")
}

fn full_storage() -> ImageStorageConfig {
    ImageStorageConfig {
        cloud_name: Some("demo".to_owned()),
        api_key: Some("key".to_owned()),
        api_secret: Some("secret".to_owned()),
    }
}

fn pipeline(primary: &MockServer, fallback: &MockServer) -> Arc<GeocodePipeline> {
    let settings = |base_url: String, api_key: Option<&str>| ProviderSettings {
        base_url,
        api_key: api_key.map(str::to_owned),
        timeout: Duration::from_secs(2),
        result_limit: 1,
        user_agent: "staybook-test/0.1".to_owned(),
    };
    let nominatim = NominatimClient::new(&settings(primary.uri(), None)).expect("primary");
    let opencage = OpenCageClient::new(&settings(fallback.uri(), Some("k"))).expect("fallback");
    Arc::new(GeocodePipeline::new(
        vec![nominatim.into(), opencage.into()],
        default_coordinate(),
    ))
}

fn draft(title: &str, location: &str) -> ListingDraft {
    ListingDraft {
        title: title.to_owned(),
        description: "Quiet flat near the river".to_owned(),
        price: Decimal::new(12_000, 2),
        location: location.to_owned(),
        country: "France".to_owned(),
    }
}

fn image() -> ImageRef {
    ImageRef {
        url: "https://res.cloudinary.com/demo/image/upload/v1/staybook/flat.png".to_owned(),
        filename: "staybook/flat".to_owned(),
    }
}

async fn mount_nominatim(server: &MockServer, body: serde_json::Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_opencage(server: &MockServer, body: serde_json::Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// create_listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_embeds_primary_point_as_lon_lat() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    mount_nominatim(&primary, json!([{ "lat": "48.8566", "lon": "2.3522" }]), 1).await;
    mount_opencage(&fallback, json!({ "results": [] }), 0).await;

    let service = ListingService::new(
        pipeline(&primary, &fallback),
        MemoryStore::default(),
        full_storage(),
    );

    let listing = service
        .create_listing("owner-1", draft("  Paris flat ", "Paris, France"), Some(image()))
        .await
        .expect("listing should be created");

    assert_eq!(listing.title, "Paris flat");
    assert_eq!(listing.owner, "owner-1");
    assert_eq!(listing.geocode_provenance, Provenance::Primary);
    assert_eq!(
        serde_json::to_value(&listing.geometry).unwrap(),
        json!({ "type": "Point", "coordinates": [2.3522, 48.8566] })
    );
    assert_eq!(service.store().inserts.load(Ordering::SeqCst), 1);
    assert_eq!(service.store().rows().len(), 1);
}

#[tokio::test]
async fn create_uses_fallback_when_primary_has_no_match() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    mount_nominatim(&primary, json!([]), 1).await;
    mount_opencage(
        &fallback,
        json!({ "results": [{ "geometry": { "lat": 35.0116, "lng": 135.7681 } }] }),
        1,
    )
    .await;

    let service = ListingService::new(
        pipeline(&primary, &fallback),
        MemoryStore::default(),
        full_storage(),
    );
    let listing = service
        .create_listing("owner-1", draft("Machiya", "Kyoto"), None)
        .await
        .unwrap();

    assert_eq!(listing.geocode_provenance, Provenance::Fallback);
    let coordinate = listing.geometry.coordinate().unwrap();
    assert!((coordinate.latitude() - 35.0116).abs() < 1e-9);
    assert!((coordinate.longitude() - 135.7681).abs() < 1e-9);
}

#[tokio::test]
async fn create_unresolvable_location_still_persists_default_point() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    mount_nominatim(&primary, json!([]), 1).await;
    mount_opencage(&fallback, json!({ "results": [] }), 1).await;

    let service = ListingService::new(
        pipeline(&primary, &fallback),
        MemoryStore::default(),
        full_storage(),
    );
    let listing = service
        .create_listing("owner-1", draft("Mystery", "xyzzynonexistentplace123"), None)
        .await
        .expect("geocoding failure must not block creation");

    assert_eq!(listing.geocode_provenance, Provenance::Default);
    assert_eq!(
        serde_json::to_value(&listing.geometry).unwrap(),
        json!({ "type": "Point", "coordinates": [0.0, 0.0] })
    );
    assert_eq!(service.store().inserts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn create_without_image_storage_fails_before_any_geocoding() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    mount_nominatim(&primary, json!([{ "lat": "1.0", "lon": "1.0" }]), 0).await;
    mount_opencage(&fallback, json!({ "results": [] }), 0).await;

    let storage = ImageStorageConfig {
        cloud_name: Some("demo".to_owned()),
        api_key: None,
        api_secret: Some("  ".to_owned()),
    };
    let service = ListingService::new(pipeline(&primary, &fallback), MemoryStore::default(), storage);

    let err = service
        .create_listing("owner-1", draft("Flat", "Paris"), Some(image()))
        .await
        .unwrap_err();

    match err {
        ListingError::Configuration { missing } => {
            assert_eq!(missing, vec!["CLOUD_API_KEY", "CLOUD_API_SECRET"]);
        }
        other => panic!("expected Configuration, got {other:?}"),
    }
    assert_eq!(service.store().inserts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn create_rejects_invalid_fields_without_geocoding() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    mount_nominatim(&primary, json!([]), 0).await;
    mount_opencage(&fallback, json!({ "results": [] }), 0).await;

    let service = ListingService::new(
        pipeline(&primary, &fallback),
        MemoryStore::default(),
        full_storage(),
    );

    let blank = service
        .create_listing("owner-1", draft("   ", "Paris"), None)
        .await
        .unwrap_err();
    assert!(matches!(blank, ListingError::Validation(_)), "got {blank:?}");

    let mut negative = draft("Flat", "Paris");
    negative.price = Decimal::new(-500, 2);
    let err = service
        .create_listing("owner-1", negative, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ListingError::Validation(_)), "got {err:?}");

    let mut oversized = draft("Flat", "Paris");
    oversized.price = Decimal::new(10_000_000_000_000, 0);
    let err = service
        .create_listing("owner-1", oversized, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ListingError::Validation(_)), "got {err:?}");

    let mut fractional = draft("Flat", "Paris");
    fractional.price = Decimal::new(12_345, 3);
    let err = service
        .create_listing("owner-1", fractional, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ListingError::Validation(_)), "got {err:?}");

    assert_eq!(service.store().inserts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn create_surfaces_store_failure() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    mount_nominatim(&primary, json!([{ "lat": "1.0", "lon": "1.0" }]), 1).await;

    let service = ListingService::new(
        pipeline(&primary, &fallback),
        MemoryStore::failing(),
        full_storage(),
    );
    let err = service
        .create_listing("owner-1", draft("Flat", "Paris"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ListingError::Persistence(_)), "got {err:?}");
    assert_eq!(service.store().inserts.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// update_listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_relocates_when_location_changes() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Paris"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "lat": "48.8566", "lon": "2.3522" }])),
        )
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Lyon"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "lat": "45.764", "lon": "4.8357" }])),
        )
        .expect(1)
        .mount(&primary)
        .await;

    let service = ListingService::new(
        pipeline(&primary, &fallback),
        MemoryStore::default(),
        full_storage(),
    );
    let created = service
        .create_listing("owner-1", draft("Flat", "Paris"), None)
        .await
        .unwrap();

    let patch = ListingPatch {
        location: Some("Lyon".to_owned()),
        ..ListingPatch::default()
    };
    let updated = service
        .update_listing(created.id, patch, None)
        .await
        .unwrap();

    assert_eq!(updated.location, "Lyon");
    assert_eq!(updated.geocode_provenance, Provenance::Primary);
    assert_eq!(
        serde_json::to_value(&updated.geometry).unwrap(),
        json!({ "type": "Point", "coordinates": [4.8357, 45.764] })
    );
}

#[tokio::test]
async fn update_keeps_geometry_when_location_unchanged() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    mount_nominatim(&primary, json!([{ "lat": "48.8566", "lon": "2.3522" }]), 1).await;

    let service = ListingService::new(
        pipeline(&primary, &fallback),
        MemoryStore::default(),
        full_storage(),
    );
    let created = service
        .create_listing("owner-1", draft("Flat", "Paris"), None)
        .await
        .unwrap();

    let patch = ListingPatch {
        title: Some("Bigger flat".to_owned()),
        location: Some(" Paris ".to_owned()),
        ..ListingPatch::default()
    };
    let updated = service
        .update_listing(created.id, patch, None)
        .await
        .unwrap();

    assert_eq!(updated.title, "Bigger flat");
    assert_eq!(updated.geometry, created.geometry);
}

#[tokio::test]
async fn update_unknown_listing_is_not_found() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    mount_nominatim(&primary, json!([]), 0).await;

    let service = ListingService::new(
        pipeline(&primary, &fallback),
        MemoryStore::default(),
        full_storage(),
    );
    let id = Uuid::new_v4();
    let patch = ListingPatch {
        location: Some("Lyon".to_owned()),
        ..ListingPatch::default()
    };

    let err = service.update_listing(id, patch, None).await.unwrap_err();
    assert!(matches!(err, ListingError::NotFound(missing) if missing == id));
}

#[tokio::test]
async fn update_with_image_requires_storage_credentials() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    let service = ListingService::new(
        pipeline(&primary, &fallback),
        MemoryStore::default(),
        ImageStorageConfig::default(),
    );
    let err = service
        .update_listing(Uuid::new_v4(), ListingPatch::default(), Some(image()))
        .await
        .unwrap_err();

    assert!(matches!(err, ListingError::Configuration { .. }), "got {err:?}");
}
