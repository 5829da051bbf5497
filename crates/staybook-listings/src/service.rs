use std::sync::Arc;

use rust_decimal::Decimal;
use staybook_core::{
    Geometry, ImageRef, ImageStorageConfig, Listing, ListingDraft, ListingPatch, ListingUpdate,
    NewListing,
};
use staybook_geocode::GeocodePipeline;
use uuid::Uuid;

use crate::error::ListingError;
use crate::store::ListingStore;

pub const MAX_TITLE_LEN: usize = 200;

/// Largest price the `NUMERIC(12, 2)` column holds.
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

const PRICE_SCALE: u32 = 2;

/// Creates and updates listings, attaching a GeoJSON point to each.
#[derive(Debug, Clone)]
pub struct ListingService<S> {
    pipeline: Arc<GeocodePipeline>,
    store: S,
    image_storage: ImageStorageConfig,
}

impl<S: ListingStore> ListingService<S> {
    #[must_use]
    pub fn new(pipeline: Arc<GeocodePipeline>, store: S, image_storage: ImageStorageConfig) -> Self {
        Self {
            pipeline,
            store,
            image_storage,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn pipeline(&self) -> &GeocodePipeline {
        &self.pipeline
    }

    /// Geocodes `draft.location` and persists a new listing owned by `owner`.
    ///
    /// The pipeline runs exactly once and the store is written exactly once.
    /// An unresolvable location still produces a listing, placed at the
    /// configured default coordinate.
    ///
    /// # Errors
    ///
    /// - [`ListingError::Configuration`] when image-storage credentials are
    ///   missing. Nothing else runs in that case.
    /// - [`ListingError::Validation`] for a blank or oversized title, a price
    ///   outside `0..=MAX_PRICE` or with more than two decimal places, or an
    ///   incomplete image reference.
    /// - [`ListingError::Persistence`] when the store rejects the insert.
    pub async fn create_listing(
        &self,
        owner: &str,
        draft: ListingDraft,
        image: Option<ImageRef>,
    ) -> Result<Listing, ListingError> {
        self.ensure_image_storage()?;

        let title = validate_title(&draft.title)?;
        validate_price(draft.price)?;
        if let Some(image) = &image {
            validate_image(image)?;
        }

        let geocoded = self.pipeline.resolve(&draft.location).await;

        let record = NewListing {
            id: Uuid::new_v4(),
            owner: owner.to_owned(),
            title,
            description: draft.description,
            price: draft.price,
            location: draft.location,
            country: draft.country,
            image,
            geometry: Geometry::point(geocoded.coordinate),
            geocode_provenance: geocoded.provenance,
        };

        let listing = self
            .store
            .insert_listing(&record)
            .await
            .map_err(ListingError::persistence)?;

        tracing::info!(
            listing_id = %listing.id,
            provenance = %geocoded.provenance,
            "listing created"
        );
        Ok(listing)
    }

    /// Applies `patch` to the listing `id`.
    ///
    /// The location is re-geocoded only when the patch changes it. Supplying
    /// a new image requires image-storage credentials, the same as creation.
    ///
    /// # Errors
    ///
    /// - [`ListingError::NotFound`] when no listing has `id`.
    /// - [`ListingError::Configuration`] when `image` is supplied without
    ///   image-storage credentials.
    /// - [`ListingError::Validation`] for invalid patched fields.
    /// - [`ListingError::Persistence`] when the store fails.
    pub async fn update_listing(
        &self,
        id: Uuid,
        mut patch: ListingPatch,
        image: Option<ImageRef>,
    ) -> Result<Listing, ListingError> {
        if let Some(image) = &image {
            self.ensure_image_storage()?;
            validate_image(image)?;
        }

        patch.title = patch.title.as_deref().map(validate_title).transpose()?;
        if let Some(price) = patch.price {
            validate_price(price)?;
        }

        let current = self
            .store
            .get_listing(id)
            .await
            .map_err(ListingError::persistence)?
            .ok_or(ListingError::NotFound(id))?;

        let relocated = patch
            .location
            .as_deref()
            .filter(|location| location.trim() != current.location.trim())
            .map(str::to_owned);

        let mut update = ListingUpdate::from(patch);
        update.image = image;

        if let Some(location) = relocated {
            let geocoded = self.pipeline.resolve(&location).await;
            tracing::debug!(
                listing_id = %id,
                provenance = %geocoded.provenance,
                "listing location re-geocoded"
            );
            update.geometry = Some(Geometry::point(geocoded.coordinate));
            update.geocode_provenance = Some(geocoded.provenance);
        }

        self.store
            .update_listing(id, &update)
            .await
            .map_err(ListingError::persistence)?
            .ok_or(ListingError::NotFound(id))
    }

    fn ensure_image_storage(&self) -> Result<(), ListingError> {
        let missing = self.image_storage.missing_vars();
        if missing.is_empty() {
            return Ok(());
        }
        tracing::error!(missing = ?missing, "image storage credentials are not configured");
        Err(ListingError::Configuration { missing })
    }
}

fn validate_title(title: &str) -> Result<String, ListingError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ListingError::Validation("title must not be empty".to_owned()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ListingError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_owned())
}

fn validate_price(price: Decimal) -> Result<(), ListingError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ListingError::Validation(
            "price must not be negative".to_owned(),
        ));
    }
    if price > MAX_PRICE {
        return Err(ListingError::Validation(format!(
            "price must be at most {MAX_PRICE}"
        )));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(ListingError::Validation(format!(
            "price must have at most {PRICE_SCALE} decimal places"
        )));
    }
    Ok(())
}

fn validate_image(image: &ImageRef) -> Result<(), ListingError> {
    if image.url.trim().is_empty() || image.filename.trim().is_empty() {
        return Err(ListingError::Validation(
            "image reference requires both url and filename".to_owned(),
        ));
    }
    Ok(())
}
