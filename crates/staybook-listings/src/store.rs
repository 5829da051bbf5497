use std::future::Future;

use staybook_core::{Listing, ListingUpdate, NewListing};
use uuid::Uuid;

/// Persistence collaborator used by [`crate::ListingService`].
///
/// `update_listing` and `get_listing` return `Ok(None)` when no row has the
/// given id.
pub trait ListingStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn insert_listing(
        &self,
        listing: &NewListing,
    ) -> impl Future<Output = Result<Listing, Self::Error>> + Send;

    fn get_listing(&self, id: Uuid)
        -> impl Future<Output = Result<Option<Listing>, Self::Error>> + Send;

    fn update_listing(
        &self,
        id: Uuid,
        update: &ListingUpdate,
    ) -> impl Future<Output = Result<Option<Listing>, Self::Error>> + Send;
}
