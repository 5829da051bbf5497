//! Postgres-backed [`ListingStore`].

use sqlx::PgPool;
use staybook_core::{Listing, ListingUpdate, NewListing};
use staybook_db::DbError;
use staybook_listings::ListingStore;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ListingStore for PgListingStore {
    type Error = DbError;

    async fn insert_listing(&self, listing: &NewListing) -> Result<Listing, DbError> {
        let row = staybook_db::insert_listing(&self.pool, listing).await?;
        Ok(row.into())
    }

    async fn get_listing(&self, id: Uuid) -> Result<Option<Listing>, DbError> {
        let row = staybook_db::get_listing(&self.pool, id).await?;
        Ok(row.map(Listing::from))
    }

    async fn update_listing(
        &self,
        id: Uuid,
        update: &ListingUpdate,
    ) -> Result<Option<Listing>, DbError> {
        let row = staybook_db::update_listing(&self.pool, id, update).await?;
        Ok(row.map(Listing::from))
    }
}
