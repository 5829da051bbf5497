use thiserror::Error;
use uuid::Uuid;

/// Errors that stop a listing write.
///
/// There is no geocoding variant: the pipeline always yields a coordinate.
#[derive(Debug, Error)]
pub enum ListingError {
    /// Required collaborator credentials are missing. Raised before any
    /// network call.
    #[error("image storage is not configured (missing {})", .missing.join(", "))]
    Configuration { missing: Vec<&'static str> },

    #[error("invalid listing: {0}")]
    Validation(String),

    #[error("listing {0} not found")]
    NotFound(Uuid),

    #[error("listing store failed: {0}")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ListingError {
    pub(crate) fn persistence<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Persistence(Box::new(source))
    }
}
