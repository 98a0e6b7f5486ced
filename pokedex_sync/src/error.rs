//! Domain error taxonomy shared by the service, resolver and orchestrator.
//!
//! The route layer translates these into HTTP statuses: `Validation` -> 400,
//! `NotFound` -> 404, `Conflict` -> 409, everything else -> 500. The
//! ingestion orchestrator never lets a per-item error escape a run; it
//! accumulates them in the report instead.

use pokeapi_client::errors::SourceError;
use thiserror::Error;

/// The unified error type for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Missing or conflicting required input.
    #[error("{0}")]
    Validation(String),

    /// An id or name lookup came up empty.
    #[error("{0}")]
    NotFound(String),

    /// A natural-key write raced another writer and the retried lookup
    /// still found nothing.
    #[error("conflicting write on {0}")]
    Conflict(String),

    /// The upstream catalog API was unreachable or answered non-2xx.
    #[error("upstream fetch failed: {0}")]
    Upstream(#[from] SourceError),

    /// Any database-level failure.
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

/// Result alias used throughout the catalog modules.
pub type CatalogResult<T> = Result<T, CatalogError>;
