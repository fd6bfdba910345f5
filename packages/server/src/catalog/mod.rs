//! Skip catalog lookup.
//!
//! The catalog is the list of skips offered for a given location. The live
//! implementation ([`HttpCatalog`]) fetches it from the upstream supplier
//! API; tests swap in fixed in-memory catalogs via the [`SkipCatalog`] trait.

pub mod http;

use async_trait::async_trait;
use skiphire_core::catalog::SkipOffer;

pub use http::HttpCatalog;

/// Errors that can occur while fetching the skip catalog.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// Network layer failed before a response arrived.
    #[error("catalog request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Upstream answered with a non-success status.
    #[error("catalog upstream returned status {status}")]
    Upstream {
        /// HTTP status code from the upstream response.
        status: u16,
    },
}

/// Source of skip offers for a location.
#[async_trait]
pub trait SkipCatalog: Send + Sync {
    /// Fetch all skips offered at the given postcode and area.
    ///
    /// Returns the raw catalog; eligibility filtering against the wizard's
    /// waste selections happens in the core rules, not here.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the upstream cannot be reached or
    /// answers with a non-success status.
    async fn by_location(&self, postcode: &str, area: &str) -> Result<Vec<SkipOffer>, CatalogError>;
}
