//! HTTP-backed skip catalog client.

use async_trait::async_trait;
use reqwest::Client;
use skiphire_core::catalog::SkipOffer;

use super::{CatalogError, SkipCatalog};

/// Default upstream supplier API.
pub const DEFAULT_BASE_URL: &str = "https://app.wewantwaste.co.uk";

/// Skip catalog served by the upstream supplier API.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    /// Create a catalog client bound to the given HTTP client and base URL.
    ///
    /// A trailing slash on `base_url` is tolerated.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }
}

#[async_trait]
impl SkipCatalog for HttpCatalog {
    async fn by_location(&self, postcode: &str, area: &str) -> Result<Vec<SkipOffer>, CatalogError> {
        let resp = self
            .client
            .get(format!("{}/api/skips/by-location", self.base_url))
            .query(&[("postcode", postcode), ("area", area)])
            .send()
            .await?
            .error_for_status()
            .map_err(|err| match err.status() {
                Some(status) => {
                    tracing::warn!(
                        status = status.as_u16(),
                        postcode,
                        "catalog upstream rejected request"
                    );
                    CatalogError::Upstream {
                        status: status.as_u16(),
                    }
                }
                None => CatalogError::Network(err),
            })?;

        Ok(resp.json().await?)
    }
}
