//! Skip-hire server: booking records, skip catalog lookup, and the REST API.

pub mod catalog;
pub mod network;
pub mod openapi;
pub mod storage;

pub use catalog::{HttpCatalog, SkipCatalog};
pub use network::{CatalogConfig, NetworkConfig, NetworkModule};
pub use storage::{build_repository, BackendKind, BookingRepository};
