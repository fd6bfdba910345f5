//! HTTP handler definitions for the skip-hire server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod bookings;
pub mod health;
pub mod skips;

pub use bookings::{create_booking, delete_booking, get_booking, list_bookings, update_booking};
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use skips::skips_by_location;

use std::sync::Arc;
use std::time::Instant;

use crate::catalog::SkipCatalog;
use crate::network::ShutdownController;
use crate::storage::BookingRepository;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references to shared resources so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Booking record store.
    pub repo: Arc<dyn BookingRepository>,
    /// Upstream skip catalog.
    pub catalog: Arc<dyn SkipCatalog>,
    /// Graceful shutdown controller with health state.
    pub shutdown: Arc<ShutdownController>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}
