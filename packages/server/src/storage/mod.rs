//! Booking persistence for the skip-hire server.
//!
//! - [`BookingRepository`]: the async CRUD trait handlers depend on
//! - [`MemoryRepository`]: DashMap-backed default
//! - [`RedbRepository`](redb::RedbRepository): embedded-file backend
//!   (feature `redb`, on by default)
//! - [`factory`]: builds the configured backend as
//!   `Arc<dyn BookingRepository>`

pub mod clock;
pub mod factory;
pub mod memory;
#[cfg(feature = "redb")]
pub mod redb;
pub mod repository;

pub use clock::{ClockSource, SystemClock};
pub use factory::{build_repository, BackendKind};
pub use memory::MemoryRepository;
pub use repository::{BookingRepository, StoreError};
