//! In-memory [`BookingRepository`] backed by [`DashMap`].
//!
//! The default backend: no persistence, sharded concurrent access, ids from
//! an atomic counter. Suitable for development, tests, and deployments that
//! treat bookings as ephemeral.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use skiphire_core::booking::{Booking, BookingPatch, NewBooking};

use super::clock::{ClockSource, SystemClock};
use super::repository::{BookingRepository, StoreError};

/// In-memory booking store.
///
/// `next_id` starts at 1 and only ever moves forward, so ids stay unique
/// for the life of the process even across deletes. Contents are lost on
/// restart; the redb backend persists.
pub struct MemoryRepository {
    bookings: DashMap<i64, Booking>,
    next_id: AtomicI64,
    clock: Arc<dyn ClockSource>,
}

impl MemoryRepository {
    /// Creates an empty repository on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty repository with an injected clock (for tests).
    #[must_use]
    pub fn with_clock(clock: Arc<dyn ClockSource>) -> Self {
        Self {
            bookings: DashMap::new(),
            next_id: AtomicI64::new(1),
            clock,
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for MemoryRepository {
    async fn create(&self, new: NewBooking) -> Result<Booking, StoreError> {
        // Validate before taking an id so rejected input burns nothing.
        new.validate()?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let booking = Booking::from_new(new, id, self.clock.now());
        self.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    async fn get(&self, id: i64) -> Result<Booking, StoreError> {
        self.bookings
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Booking>, StoreError> {
        let mut all: Vec<Booking> = self.bookings.iter().map(|e| e.value().clone()).collect();
        all.sort_unstable_by_key(|booking| booking.id);
        Ok(all)
    }

    async fn update(&self, id: i64, patch: BookingPatch) -> Result<Booking, StoreError> {
        // The entry guard holds the shard lock, making merge + validate +
        // write atomic with respect to concurrent updates of the same id.
        let mut entry = self.bookings.get_mut(&id).ok_or(StoreError::NotFound)?;
        let merged = entry.apply_patch(&patch);
        merged.validate()?;
        *entry = merged.clone();
        Ok(merged)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.bookings
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.bookings.len())
    }
}
