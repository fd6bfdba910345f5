//! The booking repository trait and its error type.
//!
//! [`BookingRepository`] is the persistence seam of the server: handlers see
//! only `Arc<dyn BookingRepository>`, and the backend (in-memory or redb) is
//! chosen at startup by the [factory](super::factory).

use async_trait::async_trait;

use skiphire_core::booking::{Booking, BookingPatch, NewBooking, ValidationError};

/// Errors returned by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The (new or merged) record failed the required-field rules.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No booking exists with the requested id.
    #[error("Booking not found")]
    NotFound,
    /// The backing medium failed (I/O, corruption, serialization).
    #[error("storage backend error: {0}")]
    Backend(#[source] anyhow::Error),
}

/// CRUD persistence for booking records.
///
/// Implementations assign ids sequentially starting at 1 and never reuse
/// one, even after deletes. Used as `Arc<dyn BookingRepository>`.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Validates `new`, assigns the next id and the creation timestamp,
    /// stores the record, and returns it.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] when a required field is blank;
    /// [`StoreError::Backend`] on medium faults.
    async fn create(&self, new: NewBooking) -> Result<Booking, StoreError>;

    /// Fetches one booking by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the id was never assigned or the record
    /// was deleted.
    async fn get(&self, id: i64) -> Result<Booking, StoreError>;

    /// All bookings, ordered by id (= insertion order).
    ///
    /// # Errors
    ///
    /// [`StoreError::Backend`] on medium faults.
    async fn list(&self) -> Result<Vec<Booking>, StoreError>;

    /// Shallow-merges `patch` into the stored record, re-validates the
    /// merged result, stores and returns it.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the id is absent;
    /// [`StoreError::Validation`] when the merge blanks a required field.
    async fn update(&self, id: i64, patch: BookingPatch) -> Result<Booking, StoreError>;

    /// Removes the record permanently. The id is not reissued.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the id is absent.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Number of stored bookings (for the health document).
    ///
    /// # Errors
    ///
    /// [`StoreError::Backend`] on medium faults.
    async fn count(&self) -> Result<usize, StoreError>;
}
