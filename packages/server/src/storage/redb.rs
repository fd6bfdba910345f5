//! Embedded-file [`BookingRepository`] backed by redb.
//!
//! Records live in one table keyed by id (JSON-encoded values); a second
//! meta table persists the id counter so ids survive restarts and are never
//! reissued, even after the highest id is deleted. Every operation is a
//! single redb transaction; the transactions are short enough at this scale
//! to run inline on the runtime worker.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};

use skiphire_core::booking::{Booking, BookingPatch, NewBooking};

use super::clock::{ClockSource, SystemClock};
use super::repository::{BookingRepository, StoreError};

const BOOKINGS: TableDefinition<i64, &[u8]> = TableDefinition::new("bookings");
const META: TableDefinition<&str, i64> = TableDefinition::new("meta");
const NEXT_ID_KEY: &str = "next_booking_id";

fn backend<E>(err: E) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StoreError::Backend(anyhow::Error::new(err))
}

/// File-backed booking store.
pub struct RedbRepository {
    db: Database,
    clock: Arc<dyn ClockSource>,
}

impl RedbRepository {
    /// Opens (or creates) the database file at `path` on the system clock.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be created or is not a valid database.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::open_with_clock(path, Arc::new(SystemClock))
    }

    /// Opens (or creates) the database file with an injected clock.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be created or is not a valid database.
    pub fn open_with_clock(
        path: impl AsRef<Path>,
        clock: Arc<dyn ClockSource>,
    ) -> anyhow::Result<Self> {
        let db = Database::create(path)?;
        // Create both tables up front so reads never race table creation.
        let write = db.begin_write()?;
        {
            write.open_table(BOOKINGS)?;
            write.open_table(META)?;
        }
        write.commit()?;
        Ok(Self { db, clock })
    }
}

#[async_trait]
impl BookingRepository for RedbRepository {
    async fn create(&self, new: NewBooking) -> Result<Booking, StoreError> {
        new.validate()?;
        let created_at = self.clock.now();

        let write = self.db.begin_write().map_err(backend)?;
        let booking;
        {
            let mut meta = write.open_table(META).map_err(backend)?;
            let id = meta
                .get(NEXT_ID_KEY)
                .map_err(backend)?
                .map_or(1, |guard| guard.value());
            meta.insert(NEXT_ID_KEY, id + 1).map_err(backend)?;
            drop(meta);

            booking = Booking::from_new(new, id, created_at);
            let bytes = serde_json::to_vec(&booking).map_err(backend)?;
            let mut table = write.open_table(BOOKINGS).map_err(backend)?;
            table.insert(id, bytes.as_slice()).map_err(backend)?;
        }
        write.commit().map_err(backend)?;
        Ok(booking)
    }

    async fn get(&self, id: i64) -> Result<Booking, StoreError> {
        let read = self.db.begin_read().map_err(backend)?;
        let table = read.open_table(BOOKINGS).map_err(backend)?;
        let guard = table
            .get(id)
            .map_err(backend)?
            .ok_or(StoreError::NotFound)?;
        serde_json::from_slice(guard.value()).map_err(backend)
    }

    async fn list(&self) -> Result<Vec<Booking>, StoreError> {
        let read = self.db.begin_read().map_err(backend)?;
        let table = read.open_table(BOOKINGS).map_err(backend)?;
        // B-tree iteration comes back key-ordered, which is id order.
        let mut all = Vec::new();
        for item in table.iter().map_err(backend)? {
            let (_, guard) = item.map_err(backend)?;
            all.push(serde_json::from_slice(guard.value()).map_err(backend)?);
        }
        Ok(all)
    }

    async fn update(&self, id: i64, patch: BookingPatch) -> Result<Booking, StoreError> {
        let write = self.db.begin_write().map_err(backend)?;
        let merged;
        {
            let mut table = write.open_table(BOOKINGS).map_err(backend)?;
            let existing: Booking = {
                let guard = table
                    .get(id)
                    .map_err(backend)?
                    .ok_or(StoreError::NotFound)?;
                serde_json::from_slice(guard.value()).map_err(backend)?
            };
            merged = existing.apply_patch(&patch);
            // An early return here drops the transaction, aborting it.
            merged.validate()?;
            let bytes = serde_json::to_vec(&merged).map_err(backend)?;
            table.insert(id, bytes.as_slice()).map_err(backend)?;
        }
        write.commit().map_err(backend)?;
        Ok(merged)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let write = self.db.begin_write().map_err(backend)?;
        let removed = {
            let mut table = write.open_table(BOOKINGS).map_err(backend)?;
            let removed = table.remove(id).map_err(backend)?.is_some();
            removed
        };
        if !removed {
            return Err(StoreError::NotFound);
        }
        write.commit().map_err(backend)?;
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let read = self.db.begin_read().map_err(backend)?;
        let table = read.open_table(BOOKINGS).map_err(backend)?;
        let len = table.len().map_err(backend)?;
        Ok(usize::try_from(len).unwrap_or(usize::MAX))
    }
}

#[cfg(test)]
mod tests {
    use skiphire_core::booking::WasteType;

    use super::*;

    fn sample_new(postcode: &str) -> NewBooking {
        NewBooking {
            user_id: None,
            postcode: postcode.to_string(),
            waste_types: vec![WasteType::Construction],
            heavy_waste_types: None,
            heavy_waste_percentage: None,
            skip_size: Some("8 Yard Skip".to_string()),
            permit_required: false,
            delivery_date: None,
            contact_name: "Jo Bloggs".to_string(),
            contact_email: "jo@example.com".to_string(),
            contact_phone: "07700 900123".to_string(),
            payment_completed: false,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = RedbRepository::open(dir.path().join("bookings.redb")).unwrap();

        let created = repo.create(sample_new("NR32")).await.unwrap();
        assert_eq!(created.id, 1);

        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn list_orders_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let repo = RedbRepository::open(dir.path().join("bookings.redb")).unwrap();

        for postcode in ["A1", "B2", "C3"] {
            repo.create(sample_new(postcode)).await.unwrap();
        }
        let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[tokio::test]
    async fn update_persists_the_merged_record() {
        let dir = tempfile::tempdir().unwrap();
        let repo = RedbRepository::open(dir.path().join("bookings.redb")).unwrap();

        let created = repo.create(sample_new("NR32")).await.unwrap();
        let patch: BookingPatch =
            serde_json::from_str(r#"{"skipSize": null, "paymentCompleted": true}"#).unwrap();
        let updated = repo.update(created.id, patch).await.unwrap();
        assert_eq!(updated.skip_size, None);
        assert!(updated.payment_completed);

        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn failed_validation_aborts_the_update() {
        let dir = tempfile::tempdir().unwrap();
        let repo = RedbRepository::open(dir.path().join("bookings.redb")).unwrap();

        let created = repo.create(sample_new("NR32")).await.unwrap();
        let patch = BookingPatch {
            contact_name: Some(String::new()),
            ..BookingPatch::default()
        };
        assert!(matches!(
            repo.update(created.id, patch).await,
            Err(StoreError::Validation(_))
        ));
        assert_eq!(repo.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = RedbRepository::open(dir.path().join("bookings.redb")).unwrap();
        assert!(matches!(repo.delete(7).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn id_counter_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.redb");

        {
            let repo = RedbRepository::open(&path).unwrap();
            repo.create(sample_new("A1")).await.unwrap();
            let second = repo.create(sample_new("B2")).await.unwrap();
            repo.delete(second.id).await.unwrap();
        }

        let repo = RedbRepository::open(&path).unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
        // Even though id 2 is gone, the counter picks up at 3.
        let third = repo.create(sample_new("C3")).await.unwrap();
        assert_eq!(third.id, 3);
        assert_eq!(repo.get(1).await.unwrap().postcode, "A1");
    }
}
