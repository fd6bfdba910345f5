//! Backend selection for the booking repository.
//!
//! The binary parses `--backend` into a [`BackendKind`] and calls
//! [`build_repository`]; everything downstream sees only
//! `Arc<dyn BookingRepository>`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::memory::MemoryRepository;
use super::repository::BookingRepository;

/// Which persistence medium backs the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Process-lifetime in-memory storage.
    #[default]
    Memory,
    /// redb database file at the given path.
    Redb { path: PathBuf },
}

/// Builds a repository for the configured backend.
///
/// # Errors
///
/// Fails when the redb file cannot be opened, or when `Redb` is requested
/// from a build without the `redb` feature.
pub fn build_repository(kind: &BackendKind) -> anyhow::Result<Arc<dyn BookingRepository>> {
    match kind {
        BackendKind::Memory => Ok(Arc::new(MemoryRepository::new())),
        BackendKind::Redb { path } => open_redb(path),
    }
}

#[cfg(feature = "redb")]
fn open_redb(path: &Path) -> anyhow::Result<Arc<dyn BookingRepository>> {
    Ok(Arc::new(super::redb::RedbRepository::open(path)?))
}

#[cfg(not(feature = "redb"))]
fn open_redb(_path: &Path) -> anyhow::Result<Arc<dyn BookingRepository>> {
    anyhow::bail!("this build does not include the redb backend (enable the `redb` feature)")
}
