//! Claim and media persistence.
//!
//! Two seams: [`ClaimRepository`] owns durable claim records, [`BlobStore`]
//! owns media payloads. Both are synchronous and last-write-wins; callers
//! hold working copies and write them back through the repository.

pub mod filesystem;
pub mod json_file;
pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use crate::claim::Claim;
use crate::clock::{Clock, SystemClock};
use crate::config::{StorageBackend, StorageConfig};
use crate::db::{self, Database};
use crate::error::StorageError;

pub use filesystem::FileBlobStore;
pub use json_file::JsonFileClaimRepository;
pub use memory::{InMemoryBlobStore, InMemoryClaimRepository};
pub use sqlite::{SqliteBlobStore, SqliteClaimRepository};

/// Ordered collection of claims keyed by id.
pub trait ClaimRepository: Send + Sync {
    /// Every stored claim in storage order.
    fn list(&self) -> Result<Vec<Claim>, StorageError>;

    /// Exact id lookup. `None` is a normal outcome.
    fn get(&self, id: &str) -> Result<Option<Claim>, StorageError>;

    /// Upsert by id: an existing claim is replaced in place, a new one is
    /// appended.
    fn save(&self, claim: &Claim) -> Result<(), StorageError>;

    /// Removes a claim; no-op if absent.
    fn delete(&self, id: &str) -> Result<(), StorageError>;
}

/// Media payloads (data-URI strings) keyed by file id.
pub trait BlobStore: Send + Sync {
    /// Stores a payload, overwriting an existing one.
    fn put(&self, file_id: &str, payload: &str) -> Result<(), StorageError>;

    /// `None` when never stored or already deleted.
    fn get(&self, file_id: &str) -> Result<Option<String>, StorageError>;

    /// Idempotent removal.
    fn delete(&self, file_id: &str) -> Result<(), StorageError>;
}

/// The pair of stores backing a claim desk.
#[derive(Clone)]
pub struct Stores {
    pub claims: Arc<dyn ClaimRepository>,
    pub blobs: Arc<dyn BlobStore>,
}

impl Stores {
    /// Fresh in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            claims: Arc::new(InMemoryClaimRepository::new()),
            blobs: Arc::new(InMemoryBlobStore::new()),
        }
    }

    /// Opens the stores selected by the configuration.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    /// Like [`Stores::open`], with `clock` stamping rows that carry write
    /// times.
    pub fn open_with_clock(
        config: &StorageConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StorageError> {
        match config.backend {
            StorageBackend::Memory => {
                log::info!("Using in-memory claim storage");
                Ok(Self::in_memory())
            }
            StorageBackend::File => {
                let data_dir = config.data_directory()?;
                log::info!("Using file claim storage in {}", data_dir.display());
                Ok(Self {
                    claims: Arc::new(JsonFileClaimRepository::new(
                        data_dir.join(json_file::CLAIMS_FILE_NAME),
                    )),
                    blobs: Arc::new(FileBlobStore::new(data_dir.join(filesystem::MEDIA_DIR_NAME))),
                })
            }
            StorageBackend::Sqlite => {
                let data_dir = config.data_directory()?;
                let database = Database::open(&data_dir.join(db::DATABASE_FILE_NAME))?;
                Ok(Self {
                    claims: Arc::new(
                        SqliteClaimRepository::new(database.clone()).with_clock(clock.clone()),
                    ),
                    blobs: Arc::new(SqliteBlobStore::new(database).with_clock(clock)),
                })
            }
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
