//! SQLite-backed stores built on [`crate::db`].
//!
//! Each save or delete touches a single row, so a failed write never
//! affects unrelated claims.

use std::sync::Arc;

use super::{BlobStore, ClaimRepository};
use crate::claim::Claim;
use crate::clock::{Clock, SystemClock};
use crate::db::{blob_repo, claim_repo, Database};
use crate::error::StorageError;

#[derive(Debug, Clone)]
pub struct SqliteClaimRepository {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl SqliteClaimRepository {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            clock: Arc::new(SystemClock),
        }
    }

    /// Source of the `updated_at` column.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

fn decode(row: &claim_repo::ClaimRow) -> Result<Claim, StorageError> {
    serde_json::from_str(&row.record).map_err(|e| {
        log::error!("Stored record for claim {} is unreadable: {}", row.id, e);
        StorageError::Serialization(e)
    })
}

impl ClaimRepository for SqliteClaimRepository {
    fn list(&self) -> Result<Vec<Claim>, StorageError> {
        claim_repo::list_all(&self.db)?
            .iter()
            .map(decode)
            .collect()
    }

    fn get(&self, id: &str) -> Result<Option<Claim>, StorageError> {
        claim_repo::find_by_id(&self.db, id)?
            .as_ref()
            .map(decode)
            .transpose()
    }

    fn save(&self, claim: &Claim) -> Result<(), StorageError> {
        let record = serde_json::to_string(claim)?;
        claim_repo::upsert(
            &self.db,
            &claim.id,
            &record,
            &claim.date.to_rfc3339(),
            &self.clock.now().to_rfc3339(),
        )?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        if claim_repo::delete(&self.db, id)? {
            log::debug!("Deleted claim row {}", id);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SqliteBlobStore {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl SqliteBlobStore {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl BlobStore for SqliteBlobStore {
    fn put(&self, file_id: &str, payload: &str) -> Result<(), StorageError> {
        blob_repo::put(&self.db, file_id, payload, &self.clock.now().to_rfc3339())?;
        Ok(())
    }

    fn get(&self, file_id: &str) -> Result<Option<String>, StorageError> {
        Ok(blob_repo::get(&self.db, file_id)?)
    }

    fn delete(&self, file_id: &str) -> Result<(), StorageError> {
        blob_repo::delete(&self.db, file_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::contract;

    fn repo() -> SqliteClaimRepository {
        SqliteClaimRepository::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_round_trip() {
        contract::round_trip(&repo());
    }

    #[test]
    fn test_save_is_idempotent() {
        contract::save_is_idempotent(&repo());
    }

    #[test]
    fn test_save_replaces_in_place() {
        contract::save_replaces_in_place(&repo());
    }

    #[test]
    fn test_delete_semantics() {
        contract::delete_semantics(&repo());
    }

    #[test]
    fn test_blob_semantics() {
        contract::blob_semantics(&SqliteBlobStore::new(Database::open_in_memory().unwrap()));
    }

    #[test]
    fn test_shared_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.db");
        {
            let db = Database::open(&path).unwrap();
            SqliteClaimRepository::new(db.clone())
                .save(&contract::claim("CLM-1"))
                .unwrap();
            SqliteBlobStore::new(db).put("f1", "data:,").unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert!(SqliteClaimRepository::new(db.clone())
            .get("CLM-1")
            .unwrap()
            .is_some());
        assert_eq!(
            SqliteBlobStore::new(db).get("f1").unwrap().as_deref(),
            Some("data:,")
        );
    }

    #[test]
    fn test_timestamps_come_from_clock() {
        use crate::clock::SteppingClock;
        use chrono::{TimeZone, Utc};

        let at = Utc.with_ymd_and_hms(2026, 5, 4, 12, 30, 0).unwrap();
        let clock: Arc<dyn Clock> = Arc::new(SteppingClock::fixed(at));
        let db = Database::open_in_memory().unwrap();

        SqliteClaimRepository::new(db.clone())
            .with_clock(clock.clone())
            .save(&contract::claim("CLM-1"))
            .unwrap();
        SqliteBlobStore::new(db.clone())
            .with_clock(clock)
            .put("f1", "data:,")
            .unwrap();

        let row = claim_repo::find_by_id(&db, "CLM-1").unwrap().unwrap();
        assert_eq!(row.updated_at, at.to_rfc3339());
        let stored_at: String = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT stored_at FROM media_blobs WHERE file_id = 'f1'",
                    [],
                    |r| r.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(stored_at, at.to_rfc3339());
    }
}
