//! Claim repository persisted as a single JSON array.
//!
//! Every save or delete rewrites the whole collection. The rewrite goes
//! through [`write_atomic`] so a failed write leaves the previous file
//! intact instead of truncating unrelated records.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::filesystem::write_atomic;
use super::ClaimRepository;
use crate::claim::Claim;
use crate::error::StorageError;

/// File name of the collection inside the data directory.
pub const CLAIMS_FILE_NAME: &str = "claims.json";

#[derive(Debug)]
pub struct JsonFileClaimRepository {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileClaimRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Claim>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::ReadFile {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, claims: &[Claim]) -> Result<(), StorageError> {
        let content = serde_json::to_vec_pretty(claims)?;
        write_atomic(&self.path, &content)?;
        log::debug!(
            "Wrote {} claims to {}",
            claims.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl ClaimRepository for JsonFileClaimRepository {
    fn list(&self) -> Result<Vec<Claim>, StorageError> {
        self.read_all()
    }

    fn get(&self, id: &str) -> Result<Option<Claim>, StorageError> {
        Ok(self.read_all()?.into_iter().find(|c| c.id == id))
    }

    fn save(&self, claim: &Claim) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::LockPoisoned)?;

        let mut claims = self.read_all()?;
        match claims.iter_mut().find(|c| c.id == claim.id) {
            Some(existing) => *existing = claim.clone(),
            None => claims.push(claim.clone()),
        }
        self.write_all(&claims)
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::LockPoisoned)?;

        let mut claims = self.read_all()?;
        let before = claims.len();
        claims.retain(|c| c.id != id);
        if claims.len() == before {
            return Ok(());
        }
        self.write_all(&claims)
    }
}
