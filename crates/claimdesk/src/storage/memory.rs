//! Process-local stores. Contents vanish with the process.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{BlobStore, ClaimRepository};
use crate::claim::Claim;
use crate::error::StorageError;

#[derive(Debug, Default)]
pub struct InMemoryClaimRepository {
    claims: RwLock<Vec<Claim>>,
}

impl InMemoryClaimRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClaimRepository for InMemoryClaimRepository {
    fn list(&self) -> Result<Vec<Claim>, StorageError> {
        let claims = self.claims.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(claims.clone())
    }

    fn get(&self, id: &str) -> Result<Option<Claim>, StorageError> {
        let claims = self.claims.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(claims.iter().find(|c| c.id == id).cloned())
    }

    fn save(&self, claim: &Claim) -> Result<(), StorageError> {
        let mut claims = self.claims.write().map_err(|_| StorageError::LockPoisoned)?;
        match claims.iter_mut().find(|c| c.id == claim.id) {
            Some(existing) => *existing = claim.clone(),
            None => claims.push(claim.clone()),
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut claims = self.claims.write().map_err(|_| StorageError::LockPoisoned)?;
        claims.retain(|c| c.id != id);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored payloads.
    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for InMemoryBlobStore {
    fn put(&self, file_id: &str, payload: &str) -> Result<(), StorageError> {
        let mut blobs = self.blobs.write().map_err(|_| StorageError::LockPoisoned)?;
        blobs.insert(file_id.to_string(), payload.to_string());
        Ok(())
    }

    fn get(&self, file_id: &str) -> Result<Option<String>, StorageError> {
        let blobs = self.blobs.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(blobs.get(file_id).cloned())
    }

    fn delete(&self, file_id: &str) -> Result<(), StorageError> {
        let mut blobs = self.blobs.write().map_err(|_| StorageError::LockPoisoned)?;
        blobs.remove(file_id);
        Ok(())
    }
}
