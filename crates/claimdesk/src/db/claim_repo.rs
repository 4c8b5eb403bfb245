//! Claim repository: row operations for the `claims` table.
//!
//! Each claim is stored as its JSON record plus an insertion sequence number
//! that fixes its position in listings. Replacing a claim keeps its position.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

/// A raw claim row from the database.
#[derive(Debug, Clone)]
pub struct ClaimRow {
    pub id: String,
    pub seq: i64,
    pub record: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ClaimRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            seq: row.get("seq")?,
            record: row.get("record")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Inserts a claim at the end of the collection, or replaces the record of
/// an existing one in place.
pub fn upsert(
    db: &Database,
    id: &str,
    record: &str,
    created_at: &str,
    updated_at: &str,
) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO claims (id, seq, record, created_at, updated_at)
             VALUES (?1, (SELECT COALESCE(MAX(seq), 0) + 1 FROM claims), ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
               record = excluded.record,
               updated_at = excluded.updated_at",
            params![id, record, created_at, updated_at],
        )?;
        Ok(())
    })
}

/// Finds a claim row by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<ClaimRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM claims WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], ClaimRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Returns every claim row in insertion order.
pub fn list_all(db: &Database) -> Result<Vec<ClaimRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM claims ORDER BY seq ASC")?;
        let rows = stmt
            .query_map([], ClaimRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Deletes a claim row. Returns whether a row was removed.
pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let removed = conn.execute("DELETE FROM claims WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    })
}

/// Counts stored claims.
pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM claims", [], |r| r.get(0))?;
        Ok(count)
    })
}
