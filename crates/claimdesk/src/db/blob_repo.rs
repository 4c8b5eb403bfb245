//! Media blob repository: payload storage in the `media_blobs` table.

use rusqlite::{params, OptionalExtension};

use super::{Database, DatabaseError};

/// Stores a payload, overwriting any existing one for the same file id.
pub fn put(db: &Database, file_id: &str, payload: &str, stored_at: &str) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO media_blobs (file_id, payload, stored_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(file_id) DO UPDATE SET
               payload = excluded.payload,
               stored_at = excluded.stored_at",
            params![file_id, payload, stored_at],
        )?;
        Ok(())
    })
}

/// Fetches a payload by file id.
pub fn get(db: &Database, file_id: &str) -> Result<Option<String>, DatabaseError> {
    db.with_conn(|conn| {
        let payload = conn
            .query_row(
                "SELECT payload FROM media_blobs WHERE file_id = ?1",
                params![file_id],
                |r| r.get(0),
            )
            .optional()?;
        Ok(payload)
    })
}

/// Removes a payload. Missing ids are ignored.
pub fn delete(db: &Database, file_id: &str) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute("DELETE FROM media_blobs WHERE file_id = ?1", params![file_id])?;
        Ok(())
    })
}

/// Counts stored payloads.
pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM media_blobs", [], |r| r.get(0))?;
        Ok(count)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AT: &str = "2026-01-01T00:00:00Z";

    #[test]
    fn test_put_get_delete() {
        let db = Database::open_in_memory().unwrap();
        put(&db, "f1", "data:image/jpeg;base64,AAAA", AT).unwrap();
        assert_eq!(
            get(&db, "f1").unwrap().as_deref(),
            Some("data:image/jpeg;base64,AAAA")
        );

        delete(&db, "f1").unwrap();
        assert!(get(&db, "f1").unwrap().is_none());
        delete(&db, "f1").unwrap();
    }

    #[test]
    fn test_put_overwrites() {
        let db = Database::open_in_memory().unwrap();
        put(&db, "f1", "first", AT).unwrap();
        put(&db, "f1", "second", AT).unwrap();
        assert_eq!(get(&db, "f1").unwrap().as_deref(), Some("second"));
        assert_eq!(count(&db).unwrap(), 1);
    }
}
