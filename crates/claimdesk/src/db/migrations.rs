//! Schema versioning for the claims database.
//!
//! Applied versions are recorded in `_migrations`. Each pending step runs in
//! its own transaction together with its bookkeeping row.

use rusqlite::{params, Connection};

use super::error::DatabaseError;

/// (version, name, sql), ascending by version.
const STEPS: &[(u32, &str, &str)] = &[
    (1, "create_claims", include_str!("sql/001_create_claims.sql")),
    (2, "create_media_blobs", include_str!("sql/002_create_media_blobs.sql")),
];

pub fn latest_version() -> u32 {
    STEPS.last().map(|(version, _, _)| *version).unwrap_or(0)
}

/// Highest applied version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> Result<u32, DatabaseError> {
    Ok(conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |row| row.get(0),
    )?)
}

/// Brings the schema up to [`latest_version`].
pub fn run_all(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current = current_version(conn)?;
    let supported = latest_version();
    if current > supported {
        return Err(DatabaseError::UnsupportedSchema {
            found: current,
            supported,
        });
    }

    for &(version, name, sql) in STEPS.iter().filter(|(v, _, _)| *v > current) {
        log::info!("Applying schema migration {} ({})", version, name);

        let failed = |e: rusqlite::Error| DatabaseError::Migration {
            version,
            name,
            reason: e.to_string(),
        };

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql).map_err(failed)?;
        tx.execute(
            "INSERT INTO _migrations (version, name) VALUES (?1, ?2)",
            params![version, name],
        )
        .map_err(failed)?;
        tx.commit()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, table: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get::<_, u32>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn test_fresh_database_reaches_latest() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();

        assert_eq!(current_version(&conn).unwrap(), latest_version());
        assert!(table_exists(&conn, "claims"));
        assert!(table_exists(&conn, "media_blobs"));
    }

    #[test]
    fn test_rerun_is_noop() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();
        run_all(&conn).unwrap();

        let rows: u32 = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows as usize, STEPS.len());
    }

    #[test]
    fn test_resumes_from_partial_schema() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE _migrations (version INTEGER PRIMARY KEY, name TEXT NOT NULL,
                 applied_at TEXT NOT NULL DEFAULT (datetime('now')));",
        )
        .unwrap();
        conn.execute_batch(STEPS[0].2).unwrap();
        conn.execute(
            "INSERT INTO _migrations (version, name) VALUES (1, 'create_claims')",
            [],
        )
        .unwrap();
        assert!(!table_exists(&conn, "media_blobs"));

        run_all(&conn).unwrap();
        assert!(table_exists(&conn, "media_blobs"));
    }

    #[test]
    fn test_newer_schema_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();
        conn.execute(
            "INSERT INTO _migrations (version, name) VALUES (?1, 'from_the_future')",
            [latest_version() + 1],
        )
        .unwrap();

        match run_all(&conn) {
            Err(DatabaseError::UnsupportedSchema { found, supported }) => {
                assert_eq!(found, latest_version() + 1);
                assert_eq!(supported, latest_version());
            }
            other => panic!("expected unsupported schema, got {:?}", other),
        }
    }

    #[test]
    fn test_claim_seq_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();

        let insert = "INSERT INTO claims (id, seq, record, created_at, updated_at)
                      VALUES (?1, 1, '{}', 'now', 'now')";
        conn.execute(insert, ["a"]).unwrap();
        assert!(conn.execute(insert, ["b"]).is_err());
    }
}
