//! Snapshot database schema

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::core_api::{CoreError, CoreErrorCode};

pub const SCHEMA_VERSION: i32 = 1;

pub fn init_schema(conn: &Connection) -> Result<(), CoreError> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("creating snapshot schema v{}", SCHEMA_VERSION);
        conn.execute_batch(SNAPSHOT_SCHEMA)
            .map_err(|e| CoreError::persistence("failed to create snapshot tables", e))?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version > SCHEMA_VERSION {
        return Err(CoreError::new(
            CoreErrorCode::Persistence,
            format!(
                "snapshot database schema v{current_version} is newer than supported v{SCHEMA_VERSION}"
            ),
        ));
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32, CoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )
    .map_err(|e| CoreError::persistence("failed to create schema_version table", e))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()
        .map_err(|e| CoreError::persistence("failed to read schema_version", e))?;
    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), CoreError> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| CoreError::persistence("failed to clear schema_version", e))?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
        .map_err(|e| CoreError::persistence("failed to set schema_version", e))?;
    Ok(())
}

// AUTOINCREMENT keeps save ids strictly increasing, so id order is upload order.
const SNAPSHOT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS saves (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uploaded_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS fish_snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    save_id INTEGER NOT NULL REFERENCES saves(id),
    fish_id TEXT NOT NULL,
    fish_name TEXT NOT NULL,
    caught INTEGER NOT NULL,
    UNIQUE (save_id, fish_id)
);

CREATE TABLE IF NOT EXISTS recipe_snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    save_id INTEGER NOT NULL REFERENCES saves(id),
    recipe_name TEXT NOT NULL,
    learned INTEGER NOT NULL,
    cooked INTEGER NOT NULL,
    UNIQUE (save_id, recipe_name)
);

CREATE INDEX IF NOT EXISTS idx_fish_snapshots_save ON fish_snapshots(save_id);
CREATE INDEX IF NOT EXISTS idx_recipe_snapshots_save ON recipe_snapshots(save_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_reports_version_zero_then_current() {
        let conn = Connection::open_in_memory().expect("connection");
        assert_eq!(get_schema_version(&conn).expect("version"), 0);
        init_schema(&conn).expect("init");
        assert_eq!(get_schema_version(&conn).expect("version"), SCHEMA_VERSION);
    }

    #[test]
    fn unreadable_version_is_an_error_not_a_fresh_schema() {
        let conn = Connection::open_in_memory().expect("connection");
        conn.execute_batch("CREATE TABLE schema_version (version TEXT NOT NULL); INSERT INTO schema_version VALUES ('garbage');")
            .expect("corrupt version table");

        let err = init_schema(&conn).expect_err("corrupt version must fail");
        assert_eq!(err.code, CoreErrorCode::Persistence);
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'saves'",
                [],
                |row| row.get(0),
            )
            .expect("table query");
        assert_eq!(tables, 0);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let conn = Connection::open_in_memory().expect("connection");
        init_schema(&conn).expect("init");
        set_schema_version(&conn, SCHEMA_VERSION + 1).expect("bump version");
        let err = init_schema(&conn).expect_err("newer schema must fail");
        assert_eq!(err.code, CoreErrorCode::Persistence);
    }
}
