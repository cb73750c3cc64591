//! Database schema migrations for choreio.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const CURRENT_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Current schema version, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version, assuming 0");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: households, rooms, chores and their completion history.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            role        TEXT NOT NULL DEFAULT 'member',
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS property (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS room (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            property_id INTEGER NOT NULL REFERENCES property(id) ON DELETE CASCADE,
            name        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS chore (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            room_id         INTEGER NOT NULL REFERENCES room(id) ON DELETE CASCADE,
            name            TEXT NOT NULL,
            frequency       INTEGER NOT NULL CHECK (frequency >= 1),
            frequency_unit  TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS chore_history (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            chore_id      INTEGER NOT NULL REFERENCES chore(id) ON DELETE CASCADE,
            user_id       TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            completed_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS chore_completed_at_idx
            ON chore_history(chore_id, completed_at);

        CREATE TABLE IF NOT EXISTS user_to_property (
            user_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            property_id  INTEGER NOT NULL REFERENCES property(id) ON DELETE CASCADE,
            created_at   TEXT NOT NULL,
            PRIMARY KEY (user_id, property_id)
        );

        CREATE TABLE IF NOT EXISTS invite (
            id                  TEXT PRIMARY KEY,
            property_id         INTEGER NOT NULL REFERENCES property(id) ON DELETE CASCADE,
            inviting_user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            invited_user_email  TEXT NOT NULL,
            created_at          TEXT NOT NULL
        );",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()?;
    Ok(())
}

/// Migration v2: floor plans.
///
/// Adds:
/// - property.aspect_ratio: width / height of the drawn plan
/// - room.points: JSON array of normalized `{x, y}` points
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "ALTER TABLE property ADD COLUMN aspect_ratio REAL;
         ALTER TABLE room ADD COLUMN points TEXT NOT NULL DEFAULT '[]';",
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_names(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("SELECT name FROM pragma_table_info('{table}')"))
            .unwrap();
        stmt.query_map([], |row| row.get::<_, String>(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        assert_eq!(schema_version(&conn), CURRENT_VERSION);
        assert!(column_names(&conn, "property").contains(&"aspect_ratio".to_string()));
        assert!(column_names(&conn, "room").contains(&"points".to_string()));
        assert!(column_names(&conn, "chore_history").contains(&"completed_at".to_string()));
    }

    #[test]
    fn test_migrate_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(schema_version(&conn), CURRENT_VERSION);
    }

    #[test]
    fn test_migrate_v1_database_keeps_rows() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        conn.execute(
            "INSERT INTO property (name, created_at) VALUES ('Flat', '2025-01-01T00:00:00.000Z')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO room (property_id, name, created_at) VALUES (1, 'Kitchen', '2025-01-01T00:00:00.000Z')",
            [],
        )
        .unwrap();

        migrate(&conn).unwrap();

        let points: String = conn
            .query_row("SELECT points FROM room WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(points, "[]");
        let aspect: Option<f64> = conn
            .query_row("SELECT aspect_ratio FROM property WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(aspect, None);
    }

    #[test]
    fn test_chore_frequency_must_be_positive() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO property (name, created_at) VALUES ('Flat', 'x');
             INSERT INTO room (property_id, name, created_at) VALUES (1, 'Bath', 'x');",
        )
        .unwrap();
        let res = conn.execute(
            "INSERT INTO chore (room_id, name, frequency, frequency_unit, created_at, updated_at)
             VALUES (1, 'Mirror', 0, 'weeks', 'x', 'x')",
            [],
        );
        assert!(res.is_err());
    }
}
