//! # Schema Migrations
//!
//! Ordered list of schema steps, tracked with `PRAGMA user_version`.
//!
//! Each step runs inside a transaction together with the version bump, so a
//! failed step leaves the database at the previous version. Statements use
//! `IF NOT EXISTS` so replaying a step against an existing schema is harmless.

use log::{debug, info};
use rusqlite::Connection;

use crate::storage::StoreError;

/// A single schema step.
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub statements: &'static [&'static str],
}

/// Creates the `chats` table and its two indexes.
pub const CHATS_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS chats (
        encryption_applied INT,
        encryption_cipher_text TEXT,
        parent_id TEXT,
        id TEXT PRIMARY KEY,
        msg TEXT,
        markup_language INT,
        created_time INT,
        deleted_time INT,
        updated_time INT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS chats_parent_id ON chats (parent_id)",
    "CREATE INDEX IF NOT EXISTS chats_created_time ON chats (created_time)",
];

/// All migrations, in application order.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_chats",
    statements: CHATS_STATEMENTS,
}];

/// Latest schema version known to this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

/// Current `user_version` of the database.
pub fn current_version(conn: &Connection) -> Result<u32, StoreError> {
    let version: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

/// Apply every pending migration. Returns the resulting schema version.
pub fn migrate(conn: &mut Connection) -> Result<u32, StoreError> {
    let mut version = current_version(conn)?;
    debug!("Schema at version {}", version);

    for migration in MIGRATIONS.iter().filter(move |m| m.version > version) {
        let tx = conn.transaction()?;
        for sql in migration.statements {
            tx.execute_batch(sql)?;
        }
        tx.pragma_update(None, "user_version", migration.version)?;
        tx.commit()?;

        info!(
            "Applied migration {} ({})",
            migration.version, migration.name
        );
        version = migration.version;
    }

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .unwrap()
    }

    fn index_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'chats' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_migrate_fresh_database() {
        let mut conn = Connection::open_in_memory().unwrap();
        let version = migrate(&mut conn).unwrap();

        assert_eq!(version, latest_version());
        assert!(table_exists(&conn, "chats"));
        assert_eq!(
            index_names(&conn),
            vec!["chats_created_time".to_string(), "chats_parent_id".to_string()]
        );
    }

    #[test]
    fn test_migrate_twice_is_noop() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        let version = migrate(&mut conn).unwrap();
        assert_eq!(version, latest_version());
        assert_eq!(current_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn test_chat_statements_replay_safely() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO chats (id, msg, created_time) VALUES ('keep', 'hi', 1)",
            [],
        )
        .unwrap();

        // Forget the version and replay everything over the existing table
        conn.pragma_update(None, "user_version", 0).unwrap();
        migrate(&mut conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM chats", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_chats_table_has_expected_columns() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('chats')").unwrap();
        let mut columns: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        columns.sort();

        assert_eq!(
            columns,
            vec![
                "created_time",
                "deleted_time",
                "encryption_applied",
                "encryption_cipher_text",
                "id",
                "markup_language",
                "msg",
                "parent_id",
                "updated_time",
            ]
        );
    }
}
