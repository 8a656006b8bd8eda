use std::fs;
use std::path::Path;

use runstrap_core::errors::{ErrorInfo, RunError};
use rusqlite::Connection;
use tracing::debug;

/// Creates or opens the SQLite database and applies the schema script.
///
/// The script runs verbatim as one batch with foreign keys enforced. There is
/// no "already initialized" check: re-running against an existing database
/// re-applies every statement, so the script itself must be idempotent.
pub fn init_db(db_path: &Path, schema_path: &Path) -> Result<(), RunError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            RunError::Io(
                ErrorInfo::new("db-mkdir", "failed to create database directory")
                    .with_context("path", parent.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
    }
    let script = fs::read_to_string(schema_path).map_err(|err| {
        RunError::Database(
            ErrorInfo::new("schema-read", "failed to read schema script")
                .with_context("path", schema_path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;

    let conn = Connection::open(db_path).map_err(|err| {
        RunError::Database(
            ErrorInfo::new("db-open", "failed to open database")
                .with_context("path", db_path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| {
            RunError::Database(
                ErrorInfo::new("db-pragma", "failed to enable foreign keys")
                    .with_hint(err.to_string()),
            )
        })?;
    conn.execute_batch(&script).map_err(|err| {
        RunError::Database(
            ErrorInfo::new("schema-apply", "failed to apply schema script")
                .with_context("schema", schema_path.display().to_string())
                .with_context("path", db_path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    // A script may open a transaction without closing it.
    if !conn.is_autocommit() {
        conn.execute_batch("COMMIT;").map_err(|err| {
            RunError::Database(
                ErrorInfo::new("schema-apply", "failed to commit schema script")
                    .with_context("path", db_path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
    }
    conn.close().map_err(|(_, err)| {
        RunError::Database(
            ErrorInfo::new("db-close", "failed to close database")
                .with_context("path", db_path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    debug!(path = %db_path.display(), schema = %schema_path.display(), "schema applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(db_path: &Path) -> Vec<String> {
        let conn = Connection::open(db_path).expect("open");
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .expect("prepare");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .expect("query");
        rows.collect::<Result<Vec<_>, _>>().expect("rows")
    }

    #[test]
    fn guarded_schema_applies_twice() {
        let dir = tempfile::tempdir().expect("tempdir");
        let schema = dir.path().join("schema.sql");
        fs::write(&schema, "CREATE TABLE IF NOT EXISTS foo(id INTEGER PRIMARY KEY);").expect("write");
        let db = dir.path().join("nested/data/runs.sqlite");
        init_db(&db, &schema).expect("first");
        init_db(&db, &schema).expect("second");
        assert_eq!(table_names(&db), ["foo"]);
    }

    #[test]
    fn unguarded_schema_fails_on_rerun() {
        let dir = tempfile::tempdir().expect("tempdir");
        let schema = dir.path().join("schema.sql");
        fs::write(&schema, "CREATE TABLE foo(id INTEGER PRIMARY KEY);").expect("write");
        let db = dir.path().join("runs.sqlite");
        init_db(&db, &schema).expect("first");
        let err = init_db(&db, &schema).unwrap_err();
        assert_eq!(err.code(), "schema-apply");
    }

    #[test]
    fn foreign_keys_are_enforced_while_applying() {
        let dir = tempfile::tempdir().expect("tempdir");
        let schema = dir.path().join("schema.sql");
        fs::write(
            &schema,
            "CREATE TABLE parent(id INTEGER PRIMARY KEY);
             CREATE TABLE child(id INTEGER PRIMARY KEY, parent_id INTEGER NOT NULL REFERENCES parent(id));
             INSERT INTO child(id, parent_id) VALUES (1, 42);",
        )
        .expect("write");
        let err = init_db(&dir.path().join("runs.sqlite"), &schema).unwrap_err();
        assert_eq!(err.code(), "schema-apply");
        assert!(err
            .info()
            .hint
            .as_deref()
            .unwrap_or_default()
            .contains("FOREIGN KEY"));
    }

    #[test]
    fn open_transaction_is_committed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let schema = dir.path().join("schema.sql");
        fs::write(
            &schema,
            "BEGIN; CREATE TABLE IF NOT EXISTS pending(id INTEGER PRIMARY KEY);",
        )
        .expect("write");
        let db = dir.path().join("runs.sqlite");
        init_db(&db, &schema).expect("init");
        assert_eq!(table_names(&db), ["pending"]);
    }

    #[test]
    fn missing_schema_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = init_db(&dir.path().join("runs.sqlite"), &dir.path().join("absent.sql"))
            .unwrap_err();
        assert!(matches!(err, RunError::Database(_)));
        assert_eq!(err.code(), "schema-read");
    }
}
