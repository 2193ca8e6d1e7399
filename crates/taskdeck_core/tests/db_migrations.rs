use taskdeck_core::db::migrations::{apply_migrations, latest_version};
use taskdeck_core::db::{open_db, open_db_in_memory, DbError};
use tempfile::tempdir;

#[test]
fn fresh_database_reaches_latest_version() {
    let conn = open_db_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
    assert!(latest_version() >= 2);
}

#[test]
fn all_tables_exist_after_migration() {
    let conn = open_db_in_memory().unwrap();

    for table in ["teams", "team_members", "projects", "tasks", "activity_log"] {
        let present: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(present, 1, "table {table} should exist");
    }
}

#[test]
fn reapplying_migrations_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn newer_schema_version_is_rejected() {
    let mut conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
        .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion { db_version, .. } if db_version == latest_version() + 1
    ));
}

#[test]
fn file_database_round_trips_bootstrap() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("taskdeck.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        conn.execute_batch("SELECT count(*) FROM tasks;").unwrap();
    }

    // Reopen: migrations already applied, bootstrap must still succeed.
    let conn = open_db(&path).unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();

    let result = conn.execute(
        "INSERT INTO team_members (uuid, team_uuid, name, role, capacity)
         VALUES ('m-1', 'no-such-team', 'Dana', 'Dev', 2);",
        [],
    );
    assert!(result.is_err());
}
