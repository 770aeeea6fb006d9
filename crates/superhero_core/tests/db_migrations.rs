use rusqlite::Connection;
use superhero_core::db::{latest_version, open_db, open_db_in_memory, schema_version, DbError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "superheroes");
    assert_index_exists(&conn, "idx_superheroes_deleted_at");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("superheroes.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO superheroes (real_name, hero_name) VALUES ('Bruce Wayne', 'Batman');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM superheroes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn insert_fills_timestamps_and_leaves_record_active() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO superheroes (real_name, hero_name) VALUES ('Clark Kent', 'Superman');",
        [],
    )
    .unwrap();

    let (created_at, updated_at, deleted_at): (i64, i64, Option<i64>) = conn
        .query_row(
            "SELECT created_at, updated_at, deleted_at FROM superheroes;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert!(created_at > 0);
    assert_eq!(created_at, updated_at);
    assert_eq!(deleted_at, None);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert!(
        sqlite_object_exists(conn, "table", table_name),
        "table {table_name} does not exist"
    );
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert!(
        sqlite_object_exists(conn, "index", index_name),
        "index {index_name} does not exist"
    );
}

fn sqlite_object_exists(conn: &Connection, kind: &str, name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}
