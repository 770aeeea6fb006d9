use rusqlite::Connection;
use superhero_core::db::latest_version;
use superhero_core::db::open_db_in_memory;
use superhero_core::{
    RecordScope, RepoError, SqliteSuperheroRepository, SuperheroRepository, SuperheroRow,
};

fn row(real_name: &str, hero_name: &str) -> SuperheroRow {
    SuperheroRow {
        real_name: real_name.to_string(),
        hero_name: hero_name.to_string(),
        photo_path: None,
        additional_info: None,
    }
}

#[test]
fn insert_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSuperheroRepository::try_new(&conn).unwrap();

    let mut new_row = row("Natasha Romanoff", "Black Widow");
    new_row.additional_info = Some("Former KGB".to_string());
    new_row.photo_path = Some("superheroes/widow.png".to_string());
    let id = repo.insert(&new_row).unwrap();

    let loaded = repo.find_by_id(id, RecordScope::Active).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.real_name, "Natasha Romanoff");
    assert_eq!(loaded.hero_name, "Black Widow");
    assert_eq!(loaded.additional_info.as_deref(), Some("Former KGB"));
    assert_eq!(loaded.photo_path.as_deref(), Some("superheroes/widow.png"));
    assert!(loaded.is_active());
}

#[test]
fn ids_are_never_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSuperheroRepository::try_new(&conn).unwrap();

    let first = repo.insert(&row("A", "One")).unwrap();
    let second = repo.insert(&row("B", "Two")).unwrap();
    conn.execute("DELETE FROM superheroes WHERE id = ?1;", [second])
        .unwrap();
    let third = repo.insert(&row("C", "Three")).unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 2);
    assert_eq!(third, 3);
}

#[test]
fn lists_are_scoped_and_ordered_by_insertion() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSuperheroRepository::try_new(&conn).unwrap();

    let a = repo.insert(&row("A", "Alpha")).unwrap();
    let b = repo.insert(&row("B", "Beta")).unwrap();
    let c = repo.insert(&row("C", "Gamma")).unwrap();
    repo.set_deleted_at(b, true).unwrap();

    let active: Vec<_> = repo.list_active().unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(active, vec![a, c]);

    let deleted = repo.list_deleted().unwrap();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].id, b);
    assert!(deleted[0].deleted_at.is_some());
}

#[test]
fn find_by_id_honors_scope() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSuperheroRepository::try_new(&conn).unwrap();

    let id = repo.insert(&row("Wade Wilson", "Deadpool")).unwrap();
    assert!(repo.find_by_id(id, RecordScope::Deleted).unwrap().is_none());

    repo.set_deleted_at(id, true).unwrap();
    assert!(repo.find_by_id(id, RecordScope::Active).unwrap().is_none());
    assert!(repo.find_by_id(id, RecordScope::Deleted).unwrap().is_some());
    assert!(repo.find_by_id(id, RecordScope::Any).unwrap().is_some());
    assert!(repo.find_by_id(id + 100, RecordScope::Any).unwrap().is_none());
}

#[test]
fn soft_delete_requires_active_row_and_restore_requires_deleted_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSuperheroRepository::try_new(&conn).unwrap();

    let id = repo.insert(&row("Logan", "Wolverine")).unwrap();

    let err = repo.set_deleted_at(id, false).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(found) if found == id));

    repo.set_deleted_at(id, true).unwrap();
    let err = repo.set_deleted_at(id, true).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(found) if found == id));

    repo.set_deleted_at(id, false).unwrap();
    let restored = repo.find_by_id(id, RecordScope::Active).unwrap().unwrap();
    assert_eq!(restored.deleted_at, None);
}

#[test]
fn update_applies_to_rows_in_any_state() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSuperheroRepository::try_new(&conn).unwrap();

    let id = repo.insert(&row("Scott Summers", "Cyclops")).unwrap();
    repo.set_deleted_at(id, true).unwrap();

    let mut changed = row("Scott Summers", "Slym");
    changed.additional_info = Some("renamed".to_string());
    repo.update(id, &changed).unwrap();

    let loaded = repo.find_by_id(id, RecordScope::Deleted).unwrap().unwrap();
    assert_eq!(loaded.hero_name, "Slym");
    assert_eq!(loaded.additional_info.as_deref(), Some("renamed"));
    assert!(loaded.is_deleted());
}

#[test]
fn update_refreshes_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSuperheroRepository::try_new(&conn).unwrap();

    let id = repo.insert(&row("Steve Rogers", "Captain America")).unwrap();
    conn.execute("UPDATE superheroes SET updated_at = 1000, created_at = 1000;", [])
        .unwrap();

    repo.update(id, &row("Steve Rogers", "Nomad")).unwrap();
    let loaded = repo.find_by_id(id, RecordScope::Active).unwrap().unwrap();
    assert_eq!(loaded.created_at, 1000);
    assert!(loaded.updated_at > 1000);
}

#[test]
fn update_missing_row_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSuperheroRepository::try_new(&conn).unwrap();

    let err = repo.update(42, &row("Nobody", "Nothing")).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(42)));
}

#[test]
fn invalid_persisted_row_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSuperheroRepository::try_new(&conn).unwrap();

    conn.execute(
        "INSERT INTO superheroes (real_name, hero_name) VALUES ('', 'Ghost');",
        [],
    )
    .unwrap();

    let err = repo.list_active().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteSuperheroRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_superheroes_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteSuperheroRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("superheroes"))
    ));
}

#[test]
fn repository_rejects_connection_missing_deleted_at_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE superheroes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            real_name TEXT NOT NULL,
            hero_name TEXT NOT NULL,
            photo_path TEXT NULL,
            additional_info TEXT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteSuperheroRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "superheroes",
            column: "deleted_at"
        })
    ));
}
