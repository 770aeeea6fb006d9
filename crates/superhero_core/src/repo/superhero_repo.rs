//! Superhero repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide scope-aware CRUD APIs over the `superheroes` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every list/lookup states its tombstone scope explicitly.
//! - Mutations touch exactly one row and report `NotFound` otherwise.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::{latest_version, schema_version, DbError};
use crate::model::superhero::{RecordScope, Superhero, SuperheroId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SUPERHERO_SELECT_SQL: &str = "SELECT
    id,
    real_name,
    hero_name,
    photo_path,
    additional_info,
    created_at,
    updated_at,
    deleted_at
FROM superheroes";

const REQUIRED_COLUMNS: [&str; 8] = [
    "id",
    "real_name",
    "hero_name",
    "photo_path",
    "additional_info",
    "created_at",
    "updated_at",
    "deleted_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for superhero persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No row with this id in the requested scope.
    NotFound(SuperheroId),
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "superhero not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted superhero data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "superhero repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "superhero repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "superhero repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Column values written by `insert` and `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperheroRow {
    pub real_name: String,
    pub hero_name: String,
    pub photo_path: Option<String>,
    pub additional_info: Option<String>,
}

/// Repository interface for superhero rows.
pub trait SuperheroRepository {
    /// Lists rows with `deleted_at IS NULL` in insertion order.
    fn list_active(&self) -> RepoResult<Vec<Superhero>>;
    /// Lists rows with `deleted_at IS NOT NULL` in insertion order.
    fn list_deleted(&self) -> RepoResult<Vec<Superhero>>;
    /// Gets one row by id within `scope`.
    fn find_by_id(&self, id: SuperheroId, scope: RecordScope) -> RepoResult<Option<Superhero>>;
    /// Inserts one row and returns its store-assigned id.
    fn insert(&self, row: &SuperheroRow) -> RepoResult<SuperheroId>;
    /// Replaces all mutable columns of one row regardless of tombstone state.
    fn update(&self, id: SuperheroId, row: &SuperheroRow) -> RepoResult<()>;
    /// Sets (`deleted = true`, Active rows only) or clears (`deleted = false`,
    /// Deleted rows only) the tombstone.
    fn set_deleted_at(&self, id: SuperheroId, deleted: bool) -> RepoResult<()>;
}

/// SQLite-backed superhero repository.
pub struct SqliteSuperheroRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSuperheroRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_superhero_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_list(&self, filter: &str) -> RepoResult<Vec<Superhero>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUPERHERO_SELECT_SQL} WHERE {filter} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut superheroes = Vec::new();

        while let Some(row) = rows.next()? {
            superheroes.push(parse_superhero_row(row)?);
        }

        Ok(superheroes)
    }
}

impl SuperheroRepository for SqliteSuperheroRepository<'_> {
    fn list_active(&self) -> RepoResult<Vec<Superhero>> {
        self.query_list(scope_filter(RecordScope::Active))
    }

    fn list_deleted(&self) -> RepoResult<Vec<Superhero>> {
        self.query_list(scope_filter(RecordScope::Deleted))
    }

    fn find_by_id(&self, id: SuperheroId, scope: RecordScope) -> RepoResult<Option<Superhero>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SUPERHERO_SELECT_SQL}
             WHERE id = ?1
               AND {};",
            scope_filter(scope)
        ))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_superhero_row(row)?));
        }

        Ok(None)
    }

    fn insert(&self, row: &SuperheroRow) -> RepoResult<SuperheroId> {
        self.conn.execute(
            "INSERT INTO superheroes (
                real_name,
                hero_name,
                photo_path,
                additional_info
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                row.real_name.as_str(),
                row.hero_name.as_str(),
                row.photo_path.as_deref(),
                row.additional_info.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, id: SuperheroId, row: &SuperheroRow) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE superheroes
             SET
                real_name = ?1,
                hero_name = ?2,
                photo_path = ?3,
                additional_info = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                row.real_name.as_str(),
                row.hero_name.as_str(),
                row.photo_path.as_deref(),
                row.additional_info.as_deref(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn set_deleted_at(&self, id: SuperheroId, deleted: bool) -> RepoResult<()> {
        let sql = if deleted {
            "UPDATE superheroes
             SET
                deleted_at = (strftime('%s', 'now') * 1000),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND deleted_at IS NULL;"
        } else {
            "UPDATE superheroes
             SET
                deleted_at = NULL,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND deleted_at IS NOT NULL;"
        };

        let changed = self.conn.execute(sql, [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn scope_filter(scope: RecordScope) -> &'static str {
    match scope {
        RecordScope::Active => "deleted_at IS NULL",
        RecordScope::Deleted => "deleted_at IS NOT NULL",
        RecordScope::Any => "1 = 1",
    }
}

fn parse_superhero_row(row: &Row<'_>) -> RepoResult<Superhero> {
    let id: SuperheroId = row.get("id")?;

    let real_name: String = row.get("real_name")?;
    if real_name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty real_name for superhero {id}"
        )));
    }

    let hero_name: String = row.get("hero_name")?;
    if hero_name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty hero_name for superhero {id}"
        )));
    }

    Ok(Superhero {
        id,
        real_name,
        hero_name,
        photo_path: row.get("photo_path")?,
        additional_info: row.get("additional_info")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        deleted_at: row.get("deleted_at")?,
    })
}

fn ensure_superhero_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "superheroes")? {
        return Err(RepoError::MissingRequiredTable("superheroes"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "superheroes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "superheroes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
