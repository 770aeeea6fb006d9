//! Versioned schema scripts for the `superheroes` table.
//!
//! Scripts are listed in ascending version order. An upgrade runs every
//! script above the stored version inside a single transaction, so a
//! failing script leaves the file at its previous version.

use super::{schema_version, DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: [Migration; 2] = [
    Migration {
        version: 1,
        name: "superheroes",
        sql: include_str!("0001_superheroes.sql"),
    },
    Migration {
        version: 2,
        name: "deleted_at_index",
        sql: include_str!("0002_deleted_at_index.sql"),
    },
];

/// Versions before and after an upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub from: u32,
    pub to: u32,
}

impl MigrationOutcome {
    /// Number of scripts that ran.
    pub fn applied(&self) -> u32 {
        self.to - self.from
    }
}

/// Highest schema version this build can produce.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Upgrades `conn` to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the stored version is newer.
/// - `Migration` when a script fails; nothing is committed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationOutcome> {
    upgrade(conn, &MIGRATIONS)
}

fn upgrade(conn: &mut Connection, migrations: &[Migration]) -> DbResult<MigrationOutcome> {
    let from = schema_version(conn)?;
    let supported = migrations.last().map_or(0, |migration| migration.version);
    if from > supported {
        return Err(DbError::UnsupportedSchemaVersion {
            found: from,
            supported,
        });
    }

    let pending: Vec<&Migration> = migrations
        .iter()
        .filter(|migration| migration.version > from)
        .collect();
    if pending.is_empty() {
        return Ok(MigrationOutcome { from, to: from });
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        debug!(
            "event=db_migrate module=db status=start version={} name={}",
            migration.version, migration.name
        );
        tx.execute_batch(migration.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", migration.version))
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
    }
    tx.commit()?;

    let outcome = MigrationOutcome {
        from,
        to: supported,
    };
    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} applied={}",
        outcome.from,
        outcome.to,
        outcome.applied()
    );
    Ok(outcome)
}
