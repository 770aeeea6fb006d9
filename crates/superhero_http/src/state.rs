//! Shared handler state.

use log::error;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use superhero_core::db::{open_db, DbResult};
use superhero_core::{
    LocalAssetStore, ServiceResult, SqliteSuperheroRepository, StoreConfig, SuperheroService,
};

use crate::error::ApiError;

/// Service type built for every request.
pub type RequestService<'a> =
    SuperheroService<SqliteSuperheroRepository<'a>, &'a LocalAssetStore>;

/// One SQLite connection and the local Asset Store, shared by all handlers.
pub struct AppState {
    conn: Mutex<Connection>,
    assets: LocalAssetStore,
}

impl AppState {
    pub fn new(conn: Connection, assets: LocalAssetStore) -> Self {
        Self {
            conn: Mutex::new(conn),
            assets,
        }
    }

    /// Opens (and migrates) the configured database and asset root.
    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        let conn = open_db(&config.db_path)?;
        Ok(Self::new(conn, LocalAssetStore::new(config.asset_root.clone())))
    }

    pub fn assets(&self) -> &LocalAssetStore {
        &self.assets
    }
}

/// Runs one Record Store operation on the blocking pool.
///
/// Requests serialize on the shared connection.
pub async fn with_service<T, F>(state: Arc<AppState>, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: for<'a> FnOnce(&RequestService<'a>) -> ServiceResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let conn = state
            .conn
            .lock()
            .map_err(|_| ApiError::internal("connection mutex poisoned"))?;
        let repo = SqliteSuperheroRepository::try_new(&conn)?;
        let service = SuperheroService::new(repo, &state.assets);
        let result = op(&service);
        result.map_err(ApiError::from)
    })
    .await
    .map_err(|err| {
        error!("event=http_task module=http status=error error_code=join_failed error={err}");
        ApiError::internal(err.to_string())
    })?
}
