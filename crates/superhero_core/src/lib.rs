//! Core domain logic for the superhero registry.
//! This crate is the single source of truth for record invariants.

pub mod asset;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use asset::{AssetError, AssetResult, AssetStore, LocalAssetStore, SUPERHEROES_NAMESPACE};
pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::superhero::{RecordScope, Superhero, SuperheroId, SuperheroState};
pub use model::validation::{
    validate_input, PhotoKind, PhotoUpload, SuperheroInput, ValidatedPhoto, ValidatedSuperhero,
    ValidationError, MAX_NAME_CHARS, MAX_PHOTO_BYTES,
};
pub use repo::superhero_repo::{
    RepoError, RepoResult, SqliteSuperheroRepository, SuperheroRepository, SuperheroRow,
};
pub use service::superhero_service::{PhotoContent, ServiceError, ServiceResult, SuperheroService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
