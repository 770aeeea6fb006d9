//! Asset Store contracts for uploaded photo binaries.
//!
//! # Responsibility
//! - Define the storage contract the record service relies on.
//! - Keep file-system details out of service orchestration.
//!
//! # Invariants
//! - Paths returned by `save` are relative, namespaced and stable.
//! - `delete` on a missing path is a no-op, not an error.

use crate::model::validation::ValidatedPhoto;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Component, Path};

mod local;

pub use local::LocalAssetStore;

/// Namespace under which superhero photos are stored.
pub const SUPERHEROES_NAMESPACE: &str = "superheroes";

pub type AssetResult<T> = Result<T, AssetError>;

/// Errors raised by Asset Store implementations.
#[derive(Debug)]
pub enum AssetError {
    /// Underlying file-system failure for `path`.
    Io {
        path: String,
        source: std::io::Error,
    },
    /// No stored asset at `path`.
    NotFound(String),
    /// Path is absolute, empty or escapes the store root.
    InvalidPath(String),
}

impl Display for AssetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "asset i/o failure at `{path}`: {source}"),
            Self::NotFound(path) => write!(f, "asset not found: {path}"),
            Self::InvalidPath(path) => write!(f, "invalid asset path: `{path}`"),
        }
    }
}

impl Error for AssetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NotFound(_) => None,
            Self::InvalidPath(_) => None,
        }
    }
}

/// File storage collaborator for uploaded photos.
pub trait AssetStore {
    /// Persists `photo` under a generated unique name inside `namespace`.
    ///
    /// Returns the relative path usable for later reads and deletion.
    fn save(&self, photo: &ValidatedPhoto, namespace: &str) -> AssetResult<String>;
    /// Returns whether an asset is stored at `path`.
    fn exists(&self, path: &str) -> AssetResult<bool>;
    /// Removes the asset at `path` if present.
    fn delete(&self, path: &str) -> AssetResult<()>;
    /// Reads the stored bytes at `path`.
    fn read(&self, path: &str) -> AssetResult<Vec<u8>>;
}

impl<T: AssetStore + ?Sized> AssetStore for &T {
    fn save(&self, photo: &ValidatedPhoto, namespace: &str) -> AssetResult<String> {
        (**self).save(photo, namespace)
    }

    fn exists(&self, path: &str) -> AssetResult<bool> {
        (**self).exists(path)
    }

    fn delete(&self, path: &str) -> AssetResult<()> {
        (**self).delete(path)
    }

    fn read(&self, path: &str) -> AssetResult<Vec<u8>> {
        (**self).read(path)
    }
}

/// Rejects paths that are empty, absolute or contain non-normal components.
pub(crate) fn ensure_relative_path(path: &str) -> AssetResult<&Path> {
    let candidate = Path::new(path);
    let is_safe = !path.trim().is_empty()
        && candidate
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if !is_safe {
        return Err(AssetError::InvalidPath(path.to_string()));
    }
    Ok(candidate)
}
