//! Local filesystem Asset Store.

use super::{ensure_relative_path, AssetError, AssetResult, AssetStore};
use crate::model::validation::ValidatedPhoto;
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Asset Store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> AssetResult<PathBuf> {
        let relative = ensure_relative_path(path)?;
        Ok(self.root.join(relative))
    }
}

impl AssetStore for LocalAssetStore {
    fn save(&self, photo: &ValidatedPhoto, namespace: &str) -> AssetResult<String> {
        let namespace_dir = self.full_path(namespace)?;
        fs::create_dir_all(&namespace_dir).map_err(|source| AssetError::Io {
            path: namespace.to_string(),
            source,
        })?;

        let relative = format!(
            "{namespace}/{}.{}",
            Uuid::new_v4().simple(),
            photo.kind.extension()
        );
        let full_path = self.full_path(&relative)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .map_err(|source| AssetError::Io {
                path: relative.clone(),
                source,
            })?;
        file.write_all(&photo.bytes)
            .and_then(|()| file.sync_all())
            .map_err(|source| AssetError::Io {
                path: relative.clone(),
                source,
            })?;

        info!(
            "event=asset_save module=asset status=ok namespace={} bytes={}",
            namespace,
            photo.bytes.len()
        );
        Ok(relative)
    }

    fn exists(&self, path: &str) -> AssetResult<bool> {
        Ok(self.full_path(path)?.is_file())
    }

    fn delete(&self, path: &str) -> AssetResult<()> {
        let full_path = self.full_path(path)?;
        match fs::remove_file(&full_path) {
            Ok(()) => {
                info!("event=asset_delete module=asset status=ok");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("event=asset_delete module=asset status=skipped reason=missing");
                Ok(())
            }
            Err(source) => Err(AssetError::Io {
                path: path.to_string(),
                source,
            }),
        }
    }

    fn read(&self, path: &str) -> AssetResult<Vec<u8>> {
        let full_path = self.full_path(path)?;
        fs::read(&full_path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                AssetError::NotFound(path.to_string())
            } else {
                AssetError::Io {
                    path: path.to_string(),
                    source,
                }
            }
        })
    }
}
