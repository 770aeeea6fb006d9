//! Superhero use-case service (the Record Store).
//!
//! # Responsibility
//! - Provide list/create/get/edit/update/soft-delete/list-deleted/restore.
//! - Coordinate photo persistence with the Asset Store.
//!
//! # Invariants
//! - Validation runs before any file write; failed validation never writes.
//! - `get` and `soft_delete` only see Active rows; `restore` only Deleted
//!   rows; `update` and `edit` see rows in any state.
//! - A stored `photo_path` referenced an existing asset when it was set.
//! - Old-photo cleanup during `update` is best-effort and never fails the call.

use crate::asset::{AssetError, AssetStore, SUPERHEROES_NAMESPACE};
use crate::model::superhero::{RecordScope, Superhero, SuperheroId};
use crate::model::validation::{
    validate_input, PhotoKind, SuperheroInput, ValidatedPhoto, ValidationError,
};
use crate::repo::superhero_repo::{RepoError, SuperheroRepository, SuperheroRow};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for superhero use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input failed the validation contract; nothing was written.
    Validation(ValidationError),
    /// No record with this id in the scope required by the operation.
    NotFound(SuperheroId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Asset Store failure.
    Asset(AssetError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "superhero not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Asset(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent superhero state: {details}")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Asset(err) => Some(err),
            Self::NotFound(_) | Self::InconsistentState(_) => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<AssetError> for ServiceError {
    fn from(value: AssetError) -> Self {
        Self::Asset(value)
    }
}

/// Stored photo bytes with the MIME type to serve them under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoContent {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Record Store facade over a repository and an Asset Store.
pub struct SuperheroService<R: SuperheroRepository, A: AssetStore> {
    repo: R,
    assets: A,
}

impl<R: SuperheroRepository, A: AssetStore> SuperheroService<R, A> {
    /// Creates a service using the provided repository and asset store.
    pub fn new(repo: R, assets: A) -> Self {
        Self { repo, assets }
    }

    /// Lists Active records in insertion order.
    pub fn list(&self) -> ServiceResult<Vec<Superhero>> {
        Ok(self.repo.list_active()?)
    }

    /// Lists Deleted records in insertion order.
    pub fn list_deleted(&self) -> ServiceResult<Vec<Superhero>> {
        Ok(self.repo.list_deleted()?)
    }

    /// Validates input, stores the optional photo and persists a new record.
    ///
    /// # Errors
    /// - `Validation` when any field fails; no asset or row is written.
    /// - `Asset`/`Repo` when storage fails. A photo saved before a failed
    ///   insert is removed again.
    pub fn create(&self, input: SuperheroInput) -> ServiceResult<Superhero> {
        let validated = validate_input(input).map_err(|err| rejected("superhero_create", err))?;

        let photo_path = match validated.photo.as_ref() {
            Some(photo) => Some(self.store_photo(photo)?),
            None => None,
        };

        let row = SuperheroRow {
            real_name: validated.real_name,
            hero_name: validated.hero_name,
            photo_path,
            additional_info: validated.additional_info,
        };

        let id = match self.repo.insert(&row) {
            Ok(id) => id,
            Err(err) => {
                if let Some(path) = row.photo_path.as_deref() {
                    self.discard_photo(path);
                }
                return Err(err.into());
            }
        };

        info!(
            "event=superhero_create module=service status=ok id={} has_photo={}",
            id,
            row.photo_path.is_some()
        );
        self.read_back(id, RecordScope::Active, "created superhero not found in read-back")
    }

    /// Gets one Active record.
    pub fn get(&self, id: SuperheroId) -> ServiceResult<Superhero> {
        self.repo
            .find_by_id(id, RecordScope::Active)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Gets one record in any state, as loaded for an edit form.
    pub fn edit(&self, id: SuperheroId) -> ServiceResult<Superhero> {
        self.repo
            .find_by_id(id, RecordScope::Any)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Replaces the editable fields of a record in any state.
    ///
    /// # Contract
    /// - Without a new photo, `photo_path` is kept.
    /// - With a new photo, the previous asset is removed (best-effort) before
    ///   the new one is saved. A new photo is removed again when the row
    ///   write fails.
    pub fn update(&self, id: SuperheroId, input: SuperheroInput) -> ServiceResult<Superhero> {
        let existing = self.edit(id)?;
        let validated = validate_input(input).map_err(|err| rejected("superhero_update", err))?;

        let new_photo_path = match validated.photo.as_ref() {
            Some(photo) => {
                if let Some(old_path) = existing.photo_path.as_deref() {
                    self.discard_photo(old_path);
                }
                Some(self.store_photo(photo)?)
            }
            None => None,
        };

        let row = SuperheroRow {
            real_name: validated.real_name,
            hero_name: validated.hero_name,
            photo_path: new_photo_path.clone().or(existing.photo_path),
            additional_info: validated.additional_info,
        };
        if let Err(err) = self.repo.update(id, &row) {
            if let Some(path) = new_photo_path.as_deref() {
                self.discard_photo(path);
            }
            return Err(err.into());
        }

        info!(
            "event=superhero_update module=service status=ok id={} photo_replaced={}",
            id,
            validated.photo.is_some()
        );
        self.read_back(id, RecordScope::Any, "updated superhero not found in read-back")
    }

    /// Soft-deletes an Active record.
    pub fn soft_delete(&self, id: SuperheroId) -> ServiceResult<Superhero> {
        self.repo.set_deleted_at(id, true)?;
        info!("event=superhero_soft_delete module=service status=ok id={id}");
        self.read_back(id, RecordScope::Deleted, "deleted superhero not found in read-back")
    }

    /// Restores a Deleted record.
    pub fn restore(&self, id: SuperheroId) -> ServiceResult<Superhero> {
        self.repo.set_deleted_at(id, false)?;
        info!("event=superhero_restore module=service status=ok id={id}");
        self.read_back(id, RecordScope::Active, "restored superhero not found in read-back")
    }

    /// Reads the photo of an Active record.
    ///
    /// # Errors
    /// - `NotFound` when the record is not Active, has no photo, or the
    ///   stored asset is gone.
    pub fn photo(&self, id: SuperheroId) -> ServiceResult<PhotoContent> {
        let superhero = self.get(id)?;
        let path = superhero.photo_path.ok_or(ServiceError::NotFound(id))?;

        let bytes = match self.assets.read(&path) {
            Ok(bytes) => bytes,
            Err(AssetError::NotFound(_)) => {
                warn!("event=superhero_photo module=service status=error id={id} error_code=asset_missing");
                return Err(ServiceError::NotFound(id));
            }
            Err(err) => return Err(err.into()),
        };

        let content_type = Path::new(&path)
            .extension()
            .and_then(|extension| extension.to_str())
            .and_then(PhotoKind::from_extension)
            .or_else(|| PhotoKind::sniff(&bytes))
            .map_or("application/octet-stream", PhotoKind::content_type);

        Ok(PhotoContent {
            bytes,
            content_type,
        })
    }

    fn store_photo(&self, photo: &ValidatedPhoto) -> ServiceResult<String> {
        let path = self.assets.save(photo, SUPERHEROES_NAMESPACE)?;
        if !self.assets.exists(&path)? {
            return Err(ServiceError::InconsistentState(
                "saved photo not found in asset store",
            ));
        }
        Ok(path)
    }

    fn discard_photo(&self, path: &str) {
        let result = self.assets.exists(path).and_then(|exists| {
            if exists {
                self.assets.delete(path)
            } else {
                Ok(())
            }
        });
        if let Err(err) = result {
            warn!(
                "event=asset_cleanup module=service status=error error_code=asset_delete_failed error={}",
                err
            );
        }
    }

    fn read_back(
        &self,
        id: SuperheroId,
        scope: RecordScope,
        details: &'static str,
    ) -> ServiceResult<Superhero> {
        self.repo
            .find_by_id(id, scope)?
            .ok_or(ServiceError::InconsistentState(details))
    }
}

fn rejected(event: &str, err: ValidationError) -> ServiceError {
    let fields = err.errors().keys().copied().collect::<Vec<_>>().join(",");
    info!("event={event} module=service status=rejected fields={fields}");
    ServiceError::Validation(err)
}
