//! `superheroes` command-line entry point.
//!
//! # Responsibility
//! - Map one subcommand onto one Record Store operation.
//! - Print results as pretty JSON on stdout and errors on stderr.
//!
//! # Exit codes
//! - `0` success, `1` failure, `2` validation failure.

mod args;

use args::{Cli, Command, RecordArgs};
use clap::Parser;
use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use superhero_core::db::{open_db, DbError};
use superhero_core::{
    init_logging, AssetStore, LocalAssetStore, LoggingError, PhotoKind, PhotoUpload, RepoError,
    ServiceError, SqliteSuperheroRepository, Superhero, SuperheroInput, SuperheroRepository,
    SuperheroService,
};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug)]
enum CliError {
    Logging(LoggingError),
    Db(DbError),
    Repo(RepoError),
    Service(ServiceError),
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Service(ServiceError::Validation(_)) => 2,
            _ => 1,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

#[derive(Debug, Serialize)]
struct ListOutput {
    superheroes: Vec<Superhero>,
    total: usize,
}

impl ListOutput {
    fn new(superheroes: Vec<Superhero>) -> Self {
        Self {
            total: superheroes.len(),
            superheroes,
        }
    }
}

#[derive(Debug, Serialize)]
struct MutationOutput {
    message: &'static str,
    superhero: Superhero,
}

#[derive(Debug, Serialize)]
struct PhotoOutput {
    id: i64,
    out: PathBuf,
    content_type: &'static str,
    bytes: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if let CliError::Service(ServiceError::Validation(failures)) = &err {
                for (field, reason) in failures.errors() {
                    eprintln!("  {field}: {reason}");
                }
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.store_config();
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir).map_err(CliError::Logging)?;
    }

    let conn = open_db(&config.db_path).map_err(CliError::Db)?;
    let repo = SqliteSuperheroRepository::try_new(&conn).map_err(CliError::Repo)?;
    let service = SuperheroService::new(repo, LocalAssetStore::new(config.asset_root));

    info!("event=cli_command module=cli status=start");
    let output = execute(cli.command, &service)?;
    let rendered = serde_json::to_string_pretty(&output).map_err(CliError::Json)?;
    println!("{rendered}");
    Ok(())
}

fn execute<R, A>(
    command: Command,
    service: &SuperheroService<R, A>,
) -> Result<serde_json::Value, CliError>
where
    R: SuperheroRepository,
    A: AssetStore,
{
    match command {
        Command::List => to_json(ListOutput::new(service.list()?)),
        Command::Deleted => to_json(ListOutput::new(service.list_deleted()?)),
        Command::Show { id } => to_json(service.get(id)?),
        Command::Edit { id } => to_json(service.edit(id)?),
        Command::Create(record) => {
            let superhero = service.create(read_input(record)?)?;
            to_json(MutationOutput {
                message: "Superhero created successfully.",
                superhero,
            })
        }
        Command::Update { id, record } => {
            let superhero = service.update(id, read_input(record)?)?;
            to_json(MutationOutput {
                message: "Superhero updated successfully.",
                superhero,
            })
        }
        Command::Delete { id } => to_json(MutationOutput {
            message: "Superhero deleted successfully (soft delete).",
            superhero: service.soft_delete(id)?,
        }),
        Command::Restore { id } => to_json(MutationOutput {
            message: "Superhero restored successfully.",
            superhero: service.restore(id)?,
        }),
        Command::Photo { id, out } => {
            let photo = service.photo(id)?;
            std::fs::write(&out, &photo.bytes).map_err(|source| CliError::Io {
                path: out.clone(),
                source,
            })?;
            to_json(PhotoOutput {
                id,
                out,
                content_type: photo.content_type,
                bytes: photo.bytes.len(),
            })
        }
    }
}

fn read_input(record: RecordArgs) -> Result<SuperheroInput, CliError> {
    let photo = match record.photo {
        Some(path) => Some(read_photo(&path)?),
        None => None,
    };

    Ok(SuperheroInput {
        real_name: record.real_name,
        hero_name: record.hero_name,
        additional_info: record.info,
        photo,
    })
}

fn read_photo(path: &Path) -> Result<PhotoUpload, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content_type = path
        .extension()
        .and_then(|extension| extension.to_str())
        .and_then(PhotoKind::from_extension)
        .map_or(FALLBACK_CONTENT_TYPE, PhotoKind::content_type);

    let upload = PhotoUpload::new(bytes, content_type);
    Ok(match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => upload.with_file_name(name),
        None => upload,
    })
}

fn to_json(value: impl Serialize) -> Result<serde_json::Value, CliError> {
    serde_json::to_value(value).map_err(CliError::Json)
}

#[cfg(test)]
mod tests {
    use super::{execute, read_photo, CliError};
    use crate::args::{Command, RecordArgs};
    use std::path::PathBuf;
    use superhero_core::db::open_db_in_memory;
    use superhero_core::{LocalAssetStore, ServiceError, SqliteSuperheroRepository, SuperheroService};

    fn record(real_name: Option<&str>, hero_name: Option<&str>, photo: Option<PathBuf>) -> RecordArgs {
        RecordArgs {
            real_name: real_name.map(str::to_string),
            hero_name: hero_name.map(str::to_string),
            info: None,
            photo,
        }
    }

    #[test]
    fn create_delete_restore_flow_renders_json() {
        let conn = open_db_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let service = SuperheroService::new(
            SqliteSuperheroRepository::try_new(&conn).unwrap(),
            LocalAssetStore::new(dir.path()),
        );

        let created = execute(
            Command::Create(record(Some("Peter Parker"), Some("Spider-Man"), None)),
            &service,
        )
        .unwrap();
        assert_eq!(created["superhero"]["id"], 1);
        assert_eq!(created["superhero"]["photo_path"], serde_json::Value::Null);

        execute(Command::Delete { id: 1 }, &service).unwrap();
        let listed = execute(Command::List, &service).unwrap();
        assert_eq!(listed["total"], 0);
        let deleted = execute(Command::Deleted, &service).unwrap();
        assert_eq!(deleted["superheroes"][0]["id"], 1);

        execute(Command::Restore { id: 1 }, &service).unwrap();
        let shown = execute(Command::Show { id: 1 }, &service).unwrap();
        assert_eq!(shown["hero_name"], "Spider-Man");
    }

    #[test]
    fn validation_failures_exit_with_code_two() {
        let conn = open_db_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let service = SuperheroService::new(
            SqliteSuperheroRepository::try_new(&conn).unwrap(),
            LocalAssetStore::new(dir.path()),
        );

        let err = execute(Command::Create(record(None, Some("Spider-Man"), None)), &service)
            .unwrap_err();
        assert!(matches!(err, CliError::Service(ServiceError::Validation(_))));
        assert_eq!(err.exit_code(), 2);

        let err = execute(Command::Show { id: 5 }, &service).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn photo_is_read_with_type_from_extension_and_exported() {
        let conn = open_db_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let service = SuperheroService::new(
            SqliteSuperheroRepository::try_new(&conn).unwrap(),
            LocalAssetStore::new(dir.path().join("assets")),
        );

        let source = dir.path().join("logo.svg");
        std::fs::write(&source, "<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>").unwrap();
        let upload = read_photo(&source).unwrap();
        assert_eq!(upload.content_type, "image/svg+xml");
        assert_eq!(upload.file_name.as_deref(), Some("logo.svg"));

        execute(
            Command::Create(record(Some("T'Challa"), Some("Black Panther"), Some(source))),
            &service,
        )
        .unwrap();

        let out = dir.path().join("exported.svg");
        let exported = execute(Command::Photo { id: 1, out: out.clone() }, &service).unwrap();
        assert_eq!(exported["content_type"], "image/svg+xml");
        assert!(std::fs::read_to_string(out).unwrap().contains("<svg"));
    }
}
