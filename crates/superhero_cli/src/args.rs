//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use superhero_core::{StoreConfig, SuperheroId};

/// Manage the superhero registry from the command line.
#[derive(Parser, Debug)]
#[command(name = "superheroes")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides SUPERHEROES_DB)
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Asset Store root directory (overrides SUPERHEROES_ASSETS)
    #[arg(long, global = true, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides SUPERHEROES_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files (overrides SUPERHEROES_LOG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List active superheroes
    List,

    /// List soft-deleted superheroes
    Deleted,

    /// Show one active superhero
    Show { id: SuperheroId },

    /// Show one superhero in any state, as loaded for editing
    Edit { id: SuperheroId },

    /// Create a superhero
    Create(RecordArgs),

    /// Replace the fields of a superhero
    Update {
        id: SuperheroId,
        #[command(flatten)]
        record: RecordArgs,
    },

    /// Soft-delete an active superhero
    Delete { id: SuperheroId },

    /// Restore a soft-deleted superhero
    Restore { id: SuperheroId },

    /// Write the photo of an active superhero to a file
    Photo {
        id: SuperheroId,
        /// Destination file
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
}

/// Editable fields shared by `create` and `update`.
#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Civilian name
    #[arg(long)]
    pub real_name: Option<String>,

    /// Superhero alias
    #[arg(long)]
    pub hero_name: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub info: Option<String>,

    /// Image file (jpeg, png, jpg, gif, svg; max 2048 KB)
    #[arg(long, value_name = "FILE")]
    pub photo: Option<PathBuf>,
}

impl Cli {
    /// Resolves the store configuration: environment first, flags last.
    pub fn store_config(&self) -> StoreConfig {
        let mut config = StoreConfig::from_env();
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(assets) = &self.assets {
            config.asset_root = assets.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = Some(log_dir.clone());
        }
        config
    }
}
