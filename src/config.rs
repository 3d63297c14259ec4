//! Command line arguments and runtime configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::{error::Result, sql::engine::Session, storage::json::JsonFileStorage};

pub const DEFAULT_DATA_DIR: &str = "data";

/// jsondb command line arguments.
#[derive(Debug, Parser)]
#[command(name = "jsondb")]
#[command(version, about = "File-backed tabular store with a SQL-like command language")]
pub struct Args {
    /// Directory holding one <database>.json document per database.
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Execute a single statement and exit.
    #[arg(short = 'c', long)]
    pub command: Option<String>,

    /// Execute statements from a file, one per line.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory, created on startup if missing.
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            data_dir: args.data_dir.clone(),
        }
    }
}

impl Config {
    /// Opens a session over the data directory, loading every database in it
    pub fn open_session(&self) -> Result<Session<JsonFileStorage>> {
        Session::new(JsonFileStorage::new(&self.data_dir)?)
    }
}
