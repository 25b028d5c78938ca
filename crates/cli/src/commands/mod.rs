//! CLI subcommands.

pub mod assign;
pub mod route;
pub mod zones;

use std::path::{Path, PathBuf};

use clean_food_delivery::{ConfigError, DeliveryError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors shared by the subcommands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// An input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An input file is not the expected JSON.
    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Environment configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The delivery engine reported an error.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Output could not be serialized.
    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CommandError> {
    let content = std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CommandError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Print a value to stdout as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    let output = serde_json::to_string_pretty(value)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}
