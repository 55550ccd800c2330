//! Setup-phase error types for `datajud-ingest`.
//!
//! Everything here aborts the run before any case number is queried.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("invalid value {value:?} for setting `{key}`")]
  InvalidSetting { key: &'static str, value: String },

  #[error(transparent)]
  Input(#[from] InputError),
}

/// Problems with the input table.
#[derive(Debug, Error)]
pub enum InputError {
  #[error("input file {0} not found")]
  NotFound(PathBuf),

  #[error("input file {0} has no data rows")]
  Empty(PathBuf),

  #[error("input file {path} has no `{column}` column")]
  MissingColumn { path: PathBuf, column: &'static str },

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
