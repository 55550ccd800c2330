//! Error type for `datajud-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// An upsert completed but the entry could not be read back.
  #[error("master index entry missing after upsert: {0}")]
  IndexEntryMissing(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
