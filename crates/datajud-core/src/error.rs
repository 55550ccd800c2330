//! Error types for `datajud-core`.

use thiserror::Error;

use crate::number::MIN_CASE_NUMBER_DIGITS;

#[derive(Debug, Error)]
pub enum Error {
  #[error(
    "case number {raw:?} has {digits} digits after normalization; at least \
     {MIN_CASE_NUMBER_DIGITS} are required"
  )]
  CaseNumberTooShort { raw: String, digits: usize },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
