//! Setup-time errors for `datajud-query`.
//!
//! Per-request problems are never errors here; they are folded into
//! [`datajud_core::search::QueryFailure`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),

  #[error("direct mode requires an API key")]
  MissingApiKey,

  #[error("direct mode requires at least one court endpoint")]
  NoCourts,

  #[error("intermediary service at {url} is unavailable: {detail}")]
  Unavailable { url: String, detail: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
