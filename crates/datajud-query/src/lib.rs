//! Query routing for DataJud case lookups.
//!
//! A [`QueryRouter`] resolves a normalized case number either through the
//! intermediary query service or directly against the per-court DataJud
//! search endpoints, and implements [`datajud_core::search::CaseResolver`].
//! Requests are issued one at a time with a fixed pause between court
//! attempts.

pub mod client;
pub mod config;
pub mod courts;
pub mod error;
pub mod router;

pub use client::DataJudClient;
pub use config::{OperatingMode, QueryConfig};
pub use courts::{CourtEndpoint, CourtTable};
pub use error::{Error, Result};
pub use router::QueryRouter;

#[cfg(test)]
mod tests;
