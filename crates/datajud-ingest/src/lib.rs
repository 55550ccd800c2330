//! Batch reconciliation of case-number lists against DataJud.
//!
//! Reads an input table, partitions it into valid and invalid case numbers,
//! and drives each valid number through a [`CaseResolver`] into a
//! [`CaseStore`], keeping run statistics along the way.
//!
//! [`CaseResolver`]: datajud_core::search::CaseResolver
//! [`CaseStore`]: datajud_core::store::CaseStore

pub mod error;
pub mod input;
pub mod orchestrator;
pub mod settings;

pub use error::{Error, Result};
pub use input::{BatchEntry, InputBatch};
pub use orchestrator::{Orchestrator, ReprocessPolicy, RunOptions, RunReport, RunStats};
pub use settings::Settings;
