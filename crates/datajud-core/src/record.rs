//! Relational row types produced by the extractor and owned by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Detail rows ─────────────────────────────────────────────────────────────

/// One matched case document, flattened. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
  pub source_id:                     Option<String>,
  pub court:                         Option<String>,
  pub case_number:                   Option<String>,
  /// Instance, e.g. `G1`, `G2`, `JE`.
  pub degree:                        Option<String>,
  pub filed_at:                      Option<String>,
  pub confidentiality_level:         Option<i64>,
  pub class_code:                    Option<i64>,
  pub class_name:                    Option<String>,
  pub format_code:                   Option<i64>,
  pub format_name:                   Option<String>,
  pub system_code:                   Option<i64>,
  pub system_name:                   Option<String>,
  pub deciding_body_code:            Option<i64>,
  pub deciding_body_name:            Option<String>,
  pub deciding_body_municipality:    Option<i64>,
  pub last_updated_at:               Option<String>,
  pub indexed_at:                    Option<String>,
}

/// One procedural movement of a case. Linked to its [`CaseRecord`] by case
/// number only; the link is not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
  pub case_number:        Option<String>,
  pub code:               Option<i64>,
  pub name:               Option<String>,
  pub occurred_at:        Option<String>,
  pub deciding_body_code: Option<i64>,
  pub deciding_body_name: Option<String>,
}

// ─── Master index ────────────────────────────────────────────────────────────

/// The dedup record for a case number. `court` and `first_seen` never change
/// once written; `last_update` moves forward on every registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterIndexEntry {
  pub case_number: String,
  pub court:       String,
  pub first_seen:  DateTime<Utc>,
  pub last_update: DateTime<Utc>,
}

/// Row totals of the three tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
  pub cases:     u64,
  pub movements: u64,
  pub indexed:   u64,
}

impl TableCounts {
  pub fn is_empty(&self) -> bool { self.cases == 0 && self.movements == 0 && self.indexed == 0 }
}
