//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 UTC strings at second precision with a `Z`
//! suffix, e.g. `2026-10-19T12:00:00Z`.

use chrono::{DateTime, SecondsFormat, Utc};
use datajud_core::record::MasterIndexEntry;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Secs, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `processos_lista` row.
pub struct RawIndexEntry {
  pub case_number: String,
  pub court:       Option<String>,
  pub first_seen:  String,
  pub last_update: String,
}

impl RawIndexEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      case_number: row.get(0)?,
      court:       row.get(1)?,
      first_seen:  row.get(2)?,
      last_update: row.get(3)?,
    })
  }

  pub fn into_entry(self) -> Result<MasterIndexEntry> {
    Ok(MasterIndexEntry {
      case_number: self.case_number,
      court:       self.court.unwrap_or_default(),
      first_seen:  decode_dt(&self.first_seen)?,
      last_update: decode_dt(&self.last_update)?,
    })
  }
}
