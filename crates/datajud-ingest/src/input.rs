//! Input loading and the valid/invalid partition.
//!
//! The input is a CSV table with a header row. `numeroProcesso` is required;
//! `tribunal`, when present, carries a per-row court hint.

use std::{collections::HashSet, path::Path};

use datajud_core::CaseNumber;

use crate::error::InputError;

pub const NUMBER_COLUMN: &str = "numeroProcesso";
pub const COURT_COLUMN: &str = "tribunal";

/// One data row, as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
  pub raw_number: String,
  pub court:      Option<String>,
}

/// The rows of an input file.
#[derive(Debug, Clone, Default)]
pub struct InputTable {
  pub rows:             Vec<InputRow>,
  pub has_court_column: bool,
}

/// Read `path` as CSV. Fails when the file is missing, has no data rows, or
/// lacks the [`NUMBER_COLUMN`]. Rows whose number cell is blank are skipped.
pub fn read_csv(path: &Path, delimiter: u8) -> Result<InputTable, InputError> {
  if !path.exists() {
    return Err(InputError::NotFound(path.to_path_buf()));
  }

  let mut reader = csv::ReaderBuilder::new()
    .delimiter(delimiter)
    .trim(csv::Trim::All)
    .flexible(true)
    .from_path(path)?;

  let headers = reader.headers()?.clone();
  let position = |name: &str| {
    headers
      .iter()
      .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
  };
  let number_idx = position(NUMBER_COLUMN).ok_or_else(|| InputError::MissingColumn {
    path:   path.to_path_buf(),
    column: NUMBER_COLUMN,
  })?;
  let court_idx = position(COURT_COLUMN);

  let mut rows = Vec::new();
  for record in reader.records() {
    let record = record?;
    let raw_number = record.get(number_idx).unwrap_or_default().trim();
    if raw_number.is_empty() {
      continue;
    }
    rows.push(InputRow {
      raw_number: raw_number.to_owned(),
      court:      court_idx.and_then(|i| record.get(i)).map(str::to_owned),
    });
  }

  if rows.is_empty() {
    return Err(InputError::Empty(path.to_path_buf()));
  }

  Ok(InputTable { rows, has_court_column: court_idx.is_some() })
}

// ─── Batch ───────────────────────────────────────────────────────────────────

/// A valid, deduplicated case number with the court hint of the first row it
/// appeared on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
  pub number:     CaseNumber,
  pub court_hint: Option<String>,
}

/// The work list for one run.
#[derive(Debug, Clone, Default)]
pub struct InputBatch {
  /// Unique valid numbers, in order of first appearance.
  pub valid:            Vec<BatchEntry>,
  /// Unique raw identifiers that normalized below the minimum length.
  pub invalid:          Vec<String>,
  pub has_court_column: bool,
}

impl InputBatch {
  pub fn from_table(table: InputTable) -> Self {
    let mut seen_valid = HashSet::new();
    let mut seen_invalid = HashSet::new();
    let mut batch = InputBatch { has_court_column: table.has_court_column, ..Self::default() };

    for row in table.rows {
      match CaseNumber::parse(&row.raw_number) {
        Ok(number) => {
          if seen_valid.insert(number.clone()) {
            batch.valid.push(BatchEntry {
              number,
              court_hint: row.court.as_deref().and_then(normalize_court_hint),
            });
          }
        }
        Err(_) => {
          if seen_invalid.insert(row.raw_number.clone()) {
            batch.invalid.push(row.raw_number);
          }
        }
      }
    }

    batch
  }

  /// Build a batch from bare identifiers, without court hints.
  pub fn from_numbers<I, S>(raw: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self::from_table(InputTable {
      rows:             raw
        .into_iter()
        .map(|r| InputRow { raw_number: r.into(), court: None })
        .collect(),
      has_court_column: false,
    })
  }
}

/// Trim and upper-case a court hint; blank means no hint.
pub fn normalize_court_hint(raw: &str) -> Option<String> {
  let hint = raw.trim();
  (!hint.is_empty()).then(|| hint.to_uppercase())
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  fn csv_file(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f
  }

  #[test]
  fn reads_numbers_and_court_hints() {
    let f = csv_file(
      "numeroProcesso,tribunal\n\
       0425144-44.2016.8.19.0001,tjrj\n\
       1.01779912E+18,\n",
    );
    let table = read_csv(f.path(), b',').unwrap();
    assert!(table.has_court_column);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].court.as_deref(), Some("tjrj"));
    assert_eq!(table.rows[1].court.as_deref(), Some(""));
  }

  #[test]
  fn court_column_is_optional() {
    let f = csv_file("numeroProcesso\n04251444420168190001\n");
    let table = read_csv(f.path(), b',').unwrap();
    assert!(!table.has_court_column);
    assert_eq!(table.rows[0].court, None);
  }

  #[test]
  fn semicolon_delimiter_and_bom_header() {
    let f = csv_file("\u{feff}numeroProcesso;tribunal\n04251444420168190001;TJRJ\n");
    let table = read_csv(f.path(), b';').unwrap();
    assert_eq!(table.rows[0].raw_number, "04251444420168190001");
  }

  #[test]
  fn missing_file_is_not_found() {
    let err = read_csv(Path::new("/definitely/not/here.csv"), b',').unwrap_err();
    assert!(matches!(err, InputError::NotFound(_)));
  }

  #[test]
  fn header_only_file_is_empty() {
    let f = csv_file("numeroProcesso,tribunal\n");
    assert!(matches!(read_csv(f.path(), b','), Err(InputError::Empty(_))));
  }

  #[test]
  fn missing_number_column_is_rejected() {
    let f = csv_file("processo,tribunal\n04251444420168190001,TJRJ\n");
    let err = read_csv(f.path(), b',').unwrap_err();
    assert!(matches!(err, InputError::MissingColumn { column: NUMBER_COLUMN, .. }));
  }

  #[test]
  fn batch_partitions_and_deduplicates() {
    let table = InputTable {
      rows:             vec![
        InputRow { raw_number: "0425144-44.2016.8.19.0001".into(), court: Some(" tjrj ".into()) },
        InputRow { raw_number: "12345".into(), court: None },
        InputRow { raw_number: "04251444420168190001".into(), court: Some("TJSP".into()) },
        InputRow { raw_number: "1.01779912E+18".into(), court: Some("".into()) },
        InputRow { raw_number: "12345".into(), court: None },
      ],
      has_court_column: true,
    };

    let batch = InputBatch::from_table(table);
    assert_eq!(batch.valid.len(), 2);
    assert_eq!(batch.valid[0].number.as_str(), "04251444420168190001");
    assert_eq!(batch.valid[0].court_hint.as_deref(), Some("TJRJ"));
    assert_eq!(batch.valid[1].number.as_str(), "1017799120000000000");
    assert_eq!(batch.valid[1].court_hint, None);
    assert_eq!(batch.invalid, ["12345"]);
  }
}
