//! Case-number normalization.
//!
//! Spreadsheet exports routinely mangle CNJ case numbers: punctuation is kept
//! or dropped at random, and long numeric cells are coerced to floats and
//! written back in scientific notation (`1.01779912E+18`). Everything is
//! reduced to a digit-only canonical form here before it reaches the router
//! or the store.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Minimum number of digits for a normalized number to be queried.
pub const MIN_CASE_NUMBER_DIGITS: usize = 15;

/// Largest exponent accepted when repairing scientific notation. Anything
/// above this is not a case number and is stripped to digits instead.
const MAX_EXPONENT: usize = 40;

static SCIENTIFIC: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^([0-9]+)(?:\.([0-9]+))?e\+([0-9]+)$").expect("valid regex")
});

/// Canonicalize a raw identifier into its digit-only form.
///
/// Never fails; the result may be empty or shorter than
/// [`MIN_CASE_NUMBER_DIGITS`].
///
/// ```
/// use datajud_core::number::normalize;
/// assert_eq!(normalize("0425144-44.2016.8.19.0001"), "04251444420168190001");
/// ```
pub fn normalize(raw: &str) -> String {
  let s = raw.trim();
  if let Some(repaired) = repair_scientific(s) {
    return strip_non_digits(&repaired);
  }
  strip_non_digits(s)
}

/// Whether a normalized number is long enough to be queried and persisted.
pub fn is_valid(normalized: &str) -> bool {
  normalized.len() >= MIN_CASE_NUMBER_DIGITS
}

fn strip_non_digits(s: &str) -> String {
  s.chars().filter(char::is_ascii_digit).collect()
}

/// Rebuild the integer a float-formatted cell stood for, by shifting the
/// mantissa's decimal point `exp` places. Fractional digits left over after
/// the shift are truncated.
fn repair_scientific(s: &str) -> Option<String> {
  let caps = SCIENTIFIC.captures(s)?;
  let int_part = caps.get(1)?.as_str();
  let frac_part = caps.get(2).map_or("", |m| m.as_str());
  let exp: usize = caps.get(3)?.as_str().parse().ok()?;
  if exp > MAX_EXPONENT {
    return None;
  }

  let mut digits = String::with_capacity(int_part.len() + exp);
  digits.push_str(int_part);
  if exp >= frac_part.len() {
    digits.push_str(frac_part);
    digits.extend(std::iter::repeat_n('0', exp - frac_part.len()));
  } else {
    digits.push_str(&frac_part[..exp]);
  }

  let trimmed = digits.trim_start_matches('0');
  Some(if trimmed.is_empty() { "0".to_owned() } else { trimmed.to_owned() })
}

// ─── CaseNumber ──────────────────────────────────────────────────────────────

/// A normalized case number that satisfies the minimum-length invariant.
///
/// Only values of this type are handed to a [`CaseResolver`] or registered in
/// the master index.
///
/// [`CaseResolver`]: crate::search::CaseResolver
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseNumber(String);

impl CaseNumber {
  /// Normalize `raw` and validate the result.
  pub fn parse(raw: &str) -> Result<Self> {
    let normalized = normalize(raw);
    if is_valid(&normalized) {
      Ok(Self(normalized))
    } else {
      Err(Error::CaseNumberTooShort { raw: raw.to_owned(), digits: normalized.len() })
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CaseNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for CaseNumber {
  fn as_ref(&self) -> &str { &self.0 }
}
