//! The ordered table of known court search endpoints.

use serde::{Deserialize, Serialize};

/// Default public DataJud host.
pub const DATAJUD_BASE_URL: &str = "https://api-publica.datajud.cnj.jus.br";

/// State courts served by DataJud, in fallback order.
pub const STATE_COURTS: [&str; 27] = [
  "TJAC", "TJAL", "TJAM", "TJAP", "TJBA", "TJCE", "TJDFT", "TJES", "TJGO",
  "TJMA", "TJMG", "TJMS", "TJMT", "TJPA", "TJPB", "TJPE", "TJPI", "TJPR",
  "TJRJ", "TJRN", "TJRO", "TJRR", "TJRS", "TJSC", "TJSE", "TJSP", "TJTO",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtEndpoint {
  /// Upper-case court code, e.g. `TJSP`.
  pub code: String,
  pub url:  String,
}

/// Court endpoints in the order the exhaustive fallback visits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourtTable(Vec<CourtEndpoint>);

impl CourtTable {
  /// The 27 state courts under `base_url`, as
  /// `{base_url}/api_publica_{code}/_search`.
  pub fn datajud(base_url: &str) -> Self {
    let base = base_url.trim_end_matches('/');
    Self(
      STATE_COURTS
        .iter()
        .map(|code| CourtEndpoint {
          code: (*code).to_owned(),
          url:  format!("{base}/api_publica_{}/_search", code.to_lowercase()),
        })
        .collect(),
    )
  }

  /// Build a table from explicit `(code, url)` pairs, keeping their order.
  pub fn from_pairs<C, U>(pairs: impl IntoIterator<Item = (C, U)>) -> Self
  where
    C: Into<String>,
    U: Into<String>,
  {
    Self(
      pairs
        .into_iter()
        .map(|(code, url)| CourtEndpoint {
          code: code.into().to_uppercase(),
          url:  url.into(),
        })
        .collect(),
    )
  }

  /// Look up a court by code, ignoring case and surrounding whitespace.
  pub fn get(&self, code: &str) -> Option<&CourtEndpoint> {
    let code = code.trim();
    self.0.iter().find(|c| c.code.eq_ignore_ascii_case(code))
  }

  pub fn iter(&self) -> impl Iterator<Item = &CourtEndpoint> { self.0.iter() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl From<Vec<CourtEndpoint>> for CourtTable {
  fn from(endpoints: Vec<CourtEndpoint>) -> Self {
    Self::from_pairs(endpoints.into_iter().map(|c| (c.code, c.url)))
  }
}

impl Default for CourtTable {
  fn default() -> Self { Self::datajud(DATAJUD_BASE_URL) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_table_has_every_state_court_in_order() {
    let table = CourtTable::default();
    assert_eq!(table.len(), 27);
    let codes: Vec<_> = table.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes.first(), Some(&"TJAC"));
    assert_eq!(codes.last(), Some(&"TJTO"));
    assert_eq!(
      table.get("TJDFT").unwrap().url,
      "https://api-publica.datajud.cnj.jus.br/api_publica_tjdft/_search"
    );
  }

  #[test]
  fn lookup_ignores_case() {
    let table = CourtTable::datajud("http://mirror.local/");
    assert_eq!(
      table.get(" tjsp ").unwrap().url,
      "http://mirror.local/api_publica_tjsp/_search"
    );
    assert!(table.get("TJXX").is_none());
  }

  #[test]
  fn from_pairs_keeps_order_and_uppercases() {
    let table = CourtTable::from_pairs([("b", "http://b"), ("a", "http://a")]);
    let codes: Vec<_> = table.iter().map(|c| c.code.clone()).collect();
    assert_eq!(codes, ["B", "A"]);
  }
}
