//! Search documents, tagged query outcomes, and the [`CaseResolver`] seam.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display};
use thiserror::Error;

use crate::{CaseNumber, Result};

// ─── Document ────────────────────────────────────────────────────────────────

/// A raw search response as returned by a court endpoint (or relayed by the
/// intermediary service). The shape is not trusted: every accessor tolerates
/// missing or mistyped members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchDocument(Value);

impl SearchDocument {
  pub fn new(value: Value) -> Self { Self(value) }

  pub fn from_slice(bytes: &[u8]) -> Result<Self> { Ok(Self(serde_json::from_slice(bytes)?)) }

  /// The `hits.hits` array, or an empty slice when the document has no such
  /// member.
  pub fn hits(&self) -> &[Value] {
    self
      .0
      .get("hits")
      .and_then(|h| h.get("hits"))
      .and_then(Value::as_array)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  pub fn has_hits(&self) -> bool { !self.hits().is_empty() }

  /// `tribunal` of the first hit's `_source`, if present.
  pub fn first_hit_court(&self) -> Option<&str> {
    self
      .hits()
      .first()?
      .get("_source")?
      .get("tribunal")?
      .as_str()
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// A successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
  /// The court that answered, when the router knows it.
  pub court:    Option<String>,
  pub document: SearchDocument,
}

/// Why a resolution failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FailureReason {
  /// Connection, timeout, or other transport-level error.
  Transport,
  /// Non-success status or structured error payload from the remote side.
  Remote,
  /// The queried source answered but did not find the number.
  NotFound,
  /// Exhaustive fallback found no hit in any known court.
  NotFoundInAnyCourt,
  /// The court hint does not name a known court endpoint.
  UnknownCourt,
  /// The response body could not be decoded.
  Malformed,
}

/// A failed resolution, tagged with its [`FailureReason`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}: {detail}")]
pub struct QueryFailure {
  pub reason: FailureReason,
  pub detail: String,
}

impl QueryFailure {
  pub fn new(reason: FailureReason, detail: impl Into<String>) -> Self {
    Self { reason, detail: detail.into() }
  }
}

pub type SearchResult = std::result::Result<Resolution, QueryFailure>;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Anything that can turn a case number into a search document.
///
/// Implementations never fail with an error type: every problem is folded
/// into a [`QueryFailure`] so the batch loop can count it and move on.
pub trait CaseResolver: Send + Sync {
  /// Resolve `number`, preferring `court_hint` when given.
  fn resolve<'a>(
    &'a self,
    number: &'a CaseNumber,
    court_hint: Option<&'a str>,
  ) -> impl Future<Output = SearchResult> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn hits_tolerates_missing_and_mistyped_members() {
    assert!(SearchDocument::new(json!({})).hits().is_empty());
    assert!(SearchDocument::new(json!({ "hits": {} })).hits().is_empty());
    assert!(SearchDocument::new(json!({ "hits": { "hits": "nope" } })).hits().is_empty());
    assert!(SearchDocument::new(json!(null)).hits().is_empty());
  }

  #[test]
  fn first_hit_court_reads_source() {
    let doc = SearchDocument::new(json!({
      "hits": { "hits": [ { "_source": { "tribunal": "TJRJ" } } ] }
    }));
    assert!(doc.has_hits());
    assert_eq!(doc.first_hit_court(), Some("TJRJ"));
  }

  #[test]
  fn failure_display_includes_reason_tag() {
    let f = QueryFailure::new(FailureReason::UnknownCourt, "TJXX");
    assert_eq!(f.to_string(), "unknown_court: TJXX");
    assert_eq!(FailureReason::NotFoundInAnyCourt.as_ref(), "not_found_in_any_court");
  }

  #[test]
  fn from_slice_rejects_non_json() {
    assert!(SearchDocument::from_slice(b"<html>").is_err());
  }
}
