//! [`QueryRouter`] — picks the query path for each case number.

use datajud_core::{
  CaseNumber,
  search::{CaseResolver, FailureReason, QueryFailure, Resolution, SearchDocument, SearchResult},
};
use tracing::{debug, info, warn};

use crate::{
  Result,
  client::DataJudClient,
  config::{OperatingMode, QueryConfig},
  courts::CourtEndpoint,
};

/// Routes lookups through the intermediary service or the court endpoints,
/// according to the run's [`OperatingMode`].
///
/// Resolutions always carry at least one hit; a hitless answer is reported
/// as [`FailureReason::NotFound`].
#[derive(Clone)]
pub struct QueryRouter {
  client: DataJudClient,
  config: QueryConfig,
}

impl QueryRouter {
  /// Validate `config` and build the HTTP client.
  pub fn new(config: QueryConfig) -> Result<Self> {
    config.validate()?;
    let client = DataJudClient::new(config.api_key.clone())?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &QueryConfig { &self.config }

  /// Pre-run availability check. Only meaningful in intermediary mode; a
  /// no-op in direct mode.
  pub async fn health_check(&self) -> Result<()> {
    match self.config.mode {
      OperatingMode::Intermediary => {
        self
          .client
          .health(&self.config.intermediary_url, self.config.health_timeout)
          .await
      }
      OperatingMode::Direct => Ok(()),
    }
  }

  // ── Intermediary ──────────────────────────────────────────────────────────

  async fn via_intermediary(&self, number: &str, court_hint: Option<&str>) -> SearchResult {
    let document = self
      .client
      .consult(
        &self.config.intermediary_url,
        number,
        court_hint,
        self.config.intermediary_timeout,
      )
      .await?;
    with_hits(number, court_hint.map(str::to_owned), document)
  }

  // ── Direct ────────────────────────────────────────────────────────────────

  async fn query_court(&self, court: &CourtEndpoint, number: &str) -> SearchResult {
    debug!(court = %court.code, number, "querying court");
    let document = self
      .client
      .search_court(court, number, self.config.page_size, self.config.direct_timeout)
      .await?;
    with_hits(number, Some(court.code.clone()), document)
  }

  async fn direct_hinted(&self, number: &str, hint: &str) -> SearchResult {
    match self.config.courts.get(hint) {
      Some(court) => self.query_court(court, number).await,
      None => Err(QueryFailure::new(
        FailureReason::UnknownCourt,
        format!("court {hint:?} is not a known endpoint"),
      )),
    }
  }

  /// Visit every court in table order and stop at the first one with a hit.
  /// The configured delay separates consecutive attempts.
  async fn direct_fallback(&self, number: &str) -> SearchResult {
    for court in self.config.courts.iter() {
      match self.query_court(court, number).await {
        Ok(resolution) => {
          info!(court = %court.code, number, "hit found during fallback");
          return Ok(resolution);
        }
        Err(f) if f.reason == FailureReason::NotFound => {}
        Err(f) => warn!(court = %court.code, number, failure = %f, "court query failed"),
      }
      tokio::time::sleep(self.config.delay).await;
    }

    Err(QueryFailure::new(
      FailureReason::NotFoundInAnyCourt,
      format!("{number} not found in any of {} courts", self.config.courts.len()),
    ))
  }
}

impl CaseResolver for QueryRouter {
  async fn resolve(&self, number: &CaseNumber, court_hint: Option<&str>) -> SearchResult {
    let number = number.as_str();
    let court_hint = court_hint.map(str::trim).filter(|h| !h.is_empty());

    match (self.config.mode, court_hint) {
      (OperatingMode::Intermediary, hint) => self.via_intermediary(number, hint).await,
      (OperatingMode::Direct, Some(hint)) => self.direct_hinted(number, hint).await,
      (OperatingMode::Direct, None) => self.direct_fallback(number).await,
    }
  }
}

fn with_hits(number: &str, court: Option<String>, document: SearchDocument) -> SearchResult {
  if document.has_hits() {
    Ok(Resolution { court, document })
  } else {
    let place = court.as_deref().unwrap_or("intermediary");
    Err(QueryFailure::new(FailureReason::NotFound, format!("{number} not found in {place}")))
  }
}
