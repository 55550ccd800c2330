//! The per-number batch loop: validate → resolve → extract → persist → index.

use std::{collections::HashSet, fmt, time::Duration};

use datajud_core::{
  extract::extract,
  record::TableCounts,
  search::{CaseResolver, FailureReason, QueryFailure, Resolution},
  store::CaseStore,
};
use strum::{Display, EnumString};
use tracing::{info, warn};

use crate::input::{BatchEntry, InputBatch};

/// Court recorded in the master index when no source names one.
pub const UNKNOWN_COURT: &str = "DESCONHECIDO";

// ─── Options ─────────────────────────────────────────────────────────────────

/// What to do with data left over from earlier runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ReprocessPolicy {
  /// Wipe every table, then query every valid number.
  #[default]
  #[strum(to_string = "full", serialize = "full-reprocess")]
  FullReprocess,
  /// Keep existing rows and skip numbers already in the master index.
  #[strum(to_string = "skip-known")]
  SkipKnown,
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
  pub policy: ReprocessPolicy,
  /// Pause after every query attempt.
  pub delay:  Duration,
}

impl Default for RunOptions {
  fn default() -> Self {
    Self { policy: ReprocessPolicy::default(), delay: Duration::from_millis(300) }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
  pub found:                     u64,
  /// Every valid number that was queried without a hit, whatever the reason.
  pub not_found:                 u64,
  /// Subset of `not_found` that carried a court hint.
  pub not_found_in_hinted_court: u64,
  /// Subset of `not_found` whose hint named no known court.
  pub unknown_court:             u64,
  pub invalid:                   u64,
  pub skipped_known:             u64,
  pub cases_persisted:           u64,
  pub movements_persisted:       u64,
}

#[derive(Debug, Clone)]
pub struct RunReport {
  pub policy:        ReprocessPolicy,
  pub stats:         RunStats,
  pub counts_before: TableCounts,
  pub counts_after:  TableCounts,
}

impl fmt::Display for RunReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = &self.stats;
    let (before, after) = (&self.counts_before, &self.counts_after);
    writeln!(f, "policy: {}", self.policy)?;
    writeln!(
      f,
      "found: {}  not found: {} (in hinted court: {}, unknown court: {})  invalid: {}  skipped: {}",
      s.found, s.not_found, s.not_found_in_hinted_court, s.unknown_court, s.invalid, s.skipped_known,
    )?;
    writeln!(f, "persisted this run: {} cases, {} movements", s.cases_persisted, s.movements_persisted)?;
    writeln!(
      f,
      "store before: {} cases, {} movements, {} indexed",
      before.cases, before.movements, before.indexed,
    )?;
    write!(
      f,
      "store after:  {} cases, {} movements, {} indexed",
      after.cases, after.movements, after.indexed,
    )
  }
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

pub struct Orchestrator<'a, S, R> {
  store:    &'a S,
  resolver: &'a R,
  options:  RunOptions,
}

enum Outcome {
  Found { cases: u64, movements: u64 },
  Missed(QueryFailure),
}

impl<'a, S, R> Orchestrator<'a, S, R>
where
  S: CaseStore,
  R: CaseResolver,
{
  pub fn new(store: &'a S, resolver: &'a R, options: RunOptions) -> Self {
    Self { store, resolver, options }
  }

  /// Run one batch to completion.
  ///
  /// Query failures are counted and never abort the run; store errors do.
  pub async fn run(&self, batch: &InputBatch) -> Result<RunReport, S::Error> {
    self.store.ensure_schema().await?;
    let counts_before = self.store.counts().await?;
    info!(
      cases = counts_before.cases,
      movements = counts_before.movements,
      indexed = counts_before.indexed,
      policy = %self.options.policy,
      "existing rows"
    );

    let known: HashSet<String> = match self.options.policy {
      ReprocessPolicy::FullReprocess => {
        self.store.reset().await?;
        info!("store cleared for full reprocess");
        HashSet::new()
      }
      ReprocessPolicy::SkipKnown => self.store.known_numbers().await?,
    };

    let mut stats = RunStats { invalid: batch.invalid.len() as u64, ..RunStats::default() };
    if !batch.invalid.is_empty() {
      warn!(count = batch.invalid.len(), numbers = ?batch.invalid, "too short to query");
    }

    let total = batch.valid.len();
    for (i, entry) in batch.valid.iter().enumerate() {
      if known.contains(entry.number.as_str()) {
        stats.skipped_known += 1;
        continue;
      }

      info!(
        index = i + 1,
        total,
        number = %entry.number,
        court = entry.court_hint.as_deref().unwrap_or("*"),
        "processing"
      );

      match self.process(entry).await? {
        Outcome::Found { cases, movements } => {
          stats.found += 1;
          stats.cases_persisted += cases;
          stats.movements_persisted += movements;
        }
        Outcome::Missed(failure) => {
          stats.not_found += 1;
          if entry.court_hint.is_some() {
            stats.not_found_in_hinted_court += 1;
          }
          if failure.reason == FailureReason::UnknownCourt {
            stats.unknown_court += 1;
          }
          warn!(number = %entry.number, reason = %failure.reason, detail = %failure.detail, "not found");
        }
      }

      tokio::time::sleep(self.options.delay).await;
    }

    let counts_after = self.store.counts().await?;
    Ok(RunReport { policy: self.options.policy, stats, counts_before, counts_after })
  }

  async fn process(&self, entry: &BatchEntry) -> Result<Outcome, S::Error> {
    let hint = entry.court_hint.as_deref();

    let resolution = match self.resolver.resolve(&entry.number, hint).await {
      Ok(r) if r.document.has_hits() => r,
      Ok(_) => {
        return Ok(Outcome::Missed(QueryFailure::new(
          FailureReason::NotFound,
          "resolution carried no hits",
        )));
      }
      Err(failure) => return Ok(Outcome::Missed(failure)),
    };

    let rows = extract(&resolution.document);
    self.store.append(&rows.cases, &rows.movements).await?;

    let court = registration_court(hint, &resolution);
    self.store.register(&entry.number, court).await?;
    info!(number = %entry.number, court, cases = rows.cases.len(), movements = rows.movements.len(), "found");

    Ok(Outcome::Found { cases: rows.cases.len() as u64, movements: rows.movements.len() as u64 })
  }
}

/// Court to record as "first found in": the caller's hint, then the court the
/// resolver answered from, then the first hit's own `tribunal`.
fn registration_court<'a>(hint: Option<&'a str>, resolution: &'a Resolution) -> &'a str {
  hint
    .or(resolution.court.as_deref())
    .or_else(|| resolution.document.first_hit_court())
    .unwrap_or(UNKNOWN_COURT)
}
