//! The `CaseStore` trait.
//!
//! Implemented by storage backends (e.g. `datajud-store-sqlite`). The batch
//! orchestrator depends on this abstraction, not on any concrete backend.

use std::{collections::HashSet, future::Future};

use crate::{
  CaseNumber,
  record::{CaseRecord, MasterIndexEntry, MovementRecord, TableCounts},
};

/// Abstraction over the relational store of cases, movements, and the master
/// index.
///
/// Case and movement rows are append-only; the master index is upserted. Only
/// [`reset`](CaseStore::reset) ever deletes.
pub trait CaseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Schema ────────────────────────────────────────────────────────────

  /// Create the three tables and their lookup indexes if missing. Safe to
  /// call on every run.
  fn ensure_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete every row from every table.
  fn reset(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Append case and movement rows in one transaction. Empty input is a
  /// no-op.
  fn append<'a>(
    &'a self,
    cases: &'a [CaseRecord],
    movements: &'a [MovementRecord],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Upsert the master-index entry for `number`.
  ///
  /// A new entry gets `first_seen = last_update = now`. An existing entry
  /// keeps its court and `first_seen`; only `last_update` moves, and never
  /// backwards.
  fn register<'a>(
    &'a self,
    number: &'a CaseNumber,
    court: &'a str,
  ) -> impl Future<Output = Result<MasterIndexEntry, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every case number present in the master index.
  fn known_numbers(&self) -> impl Future<Output = Result<HashSet<String>, Self::Error>> + Send + '_;

  fn index_entry<'a>(
    &'a self,
    number: &'a str,
  ) -> impl Future<Output = Result<Option<MasterIndexEntry>, Self::Error>> + Send + 'a;

  fn counts(&self) -> impl Future<Output = Result<TableCounts, Self::Error>> + Send + '_;
}
