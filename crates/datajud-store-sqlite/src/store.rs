//! [`SqliteStore`] — the SQLite implementation of [`CaseStore`].

use std::{collections::HashSet, path::Path};

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use datajud_core::{
  CaseNumber,
  record::{CaseRecord, MasterIndexEntry, MovementRecord, TableCounts},
  store::CaseStore,
};

use crate::{
  Error, Result,
  encode::{RawIndexEntry, encode_dt},
  schema::{RESET, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A case store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// [`CaseStore::register`] with a caller-supplied clock.
  ///
  /// Timestamps are stored to the second, and `last_update` never moves
  /// backwards: an `at` older than the stored value leaves it unchanged.
  pub async fn register_at(
    &self,
    number: &str,
    court:  &str,
    at:     DateTime<Utc>,
  ) -> Result<MasterIndexEntry> {
    let number_str = number.to_owned();
    let court_str  = court.to_owned();
    let at_str     = encode_dt(at);

    let raw: Option<RawIndexEntry> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO processos_lista (numeroProcesso, tribunal_inicial, primeiraInclusao, ultimoUpdate)
           VALUES (?1, ?2, ?3, ?3)
           ON CONFLICT(numeroProcesso) DO UPDATE
             SET ultimoUpdate = max(ultimoUpdate, excluded.ultimoUpdate)",
          rusqlite::params![number_str, court_str, at_str],
        )?;
        let raw = tx
          .query_row(
            "SELECT numeroProcesso, tribunal_inicial, primeiraInclusao, ultimoUpdate
             FROM processos_lista WHERE numeroProcesso = ?1",
            rusqlite::params![number_str],
            RawIndexEntry::from_row,
          )
          .optional()?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw
      .ok_or_else(|| Error::IndexEntryMissing(number.to_owned()))?
      .into_entry()
  }
}

// ─── CaseStore impl ──────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = Error;

  async fn ensure_schema(&self) -> Result<()> { self.init_schema().await }

  async fn reset(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(RESET)?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    debug!("store reset");
    Ok(())
  }

  async fn append(&self, cases: &[CaseRecord], movements: &[MovementRecord]) -> Result<()> {
    if cases.is_empty() && movements.is_empty() {
      return Ok(());
    }

    let cases     = cases.to_vec();
    let movements = movements.to_vec();
    let (n_cases, n_movements) = (cases.len(), movements.len());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare_cached(
            "INSERT INTO processos (
               id, tribunal, numeroProcesso, grau, dataAjuizamento, nivelSigilo,
               classe_codigo, classe_nome, formato_codigo, formato_nome,
               sistema_codigo, sistema_nome,
               orgaoJulgador_codigo, orgaoJulgador_nome, orgaoJulgador_codigoMunicipioIBGE,
               dataHoraUltimaAtualizacao, timestamp_indice
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
          )?;
          for c in &cases {
            stmt.execute(rusqlite::params![
              c.source_id,
              c.court,
              c.case_number,
              c.degree,
              c.filed_at,
              c.confidentiality_level,
              c.class_code,
              c.class_name,
              c.format_code,
              c.format_name,
              c.system_code,
              c.system_name,
              c.deciding_body_code,
              c.deciding_body_name,
              c.deciding_body_municipality,
              c.last_updated_at,
              c.indexed_at,
            ])?;
          }

          let mut stmt = tx.prepare_cached(
            "INSERT INTO movimentos (
               numeroProcesso, mov_codigo, mov_nome, mov_dataHora,
               mov_orgao_codigo, mov_orgao_nome
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          )?;
          for m in &movements {
            stmt.execute(rusqlite::params![
              m.case_number,
              m.code,
              m.name,
              m.occurred_at,
              m.deciding_body_code,
              m.deciding_body_name,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    debug!(cases = n_cases, movements = n_movements, "rows appended");
    Ok(())
  }

  async fn register(&self, number: &CaseNumber, court: &str) -> Result<MasterIndexEntry> {
    self.register_at(number.as_str(), court, Utc::now()).await
  }

  async fn known_numbers(&self) -> Result<HashSet<String>> {
    let numbers = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT numeroProcesso FROM processos_lista")?;
        let rows = stmt
          .query_map([], |row| row.get::<_, String>(0))?
          .collect::<rusqlite::Result<HashSet<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(numbers)
  }

  async fn index_entry(&self, number: &str) -> Result<Option<MasterIndexEntry>> {
    let number_str = number.to_owned();

    let raw: Option<RawIndexEntry> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT numeroProcesso, tribunal_inicial, primeiraInclusao, ultimoUpdate
             FROM processos_lista WHERE numeroProcesso = ?1",
            rusqlite::params![number_str],
            RawIndexEntry::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawIndexEntry::into_entry).transpose()
  }

  async fn counts(&self) -> Result<TableCounts> {
    let (cases, movements, indexed): (i64, i64, i64) = self
      .conn
      .call(|conn| {
        let count = |table: &str| -> rusqlite::Result<i64> {
          conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        };
        Ok((count("processos")?, count("movimentos")?, count("processos_lista")?))
      })
      .await?;

    Ok(TableCounts {
      cases:     cases as u64,
      movements: movements as u64,
      indexed:   indexed as u64,
    })
  }
}
