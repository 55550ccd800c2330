//! SQL schema for the DataJud SQLite store.
//!
//! Table and column names follow the DataJud field vocabulary so that
//! downstream consumers can query the file without a mapping layer.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per matched case document. Append-only between resets.
CREATE TABLE IF NOT EXISTS processos (
    id                                TEXT,
    tribunal                          TEXT,
    numeroProcesso                    TEXT,
    grau                              TEXT,
    dataAjuizamento                   TEXT,
    nivelSigilo                       INTEGER,
    classe_codigo                     INTEGER,
    classe_nome                       TEXT,
    formato_codigo                    INTEGER,
    formato_nome                      TEXT,
    sistema_codigo                    INTEGER,
    sistema_nome                      TEXT,
    orgaoJulgador_codigo              INTEGER,
    orgaoJulgador_nome                TEXT,
    orgaoJulgador_codigoMunicipioIBGE INTEGER,
    dataHoraUltimaAtualizacao         TEXT,
    timestamp_indice                  TEXT
);

-- Movements (1:N by numeroProcesso, not enforced).
CREATE TABLE IF NOT EXISTS movimentos (
    numeroProcesso   TEXT,
    mov_codigo       INTEGER,
    mov_nome         TEXT,
    mov_dataHora     TEXT,
    mov_orgao_codigo INTEGER,
    mov_orgao_nome   TEXT
);

-- Master index: one row per case number ever registered.
-- tribunal_inicial and primeiraInclusao are never updated.
CREATE TABLE IF NOT EXISTS processos_lista (
    numeroProcesso   TEXT PRIMARY KEY,
    tribunal_inicial TEXT,
    primeiraInclusao TEXT,   -- RFC 3339 UTC, seconds
    ultimoUpdate     TEXT    -- RFC 3339 UTC, seconds
);

CREATE INDEX IF NOT EXISTS ix_proc_numero ON processos (numeroProcesso);
CREATE INDEX IF NOT EXISTS ix_mov_numero  ON movimentos (numeroProcesso);
";

/// Wipes every table; run inside one transaction.
pub const RESET: &str = "
DELETE FROM processos;
DELETE FROM movimentos;
DELETE FROM processos_lista;
";
