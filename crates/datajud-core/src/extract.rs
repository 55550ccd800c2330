//! Flattening of search documents into [`CaseRecord`] and [`MovementRecord`]
//! rows.
//!
//! Extraction never fails. A document without a `hits.hits` array yields no
//! rows; a hit missing a nested object (`classe`, `orgaoJulgador`, ...) yields
//! NULL columns for that object.

use serde_json::Value;

use crate::{
  record::{CaseRecord, MovementRecord},
  search::SearchDocument,
};

/// Rows extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
  pub cases:     Vec<CaseRecord>,
  pub movements: Vec<MovementRecord>,
}

impl Extracted {
  pub fn is_empty(&self) -> bool { self.cases.is_empty() && self.movements.is_empty() }
}

pub fn extract(document: &SearchDocument) -> Extracted {
  let mut out = Extracted::default();

  for hit in document.hits() {
    let source = hit.get("_source").unwrap_or(&Value::Null);
    let case = case_from_source(source);

    for movement in array(source, "movimentos") {
      out.movements.push(movement_from_value(case.case_number.clone(), movement));
    }
    out.cases.push(case);
  }

  out
}

fn case_from_source(src: &Value) -> CaseRecord {
  let class = object(src, "classe");
  let format = object(src, "formato");
  let system = object(src, "sistema");
  let body = object(src, "orgaoJulgador");

  CaseRecord {
    source_id:                  text(src, "id"),
    court:                      text(src, "tribunal"),
    case_number:                text(src, "numeroProcesso"),
    degree:                     text(src, "grau"),
    filed_at:                   text(src, "dataAjuizamento"),
    confidentiality_level:      integer(src, "nivelSigilo"),
    class_code:                 integer(class, "codigo"),
    class_name:                 text(class, "nome"),
    format_code:                integer(format, "codigo"),
    format_name:                text(format, "nome"),
    system_code:                integer(system, "codigo"),
    system_name:                text(system, "nome"),
    deciding_body_code:         integer(body, "codigo"),
    deciding_body_name:         text(body, "nome"),
    deciding_body_municipality: integer(body, "codigoMunicipioIBGE"),
    last_updated_at:            text(src, "dataHoraUltimaAtualizacao"),
    indexed_at:                 text(src, "@timestamp"),
  }
}

fn movement_from_value(case_number: Option<String>, m: &Value) -> MovementRecord {
  let body = object(m, "orgaoJulgador");

  MovementRecord {
    case_number,
    code:               integer(m, "codigo"),
    name:               text(m, "nome"),
    occurred_at:        text(m, "dataHora"),
    deciding_body_code: integer(body, "codigoOrgao"),
    deciding_body_name: text(body, "nomeOrgao"),
  }
}

// ─── Lenient field access ────────────────────────────────────────────────────

/// Nested object at `key`; `Null` stands in for a missing one.
fn object<'a>(v: &'a Value, key: &str) -> &'a Value {
  v.get(key).filter(|o| o.is_object()).unwrap_or(&Value::Null)
}

fn array<'a>(v: &'a Value, key: &str) -> &'a [Value] {
  v.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
}

fn text(v: &Value, key: &str) -> Option<String> {
  match v.get(key)? {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}

fn integer(v: &Value, key: &str) -> Option<i64> {
  match v.get(key)? {
    Value::Number(n) => n.as_i64(),
    Value::String(s) => s.trim().parse().ok(),
    _ => None,
  }
}
