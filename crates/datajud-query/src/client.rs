//! Async HTTP client for the DataJud court endpoints and the intermediary
//! query service.
//!
//! Every call returns a tagged outcome rather than an error: transport
//! problems, non-2xx statuses, and undecodable bodies all become a
//! [`QueryFailure`].

use std::time::Duration;

use datajud_core::search::{FailureReason, QueryFailure, SearchDocument};
use reqwest::{Client, Response, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{Error, Result, courts::CourtEndpoint};

/// Longest slice of a response body carried into a failure detail.
const MAX_DETAIL_LEN: usize = 512;

/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct DataJudClient {
  client:  Client,
  api_key: Option<String>,
}

// ─── Intermediary wire types ─────────────────────────────────────────────────

/// Body of `POST /consultar-processo`.
#[derive(Debug, Serialize)]
struct ConsultRequest<'a> {
  numero:   &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  tribunal: Option<&'a str>,
}

/// Reply of `POST /consultar-processo`.
#[derive(Debug, Deserialize)]
struct ConsultResponse {
  #[serde(default)]
  sucesso:    bool,
  #[serde(default)]
  encontrado: bool,
  dados:      Option<Value>,
  erro:       Option<String>,
}

impl DataJudClient {
  pub fn new(api_key: Option<String>) -> Result<Self> {
    let client = Client::builder().build().map_err(Error::Client)?;
    Ok(Self { client, api_key })
  }

  // ── Direct ────────────────────────────────────────────────────────────────

  /// `POST <court search url>` with a `match` query on `numeroProcesso`.
  ///
  /// A 2xx response is returned as-is, whether or not it has hits.
  pub async fn search_court(
    &self,
    court: &CourtEndpoint,
    number: &str,
    page_size: u32,
    timeout: Duration,
  ) -> Result<SearchDocument, QueryFailure> {
    let body = json!({
      "size": page_size,
      "query": { "match": { "numeroProcesso": number } },
    });

    let mut req = self.client.post(&court.url).timeout(timeout).json(&body);
    if let Some(key) = &self.api_key {
      req = req.header(AUTHORIZATION, format!("ApiKey {key}"));
    }

    let resp = req.send().await.map_err(|e| transport(&court.code, e))?;
    let resp = ensure_success(&court.code, resp).await?;
    let bytes = resp.bytes().await.map_err(|e| transport(&court.code, e))?;

    SearchDocument::from_slice(&bytes).map_err(|e| {
      QueryFailure::new(FailureReason::Malformed, format!("{}: {e}", court.code))
    })
  }

  // ── Intermediary ──────────────────────────────────────────────────────────

  /// `POST {base_url}/consultar-processo`.
  ///
  /// Returns the relayed document only when the service reports both
  /// `sucesso` and `encontrado`.
  pub async fn consult(
    &self,
    base_url: &str,
    number: &str,
    court_hint: Option<&str>,
    timeout: Duration,
  ) -> Result<SearchDocument, QueryFailure> {
    const SOURCE: &str = "intermediary";
    let url = format!("{}/consultar-processo", base_url.trim_end_matches('/'));

    let resp = self
      .client
      .post(&url)
      .timeout(timeout)
      .json(&ConsultRequest { numero: number, tribunal: court_hint })
      .send()
      .await
      .map_err(|e| transport(SOURCE, e))?;
    let resp = ensure_success(SOURCE, resp).await?;
    let bytes = resp.bytes().await.map_err(|e| transport(SOURCE, e))?;

    let reply: ConsultResponse = serde_json::from_slice(&bytes).map_err(|e| {
      QueryFailure::new(FailureReason::Malformed, format!("{SOURCE}: {e}"))
    })?;

    match reply {
      ConsultResponse { sucesso: true, encontrado: true, dados: Some(dados), .. } => {
        Ok(SearchDocument::new(dados))
      }
      ConsultResponse { sucesso: true, encontrado: true, dados: None, .. } => Err(
        QueryFailure::new(FailureReason::Malformed, format!("{SOURCE}: found without `dados`")),
      ),
      ConsultResponse { sucesso: true, encontrado: false, erro, .. } => Err(QueryFailure::new(
        FailureReason::NotFound,
        erro.unwrap_or_else(|| format!("{number} not found")),
      )),
      ConsultResponse { sucesso: false, erro, .. } => Err(QueryFailure::new(
        FailureReason::Remote,
        erro.unwrap_or_else(|| format!("{SOURCE}: request unsuccessful")),
      )),
    }
  }

  /// `GET {base_url}/health`; any 2xx status counts as healthy.
  pub async fn health(&self, base_url: &str, timeout: Duration) -> Result<()> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    let unavailable = |detail: String| Error::Unavailable { url: url.clone(), detail };

    let resp = self
      .client
      .get(&url)
      .timeout(timeout)
      .send()
      .await
      .map_err(|e| unavailable(e.to_string()))?;

    if resp.status().is_success() {
      Ok(())
    } else {
      Err(unavailable(format!("status {}", resp.status())))
    }
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn transport(source: &str, e: reqwest::Error) -> QueryFailure {
  QueryFailure::new(FailureReason::Transport, format!("{source}: {e}"))
}

/// Turn a non-2xx response into a `Remote` failure carrying the status and a
/// prefix of the body. A JSON `{"erro": ...}` body contributes its message.
async fn ensure_success(source: &str, resp: Response) -> Result<Response, QueryFailure> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }

  let body = resp.text().await.unwrap_or_default();
  let message = serde_json::from_str::<Value>(&body)
    .ok()
    .and_then(|v| v.get("erro").and_then(Value::as_str).map(str::to_owned))
    .unwrap_or_else(|| truncate(&body, MAX_DETAIL_LEN).to_owned());

  Err(QueryFailure::new(
    FailureReason::Remote,
    format!("{source}: status {}: {message}", status.as_u16()),
  ))
}

fn truncate(s: &str, max: usize) -> &str {
  if s.len() <= max {
    return s;
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  &s[..end]
}
