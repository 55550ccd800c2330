//! Router tests against in-process axum servers standing in for the court
//! endpoints and the intermediary service.

use std::{
  sync::{Arc, Mutex},
  time::Duration,
};

use axum::{
  Json, Router,
  http::{HeaderMap, StatusCode},
  routing::{get, post},
};
use datajud_core::{
  CaseNumber,
  search::{CaseResolver, FailureReason},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::{CourtTable, Error, OperatingMode, QueryConfig, QueryRouter};

const NUMBER: &str = "04251444420168190001";

type Calls = Arc<Mutex<Vec<String>>>;

async fn spawn(app: Router) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  format!("http://{addr}")
}

fn number() -> CaseNumber { CaseNumber::parse(NUMBER).unwrap() }

fn hits(court: &str, n: usize) -> Value {
  let hits: Vec<Value> = (0..n)
    .map(|_| json!({ "_source": { "tribunal": court, "numeroProcesso": NUMBER } }))
    .collect();
  json!({ "hits": { "total": { "value": n }, "hits": hits } })
}

/// A fake court that records `(code, authorization, requested number)` and
/// answers with `hit_count` hits, or with `status` if it is not 200.
fn court_route(code: &'static str, hit_count: usize, status: StatusCode, calls: Calls) -> Router {
  Router::new().route(
    &format!("/api_publica_{}/_search", code.to_lowercase()),
    post(move |headers: HeaderMap, Json(body): Json<Value>| {
      let calls = calls.clone();
      async move {
        let auth = headers
          .get("authorization")
          .and_then(|v| v.to_str().ok())
          .unwrap_or_default()
          .to_owned();
        let requested = body["query"]["match"]["numeroProcesso"]
          .as_str()
          .unwrap_or_default()
          .to_owned();
        calls.lock().unwrap().push(format!("{code}|{auth}|{requested}"));
        (status, Json(hits(code, hit_count)))
      }
    }),
  )
}

fn direct_config(base: &str, codes: &[&str]) -> QueryConfig {
  QueryConfig {
    mode: OperatingMode::Direct,
    api_key: Some("secret".into()),
    courts: CourtTable::from_pairs(
      codes
        .iter()
        .map(|c| (*c, format!("{base}/api_publica_{}/_search", c.to_lowercase()))),
    ),
    delay: Duration::ZERO,
    ..QueryConfig::default()
  }
}

fn codes(calls: &Calls) -> Vec<String> {
  calls
    .lock()
    .unwrap()
    .iter()
    .map(|c| c.split('|').next().unwrap().to_owned())
    .collect()
}

// ─── Direct mode ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn fallback_stops_at_first_court_with_a_hit() {
  let calls: Calls = Arc::default();
  let app = court_route("A", 0, StatusCode::OK, calls.clone())
    .merge(court_route("B", 1, StatusCode::OK, calls.clone()))
    .merge(court_route("C", 1, StatusCode::OK, calls.clone()));
  let base = spawn(app).await;

  let router = QueryRouter::new(direct_config(&base, &["A", "B", "C"])).unwrap();
  let resolution = router.resolve(&number(), None).await.unwrap();

  assert_eq!(codes(&calls), ["A", "B"]);
  assert_eq!(resolution.court.as_deref(), Some("B"));
  assert_eq!(resolution.document.first_hit_court(), Some("B"));
}

#[tokio::test]
async fn fallback_continues_past_failing_courts() {
  let calls: Calls = Arc::default();
  let app = court_route("A", 0, StatusCode::INTERNAL_SERVER_ERROR, calls.clone())
    .merge(court_route("B", 2, StatusCode::OK, calls.clone()));
  let base = spawn(app).await;

  let router = QueryRouter::new(direct_config(&base, &["A", "B"])).unwrap();
  let resolution = router.resolve(&number(), None).await.unwrap();

  assert_eq!(codes(&calls), ["A", "B"]);
  assert_eq!(resolution.document.hits().len(), 2);
}

#[tokio::test]
async fn fallback_without_any_hit_is_not_found_in_any_court() {
  let calls: Calls = Arc::default();
  let app = court_route("A", 0, StatusCode::OK, calls.clone())
    .merge(court_route("B", 0, StatusCode::OK, calls.clone()));
  let base = spawn(app).await;

  let router = QueryRouter::new(direct_config(&base, &["A", "B"])).unwrap();
  let failure = router.resolve(&number(), None).await.unwrap_err();

  assert_eq!(failure.reason, FailureReason::NotFoundInAnyCourt);
  assert_eq!(codes(&calls), ["A", "B"]);
}

#[tokio::test]
async fn hinted_court_is_the_only_one_queried() {
  let calls: Calls = Arc::default();
  let app = court_route("A", 1, StatusCode::OK, calls.clone())
    .merge(court_route("B", 1, StatusCode::OK, calls.clone()));
  let base = spawn(app).await;

  let router = QueryRouter::new(direct_config(&base, &["A", "B"])).unwrap();
  let resolution = router.resolve(&number(), Some(" b ")).await.unwrap();

  assert_eq!(resolution.court.as_deref(), Some("B"));
  let recorded = calls.lock().unwrap().clone();
  assert_eq!(recorded, [format!("B|ApiKey secret|{NUMBER}")]);
}

#[tokio::test]
async fn hinted_court_without_hits_is_not_found() {
  let calls: Calls = Arc::default();
  let base = spawn(court_route("A", 0, StatusCode::OK, calls.clone())).await;

  let router = QueryRouter::new(direct_config(&base, &["A"])).unwrap();
  let failure = router.resolve(&number(), Some("A")).await.unwrap_err();
  assert_eq!(failure.reason, FailureReason::NotFound);
}

#[tokio::test]
async fn unknown_court_hint_is_distinct_from_not_found() {
  let calls: Calls = Arc::default();
  let base = spawn(court_route("A", 1, StatusCode::OK, calls.clone())).await;

  let router = QueryRouter::new(direct_config(&base, &["A"])).unwrap();
  let failure = router.resolve(&number(), Some("TJXX")).await.unwrap_err();

  assert_eq!(failure.reason, FailureReason::UnknownCourt);
  assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn remote_error_status_is_tagged_remote() {
  let calls: Calls = Arc::default();
  let base = spawn(court_route("A", 0, StatusCode::UNAUTHORIZED, calls.clone())).await;

  let router = QueryRouter::new(direct_config(&base, &["A"])).unwrap();
  let failure = router.resolve(&number(), Some("A")).await.unwrap_err();

  assert_eq!(failure.reason, FailureReason::Remote);
  assert!(failure.detail.contains("401"), "{}", failure.detail);
}

#[tokio::test]
async fn non_json_body_is_malformed() {
  let app = Router::new().route("/api_publica_a/_search", post(|| async { "<html>oops</html>" }));
  let base = spawn(app).await;

  let router = QueryRouter::new(direct_config(&base, &["A"])).unwrap();
  let failure = router.resolve(&number(), Some("A")).await.unwrap_err();
  assert_eq!(failure.reason, FailureReason::Malformed);
}

#[tokio::test]
async fn unreachable_court_is_a_transport_failure() {
  // Bind then drop to get a port nothing listens on.
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let base = format!("http://{}", listener.local_addr().unwrap());
  drop(listener);

  let router = QueryRouter::new(direct_config(&base, &["A"])).unwrap();
  let failure = router.resolve(&number(), Some("A")).await.unwrap_err();
  assert_eq!(failure.reason, FailureReason::Transport);
}

#[test]
fn direct_router_requires_api_key() {
  let cfg = QueryConfig { api_key: None, ..direct_config("http://x", &["A"]) };
  assert!(matches!(QueryRouter::new(cfg), Err(Error::MissingApiKey)));
}

// ─── Intermediary mode ───────────────────────────────────────────────────────

fn intermediary(base: &str) -> QueryRouter {
  QueryRouter::new(QueryConfig {
    mode: OperatingMode::Intermediary,
    intermediary_url: base.to_owned(),
    delay: Duration::ZERO,
    ..QueryConfig::default()
  })
  .unwrap()
}

fn consult_route(reply: Value, status: StatusCode, calls: Calls) -> Router {
  Router::new().route(
    "/consultar-processo",
    post(move |Json(body): Json<Value>| {
      let calls = calls.clone();
      let reply = reply.clone();
      async move {
        calls.lock().unwrap().push(body.to_string());
        (status, Json(reply))
      }
    }),
  )
}

#[tokio::test]
async fn intermediary_found_returns_relayed_document() {
  let calls: Calls = Arc::default();
  let reply = json!({ "sucesso": true, "encontrado": true, "dados": hits("TJSP", 1) });
  let base = spawn(consult_route(reply, StatusCode::OK, calls.clone())).await;

  let resolution = intermediary(&base).resolve(&number(), Some("TJSP")).await.unwrap();
  assert_eq!(resolution.court.as_deref(), Some("TJSP"));
  assert!(resolution.document.has_hits());

  let sent: Value = serde_json::from_str(&calls.lock().unwrap()[0]).unwrap();
  assert_eq!(sent, json!({ "numero": NUMBER, "tribunal": "TJSP" }));
}

#[tokio::test]
async fn intermediary_not_found_carries_message() {
  let calls: Calls = Arc::default();
  let reply = json!({ "sucesso": true, "encontrado": false, "erro": "Processo não encontrado" });
  let base = spawn(consult_route(reply, StatusCode::OK, calls)).await;

  let failure = intermediary(&base).resolve(&number(), None).await.unwrap_err();
  assert_eq!(failure.reason, FailureReason::NotFound);
  assert_eq!(failure.detail, "Processo não encontrado");
}

#[tokio::test]
async fn intermediary_found_but_empty_is_not_found() {
  let calls: Calls = Arc::default();
  let reply = json!({ "sucesso": true, "encontrado": true, "dados": hits("TJSP", 0) });
  let base = spawn(consult_route(reply, StatusCode::OK, calls)).await;

  let failure = intermediary(&base).resolve(&number(), None).await.unwrap_err();
  assert_eq!(failure.reason, FailureReason::NotFound);
}

#[tokio::test]
async fn intermediary_error_payload_is_remote() {
  let calls: Calls = Arc::default();
  let reply = json!({ "erro": "Tribunal indisponível" });
  let base = spawn(consult_route(reply, StatusCode::BAD_GATEWAY, calls)).await;

  let failure = intermediary(&base).resolve(&number(), None).await.unwrap_err();
  assert_eq!(failure.reason, FailureReason::Remote);
  assert!(failure.detail.contains("Tribunal indisponível"));
  assert!(failure.detail.contains("502"));
}

#[tokio::test]
async fn intermediary_unsuccessful_reply_is_remote() {
  let calls: Calls = Arc::default();
  let reply = json!({ "sucesso": false, "encontrado": false, "erro": "timeout upstream" });
  let base = spawn(consult_route(reply, StatusCode::OK, calls)).await;

  let failure = intermediary(&base).resolve(&number(), None).await.unwrap_err();
  assert_eq!(failure.reason, FailureReason::Remote);
  assert_eq!(failure.detail, "timeout upstream");
}

#[tokio::test]
async fn intermediary_found_without_document_is_malformed() {
  let calls: Calls = Arc::default();
  let reply = json!({ "sucesso": true, "encontrado": true });
  let base = spawn(consult_route(reply, StatusCode::OK, calls)).await;

  let failure = intermediary(&base).resolve(&number(), None).await.unwrap_err();
  assert_eq!(failure.reason, FailureReason::Malformed);
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_check_passes_on_2xx() {
  let app = Router::new().route("/health", get(|| async { Json(json!({ "status": "ok" })) }));
  let base = spawn(app).await;
  intermediary(&base).health_check().await.unwrap();
}

#[tokio::test]
async fn health_check_fails_on_error_status() {
  let app = Router::new().route("/health", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
  let base = spawn(app).await;

  let err = intermediary(&base).health_check().await.unwrap_err();
  assert!(matches!(err, Error::Unavailable { .. }));
}

#[tokio::test]
async fn health_check_is_skipped_in_direct_mode() {
  let router = QueryRouter::new(direct_config("http://127.0.0.1:9", &["A"])).unwrap();
  router.health_check().await.unwrap();
}
