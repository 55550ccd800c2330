//! datajud-ingest batch binary.
//!
//! Reads `datajud.toml` (or the path given with `--config`), loads the input
//! CSV, resolves every valid case number through the configured mode, and
//! persists the results into a SQLite store.
//!
//! ```sh
//! cargo run -p datajud-ingest -- --input processos.csv --mode direct
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use datajud_ingest::{
  InputBatch, Orchestrator, ReprocessPolicy, RunReport, Settings, input::read_csv,
};
use datajud_query::{OperatingMode, QueryRouter};
use datajud_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Reconcile case numbers against DataJud")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "datajud.toml")]
  config: PathBuf,

  /// Input CSV file.
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// SQLite database file.
  #[arg(short, long)]
  database: Option<PathBuf>,

  /// `intermediary` (alias `api`) or `direct` (alias `direto`).
  #[arg(short, long)]
  mode: Option<OperatingMode>,

  /// `full` or `skip-known`.
  #[arg(short, long)]
  policy: Option<ReprocessPolicy>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if let Err(err) = run(cli).await {
    tracing::error!("{err:?}");
    return Err(err);
  }
  Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
  let path_override = |p: Option<PathBuf>| p.map(|p| p.to_string_lossy().into_owned());
  let settings = Settings::load(&cli.config, [
    ("input", path_override(cli.input)),
    ("database", path_override(cli.database)),
    ("mode", cli.mode.map(|m| m.to_string())),
    ("policy", cli.policy.map(|p| p.to_string())),
  ])
  .with_context(|| format!("failed to load settings from {:?}", cli.config))?;

  let query_config = settings.query_config()?;
  let options = settings.run_options()?;
  let mode = query_config.mode;

  let router = QueryRouter::new(query_config).context("invalid query configuration")?;
  tracing::info!(%mode, policy = %options.policy, courts = router.config().courts.len(), "starting run");

  if mode == OperatingMode::Intermediary {
    router.health_check().await.with_context(|| {
      format!("intermediary service at {} is not healthy", router.config().intermediary_url)
    })?;
  }

  // Read and partition the input before touching the store, so a bad input
  // file never triggers a reset.
  let table = read_csv(&settings.input, settings.delimiter()?)
    .with_context(|| format!("failed to read input {:?}", settings.input))?;
  let batch = InputBatch::from_table(table);
  tracing::info!(
    valid = batch.valid.len(),
    invalid = batch.invalid.len(),
    court_column = batch.has_court_column,
    "input loaded"
  );

  let db_path = expand_tilde(&settings.database);
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;

  let report = Orchestrator::new(&store, &router, options)
    .run(&batch)
    .await
    .context("store error during run")?;

  log_summary(&report, mode);
  Ok(())
}

fn log_summary(report: &RunReport, mode: OperatingMode) {
  let s = &report.stats;
  let after = &report.counts_after;
  tracing::info!(
    found = s.found,
    not_found = s.not_found,
    not_found_in_hinted_court = s.not_found_in_hinted_court,
    unknown_court = s.unknown_court,
    invalid = s.invalid,
    skipped_known = s.skipped_known,
    cases_persisted = s.cases_persisted,
    movements_persisted = s.movements_persisted,
    "run finished"
  );
  tracing::info!(
    cases_before = report.counts_before.cases,
    movements_before = report.counts_before.movements,
    indexed_before = report.counts_before.indexed,
    cases = after.cases,
    movements = after.movements,
    indexed = after.indexed,
    "store totals"
  );
  tracing::info!("summary\n{report}");

  if after.is_empty() {
    match mode {
      OperatingMode::Intermediary => tracing::warn!(
        "store is empty; check that the intermediary service can reach DataJud and that the \
         input numbers are correct"
      ),
      OperatingMode::Direct => tracing::warn!(
        "store is empty; check the API key and the court endpoint table"
      ),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
