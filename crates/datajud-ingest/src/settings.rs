//! Layered run settings: built-in defaults, then the TOML file, then
//! `DATAJUD_*` environment variables, then command-line overrides.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use datajud_query::{
  CourtEndpoint, CourtTable, OperatingMode, QueryConfig, courts::DATAJUD_BASE_URL,
};
use serde::Deserialize;

use crate::{
  Error, Result,
  orchestrator::{ReprocessPolicy, RunOptions},
};

/// Prefix of the environment variables read by [`Settings::load`].
pub const ENV_PREFIX: &str = "DATAJUD";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// CSV file with a `numeroProcesso` column.
  pub input:                     PathBuf,
  /// Single-character CSV delimiter; `tab` or `\t` for tab-separated input.
  pub input_delimiter:           String,
  pub database:                  PathBuf,
  pub mode:                      String,
  pub policy:                    String,
  pub intermediary_url:          String,
  pub datajud_base_url:          String,
  #[serde(alias = "apikey")]
  pub api_key:                   Option<String>,
  /// Explicit court table. Empty means the 27 state courts under
  /// `datajud_base_url`.
  pub courts:                    Vec<CourtEndpoint>,
  pub page_size:                 u32,
  pub delay_ms:                  u64,
  pub direct_timeout_secs:       u64,
  pub intermediary_timeout_secs: u64,
  pub health_timeout_secs:       u64,
}

impl Default for Settings {
  fn default() -> Self {
    let query = QueryConfig::default();
    Self {
      input:                     PathBuf::from("processos.csv"),
      input_delimiter:           ",".to_owned(),
      database:                  PathBuf::from("datajud_processos.db"),
      mode:                      query.mode.to_string(),
      policy:                    ReprocessPolicy::default().to_string(),
      intermediary_url:          query.intermediary_url,
      datajud_base_url:          DATAJUD_BASE_URL.to_owned(),
      api_key:                   None,
      courts:                    Vec::new(),
      page_size:                 query.page_size,
      delay_ms:                  query.delay.as_millis() as u64,
      direct_timeout_secs:       query.direct_timeout.as_secs(),
      intermediary_timeout_secs: query.intermediary_timeout.as_secs(),
      health_timeout_secs:       query.health_timeout.as_secs(),
    }
  }
}

impl Settings {
  /// Load settings from `path` (optional), the environment, and `overrides`.
  ///
  /// Overrides whose value is `None` leave the lower layers untouched.
  pub fn load<I>(path: &Path, overrides: I) -> Result<Self>
  where
    I: IntoIterator<Item = (&'static str, Option<String>)>,
  {
    let mut builder = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX));
    for (key, value) in overrides {
      builder = builder.set_override_option(key, value)?;
    }
    Ok(builder.build()?.try_deserialize()?)
  }

  pub fn mode(&self) -> Result<OperatingMode> {
    self.mode.parse().map_err(|_| invalid("mode", &self.mode))
  }

  pub fn policy(&self) -> Result<ReprocessPolicy> {
    self.policy.parse().map_err(|_| invalid("policy", &self.policy))
  }

  pub fn delimiter(&self) -> Result<u8> {
    match self.input_delimiter.as_str() {
      "tab" | "\\t" | "\t" => Ok(b'\t'),
      d if d.len() == 1 && d.is_ascii() => Ok(d.as_bytes()[0]),
      d => Err(invalid("input_delimiter", d)),
    }
  }

  /// The configured court table, or the default DataJud one.
  pub fn court_table(&self) -> CourtTable {
    if self.courts.is_empty() {
      CourtTable::datajud(&self.datajud_base_url)
    } else {
      CourtTable::from_pairs(self.courts.iter().map(|c| (c.code.as_str(), c.url.as_str())))
    }
  }

  pub fn query_config(&self) -> Result<QueryConfig> {
    Ok(QueryConfig {
      mode:                 self.mode()?,
      intermediary_url:     self.intermediary_url.trim_end_matches('/').to_owned(),
      api_key:              self.api_key.clone().filter(|k| !k.trim().is_empty()),
      courts:               self.court_table(),
      page_size:            self.page_size,
      delay:                Duration::from_millis(self.delay_ms),
      direct_timeout:       Duration::from_secs(self.direct_timeout_secs),
      intermediary_timeout: Duration::from_secs(self.intermediary_timeout_secs),
      health_timeout:       Duration::from_secs(self.health_timeout_secs),
    })
  }

  pub fn run_options(&self) -> Result<RunOptions> {
    Ok(RunOptions { policy: self.policy()?, delay: Duration::from_millis(self.delay_ms) })
  }
}

fn invalid(key: &'static str, value: &str) -> Error {
  Error::InvalidSetting { key, value: value.to_owned() }
}
