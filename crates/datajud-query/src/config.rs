//! Immutable router configuration, built once at startup.

use std::time::Duration;

use strum::{Display, EnumString};

use crate::{Error, Result, courts::CourtTable};

/// How case numbers are resolved for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OperatingMode {
  /// Through the intermediary query service.
  #[default]
  #[strum(to_string = "intermediary", serialize = "api")]
  Intermediary,
  /// Straight against the per-court DataJud endpoints.
  #[strum(to_string = "direct", serialize = "direto")]
  Direct,
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
  pub mode:                 OperatingMode,
  /// Base URL of the intermediary service, without trailing slash.
  pub intermediary_url:     String,
  /// DataJud API key, sent as `Authorization: ApiKey <key>` in direct mode.
  pub api_key:              Option<String>,
  pub courts:               CourtTable,
  /// `size` of each direct search request.
  pub page_size:            u32,
  /// Pause after each court attempt that did not end a fallback.
  pub delay:                Duration,
  pub direct_timeout:       Duration,
  pub intermediary_timeout: Duration,
  pub health_timeout:       Duration,
}

impl Default for QueryConfig {
  fn default() -> Self {
    Self {
      mode:                 OperatingMode::default(),
      intermediary_url:     "http://localhost:5001".to_owned(),
      api_key:              None,
      courts:               CourtTable::default(),
      page_size:            10,
      delay:                Duration::from_millis(300),
      direct_timeout:       Duration::from_secs(30),
      intermediary_timeout: Duration::from_secs(60),
      health_timeout:       Duration::from_secs(10),
    }
  }
}

impl QueryConfig {
  /// Check that the selected mode has what it needs.
  pub fn validate(&self) -> Result<()> {
    if self.mode == OperatingMode::Direct {
      if self.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
        return Err(Error::MissingApiKey);
      }
      if self.courts.is_empty() {
        return Err(Error::NoCourts);
      }
    }
    Ok(())
  }
}
