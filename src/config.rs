// Copyright 2025 Chisomo Makombo Sakala
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use crate::context::DEFAULT_CLIENT_SPARK_VERSION;
use crate::context::DEFAULT_SHARED_SECRET;
use crate::context::ExternalContext;
use crate::error::ConfigError;
use crate::secrets::generate_shared_secret;
use clap::ValueEnum;
use figment::Figment;
use figment::providers::Env;
use figment::providers::Format;
use figment::providers::Json;
use figment::providers::Serialized;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;

// --- Default Values ---
fn default_service_name() -> String {
  "spark".to_string()
}

fn default_spark_version() -> String {
  DEFAULT_CLIENT_SPARK_VERSION.to_string()
}

/// How the executor-auth shared secret is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AuthTokenMode {
  /// The well-known `spark_shared_secret` token.
  #[default]
  Fixed,
  /// A fresh random token per submission.
  Random,
}

/// `ssl_verify` as the cluster CLI stores it: a boolean, or the path of a CA
/// bundle (which means verification is on).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SslVerify {
  Flag(bool),
  CaBundle(String),
}

impl SslVerify {
  pub fn is_enabled(&self) -> bool {
    match self {
      SslVerify::Flag(enabled) => *enabled,
      SslVerify::CaBundle(value) => !value.trim().eq_ignore_ascii_case("false"),
    }
  }
}

impl Default for SslVerify {
  fn default() -> Self {
    SslVerify::Flag(true)
  }
}

/// Resolved settings, the [`ExternalContext`] the CLI hands to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
  /// Dispatcher URL (`DCOS_URL`).
  #[serde(default)]
  pub url: Option<String>,

  #[serde(default)]
  pub ssl_verify: SslVerify,

  #[serde(default = "default_service_name")]
  pub service_name: String,

  #[serde(default)]
  pub auth_token: AuthTokenMode,

  #[serde(default = "default_spark_version")]
  pub spark_version: String,
}

impl Default for Settings {
  fn default() -> Self {
    Settings {
      url: None,
      ssl_verify: SslVerify::default(),
      service_name: default_service_name(),
      auth_token: AuthTokenMode::default(),
      spark_version: default_spark_version(),
    }
  }
}

/// Command-line values that take precedence over every other source.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsOverrides {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ssl_verify: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub service_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub auth_token: Option<AuthTokenMode>,
}

impl Settings {
  /// Layers defaults, an optional JSON file, `DCOS_*` and `SPARKSUB_*`
  /// environment variables, and `overrides`, in that order.
  pub fn load(config_file: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));

    if let Some(path) = config_file {
      if !path.exists() {
        return Err(ConfigError::ConfigFileNotFound(path.to_path_buf()));
      }
      tracing::debug!(path = %path.display(), "Reading settings file");
      figment = figment.merge(Json::file(path));
    }

    let settings: Settings = figment
      .merge(Env::prefixed("DCOS_"))
      .merge(Env::prefixed("SPARKSUB_"))
      .merge(Serialized::globals(overrides))
      .extract()?;

    tracing::debug!(?settings, "Resolved settings");
    Ok(settings)
  }

  /// Fails when no dispatcher URL was configured anywhere.
  pub fn require_service_url(&self) -> Result<&str, ConfigError> {
    self
      .url
      .as_deref()
      .filter(|url| !url.trim().is_empty())
      .ok_or(ConfigError::MissingServiceUrl)
  }
}

impl ExternalContext for Settings {
  fn resolve_service_url(&self) -> String {
    self.url.clone().unwrap_or_default()
  }

  fn ssl_verify_enabled(&self) -> bool {
    self.ssl_verify.is_enabled()
  }

  fn service_name(&self) -> String {
    self.service_name.clone()
  }

  fn shared_secret(&self) -> String {
    match self.auth_token {
      AuthTokenMode::Fixed => DEFAULT_SHARED_SECRET.to_string(),
      AuthTokenMode::Random => generate_shared_secret(),
    }
  }

  fn client_spark_version(&self) -> String {
    self.spark_version.clone()
  }
}
