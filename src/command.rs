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
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything one submission request carries into the pipeline.
///
/// Built once by the caller (the CLI, or a test) and only read afterwards.
/// Values given inside `submit_args` take precedence over the matching fields
/// here, which act as defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitCommand {
  /// Caller-chosen id for the submission, used only for logging.
  #[serde(default)]
  pub submission_id: String,

  /// The raw `spark-submit` style argument string.
  pub submit_args: String,

  /// Executor container image (e.g. "mesosphere/spark").
  #[serde(default)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub docker_image: Option<String>,

  /// Properties set before any `--conf` is applied.
  #[serde(default)]
  pub properties: BTreeMap<String, String>,

  /// Environment variables for the driver.
  #[serde(default)]
  pub env: BTreeMap<String, String>,

  #[serde(default)]
  pub verbose: bool,

  #[serde(default)]
  pub supervise: bool,

  #[serde(default)]
  pub driver_cores: Option<f64>,

  #[serde(default)]
  pub driver_memory_mb: Option<u64>,

  #[serde(default)]
  pub total_executor_cores: Option<u32>,

  #[serde(default)]
  pub kerberos_principal: Option<String>,

  #[serde(default)]
  pub keytab_secret_path: Option<String>,

  #[serde(default)]
  pub executor_auth_secret: Option<String>,
}

impl SubmitCommand {
  pub fn new(submit_args: impl Into<String>) -> Self {
    SubmitCommand {
      submit_args: submit_args.into(),
      ..Default::default()
    }
  }

  pub fn with_submission_id(mut self, id: impl Into<String>) -> Self {
    self.submission_id = id.into();
    self
  }

  pub fn with_docker_image(mut self, image: impl Into<String>) -> Self {
    let image = image.into();
    self.docker_image = (!image.is_empty()).then_some(image);
    self
  }

  pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.properties.insert(key.into(), value.into());
    self
  }

  pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(name.into(), value.into());
    self
  }

  pub fn with_supervise(mut self, supervise: bool) -> Self {
    self.supervise = supervise;
    self
  }

  pub fn with_verbose(mut self, verbose: bool) -> Self {
    self.verbose = verbose;
    self
  }

  pub fn with_driver_cores(mut self, cores: f64) -> Self {
    self.driver_cores = Some(cores);
    self
  }

  pub fn with_driver_memory_mb(mut self, memory_mb: u64) -> Self {
    self.driver_memory_mb = Some(memory_mb);
    self
  }

  pub fn with_total_executor_cores(mut self, cores: u32) -> Self {
    self.total_executor_cores = Some(cores);
    self
  }

  pub fn with_kerberos(
    mut self,
    principal: impl Into<String>,
    keytab_secret_path: impl Into<String>,
  ) -> Self {
    self.kerberos_principal = Some(principal.into());
    self.keytab_secret_path = Some(keytab_secret_path.into());
    self
  }

  pub fn with_executor_auth_secret(mut self, secret_path: impl Into<String>) -> Self {
    self.executor_auth_secret = Some(secret_path.into());
    self
  }
}
