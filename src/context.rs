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
use serde::Serialize;

/// Shared secret handed to driver and executors when no other token source is
/// configured.
pub const DEFAULT_SHARED_SECRET: &str = "spark_shared_secret";

/// Spark version reported in the submission request.
pub const DEFAULT_CLIENT_SPARK_VERSION: &str = "2.4.5";

/// Values the pipeline needs from its surroundings.
///
/// Implementations may do lookups (environment, config files, a cluster
/// client); the pipeline calls each method exactly once per submission via
/// [`SubmitContext::capture`].
pub trait ExternalContext {
  /// Base URL of the dispatcher, used as `spark.master`.
  fn resolve_service_url(&self) -> String;

  fn ssl_verify_enabled(&self) -> bool;

  /// Service name, the source of the DCOS_SPACE labels.
  fn service_name(&self) -> String;

  /// Token used for `spark.authenticate.secret`.
  fn shared_secret(&self) -> String {
    DEFAULT_SHARED_SECRET.to_string()
  }

  fn client_spark_version(&self) -> String {
    DEFAULT_CLIENT_SPARK_VERSION.to_string()
  }
}

/// Snapshot of an [`ExternalContext`], taken once at the start of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitContext {
  pub service_url: String,
  pub ssl_verify: bool,
  pub service_name: String,
  pub shared_secret: String,
  pub client_spark_version: String,
}

impl SubmitContext {
  pub fn capture<C: ExternalContext + ?Sized>(context: &C) -> Self {
    SubmitContext {
      service_url: context.resolve_service_url(),
      ssl_verify: context.ssl_verify_enabled(),
      service_name: context.service_name(),
      shared_secret: context.shared_secret(),
      client_spark_version: context.client_spark_version(),
    }
  }

  /// The DCOS_SPACE value: the service name with a leading `/`.
  pub fn dcos_space(&self) -> Option<String> {
    let name = self.service_name.trim();
    if name.is_empty() {
      return None;
    }
    if name.starts_with('/') {
      Some(name.to_string())
    } else {
      Some(format!("/{name}"))
    }
  }
}

impl ExternalContext for SubmitContext {
  fn resolve_service_url(&self) -> String {
    self.service_url.clone()
  }

  fn ssl_verify_enabled(&self) -> bool {
    self.ssl_verify
  }

  fn service_name(&self) -> String {
    self.service_name.clone()
  }

  fn shared_secret(&self) -> String {
    self.shared_secret.clone()
  }

  fn client_spark_version(&self) -> String {
    self.client_spark_version.clone()
  }
}
