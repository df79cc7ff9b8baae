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
use crate::error::SubmitError;
use crate::properties::PropertyMap;
use serde::Serialize;
use std::collections::BTreeMap;

pub const CREATE_SUBMISSION_ACTION: &str = "CreateSubmissionRequest";

/// Body of a `CreateSubmissionRequest` to the dispatcher's REST API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
  pub action: &'static str,
  pub app_resource: String,
  #[serde(skip_serializing_if = "String::is_empty")]
  pub main_class: String,
  pub app_args: Vec<String>,
  pub client_spark_version: String,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub environment_variables: BTreeMap<String, String>,
  pub spark_properties: PropertyMap,
}

impl SubmissionRequest {
  pub fn new(
    app_resource: impl Into<String>,
    main_class: impl Into<String>,
    app_args: Vec<String>,
    spark_properties: PropertyMap,
  ) -> Self {
    SubmissionRequest {
      action: CREATE_SUBMISSION_ACTION,
      app_resource: app_resource.into(),
      main_class: main_class.into(),
      app_args,
      client_spark_version: DEFAULT_CLIENT_SPARK_VERSION.to_string(),
      environment_variables: BTreeMap::new(),
      spark_properties,
    }
  }

  pub fn with_client_spark_version(mut self, version: impl Into<String>) -> Self {
    self.client_spark_version = version.into();
    self
  }

  pub fn with_environment(mut self, env: BTreeMap<String, String>) -> Self {
    self.environment_variables = env;
    self
  }

  pub fn to_json(&self) -> Result<String, SubmitError> {
    Ok(serde_json::to_string(self)?)
  }

  pub fn to_json_pretty(&self) -> Result<String, SubmitError> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

/// Renders a minimal submission request as compact JSON.
pub fn serialize(
  app_resource: &str,
  main_class: &str,
  app_args: &[String],
  props: &PropertyMap,
) -> Result<String, SubmitError> {
  SubmissionRequest::new(app_resource, main_class, app_args.to_vec(), props.clone()).to_json()
}
