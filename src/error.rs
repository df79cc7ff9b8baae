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
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error enum for the sparksub library.
#[derive(Error, Debug)]
pub enum SparksubError {
  #[error("Submission failed")]
  Submit(#[from] SubmitError),

  #[error("Configuration error")]
  Config(#[from] ConfigError),
}

/// Errors raised while splitting and classifying the raw argument string (src/tokenizer.rs).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
  #[error("No submit arguments were given")]
  Empty,

  #[error("Unterminated {quote} quote starting at character {position}")]
  UnterminatedQuote { quote: char, position: usize },

  #[error("Flag {flag} expects a value but none was given")]
  MissingValue { flag: String },
}

/// Errors raised while turning submit tokens into a payload
/// (src/options.rs, src/properties.rs, src/payload.rs).
#[derive(Error, Debug)]
pub enum SubmitError {
  #[error("Failed to tokenize submit arguments: {0}")]
  Tokenize(#[from] TokenizeError),

  #[error("Malformed --conf value '{value}', expected key=value")]
  MalformedConfig { value: String },

  #[error("No application resource (jar, script or URL) found in submit arguments")]
  MissingResource,

  #[error("Unknown submit flag: {flag}")]
  UnknownFlag { flag: String },

  #[error("Invalid value '{value}' for {flag}")]
  InvalidValue { flag: String, value: String },

  #[error("Unexpected argument '{token}' after application resource '{resource}'")]
  UnexpectedArgument { token: String, resource: String },

  #[error("Failed to serialize submission payload")]
  Serialize(#[from] serde_json::Error),
}

/// Errors related to configuration resolution (src/config.rs, src/cli.rs).
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to load settings: {0}")]
  Extract(#[from] Box<figment::Error>),

  #[error("Settings file not found: {0}")]
  ConfigFileNotFound(PathBuf),

  #[error("No dispatcher URL configured. Set DCOS_URL or pass --url.")]
  MissingServiceUrl,

  #[error("Invalid {kind} entry '{entry}', expected KEY=VALUE")]
  InvalidProperty { kind: &'static str, entry: String },
}

impl From<figment::Error> for ConfigError {
  fn from(err: figment::Error) -> Self {
    ConfigError::Extract(Box::new(err))
  }
}
