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
use crate::command::SubmitCommand;
use crate::config::AuthTokenMode;
use crate::config::Settings;
use crate::config::SettingsOverrides;
use crate::error::ConfigError;
use crate::error::SparksubError;
use crate::error::SubmitError;
use crate::flags::FlagTable;
use crate::pipeline::build_submission;
use crate::tokenizer::clean;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
  version,
  about = "Builds Spark dispatcher submission payloads from spark-submit arguments"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// Print the JSON submission payload for a set of spark-submit arguments.
  Payload(PayloadArgs),

  /// Print the cleaned submit tokens and application arguments as JSON.
  Tokens {
    /// The spark-submit style argument string, quoted as a single value.
    #[arg(long, allow_hyphen_values = true)]
    submit_args: String,
  },
}

#[derive(Debug, Args)]
pub struct PayloadArgs {
  /// The spark-submit style argument string, quoted as a single value.
  /// Example: '--class org.example.Main http://host/app.jar arg1'
  #[arg(long, allow_hyphen_values = true)]
  pub submit_args: String,

  /// Executor docker image.
  #[arg(long)]
  pub docker_image: Option<String>,

  /// Property applied before any --conf in the submit arguments. Repeatable.
  #[arg(long = "conf", value_name = "KEY=VALUE")]
  pub properties: Vec<String>,

  /// Driver environment variable. Repeatable.
  #[arg(long = "env", value_name = "NAME=VALUE")]
  pub env: Vec<String>,

  #[arg(long)]
  pub supervise: bool,

  #[arg(long)]
  pub verbose: bool,

  #[arg(long)]
  pub driver_cores: Option<f64>,

  #[arg(long)]
  pub driver_memory_mb: Option<u64>,

  #[arg(long)]
  pub total_executor_cores: Option<u32>,

  #[arg(long)]
  pub kerberos_principal: Option<String>,

  #[arg(long)]
  pub keytab_secret_path: Option<String>,

  #[arg(long)]
  pub executor_auth_secret: Option<String>,

  /// Id used to tag log output for this submission.
  #[arg(long, default_value = "")]
  pub submission_id: String,

  /// JSON settings file.
  #[arg(long, env = "SPARKSUB_CONFIG")]
  pub config: Option<PathBuf>,

  /// Dispatcher URL. Overrides DCOS_URL.
  #[arg(long)]
  pub url: Option<String>,

  /// Service name used for the DCOS_SPACE labels.
  #[arg(long)]
  pub service_name: Option<String>,

  /// Whether the dispatcher's TLS certificate is verified.
  #[arg(long)]
  pub ssl_verify: Option<bool>,

  #[arg(long, value_enum)]
  pub auth_token: Option<AuthTokenMode>,

  /// Pretty-print the payload.
  #[arg(long)]
  pub pretty: bool,
}

impl PayloadArgs {
  pub fn overrides(&self) -> SettingsOverrides {
    SettingsOverrides {
      url: self.url.clone(),
      ssl_verify: self.ssl_verify,
      service_name: self.service_name.clone(),
      auth_token: self.auth_token,
    }
  }
}

fn parse_key_value(kind: &'static str, entry: &str) -> Result<(String, String), ConfigError> {
  match entry.split_once('=') {
    Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
    _ => Err(ConfigError::InvalidProperty {
      kind,
      entry: entry.to_string(),
    }),
  }
}

impl TryFrom<&PayloadArgs> for SubmitCommand {
  type Error = ConfigError;

  fn try_from(args: &PayloadArgs) -> Result<Self, Self::Error> {
    let mut cmd = SubmitCommand::new(args.submit_args.as_str())
      .with_submission_id(args.submission_id.as_str())
      .with_supervise(args.supervise)
      .with_verbose(args.verbose);

    if let Some(image) = &args.docker_image {
      cmd = cmd.with_docker_image(image.as_str());
    }
    for entry in &args.properties {
      let (key, value) = parse_key_value("--conf", entry)?;
      cmd = cmd.with_property(key, value);
    }
    for entry in &args.env {
      let (name, value) = parse_key_value("--env", entry)?;
      cmd = cmd.with_env(name, value);
    }

    cmd.driver_cores = args.driver_cores;
    cmd.driver_memory_mb = args.driver_memory_mb;
    cmd.total_executor_cores = args.total_executor_cores;
    cmd.kerberos_principal = args.kerberos_principal.clone();
    cmd.keytab_secret_path = args.keytab_secret_path.clone();
    cmd.executor_auth_secret = args.executor_auth_secret.clone();

    Ok(cmd)
  }
}

/// Resolves settings and renders the payload for `args`.
pub fn run_payload(args: &PayloadArgs) -> Result<String, SparksubError> {
  let settings = Settings::load(args.config.as_deref(), &args.overrides())?;
  settings.require_service_url()?;

  let cmd = SubmitCommand::try_from(args)?;
  let request = build_submission(&cmd, &settings)?;

  let json = if args.pretty {
    request.to_json_pretty()?
  } else {
    request.to_json()?
  };
  Ok(json)
}

/// Renders the cleanup stage's output for `submit_args`.
pub fn run_tokens(submit_args: &str) -> Result<String, SparksubError> {
  let cleaned = clean(submit_args, &FlagTable::spark_submit()).map_err(SubmitError::from)?;
  let json = serde_json::to_string(&cleaned).map_err(SubmitError::from)?;
  Ok(json)
}
