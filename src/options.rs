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
use crate::error::SubmitError;
use crate::error::TokenizeError;
use crate::flags::AuthFlag;
use crate::flags::FlagKind;
use crate::flags::FlagTable;

/// What kind of program the application resource is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
  Jvm,
  Python,
  R,
}

impl ResourceKind {
  pub fn of(resource: &str) -> Self {
    if resource.ends_with(".py") {
      ResourceKind::Python
    } else if resource.ends_with(".R") || resource.ends_with(".r") {
      ResourceKind::R
    } else {
      ResourceKind::Jvm
    }
  }
}

/// Secret and credential options, as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthOptions {
  pub kerberos_principal: Option<String>,
  pub keytab_secret_path: Option<String>,
  pub tgt_secret_path: Option<String>,
  pub executor_auth_secret: Option<String>,
  pub keystore_secret_path: Option<String>,
  pub keystore_password: Option<String>,
  pub private_key_password: Option<String>,
  pub truststore_secret_path: Option<String>,
  pub truststore_password: Option<String>,
}

impl AuthOptions {
  fn set(&mut self, flag: AuthFlag, value: String) {
    let field = match flag {
      AuthFlag::KerberosPrincipal => &mut self.kerberos_principal,
      AuthFlag::KeytabSecretPath => &mut self.keytab_secret_path,
      AuthFlag::TgtSecretPath => &mut self.tgt_secret_path,
      AuthFlag::ExecutorAuthSecret => &mut self.executor_auth_secret,
      AuthFlag::KeystoreSecretPath => &mut self.keystore_secret_path,
      AuthFlag::KeystorePassword => &mut self.keystore_password,
      AuthFlag::PrivateKeyPassword => &mut self.private_key_password,
      AuthFlag::TruststoreSecretPath => &mut self.truststore_secret_path,
      AuthFlag::TruststorePassword => &mut self.truststore_password,
    };
    *field = Some(value);
  }
}

/// Submit tokens after interpretation against the [`FlagTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOptions {
  pub app_resource: String,
  pub main_class: Option<String>,
  /// `(key, value)` pairs in command-line order; later pairs win.
  pub properties: Vec<(String, String)>,
  pub verbose: bool,
  pub auth: AuthOptions,
}

impl SubmitOptions {
  pub fn resource_kind(&self) -> ResourceKind {
    ResourceKind::of(&self.app_resource)
  }

  /// Interprets canonical submit tokens, as produced by
  /// [`crate::tokenizer::classify`].
  pub fn parse<S: AsRef<str>>(tokens: &[S], flags: &FlagTable) -> Result<Self, SubmitError> {
    let mut app_resource: Option<String> = None;
    let mut main_class = None;
    let mut properties = Vec::new();
    let mut verbose = false;
    let mut auth = AuthOptions::default();

    for token in tokens.iter().map(AsRef::as_ref) {
      if let Some(resource) = &app_resource {
        return Err(SubmitError::UnexpectedArgument {
          token: token.to_string(),
          resource: resource.clone(),
        });
      }

      if token.is_empty() {
        return Err(SubmitError::MissingResource);
      }
      if !token.starts_with('-') || token == "-" {
        app_resource = Some(token.to_string());
        continue;
      }

      let (name, inline) = match token.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (token, None),
      };

      let Some(kind) = flags.lookup(name) else {
        return Err(SubmitError::UnknownFlag {
          flag: name.to_string(),
        });
      };

      let required = || {
        inline
          .map(str::to_string)
          .ok_or_else(|| TokenizeError::MissingValue {
            flag: name.to_string(),
          })
      };

      match kind {
        FlagKind::Switch(property) => {
          let enabled = match inline {
            None => true,
            Some(value) => parse_switch(value).ok_or_else(|| SubmitError::InvalidValue {
              flag: name.to_string(),
              value: value.to_string(),
            })?,
          };
          if name == "--verbose" {
            verbose = enabled;
          }
          if let Some(property) = property {
            properties.push((property.to_string(), enabled.to_string()));
          }
        }
        FlagKind::Property(property) => properties.push((property.to_string(), required()?)),
        FlagKind::JavaOptions(target) => {
          properties.push((target.property().to_string(), required()?))
        }
        FlagKind::Conf => properties.push(parse_conf(required()?)?),
        FlagKind::MainClass => main_class = Some(required()?),
        FlagKind::Auth(flag) => auth.set(flag, required()?),
      }
    }

    let app_resource = app_resource.ok_or(SubmitError::MissingResource)?;
    tracing::debug!(
      resource = %app_resource,
      main_class = ?main_class,
      properties = properties.len(),
      "Parsed submit options"
    );

    Ok(SubmitOptions {
      app_resource,
      main_class,
      properties,
      verbose,
      auth,
    })
  }
}

fn parse_switch(value: &str) -> Option<bool> {
  match value.to_ascii_lowercase().as_str() {
    "true" | "yes" | "1" => Some(true),
    "false" | "no" | "0" => Some(false),
    _ => None,
  }
}

fn parse_conf(value: String) -> Result<(String, String), SubmitError> {
  let pair = value
    .split_once('=')
    .filter(|(key, _)| !key.trim().is_empty())
    .map(|(key, setting)| (key.trim().to_string(), setting.to_string()));
  pair.ok_or(SubmitError::MalformedConfig { value })
}
