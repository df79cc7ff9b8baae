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

//! The Spark property set sent with a submission, and the merge that builds it.
//!
//! [`build_properties`] layers, in order: built-in defaults and the command's
//! own fields, the user's `--conf`/long flags, the executor image, the
//! DCOS_SPACE labels, TLS verification, the master URL, and finally Kerberos,
//! executor-auth and keystore secrets. The later computed keys are
//! *protected*: they replace whatever the user wrote and cannot be written
//! again through [`PropertyMap::set`].

use crate::command::SubmitCommand;
use crate::context::ExternalContext;
use crate::context::SubmitContext;
use crate::error::SubmitError;
use crate::flags::FlagTable;
use crate::options::AuthOptions;
use crate::options::ResourceKind;
use crate::options::SubmitOptions;
use crate::secrets::register_driver_secret;
use serde::Serialize;
use serde::Serializer;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

pub const EXECUTOR_MEMORY: &str = "spark.executor.memory";
pub const DEPLOY_MODE: &str = "spark.submit.deployMode";
pub const DRIVER_CORES: &str = "spark.driver.cores";
pub const DRIVER_MEMORY: &str = "spark.driver.memory";
pub const CORES_MAX: &str = "spark.cores.max";
pub const DRIVER_SUPERVISE: &str = "spark.driver.supervise";
pub const DRIVER_ENV_PREFIX: &str = "spark.mesos.driverEnv.";
pub const JARS: &str = "spark.jars";
pub const DOCKER_IMAGE: &str = "spark.mesos.executor.docker.image";
pub const DOCKER_FORCE_PULL: &str = "spark.mesos.executor.docker.forcePullImage";
pub const DRIVER_LABELS: &str = "spark.mesos.driver.labels";
pub const TASK_LABELS: &str = "spark.mesos.task.labels";
pub const NO_CERT_VERIFICATION: &str = "spark.ssl.noCertVerification";
pub const MASTER: &str = "spark.master";
pub const CONTAINERIZER: &str = "spark.mesos.containerizer";
pub const YARN_PRINCIPAL: &str = "spark.yarn.principal";
pub const YARN_KEYTAB: &str = "spark.yarn.keytab";
pub const KRB5CCNAME: &str = "spark.mesos.driverEnv.KRB5CCNAME";
pub const AUTHENTICATE: &str = "spark.authenticate";
pub const SASL_ENCRYPTION: &str = "spark.authenticate.enableSaslEncryption";
pub const AUTH_SECRET: &str = "spark.authenticate.secret";
pub const EXECUTOR_AUTH_SECRET_ENV: &str = "spark.executorEnv._SPARK_AUTH_SECRET";
pub const SSL_ENABLED: &str = "spark.ssl.enabled";
pub const SSL_KEYSTORE: &str = "spark.ssl.keyStore";
pub const SSL_KEYSTORE_PASSWORD: &str = "spark.ssl.keyStorePassword";
pub const SSL_KEY_PASSWORD: &str = "spark.ssl.keyPassword";
pub const SSL_TRUSTSTORE: &str = "spark.ssl.trustStore";
pub const SSL_TRUSTSTORE_PASSWORD: &str = "spark.ssl.trustStorePassword";

const DCOS_SPACE_LABEL: &str = "DCOS_SPACE:";

/// Spark configuration keyed by dot-delimited property name.
///
/// Keys are unique and iterate in sorted order. Values are always strings;
/// numbers and booleans are stringified on insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
  entries: BTreeMap<String, String>,
  protected: BTreeSet<String>,
}

impl PropertyMap {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.entries.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .entries
      .iter()
      .map(|(key, value)| (key.as_str(), value.as_str()))
  }

  pub fn is_protected(&self, key: &str) -> bool {
    self.protected.contains(key)
  }

  /// Writes a user or default value. Last write wins, except on protected
  /// keys, which are left untouched; returns whether the value was stored.
  pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> bool {
    let key = key.into();
    if self.protected.contains(&key) {
      tracing::warn!(%key, "Ignoring write to a computed property");
      return false;
    }
    self.entries.insert(key, value.to_string());
    true
  }

  /// Writes `value` only when `key` has no value yet.
  pub fn set_default(&mut self, key: impl Into<String>, value: impl ToString) {
    self
      .entries
      .entry(key.into())
      .or_insert_with(|| value.to_string());
  }

  /// Writes a computed value and protects the key.
  pub fn set_protected(&mut self, key: impl Into<String>, value: impl ToString) {
    let key = key.into();
    let value = value.to_string();
    if let Some(previous) = self.entries.get(&key) {
      if *previous != value && !self.protected.contains(&key) {
        tracing::warn!(%key, user_value = %previous, "Overriding user-supplied value with computed one");
      }
    }
    self.entries.insert(key.clone(), value);
    self.protected.insert(key);
  }

  pub fn protect(&mut self, key: impl Into<String>) {
    self.protected.insert(key.into());
  }

  /// Entries of a comma-separated list value.
  pub fn list(&self, key: &str) -> Vec<&str> {
    self
      .get(key)
      .map(|value| value.split(',').filter(|item| !item.is_empty()).collect())
      .unwrap_or_default()
  }

  pub fn list_contains(&self, key: &str, item: &str) -> bool {
    self.list(key).contains(&item)
  }

  /// Appends `item` to a comma-separated list value, bypassing protection.
  pub fn append_list(&mut self, key: &str, item: &str) {
    let value = match self.entries.get(key) {
      Some(existing) if !existing.is_empty() => format!("{existing},{item}"),
      _ => item.to_string(),
    };
    self.entries.insert(key.to_string(), value);
  }
}

impl Serialize for PropertyMap {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(&self.entries)
  }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for PropertyMap {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut props = PropertyMap::new();
    for (key, value) in iter {
      props.set(key, value);
    }
    props
  }
}

/// Parses `submit_tokens` and merges them with the command and the context
/// into the final property set.
pub fn build_properties<S, C>(
  cmd: &SubmitCommand,
  submit_tokens: &[S],
  context: &C,
) -> Result<PropertyMap, SubmitError>
where
  S: AsRef<str>,
  C: ExternalContext + ?Sized,
{
  let context = SubmitContext::capture(context);
  let options = SubmitOptions::parse(submit_tokens, &FlagTable::spark_submit())?;
  Ok(merge(cmd, &options, &context))
}

/// The merge proper, on already parsed options and a context snapshot.
pub fn merge(cmd: &SubmitCommand, options: &SubmitOptions, context: &SubmitContext) -> PropertyMap {
  let mut props = PropertyMap::new();

  seed_defaults(&mut props, cmd);
  apply_user_properties(&mut props, options);
  apply_image(&mut props, cmd);
  apply_space_labels(&mut props, context);

  props.set_protected(NO_CERT_VERIFICATION, !context.ssl_verify);
  if context.service_url.is_empty() {
    tracing::warn!("No dispatcher URL in context, leaving {} unset", MASTER);
  } else {
    props.set_protected(MASTER, &context.service_url);
  }

  let auth = resolve_auth(cmd, &options.auth);
  apply_kerberos(&mut props, &auth);
  apply_executor_auth(&mut props, &auth, &context.shared_secret);
  apply_tls(&mut props, &auth);

  props
}

fn seed_defaults(props: &mut PropertyMap, cmd: &SubmitCommand) {
  props.set(EXECUTOR_MEMORY, "1G");
  props.set(DEPLOY_MODE, "cluster");

  if let Some(cores) = cmd.driver_cores {
    props.set(DRIVER_CORES, cores);
  }
  if let Some(memory_mb) = cmd.driver_memory_mb {
    props.set(DRIVER_MEMORY, format!("{memory_mb}M"));
  }
  if let Some(cores) = cmd.total_executor_cores {
    props.set(CORES_MAX, cores);
  }
  if cmd.supervise {
    props.set(DRIVER_SUPERVISE, true);
  }

  for (key, value) in &cmd.properties {
    props.set(key.as_str(), value);
  }
  for (name, value) in &cmd.env {
    props.set(format!("{DRIVER_ENV_PREFIX}{name}"), value);
  }
}

fn apply_user_properties(props: &mut PropertyMap, options: &SubmitOptions) {
  for (key, value) in &options.properties {
    props.set(key.as_str(), value);
  }

  if options.resource_kind() == ResourceKind::Jvm
    && !props.list_contains(JARS, &options.app_resource)
  {
    props.append_list(JARS, &options.app_resource);
  }
}

fn apply_image(props: &mut PropertyMap, cmd: &SubmitCommand) {
  if let Some(image) = cmd.docker_image.as_deref() {
    if props.contains_key(DOCKER_IMAGE) {
      tracing::debug!(%image, "Executor image set through --conf, keeping it");
    } else {
      props.set(DOCKER_IMAGE, image);
    }
  }

  if props.contains_key(DOCKER_IMAGE) {
    props.set_default(DOCKER_FORCE_PULL, true);
  }
}

fn apply_space_labels(props: &mut PropertyMap, context: &SubmitContext) {
  let Some(space) = context.dcos_space() else {
    tracing::debug!("No service name, skipping DCOS_SPACE labels");
    return;
  };
  let label = format!("{DCOS_SPACE_LABEL}{space}");

  for key in [DRIVER_LABELS, TASK_LABELS] {
    let mut labels: Vec<String> = props
      .list(key)
      .into_iter()
      .filter(|existing| !existing.starts_with(DCOS_SPACE_LABEL))
      .map(str::to_string)
      .collect();
    labels.push(label.clone());
    props.set_protected(key, labels.join(","));
  }
}

/// Command-line auth options, falling back to the command's own fields.
fn resolve_auth(cmd: &SubmitCommand, options: &AuthOptions) -> AuthOptions {
  let mut auth = options.clone();
  if auth.kerberos_principal.is_none() {
    auth.kerberos_principal = cmd.kerberos_principal.clone();
  }
  if auth.keytab_secret_path.is_none() {
    auth.keytab_secret_path = cmd.keytab_secret_path.clone();
  }
  if auth.executor_auth_secret.is_none() {
    auth.executor_auth_secret = cmd.executor_auth_secret.clone();
  }
  auth
}

/// Secret files are only mounted by the Mesos containerizer.
fn force_mesos_containerizer(props: &mut PropertyMap) {
  props.set_protected(CONTAINERIZER, "mesos");
}

fn apply_kerberos(props: &mut PropertyMap, auth: &AuthOptions) {
  if let Some(principal) = &auth.kerberos_principal {
    props.set_protected(YARN_PRINCIPAL, principal);
    force_mesos_containerizer(props);
  }

  if let Some(keytab) = &auth.keytab_secret_path {
    if auth.kerberos_principal.is_none() {
      tracing::warn!(%keytab, "Keytab given without a Kerberos principal");
    }
    let filename = register_driver_secret(props, keytab);
    props.set_protected(YARN_KEYTAB, filename);
    force_mesos_containerizer(props);
  }

  if let Some(tgt) = &auth.tgt_secret_path {
    let filename = register_driver_secret(props, tgt);
    props.set_protected(KRB5CCNAME, filename);
    force_mesos_containerizer(props);
  }
}

fn apply_executor_auth(props: &mut PropertyMap, auth: &AuthOptions, shared_secret: &str) {
  let Some(secret_path) = &auth.executor_auth_secret else {
    return;
  };

  props.set_protected(AUTHENTICATE, true);
  props.set_protected(SASL_ENCRYPTION, true);
  force_mesos_containerizer(props);
  props.set_protected(AUTH_SECRET, shared_secret);
  props.set_protected(EXECUTOR_AUTH_SECRET_ENV, shared_secret);
  register_driver_secret(props, secret_path);
}

fn apply_tls(props: &mut PropertyMap, auth: &AuthOptions) {
  if let Some(keystore) = &auth.keystore_secret_path {
    let filename = register_driver_secret(props, keystore);
    props.set_protected(SSL_ENABLED, true);
    props.set_protected(SSL_KEYSTORE, filename);
    force_mesos_containerizer(props);
  }
  if let Some(password) = &auth.keystore_password {
    props.set_protected(SSL_KEYSTORE_PASSWORD, password);
  }
  if let Some(password) = &auth.private_key_password {
    props.set_protected(SSL_KEY_PASSWORD, password);
  }

  if let Some(truststore) = &auth.truststore_secret_path {
    let filename = register_driver_secret(props, truststore);
    props.set_protected(SSL_ENABLED, true);
    props.set_protected(SSL_TRUSTSTORE, filename);
    force_mesos_containerizer(props);
  }
  if let Some(password) = &auth.truststore_password {
    props.set_protected(SSL_TRUSTSTORE_PASSWORD, password);
  }
}
