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

//! Lookup table of the submit flags the tokenizer and option parser understand.
//!
//! Each flag is known ahead of time together with its arity, so that
//! `--flag value` can be joined into `--flag=value` without guessing, and a
//! boolean switch never swallows the token that follows it.

use std::collections::HashMap;

pub const DRIVER_JAVA_OPTIONS: &str = "spark.driver.extraJavaOptions";
pub const EXECUTOR_JAVA_OPTIONS: &str = "spark.executor.extraJavaOptions";

/// Which JVM a java-options flag configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JavaTarget {
  Driver,
  Executor,
}

impl JavaTarget {
  /// The property key holding the options for this JVM.
  pub fn property(self) -> &'static str {
    match self {
      JavaTarget::Driver => DRIVER_JAVA_OPTIONS,
      JavaTarget::Executor => EXECUTOR_JAVA_OPTIONS,
    }
  }

  /// Maps a `--conf` key back to its java-options target, if it is one.
  pub fn from_property(key: &str) -> Option<Self> {
    match key {
      DRIVER_JAVA_OPTIONS => Some(JavaTarget::Driver),
      EXECUTOR_JAVA_OPTIONS => Some(JavaTarget::Executor),
      _ => None,
    }
  }
}

/// Secret and credential flags. These never map straight to a property; the
/// merger wires them into several keys at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthFlag {
  KerberosPrincipal,
  KeytabSecretPath,
  TgtSecretPath,
  ExecutorAuthSecret,
  KeystoreSecretPath,
  KeystorePassword,
  PrivateKeyPassword,
  TruststoreSecretPath,
  TruststorePassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
  /// Boolean flag, standalone on the command line. Sets the property to
  /// `true` when there is one.
  Switch(Option<&'static str>),
  /// Value flag mapped one-to-one onto a property.
  Property(&'static str),
  /// `--conf key=value`.
  Conf,
  /// `--driver-java-options` and friends.
  JavaOptions(JavaTarget),
  /// `--class`, carried in the payload rather than the properties.
  MainClass,
  Auth(AuthFlag),
}

impl FlagKind {
  pub fn is_boolean(self) -> bool {
    matches!(self, FlagKind::Switch(_))
  }
}

const SPARK_SUBMIT_FLAGS: &[(&str, FlagKind)] = &[
  ("--supervise", FlagKind::Switch(Some("spark.driver.supervise"))),
  ("--verbose", FlagKind::Switch(None)),
  ("--name", FlagKind::Property("spark.app.name")),
  ("--class", FlagKind::MainClass),
  ("--driver-cores", FlagKind::Property("spark.driver.cores")),
  ("--driver-memory", FlagKind::Property("spark.driver.memory")),
  ("--driver-class-path", FlagKind::Property("spark.driver.extraClassPath")),
  ("--driver-library-path", FlagKind::Property("spark.driver.extraLibraryPath")),
  ("--executor-memory", FlagKind::Property("spark.executor.memory")),
  ("--executor-cores", FlagKind::Property("spark.executor.cores")),
  ("--total-executor-cores", FlagKind::Property("spark.cores.max")),
  ("--jars", FlagKind::Property("spark.jars")),
  ("--packages", FlagKind::Property("spark.jars.packages")),
  ("--exclude-packages", FlagKind::Property("spark.jars.excludes")),
  ("--repositories", FlagKind::Property("spark.jars.repositories")),
  ("--files", FlagKind::Property("spark.files")),
  ("--py-files", FlagKind::Property("spark.submit.pyFiles")),
  ("--conf", FlagKind::Conf),
  ("--driver-java-options", FlagKind::JavaOptions(JavaTarget::Driver)),
  ("--driver-java-option", FlagKind::JavaOptions(JavaTarget::Driver)),
  ("--executor-java-options", FlagKind::JavaOptions(JavaTarget::Executor)),
  ("--executor-java-option", FlagKind::JavaOptions(JavaTarget::Executor)),
  ("--kerberos-principal", FlagKind::Auth(AuthFlag::KerberosPrincipal)),
  ("--principal", FlagKind::Auth(AuthFlag::KerberosPrincipal)),
  ("--keytab-secret-path", FlagKind::Auth(AuthFlag::KeytabSecretPath)),
  ("--tgt-secret-path", FlagKind::Auth(AuthFlag::TgtSecretPath)),
  ("--executor-auth-secret", FlagKind::Auth(AuthFlag::ExecutorAuthSecret)),
  ("--keystore-secret-path", FlagKind::Auth(AuthFlag::KeystoreSecretPath)),
  ("--keystore-password", FlagKind::Auth(AuthFlag::KeystorePassword)),
  ("--private-key-password", FlagKind::Auth(AuthFlag::PrivateKeyPassword)),
  ("--truststore-secret-path", FlagKind::Auth(AuthFlag::TruststoreSecretPath)),
  ("--truststore-password", FlagKind::Auth(AuthFlag::TruststorePassword)),
];

/// Flag name to kind lookup.
#[derive(Debug, Clone)]
pub struct FlagTable {
  flags: HashMap<&'static str, FlagKind>,
}

impl FlagTable {
  /// The flags accepted in `--submit-args`.
  pub fn spark_submit() -> Self {
    SPARK_SUBMIT_FLAGS.iter().copied().collect()
  }

  pub fn lookup(&self, name: &str) -> Option<FlagKind> {
    self.flags.get(name).copied()
  }

  pub fn is_boolean(&self, name: &str) -> bool {
    self.lookup(name).is_some_and(FlagKind::is_boolean)
  }

  /// Names of every boolean flag, sorted.
  pub fn boolean_flags(&self) -> Vec<&'static str> {
    let mut names: Vec<_> = self
      .flags
      .iter()
      .filter(|(_, kind)| kind.is_boolean())
      .map(|(name, _)| *name)
      .collect();
    names.sort_unstable();
    names
  }
}

impl Default for FlagTable {
  fn default() -> Self {
    Self::spark_submit()
  }
}

impl FromIterator<(&'static str, FlagKind)> for FlagTable {
  fn from_iter<I: IntoIterator<Item = (&'static str, FlagKind)>>(iter: I) -> Self {
    FlagTable {
      flags: iter.into_iter().collect(),
    }
  }
}
