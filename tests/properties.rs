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
use sparksub::command::SubmitCommand;
use sparksub::context::ExternalContext;
use sparksub::error::SubmitError;
use sparksub::flags::FlagTable;
use sparksub::properties::PropertyMap;
use sparksub::properties::build_properties;
use sparksub::secrets::generate_shared_secret;
use sparksub::secrets::secret_filename;
use sparksub::tokenizer::clean;

const IMAGE: &str = "mesosphere/spark";
const APP_JAR: &str = "http://spark-example.jar";
const MAIN_CLASS: &str = "org.apache.spark.examples.SparkPi";
const PRINCIPAL: &str = "client@local";
const SERVICE_NAME: &str = "spark-app";

struct FakeContext {
  ssl_verify: bool,
  service_name: &'static str,
}

impl Default for FakeContext {
  fn default() -> Self {
    FakeContext {
      ssl_verify: false,
      service_name: SERVICE_NAME,
    }
  }
}

impl ExternalContext for FakeContext {
  fn resolve_service_url(&self) -> String {
    "https://fake-url".to_string()
  }

  fn ssl_verify_enabled(&self) -> bool {
    self.ssl_verify
  }

  fn service_name(&self) -> String {
    self.service_name.to_string()
  }
}

fn properties_for(cmd: &SubmitCommand) -> Result<PropertyMap, SubmitError> {
  properties_with_context(cmd, &FakeContext::default())
}

fn properties_with_context(
  cmd: &SubmitCommand,
  context: &FakeContext,
) -> Result<PropertyMap, SubmitError> {
  let cleaned = clean(&cmd.submit_args, &FlagTable::spark_submit())?;
  build_properties(cmd, &cleaned.submit_tokens, context)
}

fn check_props(props: &PropertyMap, expected: &[(&str, &str)]) {
  for (key, value) in expected {
    assert_eq!(props.get(key), Some(*value), "property {key}");
  }
}

fn spark_pi_args(extra: &str) -> String {
  format!(
    "--driver-cores 1 {extra} --conf spark.cores.max=1 --driver-memory 512M \
     --class {MAIN_CLASS} {APP_JAR} --input1 value1 --input2 value2"
  )
}

#[test]
fn test_simple_submission_properties() {
  let cmd = SubmitCommand::new(spark_pi_args("")).with_docker_image(IMAGE);
  let props = properties_for(&cmd).unwrap();

  let space_label = format!("DCOS_SPACE:/{SERVICE_NAME}");
  check_props(
    &props,
    &[
      ("spark.driver.cores", "1"),
      ("spark.cores.max", "1"),
      ("spark.mesos.executor.docker.forcePullImage", "true"),
      ("spark.mesos.executor.docker.image", IMAGE),
      ("spark.mesos.task.labels", space_label.as_str()),
      ("spark.mesos.driver.labels", space_label.as_str()),
      ("spark.ssl.noCertVerification", "true"),
      ("spark.executor.memory", "1G"),
      ("spark.submit.deployMode", "cluster"),
      ("spark.driver.memory", "512M"),
      ("spark.jars", APP_JAR),
      ("spark.master", "https://fake-url"),
    ],
  );
  assert!(!props.contains_key("spark.mesos.containerizer"));
  assert!(!props.contains_key("spark.authenticate"));
}

#[test]
fn test_user_image_and_force_pull_are_kept() {
  let cmd = SubmitCommand::new(spark_pi_args(
    "--conf spark.mesos.executor.docker.image=other \
     --conf spark.mesos.executor.docker.forcePullImage=false",
  ));
  let props = properties_for(&cmd).unwrap();

  check_props(
    &props,
    &[
      ("spark.mesos.executor.docker.forcePullImage", "false"),
      ("spark.mesos.executor.docker.image", "other"),
    ],
  );
}

#[test]
fn test_user_image_wins_over_command_image() {
  let cmd = SubmitCommand::new("--conf spark.mesos.executor.docker.image=other app.jar")
    .with_docker_image(IMAGE);
  let props = properties_for(&cmd).unwrap();

  check_props(
    &props,
    &[
      ("spark.mesos.executor.docker.image", "other"),
      ("spark.mesos.executor.docker.forcePullImage", "true"),
    ],
  );
}

#[test]
fn test_no_image_means_no_force_pull() {
  let props = properties_for(&SubmitCommand::new("app.jar")).unwrap();

  assert!(!props.contains_key("spark.mesos.executor.docker.image"));
  assert!(!props.contains_key("spark.mesos.executor.docker.forcePullImage"));
}

fn check_keytab_secret(secret_path: &str, secret_file: &str) {
  let cmd = SubmitCommand::new(spark_pi_args(&format!(
    "--kerberos-principal {PRINCIPAL} --keytab-secret-path /{secret_path}"
  )))
  .with_docker_image(IMAGE);
  let props = properties_for(&cmd).unwrap();
  let secret_name = format!("/{secret_path}");

  check_props(
    &props,
    &[
      ("spark.yarn.principal", PRINCIPAL),
      ("spark.yarn.keytab", secret_file),
      ("spark.mesos.containerizer", "mesos"),
      ("spark.mesos.driver.secret.filenames", secret_file),
      ("spark.mesos.driver.secret.names", secret_name.as_str()),
    ],
  );
}

#[test]
fn test_keytab_secret() {
  check_keytab_secret("keytab", "keytab");
}

#[test]
fn test_base64_keytab_secret_keeps_marker_in_path_only() {
  check_keytab_secret("__dcos_base64__keytab", "keytab");
}

#[test]
fn test_kerberos_from_command_fields() {
  let cmd = SubmitCommand::new("app.jar").with_kerberos(PRINCIPAL, "/keytab");
  let props = properties_for(&cmd).unwrap();

  check_props(
    &props,
    &[
      ("spark.yarn.principal", PRINCIPAL),
      ("spark.mesos.driver.secret.names", "/keytab"),
    ],
  );
}

#[test]
fn test_executor_auth_secret() {
  let cmd = SubmitCommand::new(format!(
    "--executor-auth-secret /spark-auth-secret --class {MAIN_CLASS} {APP_JAR} --input1 value1"
  ))
  .with_docker_image(IMAGE);
  let props = properties_for(&cmd).unwrap();

  check_props(
    &props,
    &[
      ("spark.authenticate", "true"),
      ("spark.mesos.containerizer", "mesos"),
      ("spark.authenticate.enableSaslEncryption", "true"),
      ("spark.authenticate.secret", "spark_shared_secret"),
      ("spark.executorEnv._SPARK_AUTH_SECRET", "spark_shared_secret"),
      ("spark.mesos.driver.secret.filenames", "spark-auth-secret"),
      ("spark.mesos.driver.secret.names", "/spark-auth-secret"),
    ],
  );
}

#[test]
fn test_keytab_and_auth_secrets_accumulate() {
  let cmd = SubmitCommand::new(format!(
    "--kerberos-principal {PRINCIPAL} --keytab-secret-path /__dcos_base64__keytab \
     --executor-auth-secret /spark-auth-secret {APP_JAR}"
  ));
  let props = properties_for(&cmd).unwrap();

  check_props(
    &props,
    &[
      (
        "spark.mesos.driver.secret.names",
        "/__dcos_base64__keytab,/spark-auth-secret",
      ),
      ("spark.mesos.driver.secret.filenames", "keytab,spark-auth-secret"),
      ("spark.authenticate", "true"),
    ],
  );
}

#[test]
fn test_tls_and_tgt_secrets() {
  let cmd = SubmitCommand::new(
    "--tgt-secret-path /tgt --keystore-secret-path /__dcos_base64__server.jks \
     --keystore-password ks-pass --private-key-password key-pass \
     --truststore-secret-path /trust.jks --truststore-password trust-pass app.jar",
  );
  let props = properties_for(&cmd).unwrap();

  check_props(
    &props,
    &[
      (
        "spark.mesos.driver.secret.names",
        "/tgt,/__dcos_base64__server.jks,/trust.jks",
      ),
      (
        "spark.mesos.driver.secret.filenames",
        "tgt,server.jks,trust.jks",
      ),
      ("spark.mesos.driverEnv.KRB5CCNAME", "tgt"),
      ("spark.ssl.enabled", "true"),
      ("spark.ssl.keyStore", "server.jks"),
      ("spark.ssl.keyStorePassword", "ks-pass"),
      ("spark.ssl.keyPassword", "key-pass"),
      ("spark.ssl.trustStore", "trust.jks"),
      ("spark.ssl.trustStorePassword", "trust-pass"),
      ("spark.mesos.containerizer", "mesos"),
    ],
  );
}

#[test]
fn test_computed_keys_override_user_conf() {
  let cmd = SubmitCommand::new(
    "--conf spark.authenticate.secret=mine --conf spark.master=mesos://elsewhere \
     --conf spark.mesos.containerizer=docker --executor-auth-secret /s app.jar",
  );
  let props = properties_for(&cmd).unwrap();

  check_props(
    &props,
    &[
      ("spark.authenticate.secret", "spark_shared_secret"),
      ("spark.master", "https://fake-url"),
      ("spark.mesos.containerizer", "mesos"),
    ],
  );
  assert!(props.is_protected("spark.authenticate.secret"));
  assert!(props.is_protected("spark.master"));
}

#[test]
fn test_auth_secret_conf_survives_without_auth_request() {
  let props =
    properties_for(&SubmitCommand::new("--conf spark.authenticate.secret=mine app.jar")).unwrap();

  assert_eq!(props.get("spark.authenticate.secret"), Some("mine"));
  assert!(!props.is_protected("spark.authenticate.secret"));
}

#[test]
fn test_last_conf_wins() {
  let cmd = SubmitCommand::new(
    "--conf spark.cores.max=1 --driver-memory 1G --conf spark.cores.max=4 \
     --conf spark.driver.memory=2G app.jar",
  );
  let props = properties_for(&cmd).unwrap();

  check_props(
    &props,
    &[("spark.cores.max", "4"), ("spark.driver.memory", "2G")],
  );
}

#[test]
fn test_command_fields_are_defaults_for_flags() {
  let cmd = SubmitCommand::new("--driver-cores 3 --supervise app.jar")
    .with_driver_cores(2.0)
    .with_driver_memory_mb(1024)
    .with_total_executor_cores(6)
    .with_property("spark.eventLog.enabled", "true")
    .with_property("spark.executor.memory", "4G")
    .with_env("FOO", "bar");
  let props = properties_for(&cmd).unwrap();

  check_props(
    &props,
    &[
      ("spark.driver.cores", "3"),
      ("spark.driver.memory", "1024M"),
      ("spark.cores.max", "6"),
      ("spark.driver.supervise", "true"),
      ("spark.eventLog.enabled", "true"),
      ("spark.executor.memory", "4G"),
      ("spark.mesos.driverEnv.FOO", "bar"),
    ],
  );
}

#[test]
fn test_space_labels_keep_user_labels() {
  let cmd = SubmitCommand::new(
    "--conf spark.mesos.driver.labels=team:data,DCOS_SPACE:/other app.jar",
  );
  let props = properties_for(&cmd).unwrap();

  check_props(
    &props,
    &[
      ("spark.mesos.driver.labels", "team:data,DCOS_SPACE:/spark-app"),
      ("spark.mesos.task.labels", "DCOS_SPACE:/spark-app"),
    ],
  );
}

#[test]
fn test_context_values() {
  let context = FakeContext {
    ssl_verify: true,
    service_name: "/nested/spark",
  };
  let props = properties_with_context(&SubmitCommand::new("app.jar"), &context).unwrap();

  check_props(
    &props,
    &[
      ("spark.ssl.noCertVerification", "false"),
      ("spark.mesos.driver.labels", "DCOS_SPACE:/nested/spark"),
    ],
  );
}

#[test]
fn test_resource_is_appended_to_jars() {
  let props = properties_for(&SubmitCommand::new("--jars dep.jar app.jar")).unwrap();
  assert_eq!(props.get("spark.jars"), Some("dep.jar,app.jar"));

  let props = properties_for(&SubmitCommand::new("--py-files dep.py job.py")).unwrap();
  assert_eq!(props.get("spark.jars"), None);
  assert_eq!(props.get("spark.submit.pyFiles"), Some("dep.py"));
}

#[test]
fn test_java_options_reach_properties() {
  let cmd = SubmitCommand::new(
    "--driver-java-options '-Da=1 -Db=2' --conf spark.driver.extraJavaOptions=-Dc=3 app.jar",
  );
  let props = properties_for(&cmd).unwrap();

  assert_eq!(
    props.get("spark.driver.extraJavaOptions"),
    Some("-Da=1 -Db=2 -Dc=3")
  );
}

#[test]
fn test_malformed_conf() {
  let err = properties_for(&SubmitCommand::new("--conf spark.cores.max app.jar")).unwrap_err();
  assert!(
    matches!(err, SubmitError::MalformedConfig { ref value } if value == "spark.cores.max"),
    "{err:?}"
  );

  let err = properties_for(&SubmitCommand::new("--conf =1 app.jar")).unwrap_err();
  assert!(matches!(err, SubmitError::MalformedConfig { .. }), "{err:?}");
}

#[test]
fn test_missing_resource() {
  let err = properties_for(&SubmitCommand::new("--driver-memory 1G")).unwrap_err();
  assert!(matches!(err, SubmitError::MissingResource), "{err:?}");
}

#[test]
fn test_empty_quoted_resource_is_missing() {
  let err = properties_for(&SubmitCommand::new("--class Main '' x")).unwrap_err();
  assert!(matches!(err, SubmitError::MissingResource), "{err:?}");
}

#[test]
fn test_unknown_flag_is_rejected() {
  let err = properties_for(&SubmitCommand::new("--deploy-mode=client app.jar")).unwrap_err();
  assert!(
    matches!(err, SubmitError::UnknownFlag { ref flag } if flag == "--deploy-mode"),
    "{err:?}"
  );
}

#[test]
fn test_invalid_switch_value() {
  let err = properties_for(&SubmitCommand::new("--supervise=maybe app.jar")).unwrap_err();
  assert!(matches!(err, SubmitError::InvalidValue { .. }), "{err:?}");

  let props = properties_for(&SubmitCommand::new("--supervise=false app.jar")).unwrap();
  assert_eq!(props.get("spark.driver.supervise"), Some("false"));
}

#[test]
fn test_second_positional_is_rejected() {
  let tokens = ["a.jar", "b.jar"];
  let err =
    build_properties(&SubmitCommand::default(), &tokens, &FakeContext::default()).unwrap_err();
  assert!(matches!(err, SubmitError::UnexpectedArgument { .. }), "{err:?}");
}

#[test]
fn test_property_map_write_rules() {
  let mut props = PropertyMap::new();
  props.set("spark.driver.cores", 1.5);
  props.set("spark.driver.supervise", true);
  props.set_default("spark.driver.cores", 4);
  props.set_protected("spark.master", "mesos://a");

  assert!(!props.set("spark.master", "mesos://b"));
  assert_eq!(props.get("spark.master"), Some("mesos://a"));
  assert_eq!(props.get("spark.driver.cores"), Some("1.5"));
  assert_eq!(props.get("spark.driver.supervise"), Some("true"));

  props.append_list("spark.jars", "a.jar");
  props.append_list("spark.jars", "b.jar");
  assert_eq!(props.list("spark.jars"), vec!["a.jar", "b.jar"]);
  assert_eq!(props.len(), 4);
}

#[test]
fn test_secret_helpers() {
  assert_eq!(secret_filename("/path/to/__dcos_base64__keytab"), "keytab");
  assert_eq!(secret_filename("keytab"), "keytab");
  assert_eq!(secret_filename("/spark-auth-secret"), "spark-auth-secret");

  let first = generate_shared_secret();
  let second = generate_shared_secret();
  assert_eq!(first.len(), 44);
  assert_ne!(first, second);
}
