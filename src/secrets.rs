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
use crate::properties::PropertyMap;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;

/// Prefix marking a secret stored base64-encoded in the secret store.
pub const BASE64_MARKER: &str = "__dcos_base64__";

pub const DRIVER_SECRET_NAMES: &str = "spark.mesos.driver.secret.names";
pub const DRIVER_SECRET_FILENAMES: &str = "spark.mesos.driver.secret.filenames";

/// File name a secret is mounted under in the driver sandbox: the last path
/// segment, without the base64 marker.
pub fn secret_filename(path: &str) -> String {
  let base = path.rsplit_once('/').map_or(path, |(_, base)| base);
  base.strip_prefix(BASE64_MARKER).unwrap_or(base).to_string()
}

/// Registers `path` as a file-based driver secret and returns its file name.
///
/// Names and file names are kept as parallel comma-separated lists, so
/// several secrets accumulate. Registering the same path twice is a no-op.
pub fn register_driver_secret(props: &mut PropertyMap, path: &str) -> String {
  let filename = secret_filename(path);

  if props.list_contains(DRIVER_SECRET_NAMES, path) {
    tracing::debug!(%path, "Driver secret already registered");
  } else {
    tracing::debug!(%path, %filename, "Registering driver secret");
    props.append_list(DRIVER_SECRET_NAMES, path);
    props.append_list(DRIVER_SECRET_FILENAMES, &filename);
  }
  props.protect(DRIVER_SECRET_NAMES);
  props.protect(DRIVER_SECRET_FILENAMES);

  filename
}

/// Random 256-bit token, base64-encoded.
pub fn generate_shared_secret() -> String {
  let mut bytes = [0u8; 32];
  rand::rng().fill_bytes(&mut bytes);
  STANDARD.encode(bytes)
}
