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
use crate::context::ExternalContext;
use crate::context::SubmitContext;
use crate::error::SubmitError;
use crate::flags::FlagTable;
use crate::options::SubmitOptions;
use crate::payload::SubmissionRequest;
use crate::properties::merge;
use crate::tokenizer::clean;

/// Runs the whole pipeline: clean, parse, merge, and assemble the request.
///
/// The context is read once, before any token is looked at.
pub fn build_submission<C>(cmd: &SubmitCommand, context: &C) -> Result<SubmissionRequest, SubmitError>
where
  C: ExternalContext + ?Sized,
{
  let context = SubmitContext::capture(context);
  let span = tracing::info_span!("build_submission", id = %cmd.submission_id);
  let _enter = span.enter();

  let flags = FlagTable::spark_submit();
  let cleaned = clean(&cmd.submit_args, &flags)?;
  tracing::debug!(
    submit_tokens = ?cleaned.submit_tokens,
    app_args = ?cleaned.app_args,
    "Cleaned submit arguments"
  );

  let options = SubmitOptions::parse(&cleaned.submit_tokens, &flags)?;
  if cmd.verbose || options.verbose {
    tracing::info!(tokens = ?cleaned.submit_tokens, "Verbose submission");
  }

  let props = merge(cmd, &options, &context);
  tracing::info!(
    resource = %options.app_resource,
    properties = props.len(),
    "Built submission request"
  );

  Ok(
    SubmissionRequest::new(
      options.app_resource,
      options.main_class.unwrap_or_default(),
      cleaned.app_args,
      props,
    )
    .with_client_spark_version(context.client_spark_version)
    .with_environment(cmd.env.clone()),
  )
}

/// [`build_submission`] rendered as compact JSON.
pub fn build_submit_json<C>(cmd: &SubmitCommand, context: &C) -> Result<String, SubmitError>
where
  C: ExternalContext + ?Sized,
{
  build_submission(cmd, context)?.to_json()
}
