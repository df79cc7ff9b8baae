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

//! # Sparksub
//!
//! `sparksub` turns a `spark-submit` style command line into the JSON body of
//! a `CreateSubmissionRequest` for a Mesos Spark dispatcher, launching the
//! Spark driver as a managed job.
//!
//! The library is a synchronous pipeline with no I/O of its own:
//! raw argument string → [`tokenizer`] → [`options`] → [`properties`] →
//! [`payload`]. [`pipeline::build_submission`] runs all of it.
//!
//! ## Core Modules
//!
//! * [`tokenizer`]: Splits the argument string (quotes, whitespace) and
//!   classifies the words into canonical submit tokens and application
//!   arguments, folding java options into one property per JVM.
//! * [`flags`]: The table of known submit flags and their arity.
//! * [`options`]: Interprets canonical submit tokens.
//! * [`properties`]: The `PropertyMap` and the merge of defaults, user
//!   configuration, labels and secrets.
//! * [`secrets`]: Driver secret registration and shared-secret generation.
//! * [`payload`]: The `SubmissionRequest` JSON shape.
//! * [`command`]: Defines the `SubmitCommand` input record.
//! * [`context`]: The `ExternalContext` collaborator and its per-submission snapshot.
//! * [`config`]: `figment`-based settings, the CLI's `ExternalContext`.
//! * [`cli`]: Defines the `clap`-based command-line interface.
//! * [`error`]: Defines the custom error types for the library.
//! * [`logging`]: Provides the `setup_tracing` utility.

pub mod cli;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod flags;
pub mod logging;
pub mod options;
pub mod payload;
pub mod pipeline;
pub mod properties;
pub mod secrets;
pub mod tokenizer;
