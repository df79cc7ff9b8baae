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
use Commands::Payload;
use Commands::Tokens;
use anyhow::Result;
use clap::Parser;
use sparksub::cli::Cli;
use sparksub::cli::Commands;
use sparksub::cli::run_payload;
use sparksub::cli::run_tokens;
use sparksub::logging::setup_tracing;

fn main() -> Result<()> {
  let _log_guard = setup_tracing()?;

  let Cli { command } = Cli::parse();
  let main_span = tracing::info_span!("sparksub");
  let _enter = main_span.enter();

  match command {
    Payload(args) => {
      tracing::debug!("Building submission payload...");

      let json = run_payload(&args)?;
      println!("{}", json);
    }
    Tokens { submit_args } => {
      let json = run_tokens(&submit_args)?;
      println!("{}", json);
    }
  }

  Ok(())
}
