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

//! Turns a raw `spark-submit` style argument string into canonical submit
//! tokens and pass-through application arguments.
//!
//! The work happens in two stages that can be run on their own:
//!
//! * [`split`] breaks the string into [`Token`]s, honouring single and double
//!   quotes (also in the middle of a word, as in `--conf='a b'`).
//! * [`classify`] walks the tokens with a small state machine driven by the
//!   [`FlagTable`], joining `--flag value` into `--flag=value`, folding java
//!   options into one property per JVM, and splitting at the application
//!   resource.

use crate::error::TokenizeError;
use crate::flags::FlagKind;
use crate::flags::FlagTable;
use crate::flags::JavaTarget;
use serde::Serialize;
use std::iter::Peekable;

/// One word of the argument string, quotes already stripped.
///
/// Quoting only groups characters: a quoted word starting with `-` is still
/// a flag, as it is for `spark-submit` after the shell has removed the quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub text: String,
}

impl Token {
  pub fn new(text: impl Into<String>) -> Self {
    Token { text: text.into() }
  }

  fn is_flag(&self) -> bool {
    looks_like_flag(&self.text)
  }

  /// A single-dash JVM setting such as `-Dkey=value` or `-Xmx1g`.
  fn is_java_setting(&self) -> bool {
    self.is_flag() && !self.text.starts_with("--")
  }
}

impl From<String> for Token {
  fn from(text: String) -> Self {
    Token::new(text)
  }
}

impl From<&str> for Token {
  fn from(text: &str) -> Self {
    Token::new(text)
  }
}

/// Output of the cleanup stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanedArgs {
  /// Canonical `--key=value` and boolean tokens, ending with the application
  /// resource when one was found.
  pub submit_tokens: Vec<String>,
  /// Everything after the application resource, untouched.
  pub app_args: Vec<String>,
}

impl CleanedArgs {
  /// The application resource, i.e. the trailing non-flag submit token.
  pub fn resource(&self) -> Option<&str> {
    self
      .submit_tokens
      .last()
      .filter(|token| !looks_like_flag(token))
      .map(String::as_str)
  }

  /// All tokens in their original order, suitable for feeding back into
  /// [`classify`].
  pub fn into_tokens(self) -> impl Iterator<Item = Token> {
    self
      .submit_tokens
      .into_iter()
      .chain(self.app_args)
      .map(Token::from)
  }
}

/// A lone `-` is a positional (stdin), not a flag.
fn looks_like_flag(text: &str) -> bool {
  text.len() > 1 && text.starts_with('-')
}

/// Splits and classifies `raw` in one go.
pub fn clean(raw: &str, flags: &FlagTable) -> Result<CleanedArgs, TokenizeError> {
  let tokens = split(raw)?;
  classify(tokens, flags)
}

/// Splits on unquoted whitespace, collapsing runs of it.
///
/// Quote characters are removed and the text between them is kept verbatim,
/// so `--conf='a  b'` yields the single token `--conf=a  b`. A quote of the
/// other kind inside a quoted run is literal. An empty quoted word (`''`)
/// still produces a token.
pub fn split(raw: &str) -> Result<Vec<Token>, TokenizeError> {
  let mut tokens = Vec::new();
  let mut current = String::new();
  let mut in_word = false;
  let mut open: Option<(char, usize)> = None;

  for (position, ch) in raw.chars().enumerate() {
    match open {
      Some((quote, _)) if ch == quote => open = None,
      Some(_) => current.push(ch),
      None if ch == '\'' || ch == '"' => {
        open = Some((ch, position));
        in_word = true;
      }
      None if ch.is_whitespace() => {
        if in_word {
          tokens.push(Token::new(std::mem::take(&mut current)));
          in_word = false;
        }
      }
      None => {
        current.push(ch);
        in_word = true;
      }
    }
  }

  if let Some((quote, position)) = open {
    return Err(TokenizeError::UnterminatedQuote { quote, position });
  }
  if in_word {
    tokens.push(Token::new(current));
  }
  if tokens.is_empty() {
    return Err(TokenizeError::Empty);
  }

  Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
  PreResource,
  PostResource,
}

/// Submit-side output slot. Java options are rendered once all occurrences
/// for their JVM have been seen.
enum Slot {
  Token(String),
  JavaOptions(JavaTarget),
}

#[derive(Default)]
struct JavaOptions {
  driver: Option<Vec<String>>,
  executor: Option<Vec<String>>,
}

impl JavaOptions {
  fn slot(&mut self, target: JavaTarget) -> &mut Option<Vec<String>> {
    match target {
      JavaTarget::Driver => &mut self.driver,
      JavaTarget::Executor => &mut self.executor,
    }
  }

  /// Adds the settings in `value`, skipping ones already recorded. Returns
  /// true the first time `target` is seen.
  fn record(&mut self, target: JavaTarget, value: &str) -> bool {
    let slot = self.slot(target);
    let first = slot.is_none();
    let settings = slot.get_or_insert_with(Vec::new);
    for setting in java_settings(value) {
      if !settings.contains(&setting) {
        settings.push(setting);
      }
    }
    first
  }

  fn render(&mut self, target: JavaTarget) -> String {
    let settings = self.slot(target).take().unwrap_or_default();
    format!("--conf={}={}", target.property(), settings.join(" "))
  }
}

/// Breaks a java-options value into whole settings.
///
/// Words split on whitespace outside quotes, with the quote characters kept.
/// A setting starts at a word beginning with `-`; any other word belongs to
/// the setting before it, so `-Dmsg=hello world` stays one setting.
fn java_settings(value: &str) -> Vec<String> {
  let mut words = Vec::new();
  let mut current = String::new();
  let mut open: Option<char> = None;

  for ch in value.chars() {
    match open {
      Some(quote) if ch == quote => {
        open = None;
        current.push(ch);
      }
      Some(_) => current.push(ch),
      None if ch == '\'' || ch == '"' => {
        open = Some(ch);
        current.push(ch);
      }
      None if ch.is_whitespace() => {
        if !current.is_empty() {
          words.push(std::mem::take(&mut current));
        }
      }
      None => current.push(ch),
    }
  }
  if !current.is_empty() {
    words.push(current);
  }

  let mut settings: Vec<String> = Vec::new();
  for word in words {
    match settings.last_mut() {
      Some(setting) if !word.starts_with('-') => {
        setting.push(' ');
        setting.push_str(&word);
      }
      _ => settings.push(word),
    }
  }
  settings
}

/// Classifies already split tokens.
///
/// Before the application resource every token is a flag: boolean switches
/// stay standalone, value flags absorb their value into `--flag=value`, and
/// java options fold into `--conf=spark.{driver,executor}.extraJavaOptions=…`
/// at the position of their first occurrence. The first non-flag token is the
/// resource and closes the submit tokens; the rest are application arguments.
///
/// Flags missing from `flags` are kept as they are (a bare `--flag` does not
/// take the next token) and left for the option parser to reject.
pub fn classify<I>(tokens: I, flags: &FlagTable) -> Result<CleanedArgs, TokenizeError>
where
  I: IntoIterator<Item = Token>,
{
  let mut tokens = tokens.into_iter().peekable();
  let mut slots: Vec<Slot> = Vec::new();
  let mut java = JavaOptions::default();
  let mut app_args = Vec::new();
  let mut state = State::PreResource;

  while let Some(token) = tokens.next() {
    if state == State::PostResource {
      app_args.push(token.text);
      continue;
    }

    if !token.is_flag() {
      tracing::debug!(resource = %token.text, "Found application resource");
      slots.push(Slot::Token(token.text));
      state = State::PostResource;
      continue;
    }

    let (name, inline) = match token.text.split_once('=') {
      Some((name, value)) => (name.to_string(), Some(value.to_string())),
      None => (token.text.clone(), None),
    };

    match flags.lookup(&name) {
      None => {
        tracing::debug!(flag = %name, "Keeping unrecognized flag as-is");
        slots.push(Slot::Token(token.text));
      }
      Some(kind) if kind.is_boolean() => slots.push(Slot::Token(token.text)),
      Some(FlagKind::JavaOptions(target)) => {
        let value = take_value(&name, inline, &mut tokens)?;
        let value = fold_java_settings(value, &mut tokens);
        if java.record(target, &value) {
          slots.push(Slot::JavaOptions(target));
        }
      }
      Some(FlagKind::Conf) => {
        let value = take_value(&name, inline, &mut tokens)?;
        let java_target = value
          .split_once('=')
          .and_then(|(key, options)| JavaTarget::from_property(key).map(|t| (t, options)));

        match java_target {
          Some((target, options)) => {
            let options = fold_java_settings(options.to_string(), &mut tokens);
            if java.record(target, &options) {
              slots.push(Slot::JavaOptions(target));
            }
          }
          None => slots.push(Slot::Token(format!("{name}={value}"))),
        }
      }
      Some(_) => {
        let value = take_value(&name, inline, &mut tokens)?;
        slots.push(Slot::Token(format!("{name}={value}")));
      }
    }
  }

  let submit_tokens = slots
    .into_iter()
    .map(|slot| match slot {
      Slot::Token(token) => token,
      Slot::JavaOptions(target) => java.render(target),
    })
    .collect();

  Ok(CleanedArgs {
    submit_tokens,
    app_args,
  })
}

fn take_value<I>(
  flag: &str,
  inline: Option<String>,
  tokens: &mut Peekable<I>,
) -> Result<String, TokenizeError>
where
  I: Iterator<Item = Token>,
{
  match inline {
    Some(value) => Ok(value),
    None => tokens
      .next()
      .map(|token| token.text)
      .ok_or_else(|| TokenizeError::MissingValue {
        flag: flag.to_string(),
      }),
  }
}

/// Appends the single-dash `-D…`/`-X…` words that follow a java-options value.
fn fold_java_settings<I>(mut value: String, tokens: &mut Peekable<I>) -> String
where
  I: Iterator<Item = Token>,
{
  while let Some(next) = tokens.next_if(Token::is_java_setting) {
    if !value.is_empty() {
      value.push(' ');
    }
    value.push_str(&next.text);
  }
  value
}
