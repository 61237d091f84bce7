//! CLI output formatting utilities.
//!
//! Progress and summary lines go to stdout, errors and warnings to stderr.
//! Colour is only used when the stream supports it.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const WARNING: &str = "!";
  pub const HINT: &str = "$";
}

/// Elapsed wall-clock time, rounded down to whole seconds.
pub fn format_elapsed(elapsed: Duration) -> String {
  humantime::format_duration(Duration::from_secs(elapsed.as_secs())).to_string()
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

/// A follow-up shell command for the user to run, e.g. `vagrant box add`.
pub fn print_hint(intro: &str, command: &str) {
  println!();
  println!("{}", intro);
  println!(
    "  {} {}",
    symbols::HINT.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    command.if_supports_color(Stream::Stdout, |s| s.cyan())
  );
}

/// Message shown when a failed build leaves its VM behind.
pub fn left_running_message(dir: &Path) -> String {
  format!(
    "VM left running in {} for inspection; remove it with `vagrant destroy -f` there",
    dir.display()
  )
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
