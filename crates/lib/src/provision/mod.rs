//! Provisioning commands.
//!
//! A build drives the provisioning tool through three kinds of step. Each step
//! is described by a typed [`ProvisionCommand`] (working directory, argument
//! list, environment) and handed to a [`Provisioner`] that runs it.

mod vagrant;

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use vagrant::Vagrant;

/// A stage of the box lifecycle that talks to the provisioning tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
  Destroy,
  Up,
  Package,
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Step::Destroy => "destroy",
      Step::Up => "up",
      Step::Package => "package",
    };
    f.write_str(name)
  }
}

/// Errors from running a provisioning command.
#[derive(Debug, Error)]
pub enum CommandError {
  #[error("failed to run `{command}`: {source}")]
  Spawn { command: String, source: std::io::Error },

  /// The command ran and exited unsuccessfully. `code` is `None` when it was
  /// killed by a signal.
  #[error("`{command}` failed with exit code {}", display_code(.code))]
  Failed {
    step: Step,
    command: String,
    code: Option<i32>,
  },
}

impl CommandError {
  /// Exit status of the failed command, if it produced one.
  pub fn code(&self) -> Option<i32> {
    match self {
      CommandError::Spawn { .. } => None,
      CommandError::Failed { code, .. } => *code,
    }
  }
}

fn display_code(code: &Option<i32>) -> String {
  match code {
    Some(code) => code.to_string(),
    None => "none (terminated by signal)".to_string(),
  }
}

/// One invocation of the provisioning tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionCommand {
  pub step: Step,
  pub dir: PathBuf,
  pub args: Vec<OsString>,
  pub env: BTreeMap<String, String>,
}

impl ProvisionCommand {
  /// Tear down the environment in `dir`. Succeeds when there is nothing to tear down.
  pub fn destroy(dir: &Path) -> Self {
    Self {
      step: Step::Destroy,
      dir: dir.to_path_buf(),
      args: vec!["destroy".into(), "-f".into()],
      env: BTreeMap::new(),
    }
  }

  pub fn up(dir: &Path, env: BTreeMap<String, String>) -> Self {
    Self {
      step: Step::Up,
      dir: dir.to_path_buf(),
      args: vec!["up".into()],
      env,
    }
  }

  /// Archive the running environment in `dir` into `output`.
  pub fn package(dir: &Path, output: &Path) -> Self {
    Self {
      step: Step::Package,
      dir: dir.to_path_buf(),
      args: vec!["package".into(), "--output".into(), output.as_os_str().to_owned()],
      env: BTreeMap::new(),
    }
  }

  /// Render as `<program> <args...>` for logs and error messages.
  pub fn display_with(&self, program: &Path) -> String {
    let mut rendered = program.to_string_lossy().into_owned();
    for arg in &self.args {
      rendered.push(' ');
      rendered.push_str(&arg.to_string_lossy());
    }
    rendered
  }
}

/// Something that can carry out provisioning commands.
///
/// [`Vagrant`] is the real implementation; tests substitute recorders.
#[allow(async_fn_in_trait)]
pub trait Provisioner {
  async fn run(&self, command: &ProvisionCommand) -> Result<(), CommandError>;
}
