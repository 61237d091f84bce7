//! Running provisioning commands through the `vagrant` executable.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use super::{CommandError, ProvisionCommand, Provisioner};
use crate::consts::DEFAULT_VAGRANT;

/// The Vagrant command-line tool.
///
/// Vagrant's progress output reaches the user on stderr; stdout carries only
/// the build summary, which may be JSON. Commands inherit the caller's
/// environment with the command's variables layered on top.
#[derive(Debug, Clone)]
pub struct Vagrant {
  program: PathBuf,
}

impl Vagrant {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
    }
  }

  pub fn program(&self) -> &Path {
    &self.program
  }
}

impl Default for Vagrant {
  fn default() -> Self {
    Self::new(DEFAULT_VAGRANT)
  }
}

impl Provisioner for Vagrant {
  async fn run(&self, command: &ProvisionCommand) -> Result<(), CommandError> {
    let rendered = command.display_with(&self.program);
    info!(step = %command.step, cmd = %rendered, "running vagrant");
    debug!(dir = %command.dir.display(), env = ?command.env, "spawning process");

    let status = Command::new(&self.program)
      .args(&command.args)
      .stdout(Stdio::from(std::io::stderr()))
      .current_dir(&command.dir)
      .envs(&command.env)
      .status()
      .await
      .map_err(|source| CommandError::Spawn {
        command: rendered.clone(),
        source,
      })?;

    if !status.success() {
      return Err(CommandError::Failed {
        step: command.step,
        command: rendered,
        code: status.code(),
      });
    }

    debug!(step = %command.step, "vagrant finished");
    Ok(())
  }
}
