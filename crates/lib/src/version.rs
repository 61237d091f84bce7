//! Release version lookup.
//!
//! The version of the software that goes into a release box is taken from an
//! explicit override when one is given, otherwise from `git describe` in the
//! repository root. It is looked up once and passed along as a plain value.

use std::path::Path;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum VersionError {
  #[error("failed to run git: {0}")]
  Git(#[from] std::io::Error),

  #[error("`git describe` failed in {path} with exit code {code:?}: {stderr}")]
  Describe {
    path: String,
    code: Option<i32>,
    stderr: String,
  },

  #[error("release version is empty")]
  Empty,
}

/// Determine the current release version.
///
/// `override_version` wins when present; it is trimmed and must not be empty.
pub async fn release_version(root: &Path, override_version: Option<&str>) -> Result<String, VersionError> {
  if let Some(version) = override_version {
    return non_empty(version);
  }

  let output = Command::new("git")
    .args(["describe", "--tags", "--dirty", "--always"])
    .current_dir(root)
    .output()
    .await?;

  if !output.status.success() {
    return Err(VersionError::Describe {
      path: root.display().to_string(),
      code: output.status.code(),
      stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    });
  }

  let version = non_empty(&String::from_utf8_lossy(&output.stdout))?;
  debug!(version = %version, "release version from git");
  Ok(version)
}

fn non_empty(version: &str) -> Result<String, VersionError> {
  let version = version.trim();
  if version.is_empty() {
    return Err(VersionError::Empty);
  }
  Ok(version.to_string())
}
