//! Box specifications.
//!
//! A [`BoxSpec`] names one box variant and says which Flocker build goes into
//! it: either a fixed release version or the tip of a source branch. Every
//! output path of a build is derived from it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::{BOX_EXTENSION, BRANCH_ENV, METADATA_EXTENSION, VERSION_ENV};

/// Errors that can occur while constructing a box specification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
  #[error("box name must not be empty")]
  EmptyName,

  #[error("invalid box name '{0}': must not contain path separators")]
  InvalidName(String),

  #[error("either a release version or a branch is required")]
  MissingSource,

  #[error("cannot build from branch '{branch}' with fixed version '{version}'")]
  ConflictingSource { version: String, branch: String },
}

/// A single box to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxSpec {
  path: PathBuf,
  name: String,
  version: String,
  branch: String,
}

impl BoxSpec {
  /// Create a specification, validating the name and the version/branch pair.
  ///
  /// Exactly one of `version` and `branch` must be non-empty. A branch build
  /// pulls unreleased packages and so carries no version.
  pub fn new(
    path: impl Into<PathBuf>,
    name: impl Into<String>,
    version: impl Into<String>,
    branch: impl Into<String>,
  ) -> Result<Self, SpecError> {
    let name = name.into();
    let version = version.into();
    let branch = branch.into();

    validate_name(&name)?;
    match (version.is_empty(), branch.is_empty()) {
      (true, true) => return Err(SpecError::MissingSource),
      (false, false) => return Err(SpecError::ConflictingSource { version, branch }),
      _ => {}
    }

    Ok(Self {
      path: path.into(),
      name,
      version,
      branch,
    })
  }

  /// A box built from a fixed release.
  pub fn release(path: impl Into<PathBuf>, name: impl Into<String>, version: impl Into<String>) -> Result<Self, SpecError> {
    Self::new(path, name, version, "")
  }

  /// A floating box built from the given branch.
  pub fn branch(path: impl Into<PathBuf>, name: impl Into<String>, branch: impl Into<String>) -> Result<Self, SpecError> {
    Self::new(path, name, "", branch)
  }

  /// Directory holding the Vagrantfile for this box.
  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Release version, empty for branch builds.
  pub fn version(&self) -> &str {
    &self.version
  }

  /// Source branch, empty for release builds.
  pub fn branch_name(&self) -> &str {
    &self.branch
  }

  /// `<name>-<version>.box`, or `<name>.box` for floating builds.
  pub fn artifact_file_name(&self) -> String {
    if self.version.is_empty() {
      format!("{}.{}", self.name, BOX_EXTENSION)
    } else {
      format!("{}-{}.{}", self.name, self.version, BOX_EXTENSION)
    }
  }

  pub fn artifact_path(&self) -> PathBuf {
    self.path.join(self.artifact_file_name())
  }

  /// `<name>.json`, written next to the artifact.
  pub fn metadata_path(&self) -> PathBuf {
    self.path.join(format!("{}.{}", self.name, METADATA_EXTENSION))
  }

  /// Environment handed to `vagrant up`.
  ///
  /// Both variables are always present; an empty branch means "no branch
  /// override" to the Vagrantfile and must not be confused with unset.
  pub fn provision_env(&self) -> BTreeMap<String, String> {
    BTreeMap::from([
      (VERSION_ENV.to_string(), env_version(&self.version)),
      (BRANCH_ENV.to_string(), self.branch.clone()),
    ])
  }
}

/// Box names become file and directory names, so they must be a single path component.
pub fn validate_name(name: &str) -> Result<(), SpecError> {
  if name.is_empty() {
    return Err(SpecError::EmptyName);
  }
  if name.contains(['/', '\\']) || name == "." || name == ".." {
    return Err(SpecError::InvalidName(name.to_string()));
  }
  Ok(())
}

/// Version as the Vagrantfile expects it: dashes become underscores.
pub fn env_version(version: &str) -> String {
  version.replace('-', "_")
}

/// Version as Vagrant accepts it in box metadata: dashes become dots.
pub fn metadata_version(version: &str) -> String {
  version.replace('-', ".")
}
