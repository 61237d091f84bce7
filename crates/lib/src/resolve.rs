//! Resolving what to build from the command line.
//!
//! Boxes live at `<root>/vagrant/<box>/`. Run from inside one of those
//! directories the box is implied; anywhere else it must be named. A second
//! positional argument selects a branch build.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::consts::VAGRANT_DIR;
use crate::spec::{BoxSpec, SpecError, validate_name};

/// Usage text shown alongside resolution errors.
pub const USAGE: &str = "Usage: build-vagrant-box [OPTIONS] [BOX] [BRANCH]";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
  #[error("expected at most 2 arguments (box name and branch), got {0}")]
  TooManyArguments(usize),

  #[error("box name required when not run from a box directory under vagrant/")]
  MissingBoxName,

  #[error(transparent)]
  Spec(#[from] SpecError),
}

/// Where a build takes place and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
  /// Short box name, e.g. `dev`.
  pub box_name: String,
  /// Artifact base name, e.g. `flocker-dev`.
  pub name: String,
  /// Repository root.
  pub root: PathBuf,
  /// Box directory holding the Vagrantfile.
  pub path: PathBuf,
  /// Source branch for floating builds.
  pub branch: Option<String>,
}

impl Target {
  /// Whether building this target needs the current release version.
  pub fn needs_release_version(&self) -> bool {
    self.branch.is_none()
  }

  /// Turn the target into a specification.
  ///
  /// `release_version` is ignored for branch builds.
  pub fn into_spec(self, release_version: &str) -> Result<BoxSpec, SpecError> {
    match self.branch {
      Some(branch) => BoxSpec::branch(self.path, self.name, branch),
      None => BoxSpec::release(self.path, self.name, release_version),
    }
  }
}

/// Resolve positional arguments against the working directory.
///
/// * `cwd` - Current working directory (absolute)
/// * `root` - Explicit repository root; discovered from `cwd` when `None`
/// * `args` - Positional arguments: `[box] [branch]`
/// * `prefix` - Prepended to the box name to form the artifact name
pub fn resolve_target(cwd: &Path, root: Option<&Path>, args: &[String], prefix: &str) -> Result<Target, ResolveError> {
  if args.len() > 2 {
    return Err(ResolveError::TooManyArguments(args.len()));
  }

  let root = match root {
    Some(root) => root.to_path_buf(),
    None => find_root(cwd),
  };

  let box_name = match args.first() {
    Some(name) => name.clone(),
    None => box_from_cwd(cwd, &root).ok_or(ResolveError::MissingBoxName)?,
  };
  validate_name(&box_name)?;

  let branch = args.get(1).filter(|b| !b.is_empty()).cloned();
  let path = root.join(VAGRANT_DIR).join(&box_name);
  let name = if prefix.is_empty() {
    box_name.clone()
  } else {
    format!("{}-{}", prefix, box_name)
  };

  debug!(box_name = %box_name, path = %path.display(), branch = ?branch, "resolved target");

  Ok(Target {
    box_name,
    name,
    root,
    path,
    branch,
  })
}

/// Nearest ancestor of `cwd` (inclusive) containing a `vagrant/` directory.
///
/// A box directory's grandparent is preferred so that running from
/// `<root>/vagrant/dev` never picks up a nested `vagrant/` inside the box.
/// Falls back to `cwd` itself.
pub fn find_root(cwd: &Path) -> PathBuf {
  if let Some(root) = box_dir_root(cwd) {
    return root.to_path_buf();
  }
  cwd
    .ancestors()
    .find(|dir| dir.join(VAGRANT_DIR).is_dir())
    .unwrap_or(cwd)
    .to_path_buf()
}

fn box_dir_root(cwd: &Path) -> Option<&Path> {
  let parent = cwd.parent()?;
  if parent.file_name()? == VAGRANT_DIR {
    parent.parent()
  } else {
    None
  }
}

fn box_from_cwd(cwd: &Path, root: &Path) -> Option<String> {
  let parent = cwd.parent()?;
  if parent != root.join(VAGRANT_DIR) {
    return None;
  }
  cwd.file_name().map(|name| name.to_string_lossy().into_owned())
}
