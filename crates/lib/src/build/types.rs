//! Types for box builds.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::consts::{DEFAULT_NAMESPACE, DEFAULT_PROVIDER};
use crate::metadata::{BoxMetadata, MetadataError};
use crate::provision::CommandError;

/// Errors that abort a build.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The box directory does not exist, so there is nothing to provision.
  #[error("box directory not found: {}", path.display())]
  MissingBoxDir { path: PathBuf },

  #[error("failed to remove previous artifact {}: {source}", path.display())]
  RemoveArtifact { path: PathBuf, source: std::io::Error },

  /// A provisioning command failed. The environment is left as it was.
  #[error(transparent)]
  Command(#[from] CommandError),

  #[error(transparent)]
  Metadata(#[from] MetadataError),
}

impl BuildError {
  /// Process exit status for this failure.
  ///
  /// A failed provisioning command propagates its own status; everything
  /// else, including commands killed by a signal, maps to 1.
  pub fn exit_code(&self) -> i32 {
    match self {
      BuildError::Command(err) => err.code().filter(|code| *code != 0).unwrap_or(1),
      _ => 1,
    }
  }
}

/// Configuration for a build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Metadata namespace, e.g. `clusterhq` in `clusterhq/flocker-dev`.
  pub namespace: String,
  /// Provider recorded in the metadata descriptor.
  pub provider: String,
  /// Destroy the environment when `up` or `package` fails instead of leaving
  /// it for inspection.
  pub destroy_on_failure: bool,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      namespace: DEFAULT_NAMESPACE.to_string(),
      provider: DEFAULT_PROVIDER.to_string(),
      destroy_on_failure: false,
    }
  }
}

/// Result of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
  /// The packaged box.
  pub artifact: PathBuf,
  /// The descriptor written next to it.
  pub metadata_path: PathBuf,
  pub metadata: BoxMetadata,
}
