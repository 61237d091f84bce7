//! Box metadata descriptors.
//!
//! `vagrant box add <file>.json` reads this format to register a box from a
//! local file instead of fetching it from a remote catalog.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::spec::metadata_version;

#[derive(Debug, Error)]
pub enum MetadataError {
  #[error("failed to resolve artifact path {}: {source}", path.display())]
  Artifact { path: PathBuf, source: std::io::Error },

  #[error("failed to serialize box metadata: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("failed to write box metadata {}: {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxMetadata {
  pub name: String,
  pub description: String,
  pub versions: Vec<BoxVersion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxVersion {
  pub version: String,
  pub providers: Vec<BoxProvider>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxProvider {
  pub name: String,
  pub url: String,
}

impl BoxMetadata {
  /// Describe a single artifact as the only version of `<namespace>/<box_name>`.
  ///
  /// Dashes in `version` are turned into dots; relative artifact paths are made
  /// absolute against the current directory.
  pub fn for_artifact(
    namespace: &str,
    box_name: &str,
    version: &str,
    provider: &str,
    artifact: &Path,
  ) -> Result<Self, MetadataError> {
    let url = std::path::absolute(artifact).map_err(|source| MetadataError::Artifact {
      path: artifact.to_path_buf(),
      source,
    })?;
    let name = format!("{}/{}", namespace, box_name);

    Ok(Self {
      description: format!("Test {} box.", name),
      name,
      versions: vec![BoxVersion {
        version: metadata_version(version),
        providers: vec![BoxProvider {
          name: provider.to_string(),
          url: url.to_string_lossy().into_owned(),
        }],
      }],
    })
  }

  /// Write the descriptor as pretty-printed JSON, replacing any existing file.
  pub fn write(&self, path: &Path) -> Result<(), MetadataError> {
    let mut json = serde_json::to_string_pretty(self)?;
    json.push('\n');
    fs::write(path, json).map_err(|source| MetadataError::Write {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "wrote box metadata");
    Ok(())
  }
}
