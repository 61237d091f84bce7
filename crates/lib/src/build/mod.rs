//! Building boxes.
//!
//! A build runs the provisioning tool through a fixed lifecycle:
//!
//! 1. destroy any leftover environment, so provisioning starts clean
//! 2. bring the environment up with the version/branch variables set
//! 3. package it into the box artifact
//! 4. destroy it again, since the artifact now holds everything needed
//! 5. write the metadata descriptor beside the artifact
//!
//! Any failing step aborts the build. A failed `up` or `package` leaves the
//! environment running so it can be inspected, unless
//! [`BuildOptions::destroy_on_failure`] asks for a best-effort teardown.

mod types;

pub use types::{BuildError, BuildOptions, BuildResult};

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::metadata::BoxMetadata;
use crate::provision::{CommandError, ProvisionCommand, Provisioner};
use crate::spec::BoxSpec;

/// Build the box described by `spec`.
pub async fn build<P: Provisioner>(
  spec: &BoxSpec,
  provisioner: &P,
  options: &BuildOptions,
) -> Result<BuildResult, BuildError> {
  let dir = spec.path();
  if !dir.is_dir() {
    return Err(BuildError::MissingBoxDir { path: dir.to_path_buf() });
  }

  let artifact = spec.artifact_path();
  info!(
    name = %spec.name(),
    version = %spec.version(),
    branch = %spec.branch_name(),
    dir = %dir.display(),
    "building box"
  );

  provisioner.run(&ProvisionCommand::destroy(dir)).await?;

  // `vagrant package` refuses to overwrite an existing output file.
  remove_stale_artifact(&artifact)?;

  let up = ProvisionCommand::up(dir, spec.provision_env());
  if let Err(err) = provisioner.run(&up).await {
    return Err(abort(provisioner, spec, options, err).await);
  }

  let package = ProvisionCommand::package(dir, &artifact);
  if let Err(err) = provisioner.run(&package).await {
    return Err(abort(provisioner, spec, options, err).await);
  }

  provisioner.run(&ProvisionCommand::destroy(dir)).await?;

  let metadata = BoxMetadata::for_artifact(
    &options.namespace,
    spec.name(),
    spec.version(),
    &options.provider,
    &artifact,
  )?;
  let metadata_path = spec.metadata_path();
  metadata.write(&metadata_path)?;

  info!(artifact = %artifact.display(), metadata = %metadata_path.display(), "box built");

  Ok(BuildResult {
    artifact,
    metadata_path,
    metadata,
  })
}

fn remove_stale_artifact(artifact: &Path) -> Result<(), BuildError> {
  match std::fs::remove_file(artifact) {
    Ok(()) => {
      debug!(artifact = %artifact.display(), "removed previous artifact");
      Ok(())
    }
    Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
    Err(source) => Err(BuildError::RemoveArtifact {
      path: artifact.to_path_buf(),
      source,
    }),
  }
}

/// Turn a failed `up`/`package` into the build error, tearing the environment
/// down first when configured to.
async fn abort<P: Provisioner>(provisioner: &P, spec: &BoxSpec, options: &BuildOptions, err: CommandError) -> BuildError {
  if options.destroy_on_failure {
    info!(dir = %spec.path().display(), "destroying failed environment");
    if let Err(cleanup) = provisioner.run(&ProvisionCommand::destroy(spec.path())).await {
      warn!(error = %cleanup, "cleanup after failed build did not succeed");
    }
  } else {
    info!(dir = %spec.path().display(), "leaving failed environment for inspection");
  }
  BuildError::Command(err)
}
