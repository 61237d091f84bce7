//! Implementation of the `build-vagrant-box` command.
//!
//! Resolves which box to build from the working directory and positional
//! arguments, looks up the release version when needed, and runs the build.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use boxbuild_lib::build::{BuildError, BuildOptions, build};
use boxbuild_lib::provision::{CommandError, Step, Vagrant};
use boxbuild_lib::resolve::resolve_target;
use boxbuild_lib::version::release_version;

use crate::output::{
  OutputFormat, format_elapsed, left_running_message, print_hint, print_info, print_json, print_stat, print_success,
  print_warning,
};

/// Arguments for a build, collected from the command line.
pub struct BuildArgs {
  /// `[box] [branch]`, plus anything extra the user passed.
  pub positionals: Vec<String>,
  pub release_version: Option<String>,
  pub root: Option<PathBuf>,
  pub vagrant: PathBuf,
  pub namespace: String,
  pub prefix: String,
  pub provider: String,
  pub destroy_on_failure: bool,
  pub output: OutputFormat,
}

/// Execute the build command.
///
/// - Resolves the target box before running anything, so usage errors never
///   touch Vagrant
/// - Reads the release version once (only for release builds)
/// - Runs destroy/up/package/destroy and writes the metadata descriptor
///
/// Prints a summary with the artifact and descriptor paths.
pub fn cmd_build(args: BuildArgs) -> Result<()> {
  let cwd = std::env::current_dir().context("Failed to determine working directory")?;
  let cwd = dunce::canonicalize(&cwd).unwrap_or(cwd);
  let root = args.root.map(|root| dunce::canonicalize(&root).unwrap_or(root));

  let target = resolve_target(&cwd, root.as_deref(), &args.positionals, &args.prefix)?;

  // Builds are strictly sequential; a single-threaded runtime is enough.
  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")?;

  let version = if target.needs_release_version() {
    rt.block_on(release_version(&target.root, args.release_version.as_deref()))
      .context("Failed to determine release version")?
  } else {
    String::new()
  };

  let box_name = target.box_name.clone();
  let spec = target.into_spec(&version)?;

  if !args.output.is_json() {
    match spec.branch_name() {
      "" => print_info(&format!("Building box {} at version {}", box_name, spec.version())),
      branch => print_info(&format!("Building box {} from branch {}", box_name, branch)),
    }
  }

  let vagrant = Vagrant::new(args.vagrant);
  let options = BuildOptions {
    namespace: args.namespace,
    provider: args.provider,
    destroy_on_failure: args.destroy_on_failure,
  };

  let started = Instant::now();
  let result = match rt.block_on(build(&spec, &vagrant, &options)) {
    Ok(result) => result,
    Err(err) => {
      if left_running(&err, options.destroy_on_failure) {
        print_warning(&left_running_message(spec.path()));
      }
      return Err(anyhow::Error::new(err).context("Build failed"));
    }
  };
  info!(elapsed = ?started.elapsed(), "build finished");

  if args.output.is_json() {
    return print_json(&result);
  }

  print_success(&format!("Built {} in {}", spec.name(), format_elapsed(started.elapsed())));
  print_stat("Box", &result.artifact.display().to_string());
  print_stat("Metadata", &result.metadata_path.display().to_string());
  if let Some(entry) = result.metadata.versions.first().filter(|v| !v.version.is_empty()) {
    print_stat("Version", &entry.version);
  }
  print_hint(
    "Register it locally with:",
    &format!("vagrant box add {}", result.metadata_path.display()),
  );

  Ok(())
}

/// Whether a failed build left a provisioned VM behind.
///
/// Only a failed `up` or `package` does; a failed initial destroy never got
/// that far, and `--destroy-on-failure` already tore it down.
fn left_running(err: &BuildError, destroy_on_failure: bool) -> bool {
  !destroy_on_failure
    && matches!(
      err,
      BuildError::Command(CommandError::Failed {
        step: Step::Up | Step::Package,
        ..
      })
    )
}
