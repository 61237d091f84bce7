mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use boxbuild_lib::build::BuildError;
use boxbuild_lib::consts::{DEFAULT_NAMESPACE, DEFAULT_PREFIX, DEFAULT_PROVIDER, DEFAULT_VAGRANT};
use boxbuild_lib::resolve::{ResolveError, USAGE};

use crate::output::{OutputFormat, print_error};

/// Build a versioned Vagrant box and its local metadata descriptor
#[derive(Parser)]
#[command(name = "build-vagrant-box")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Box to build; inferred when run from vagrant/<box>/
  #[arg(value_name = "BOX")]
  box_name: Option<String>,

  /// Build from this branch's unreleased packages instead of the current release
  branch: Option<String>,

  #[arg(hide = true)]
  extra: Vec<String>,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,

  /// Output format for the build summary
  #[arg(short, long, value_enum, default_value_t)]
  output: OutputFormat,

  /// Release version to build; defaults to `git describe` in the repository root
  #[arg(long, env = "BOXBUILD_RELEASE_VERSION")]
  release_version: Option<String>,

  /// Repository root containing vagrant/<box>/; discovered from the working directory by default
  #[arg(long, env = "BOXBUILD_ROOT")]
  root: Option<PathBuf>,

  /// Vagrant executable
  #[arg(long, env = "BOXBUILD_VAGRANT", default_value = DEFAULT_VAGRANT)]
  vagrant: PathBuf,

  /// Namespace of the box name in the metadata descriptor
  #[arg(long, default_value = DEFAULT_NAMESPACE)]
  namespace: String,

  /// Prefix joined to the box name to form the artifact name
  #[arg(long, default_value = DEFAULT_PREFIX)]
  prefix: String,

  /// Provider recorded in the metadata descriptor
  #[arg(long, default_value = DEFAULT_PROVIDER)]
  provider: String,

  /// Destroy the VM when `up` or `package` fails instead of leaving it for inspection
  #[arg(long)]
  destroy_on_failure: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let positionals: Vec<String> = cli
    .box_name
    .iter()
    .chain(cli.branch.iter())
    .chain(cli.extra.iter())
    .cloned()
    .collect();

  let args = cmd::BuildArgs {
    positionals,
    release_version: cli.release_version,
    root: cli.root,
    vagrant: cli.vagrant,
    namespace: cli.namespace,
    prefix: cli.prefix,
    provider: cli.provider,
    destroy_on_failure: cli.destroy_on_failure,
    output: cli.output,
  };

  match cmd::cmd_build(args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      if err.downcast_ref::<ResolveError>().is_some() {
        eprintln!("{}", USAGE);
      }
      ExitCode::from(exit_status(&err))
    }
  }
}

/// Map a failure to the process exit status.
///
/// Provisioning command failures propagate the command's own status.
fn exit_status(err: &anyhow::Error) -> u8 {
  err
    .downcast_ref::<BuildError>()
    .map(BuildError::exit_code)
    .and_then(|code| u8::try_from(code).ok())
    .filter(|code| *code != 0)
    .unwrap_or(1)
}
