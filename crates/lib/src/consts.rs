//! Names and defaults shared across the crate.

/// Directory under the repository root holding one subdirectory per box variant.
pub const VAGRANT_DIR: &str = "vagrant";

pub const BOX_EXTENSION: &str = "box";
pub const METADATA_EXTENSION: &str = "json";

pub const DEFAULT_VAGRANT: &str = "vagrant";
pub const DEFAULT_NAMESPACE: &str = "clusterhq";
pub const DEFAULT_PREFIX: &str = "flocker";
pub const DEFAULT_PROVIDER: &str = "virtualbox";

/// Environment variables read by the Vagrantfile while provisioning.
pub const VERSION_ENV: &str = "FLOCKER_VERSION";
pub const BRANCH_ENV: &str = "FLOCKER_BRANCH";
