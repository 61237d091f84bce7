//! Successful build integration tests.

use predicates::prelude::*;
use serde_json::Value;
use serial_test::serial;

use super::common::TestRepo;

fn read_json(path: &std::path::Path) -> Value {
  serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
#[serial]
fn release_build_from_repository_root() {
  let repo = TestRepo::new();
  let dir = repo.box_dir("dev");

  repo
    .cmd()
    .arg("dev")
    .arg("--release-version")
    .arg("0.2.1")
    .assert()
    .success()
    .stdout(predicate::str::contains("Built flocker-dev"))
    .stdout(predicate::str::contains("==> default").not())
    .stderr(predicate::str::contains("==> default: package"));

  let artifact = dir.join("flocker-dev-0.2.1.box");
  assert!(artifact.exists(), "box artifact should be packaged");

  let metadata = read_json(&dir.join("flocker-dev.json"));
  assert_eq!(metadata["name"], "clusterhq/flocker-dev");
  assert_eq!(metadata["description"], "Test clusterhq/flocker-dev box.");
  assert_eq!(metadata["versions"][0]["version"], "0.2.1");
  assert_eq!(metadata["versions"][0]["providers"][0]["name"], "virtualbox");
  assert_eq!(
    metadata["versions"][0]["providers"][0]["url"],
    artifact.to_string_lossy().as_ref()
  );

  assert_eq!(
    repo.call_args(),
    vec![
      "destroy -f".to_string(),
      "up".to_string(),
      format!("package --output {}", artifact.display()),
      "destroy -f".to_string(),
    ]
  );
}

#[test]
#[serial]
fn every_step_runs_in_box_directory() {
  let repo = TestRepo::new();
  let dir = repo.box_dir("dev");

  repo.cmd().arg("dev").arg("--release-version=0.2.1").assert().success();

  let suffix = format!("|cwd={}", dir.display());
  for call in repo.calls() {
    assert!(call.ends_with(&suffix), "unexpected working directory: {}", call);
  }
}

#[test]
#[serial]
fn release_version_from_environment() {
  let repo = TestRepo::new();

  repo
    .cmd()
    .arg("dev")
    .env("BOXBUILD_RELEASE_VERSION", "0.3.0")
    .assert()
    .success();

  assert!(repo.box_dir("dev").join("flocker-dev-0.3.0.box").exists());
}

#[test]
#[serial]
fn dashed_version_is_rewritten_per_consumer() {
  let repo = TestRepo::new();
  let dir = repo.box_dir("dev");

  repo
    .cmd()
    .arg("dev")
    .arg("--release-version")
    .arg("0.2.1-12-gabcdef")
    .assert()
    .success();

  // The artifact keeps the version as-is.
  assert!(dir.join("flocker-dev-0.2.1-12-gabcdef.box").exists());

  // Vagrant metadata rejects dashes.
  let metadata = read_json(&dir.join("flocker-dev.json"));
  assert_eq!(metadata["versions"][0]["version"], "0.2.1.12.gabcdef");

  // The Vagrantfile gets underscores, and an empty (not unset) branch.
  let up = repo.calls().into_iter().find(|c| c.starts_with("up|")).unwrap();
  assert!(up.contains("|FLOCKER_VERSION=0.2.1_12_gabcdef|"), "{}", up);
  assert!(up.contains("|FLOCKER_BRANCH=|"), "{}", up);
}

#[test]
#[serial]
fn branch_build_is_unversioned() {
  let repo = TestRepo::new();
  let dir = repo.box_dir("dev");

  repo
    .cmd()
    .arg("dev")
    .arg("feature-x")
    .assert()
    .success()
    .stdout(predicate::str::contains("from branch feature-x"));

  assert!(dir.join("flocker-dev.box").exists());
  assert!(dir.join("flocker-dev.json").exists());
  assert!(
    !std::fs::read_dir(&dir)
      .unwrap()
      .any(|e| e.unwrap().file_name().to_string_lossy().starts_with("flocker-dev-")),
    "branch builds carry no version suffix"
  );

  let up = repo.calls().into_iter().find(|c| c.starts_with("up|")).unwrap();
  assert!(up.contains("|FLOCKER_BRANCH=feature-x|"), "{}", up);
  assert!(up.contains("|FLOCKER_VERSION=|"), "{}", up);
}

#[test]
#[serial]
fn branch_build_skips_version_lookup() {
  let repo = TestRepo::new();

  // The scratch repository is not a git checkout, so a version lookup would fail.
  repo.cmd().arg("dev").arg("feature-x").assert().success();
}

#[test]
#[serial]
fn box_inferred_from_box_directory() {
  let repo = TestRepo::new();
  let dir = repo.box_dir("tutorial");

  repo
    .cmd_in(&dir)
    .arg("--release-version=0.2.1")
    .assert()
    .success();

  assert!(dir.join("flocker-tutorial-0.2.1.box").exists());
  let metadata = read_json(&dir.join("flocker-tutorial.json"));
  assert_eq!(metadata["name"], "clusterhq/flocker-tutorial");
}

#[test]
#[serial]
fn explicit_root_from_elsewhere() {
  let repo = TestRepo::new();
  let elsewhere = tempfile::TempDir::new().unwrap();

  repo
    .cmd_in(elsewhere.path())
    .arg("dev")
    .arg("--release-version=0.2.1")
    .env("BOXBUILD_ROOT", &repo.root)
    .assert()
    .success();

  assert!(repo.box_dir("dev").join("flocker-dev-0.2.1.box").exists());
}

#[test]
#[serial]
fn metadata_options_are_applied() {
  let repo = TestRepo::new();
  let dir = repo.box_dir("dev");

  repo
    .cmd()
    .args(["dev", "--release-version=1.0.0", "--namespace=acme", "--prefix=acme", "--provider=libvirt"])
    .assert()
    .success();

  let metadata = read_json(&dir.join("acme-dev.json"));
  assert_eq!(metadata["name"], "acme/acme-dev");
  assert_eq!(metadata["versions"][0]["providers"][0]["name"], "libvirt");
  assert!(dir.join("acme-dev-1.0.0.box").exists());
}

#[test]
#[serial]
fn json_summary() {
  let repo = TestRepo::new();
  let dir = repo.box_dir("dev");

  let output = repo
    .cmd()
    .args(["dev", "--release-version=0.2.1", "--output", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());
  assert!(String::from_utf8_lossy(&output.stderr).contains("==> default: up"));

  let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(
    summary["artifact"],
    dir.join("flocker-dev-0.2.1.box").to_string_lossy().as_ref()
  );
  assert_eq!(
    summary["metadata_path"],
    dir.join("flocker-dev.json").to_string_lossy().as_ref()
  );
  assert_eq!(summary["metadata"]["versions"][0]["version"], "0.2.1");
}

#[test]
#[serial]
fn rebuild_overwrites_outputs() {
  let repo = TestRepo::new();
  let dir = repo.box_dir("dev");
  std::fs::write(dir.join("flocker-dev.json"), "stale").unwrap();
  std::fs::write(dir.join("flocker-dev-0.2.1.box"), "stale").unwrap();

  repo.cmd().args(["dev", "--release-version=0.2.1"]).assert().success();
  repo.cmd().args(["dev", "--release-version=0.2.1"]).assert().success();

  assert_eq!(std::fs::read_to_string(dir.join("flocker-dev-0.2.1.box")).unwrap(), "box");
  let metadata = read_json(&dir.join("flocker-dev.json"));
  assert_eq!(metadata["versions"][0]["version"], "0.2.1");
  assert_eq!(repo.call_args().len(), 8);
}
