//! CLI integration tests for build-vagrant-box.
//!
//! Each test gets a scratch repository with a `vagrant/<box>/` layout and a
//! fake `vagrant` script that logs its invocations instead of creating VMs.

#![cfg(unix)]

mod build_tests;
