//! boxbuild-lib: Core types and logic for building Vagrant boxes
//!
//! This crate provides the pieces behind `build-vagrant-box`:
//! - `BoxSpec`: which box to build, at which version or from which branch
//! - `resolve`: turning a working directory and positional arguments into a target
//! - `provision`: the Vagrant command abstraction
//! - `build`: the destroy/up/package/destroy lifecycle
//! - `metadata`: the descriptor used to register a box locally

pub mod build;
pub mod consts;
pub mod metadata;
pub mod provision;
pub mod resolve;
pub mod spec;
pub mod version;
