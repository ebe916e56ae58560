//! # systemd-nri-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the systemd NRI plugin workspace.
//!
//! This crate is the leaf of the dependency graph. It describes the
//! request the host runtime hands to the plugin (a pod sandbox and a
//! proposed container) and the adjustment the plugin hands back.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
