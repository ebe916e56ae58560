//! CLI command definitions and dispatch.

pub mod evaluate;
pub mod probe;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use systemd_nri_common::config::PluginConfig;
use systemd_nri_common::constants::{DEFAULT_CGROUP_ROOT, DEFAULT_PLUGIN_IDX, DEFAULT_PLUGIN_NAME};

/// systemd-nri — Prepare containers to run systemd as PID 1.
#[derive(Parser, Debug)]
#[command(name = "systemd-nri", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Plugin index to register with the runtime.
    #[arg(long, global = true, default_value = DEFAULT_PLUGIN_IDX)]
    pub idx: String,

    /// Plugin name to register with the runtime.
    #[arg(long, global = true, default_value = DEFAULT_PLUGIN_NAME)]
    pub name: String,

    /// Enable (more) verbose logging, including request dumps.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Host path probed for cgroup filesystem support.
    #[arg(long, global = true, default_value = DEFAULT_CGROUP_ROOT)]
    pub cgroup_root: PathBuf,
}

impl Cli {
    /// Builds the plugin configuration from the global flags.
    #[must_use]
    pub fn plugin_config(&self) -> PluginConfig {
        PluginConfig {
            plugin_name: self.name.clone(),
            plugin_idx: self.idx.clone(),
            verbose: self.verbose,
            cgroup_root: self.cgroup_root.clone(),
        }
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a create-container request and print the response.
    Evaluate(evaluate::EvaluateArgs),
    /// Report whether the host provides a cgroup filesystem.
    Probe(probe::ProbeArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the command fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.plugin_config();
    config.validate()?;
    tracing::debug!(
        plugin = %config.plugin_name,
        idx = %config.plugin_idx,
        "plugin configured"
    );

    match cli.command {
        Command::Evaluate(args) => evaluate::execute(args, &config),
        Command::Probe(args) => probe::execute(args, &config),
    }
}
