//! `systemd-nri probe` — Report host cgroup support.

use clap::Args;
use systemd_nri_common::config::PluginConfig;
use systemd_nri_core::cgroup::{CgroupProbe, HostCgroupProbe};

/// Arguments for the `probe` command.
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Exit with an error when no cgroup filesystem is present.
    #[arg(long)]
    pub require: bool,
}

/// Executes the `probe` command.
///
/// # Errors
///
/// Returns an error if `--require` is set and the host has no cgroup
/// filesystem.
pub fn execute(args: ProbeArgs, config: &PluginConfig) -> anyhow::Result<()> {
    let probe = HostCgroupProbe::new(config.cgroup_root.clone());
    let present = probe.has_cgroup_filesystem();

    if present {
        println!("cgroup filesystem present at {}", probe.root().display());
    } else {
        println!("cgroup filesystem not available at {}", probe.root().display());
        if args.require {
            anyhow::bail!("systemd containers are not supported on this host");
        }
    }

    Ok(())
}
