//! Cgroup mount handling for systemd containers.
//!
//! systemd needs write access to its own cgroup sub-hierarchy. Runtimes
//! commonly mount `/sys/fs/cgroup` read-only, so the declared mount is
//! replaced by an identical one with `ro` turned into `rw`. Only the
//! container's delegated view is affected; the host hierarchy is not.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use systemd_nri_common::constants::{CGROUP_MOUNT_PATH, DEFAULT_CGROUP_ROOT, OPTION_RO, OPTION_RW};
use systemd_nri_common::error::{Result, SystemdNriError};
use systemd_nri_common::types::{ContainerAdjustment, ContainerDescriptor, MountSpec};

/// Answers whether the host provides a cgroup filesystem.
pub trait CgroupProbe: Send + Sync {
    /// Returns `true` if a cgroup filesystem is present on the host.
    fn has_cgroup_filesystem(&self) -> bool;
}

/// Probes the host by checking for the cgroup root directory.
#[derive(Debug, Clone)]
pub struct HostCgroupProbe {
    root: PathBuf,
}

impl HostCgroupProbe {
    /// Creates a probe that inspects `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path this probe inspects.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for HostCgroupProbe {
    fn default() -> Self {
        Self::new(DEFAULT_CGROUP_ROOT)
    }
}

impl CgroupProbe for HostCgroupProbe {
    // Only a missing path counts as absent; a stat failure for any other
    // reason still means something is mounted there.
    fn has_cgroup_filesystem(&self) -> bool {
        match std::fs::metadata(&self.root) {
            Ok(_) => true,
            Err(e) => e.kind() != ErrorKind::NotFound,
        }
    }
}

/// Result of inspecting a container's cgroup mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CgroupOutcome {
    /// The cgroup mount is already writable.
    NoChangeNeeded,
    /// The read-only cgroup mount was replaced by a writable one.
    Adjusted,
    /// The host has no cgroup filesystem; cgroup handling was skipped.
    MissingCgroupFilesystem,
}

/// Makes the container's `/sys/fs/cgroup` mount writable.
///
/// When the declared mount carries `ro`, a removal of the original and an
/// addition of a copy with every `ro` replaced by `rw` are recorded in
/// `adjust`. Destination, type, source and the order of the remaining
/// options are preserved.
///
/// # Errors
///
/// Returns [`SystemdNriError::MissingCgroupMount`] if the host supports
/// cgroups but the container declares no `/sys/fs/cgroup` mount.
pub fn adjust_cgroup_mount(
    adjust: &mut ContainerAdjustment,
    container: &ContainerDescriptor,
    name: &str,
    probe: &dyn CgroupProbe,
) -> Result<CgroupOutcome> {
    if !probe.has_cgroup_filesystem() {
        tracing::error!(
            container = %name,
            "cgroup filesystem not available at {CGROUP_MOUNT_PATH}, skipping systemd support"
        );
        return Ok(CgroupOutcome::MissingCgroupFilesystem);
    }

    let Some(existing) = container.mount_at(CGROUP_MOUNT_PATH) else {
        tracing::error!(
            container = %name,
            "no existing cgroup mount found, systemd requires {CGROUP_MOUNT_PATH}"
        );
        return Err(SystemdNriError::MissingCgroupMount {
            container: name.to_string(),
        });
    };

    if !existing.has_option(OPTION_RO) {
        tracing::debug!(container = %name, "cgroup mount already writable, skipping");
        return Ok(CgroupOutcome::NoChangeNeeded);
    }

    adjust.remove_mount(CGROUP_MOUNT_PATH);
    adjust.add_mount(writable_copy(existing));
    tracing::debug!(container = %name, "changed cgroup mount from ro to rw");

    Ok(CgroupOutcome::Adjusted)
}

fn writable_copy(mount: &MountSpec) -> MountSpec {
    let options = mount
        .options
        .iter()
        .map(|opt| {
            if opt == OPTION_RO {
                OPTION_RW.to_string()
            } else {
                opt.clone()
            }
        })
        .collect();

    MountSpec {
        destination: mount.destination.clone(),
        fs_type: mount.fs_type.clone(),
        source: mount.source.clone(),
        options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(bool);

    impl CgroupProbe for FixedProbe {
        fn has_cgroup_filesystem(&self) -> bool {
            self.0
        }
    }

    fn cgroup_mount(options: &[&str]) -> MountSpec {
        MountSpec {
            destination: CGROUP_MOUNT_PATH.into(),
            fs_type: "cgroup".into(),
            source: "cgroup".into(),
            options: options.iter().map(|o| (*o).to_string()).collect(),
        }
    }

    fn container_with(mounts: Vec<MountSpec>) -> ContainerDescriptor {
        ContainerDescriptor {
            name: "test".into(),
            args: vec!["/sbin/init".into()],
            mounts,
            ..ContainerDescriptor::default()
        }
    }

    #[test]
    fn readonly_mount_is_rewritten() {
        let container = container_with(vec![cgroup_mount(&[
            "nosuid", "noexec", "nodev", "relatime", "ro",
        ])]);
        let mut adjust = ContainerAdjustment::new();

        let outcome = adjust_cgroup_mount(&mut adjust, &container, "test", &FixedProbe(true)).unwrap();

        assert_eq!(outcome, CgroupOutcome::Adjusted);
        assert_eq!(adjust.remove_mounts, vec![CGROUP_MOUNT_PATH]);
        assert_eq!(adjust.mounts.len(), 1);
        let rewritten = &adjust.mounts[0];
        assert_eq!(rewritten.destination, CGROUP_MOUNT_PATH);
        assert_eq!(rewritten.fs_type, "cgroup");
        assert_eq!(rewritten.source, "cgroup");
        assert_eq!(
            rewritten.options,
            vec!["nosuid", "noexec", "nodev", "relatime", "rw"]
        );
    }

    #[test]
    fn every_ro_occurrence_is_replaced_in_place() {
        let container = container_with(vec![cgroup_mount(&["ro", "nosuid", "ro"])]);
        let mut adjust = ContainerAdjustment::new();

        let _ = adjust_cgroup_mount(&mut adjust, &container, "test", &FixedProbe(true)).unwrap();

        assert_eq!(adjust.mounts[0].options, vec!["rw", "nosuid", "rw"]);
    }

    #[test]
    fn writable_mount_needs_no_change() {
        let container = container_with(vec![cgroup_mount(&["nosuid", "rw"])]);
        let mut adjust = ContainerAdjustment::new();

        let outcome = adjust_cgroup_mount(&mut adjust, &container, "test", &FixedProbe(true)).unwrap();

        assert_eq!(outcome, CgroupOutcome::NoChangeNeeded);
        assert!(adjust.is_empty());
    }

    #[test]
    fn ro_substring_options_are_not_readonly() {
        let container = container_with(vec![cgroup_mount(&["rootcontext=x", "rprivate"])]);
        let mut adjust = ContainerAdjustment::new();

        let outcome = adjust_cgroup_mount(&mut adjust, &container, "test", &FixedProbe(true)).unwrap();

        assert_eq!(outcome, CgroupOutcome::NoChangeNeeded);
    }

    #[test]
    fn missing_mount_is_fatal() {
        let container = container_with(Vec::new());
        let mut adjust = ContainerAdjustment::new();

        let err = adjust_cgroup_mount(&mut adjust, &container, "pod/test", &FixedProbe(true))
            .unwrap_err();

        assert!(matches!(err, SystemdNriError::MissingCgroupMount { .. }));
        assert!(err.to_string().contains("pod/test"), "got: {err}");
        assert!(adjust.is_empty());
    }

    #[test]
    fn missing_host_cgroup_skips_silently() {
        let container = container_with(Vec::new());
        let mut adjust = ContainerAdjustment::new();

        let outcome = adjust_cgroup_mount(&mut adjust, &container, "test", &FixedProbe(false)).unwrap();

        assert_eq!(outcome, CgroupOutcome::MissingCgroupFilesystem);
        assert!(adjust.is_empty());
    }

    #[test]
    fn host_probe_detects_existing_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(HostCgroupProbe::new(dir.path()).has_cgroup_filesystem());
    }

    #[test]
    fn host_probe_reports_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let probe = HostCgroupProbe::new(dir.path().join("cgroup"));
        assert!(!probe.has_cgroup_filesystem());
    }

    #[test]
    fn host_probe_defaults_to_sys_fs_cgroup() {
        assert_eq!(HostCgroupProbe::default().root(), Path::new("/sys/fs/cgroup"));
    }
}
