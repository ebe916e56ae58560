//! Tmpfs mounts systemd expects at boot.

use std::collections::HashSet;

use systemd_nri_common::constants::{SYSTEMD_TMPFS_MOUNTS, TMPFS_BASE_OPTIONS, TMPFS_TYPE, TmpfsEntry};
use systemd_nri_common::types::{ContainerAdjustment, ContainerDescriptor, MountSpec};

/// Adds a tmpfs mount for every catalog destination the container does not
/// already mount. Existing mounts are never touched, whatever their options.
pub fn add_systemd_tmpfs_mounts(adjust: &mut ContainerAdjustment, container: &ContainerDescriptor) {
    let existing: HashSet<&str> = container
        .mounts
        .iter()
        .map(|m| m.destination.as_str())
        .collect();

    for entry in SYSTEMD_TMPFS_MOUNTS {
        if existing.contains(entry.destination) {
            continue;
        }
        adjust.add_mount(tmpfs_mount(entry));
    }
}

fn tmpfs_mount(entry: &TmpfsEntry) -> MountSpec {
    let mut options: Vec<String> = TMPFS_BASE_OPTIONS.iter().map(|o| (*o).to_string()).collect();
    options.push(entry.mode.to_string());

    MountSpec {
        destination: entry.destination.to_string(),
        fs_type: TMPFS_TYPE.to_string(),
        source: TMPFS_TYPE.to_string(),
        options,
    }
}
