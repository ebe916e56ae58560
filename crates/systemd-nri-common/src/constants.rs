//! Compiled-in policy tables and well-known paths.

/// Container path where the cgroup hierarchy is mounted.
pub const CGROUP_MOUNT_PATH: &str = "/sys/fs/cgroup";

/// Host path probed for cgroup filesystem support.
pub const DEFAULT_CGROUP_ROOT: &str = "/sys/fs/cgroup";

/// Entrypoints that identify a container as running systemd as PID 1.
pub const SYSTEMD_ENTRYPOINTS: &[&str] = &[
    "/sbin/init",
    "/lib/systemd/systemd",
    "/usr/lib/systemd/systemd",
];

/// A tmpfs mount systemd expects to find at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TmpfsEntry {
    /// Mount destination inside the container.
    pub destination: &'static str,
    /// `mode=` option applied to the tmpfs root.
    pub mode: &'static str,
}

/// Tmpfs mounts injected into systemd containers, in injection order.
pub const SYSTEMD_TMPFS_MOUNTS: &[TmpfsEntry] = &[
    TmpfsEntry {
        destination: "/run",
        mode: "mode=755",
    },
    TmpfsEntry {
        destination: "/run/lock",
        mode: "mode=755",
    },
    TmpfsEntry {
        destination: "/tmp",
        mode: "mode=1777",
    },
    TmpfsEntry {
        destination: "/var/log/journal",
        mode: "mode=755",
    },
];

/// Options shared by every injected tmpfs mount; the mode option follows.
pub const TMPFS_BASE_OPTIONS: &[&str] = &["rw", "rprivate", "nosuid", "nodev"];

/// Filesystem type and source used for injected tmpfs mounts.
pub const TMPFS_TYPE: &str = "tmpfs";

/// Read-only mount option.
pub const OPTION_RO: &str = "ro";

/// Read-write mount option.
pub const OPTION_RW: &str = "rw";

/// Environment variable systemd reads to detect container virtualization.
pub const CONTAINER_ENV: &str = "container";

/// Value of [`CONTAINER_ENV`] for a runtime systemd has no special name for.
pub const CONTAINER_ENV_VALUE: &str = "other";

/// Environment variable systemd derives `/etc/machine-id` from.
pub const CONTAINER_UUID_ENV: &str = "container_uuid";

/// Pod annotation carrying the Kubernetes pod UID.
pub const POD_UID_ANNOTATION: &str = "io.kubernetes.pod.uid";

/// Default plugin name registered with the runtime.
pub const DEFAULT_PLUGIN_NAME: &str = "systemd";

/// Default plugin index registered with the runtime.
pub const DEFAULT_PLUGIN_IDX: &str = "10";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "systemd-nri";
