//! Systemd workload detection.

use systemd_nri_common::constants::SYSTEMD_ENTRYPOINTS;
use systemd_nri_common::types::ContainerDescriptor;

/// Returns `true` if the container's entrypoint is a known systemd binary.
///
/// Only the first argument is inspected, and it must match one of
/// [`SYSTEMD_ENTRYPOINTS`] exactly. Wrappers, relative paths and other
/// aliases are not recognised.
#[must_use]
pub fn is_systemd_container(container: &ContainerDescriptor) -> bool {
    container
        .args
        .first()
        .is_some_and(|cmd| SYSTEMD_ENTRYPOINTS.contains(&cmd.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_args(args: &[&str]) -> ContainerDescriptor {
        ContainerDescriptor {
            args: args.iter().map(|a| (*a).to_string()).collect(),
            ..ContainerDescriptor::default()
        }
    }

    #[test]
    fn detect_empty_args_is_false() {
        assert!(!is_systemd_container(&with_args(&[])));
    }

    #[test]
    fn detect_shells_and_plain_commands_are_false() {
        for args in [&["/bin/bash"][..], &["/bin/sh"][..], &["sleep", "infinity"][..]] {
            assert!(!is_systemd_container(&with_args(args)), "args: {args:?}");
        }
    }

    #[test]
    fn detect_each_allowed_entrypoint() {
        for entrypoint in SYSTEMD_ENTRYPOINTS {
            assert!(is_systemd_container(&with_args(&[entrypoint])));
        }
    }

    #[test]
    fn detect_ignores_trailing_args() {
        assert!(is_systemd_container(&with_args(&[
            "/sbin/init",
            "--log-target=journal"
        ])));
    }

    #[test]
    fn detect_only_inspects_first_arg() {
        assert!(!is_systemd_container(&with_args(&["/bin/sh", "/sbin/init"])));
    }

    #[test]
    fn detect_rejects_relative_and_aliased_paths() {
        for cmd in ["systemd", "sbin/init", "/usr/sbin/init", "/sbin/init "] {
            assert!(!is_systemd_container(&with_args(&[cmd])), "cmd: {cmd}");
        }
    }
}
