//! Environment variables systemd consumes at boot.
//!
//! `container` tells systemd it runs virtualized; `container_uuid` seeds
//! `/etc/machine-id` when the image ships none.

use systemd_nri_common::constants::{
    CONTAINER_ENV, CONTAINER_ENV_VALUE, CONTAINER_UUID_ENV, POD_UID_ANNOTATION,
};
use systemd_nri_common::types::{ContainerAdjustment, ContainerDescriptor, SandboxDescriptor};

/// Adds `container=other` and, unless the container declares its own, a
/// `container_uuid` taken from the container ID or else the pod UID.
pub fn set_systemd_environment(
    adjust: &mut ContainerAdjustment,
    pod: Option<&SandboxDescriptor>,
    container: &ContainerDescriptor,
) {
    adjust.add_env(CONTAINER_ENV, CONTAINER_ENV_VALUE);

    if container.has_env(CONTAINER_UUID_ENV) {
        return;
    }

    if let Some(uuid) = machine_uuid(pod, container) {
        adjust.add_env(CONTAINER_UUID_ENV, uuid);
    }
}

fn machine_uuid<'a>(
    pod: Option<&'a SandboxDescriptor>,
    container: &'a ContainerDescriptor,
) -> Option<&'a str> {
    if !container.id.is_empty() {
        return Some(&container.id);
    }
    pod.and_then(|p| p.annotations.get(POD_UID_ANNOTATION))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod_with_uid(uid: &str) -> SandboxDescriptor {
        SandboxDescriptor {
            name: "pod".into(),
            annotations: [(POD_UID_ANNOTATION.to_string(), uid.to_string())]
                .into_iter()
                .collect(),
        }
    }

    fn uuid_entries(adjust: &ContainerAdjustment) -> usize {
        adjust.env.iter().filter(|kv| kv.key == CONTAINER_UUID_ENV).count()
    }

    #[test]
    fn container_marker_always_added_first() {
        let mut adjust = ContainerAdjustment::new();
        set_systemd_environment(&mut adjust, None, &ContainerDescriptor::default());

        assert_eq!(adjust.env.len(), 1);
        assert_eq!(adjust.env[0].key, "container");
        assert_eq!(adjust.env[0].value, "other");
    }

    #[test]
    fn container_id_wins_over_pod_uid() {
        let container = ContainerDescriptor {
            id: "abc123".into(),
            ..ContainerDescriptor::default()
        };
        let mut adjust = ContainerAdjustment::new();
        set_systemd_environment(&mut adjust, Some(&pod_with_uid("xyz")), &container);

        assert_eq!(adjust.env_value(CONTAINER_UUID_ENV), Some("abc123"));
        assert_eq!(uuid_entries(&adjust), 1);
    }

    #[test]
    fn pod_uid_used_without_container_id() {
        let mut adjust = ContainerAdjustment::new();
        set_systemd_environment(
            &mut adjust,
            Some(&pod_with_uid("xyz")),
            &ContainerDescriptor::default(),
        );

        assert_eq!(adjust.env_value(CONTAINER_UUID_ENV), Some("xyz"));
    }

    #[test]
    fn declared_uuid_is_never_overridden() {
        let container = ContainerDescriptor {
            id: "abc123".into(),
            env: vec!["container_uuid=user-value".into()],
            ..ContainerDescriptor::default()
        };
        let mut adjust = ContainerAdjustment::new();
        set_systemd_environment(&mut adjust, Some(&pod_with_uid("xyz")), &container);

        assert_eq!(uuid_entries(&adjust), 0);
        assert_eq!(adjust.env_value(CONTAINER_ENV), Some("other"));
    }

    #[test]
    fn no_source_means_no_uuid() {
        let pod = SandboxDescriptor {
            name: "pod".into(),
            ..SandboxDescriptor::default()
        };
        let mut adjust = ContainerAdjustment::new();
        set_systemd_environment(&mut adjust, Some(&pod), &ContainerDescriptor::default());

        assert_eq!(uuid_entries(&adjust), 0);
    }
}
