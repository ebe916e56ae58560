//! Request-scoped value types exchanged with the host runtime.
//!
//! Field names follow the NRI wire shape so that requests captured from a
//! runtime deserialize without translation.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// The pod sandbox enclosing a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxDescriptor {
    /// Pod name.
    pub name: String,
    /// Pod annotations.
    pub annotations: BTreeMap<String, String>,
}

/// A mount as declared in an OCI runtime spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountSpec {
    /// Absolute path inside the container.
    pub destination: String,
    /// Filesystem type, e.g. `cgroup2` or `tmpfs`.
    #[serde(rename = "type")]
    pub fs_type: String,
    /// Mount source.
    pub source: String,
    /// Mount options in declaration order.
    pub options: Vec<String>,
}

impl MountSpec {
    /// Returns `true` if `option` appears verbatim among the options.
    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// A container proposed for creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerDescriptor {
    /// Runtime-assigned container ID.
    pub id: String,
    /// Container name within its pod.
    pub name: String,
    /// Command line; the first element is the entrypoint.
    pub args: Vec<String>,
    /// Environment entries formatted `KEY=VALUE`.
    pub env: Vec<String>,
    /// Declared mounts.
    pub mounts: Vec<MountSpec>,
    /// Container annotations.
    pub annotations: BTreeMap<String, String>,
}

impl ContainerDescriptor {
    /// Returns the mount declared at `destination`, if any.
    #[must_use]
    pub fn mount_at(&self, destination: &str) -> Option<&MountSpec> {
        self.mounts.iter().find(|m| m.destination == destination)
    }

    /// Returns `true` if the environment declares `key`, whatever its value.
    #[must_use]
    pub fn has_env(&self, key: &str) -> bool {
        self.env.iter().any(|e| env_key_matches(e, key))
    }

    /// Name used to identify the container in logs: `pod/container` when
    /// the pod is known, the bare container name otherwise.
    #[must_use]
    pub fn display_name(&self, pod: Option<&SandboxDescriptor>) -> String {
        pod.map_or_else(
            || self.name.clone(),
            |pod| format!("{}/{}", pod.name, self.name),
        )
    }
}

fn env_key_matches(entry: &str, key: &str) -> bool {
    entry
        .strip_prefix(key)
        .is_some_and(|rest| rest.starts_with('='))
}

/// An environment variable added by an adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Variable name.
    pub key: String,
    /// Variable value.
    pub value: String,
}

/// Changes to apply to a container spec before the container is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerAdjustment {
    /// Destinations whose declared mounts are removed.
    pub remove_mounts: Vec<String>,
    /// Mounts added, in order.
    pub mounts: Vec<MountSpec>,
    /// Environment variables added, in order.
    pub env: Vec<KeyValue>,
}

impl ContainerAdjustment {
    /// Creates an empty adjustment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records removal of the mount at `destination`.
    pub fn remove_mount(&mut self, destination: impl Into<String>) {
        self.remove_mounts.push(destination.into());
    }

    /// Records addition of `mount`.
    pub fn add_mount(&mut self, mount: MountSpec) {
        self.mounts.push(mount);
    }

    /// Records addition of the environment variable `key=value`.
    pub fn add_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env.push(KeyValue {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Returns the value of the added variable `key`, if any.
    #[must_use]
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| kv.value.as_str())
    }

    /// Returns `true` if the adjustment changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remove_mounts.is_empty() && self.mounts.is_empty() && self.env.is_empty()
    }

    /// Returns a copy of `container` with this adjustment applied the way
    /// the runtime applies it: removals first, then additions replacing any
    /// mount at the same destination, then environment entries replacing
    /// an existing variable of the same name.
    #[must_use]
    pub fn apply_to(&self, container: &ContainerDescriptor) -> ContainerDescriptor {
        let mut adjusted = container.clone();

        let removed: HashSet<&str> = self.remove_mounts.iter().map(String::as_str).collect();
        adjusted
            .mounts
            .retain(|m| !removed.contains(m.destination.as_str()));

        for mount in &self.mounts {
            adjusted.mounts.retain(|m| m.destination != mount.destination);
            adjusted.mounts.push(mount.clone());
        }

        for kv in &self.env {
            adjusted.env.retain(|e| !env_key_matches(e, &kv.key));
            adjusted.env.push(format!("{}={}", kv.key, kv.value));
        }

        adjusted
    }
}

/// An update to a running container. The plugin never produces one; the
/// type exists so the response mirrors the runtime's protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerUpdate {
    /// Container the update targets.
    pub container_id: String,
    /// Whether the runtime may ignore a failure to apply the update.
    pub ignore_failure: bool,
}

/// A create-container event as delivered by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateContainerRequest {
    /// Enclosing pod, if the runtime supplied one.
    pub pod: Option<SandboxDescriptor>,
    /// Proposed container.
    pub container: ContainerDescriptor,
}

/// The plugin's answer to a create-container event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContainerResponse {
    /// Adjustment to apply before creation; `None` leaves the container as is.
    pub adjust: Option<ContainerAdjustment>,
    /// Updates to other containers; always `None` for this plugin.
    pub update: Option<Vec<ContainerUpdate>>,
}
