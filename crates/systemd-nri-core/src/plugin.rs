//! Create-container handler that ties the policy steps together.

use systemd_nri_common::config::PluginConfig;
use systemd_nri_common::error::Result;
use systemd_nri_common::types::{
    ContainerAdjustment, ContainerDescriptor, CreateContainerRequest, CreateContainerResponse,
    SandboxDescriptor,
};

use crate::cgroup::{self, CgroupProbe, HostCgroupProbe};
use crate::detect::is_systemd_container;
use crate::dump::dump;
use crate::environment::set_systemd_environment;
use crate::tmpfs::add_systemd_tmpfs_mounts;

/// Outcome of a create-container request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The container does not run systemd; nothing is adjusted.
    NotApplicable,
    /// The container runs systemd and needs this adjustment.
    Adjusted(ContainerAdjustment),
}

impl Verdict {
    /// Returns the adjustment, if any.
    #[must_use]
    pub const fn adjustment(&self) -> Option<&ContainerAdjustment> {
        match self {
            Self::NotApplicable => None,
            Self::Adjusted(adjust) => Some(adjust),
        }
    }

    /// Converts into the runtime's response shape. Updates are never produced.
    #[must_use]
    pub fn into_response(self) -> CreateContainerResponse {
        match self {
            Self::NotApplicable => CreateContainerResponse::default(),
            Self::Adjusted(adjust) => CreateContainerResponse {
                adjust: Some(adjust),
                update: None,
            },
        }
    }
}

/// Stateless plugin that prepares systemd containers for creation.
///
/// Safe to share between concurrent requests: each call reads only its
/// arguments and the host probe, and builds its own adjustment.
pub struct SystemdPlugin {
    probe: Box<dyn CgroupProbe>,
    verbose: bool,
}

impl SystemdPlugin {
    /// Creates a plugin probing the cgroup root named in `config`.
    #[must_use]
    pub fn new(config: &PluginConfig) -> Self {
        Self {
            probe: Box::new(HostCgroupProbe::new(config.cgroup_root.clone())),
            verbose: config.verbose,
        }
    }

    /// Creates a plugin using a custom host probe.
    #[must_use]
    pub fn with_probe(probe: Box<dyn CgroupProbe>, verbose: bool) -> Self {
        Self { probe, verbose }
    }

    /// Decides whether `container` runs systemd and computes its adjustment.
    ///
    /// Steps run in order: detection, cgroup mount, tmpfs mounts, then
    /// environment. The tmpfs and environment steps run even when the host
    /// lacks a cgroup filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`MissingCgroupMount`] if the host supports cgroups but the
    /// container declares no `/sys/fs/cgroup` mount. No partial adjustment
    /// is returned in that case.
    ///
    /// [`MissingCgroupMount`]: systemd_nri_common::error::SystemdNriError::MissingCgroupMount
    pub fn create_container(
        &self,
        pod: Option<&SandboxDescriptor>,
        container: &ContainerDescriptor,
    ) -> Result<Verdict> {
        let name = container.display_name(pod);

        if self.verbose {
            if let Some(pod) = pod {
                dump("CreateContainer", "pod", pod);
            }
            dump("CreateContainer", "container", container);
        }

        if !is_systemd_container(container) {
            if self.verbose {
                tracing::info!(container = %name, "not a systemd container, skipping");
            }
            return Ok(Verdict::NotApplicable);
        }

        let mut adjust = ContainerAdjustment::new();

        let outcome = cgroup::adjust_cgroup_mount(&mut adjust, container, &name, self.probe.as_ref())?;
        tracing::debug!(container = %name, ?outcome, "cgroup mount inspected");

        add_systemd_tmpfs_mounts(&mut adjust, container);
        set_systemd_environment(&mut adjust, pod, container);

        if self.verbose {
            dump(&name, "ContainerAdjustment", &adjust);
        } else {
            tracing::info!(container = %name, "systemd support configured");
        }

        Ok(Verdict::Adjusted(adjust))
    }

    /// Handles a deserialized request and returns the wire response.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Self::create_container`].
    pub fn handle(&self, request: &CreateContainerRequest) -> Result<CreateContainerResponse> {
        self.create_container(request.pod.as_ref(), &request.container)
            .map(Verdict::into_response)
    }
}

impl std::fmt::Debug for SystemdPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemdPlugin")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}
