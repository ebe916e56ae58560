//! # systemd-nri-core
//!
//! Decision-and-mutation engine run once per container creation.
//!
//! Given a proposed container and its pod, the engine decides whether the
//! container boots systemd and, if so, computes the adjustment systemd
//! needs to run as PID 1 in an unprivileged container:
//! - **Detection**: entrypoint allow-list ([`detect`]).
//! - **Cgroup**: lifts a read-only `/sys/fs/cgroup` mount ([`cgroup`]).
//! - **Tmpfs**: adds the tmpfs mounts systemd expects ([`tmpfs`]).
//! - **Environment**: sets `container` and `container_uuid` ([`environment`]).
//!
//! [`plugin::SystemdPlugin`] sequences these steps. The engine is
//! stateless; every request builds its own adjustment.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod cgroup;
pub mod detect;
pub mod dump;
pub mod environment;
pub mod plugin;
pub mod tmpfs;
