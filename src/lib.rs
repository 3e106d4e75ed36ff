//! Capstan - constraint validation engine for cluster deployment specifications
//!
//! Capstan checks a fully-populated cluster deployment spec (orchestrator
//! choice and version, master and agent node pools, networking mode, identity
//! and security profiles) before any provisioning artifact is generated from
//! it. Inconsistent or unsupported combinations are rejected early with a
//! precise diagnostic instead of failing later against cloud infrastructure.
//!
//! # Architecture
//!
//! Validation is a single synchronous pass over an in-memory [`spec::ClusterSpec`]:
//! entity validators run in a fixed order, cross-entity checks are layered on
//! top, and the first failing rule aborts the whole pass. The engine performs
//! no I/O and keeps no state between calls; compiled patterns and
//! compatibility tables are built once and shared read-only.
//!
//! # Modules
//!
//! - [`spec`] - The deployment spec data model (profiles, configs, enums)
//! - [`validate`] - The validation rule set and its entry point
//! - [`versions`] - Orchestrator version tables and compatibility logic
//! - [`net`] - CIDR and IP address helpers used by network rules
//! - [`error`] - Error types for the engine
//!
//! The only mutation validation ever performs is assigning the default port
//! set to an agent pool that declares a DNS prefix without ports; everything
//! else treats the spec as read-only.

#![deny(missing_docs)]

pub mod error;
pub mod net;
pub mod spec;
pub mod validate;
pub mod versions;

pub use error::Error;
pub use spec::ClusterSpec;
pub use validate::ValidationMode;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Default Configuration Constants
// =============================================================================
// Centralizing these here keeps the validators, spec defaults, and test
// fixtures in agreement.

/// Ports assigned to an agent pool that sets a DNS prefix without ports
pub const DEFAULT_AGENT_POOL_PORTS: [i32; 3] = [80, 443, 8080];

/// Minimum value accepted for KubernetesConfig.maxPods
pub const KUBERNETES_MIN_MAX_PODS: i32 = 5;

/// Minimum number of kubelet status-update retries the controller manager
/// must allow before marking a node unreachable
pub const MIN_KUBELET_RETRIES: u32 = 4;

/// Maximum length of a Kubernetes label key prefix (the DNS subdomain before '/')
pub const LABEL_KEY_PREFIX_MAX_LENGTH: usize = 253;

/// Maximum number of VMs in a single agent pool
pub const MAX_AGENT_POOL_COUNT: i32 = 100;
