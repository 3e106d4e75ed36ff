//! Closed enumerations used throughout the deployment spec
//!
//! The wire format (JSON) historically carried these as open strings, with the
//! empty string meaning "unset". They are modeled as closed sum types so that
//! every switch over them is exhaustiveness-checked at compile time; unknown
//! values are rejected at deserialization with a descriptive serde error
//! instead of silently falling through a default branch.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Supported cluster orchestrators
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[non_exhaustive]
pub enum OrchestratorType {
    /// DC/OS (Mesos-based)
    #[serde(rename = "DCOS")]
    Dcos,
    /// Docker Swarm (standalone)
    Swarm,
    /// Docker Swarm Mode
    SwarmMode,
    /// Kubernetes
    Kubernetes,
    /// OpenShift
    OpenShift,
}

impl std::fmt::Display for OrchestratorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dcos => write!(f, "DCOS"),
            Self::Swarm => write!(f, "Swarm"),
            Self::SwarmMode => write!(f, "SwarmMode"),
            Self::Kubernetes => write!(f, "Kubernetes"),
            Self::OpenShift => write!(f, "OpenShift"),
        }
    }
}

impl std::str::FromStr for OrchestratorType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DCOS" => Ok(Self::Dcos),
            "Swarm" => Ok(Self::Swarm),
            "SwarmMode" => Ok(Self::SwarmMode),
            "Kubernetes" => Ok(Self::Kubernetes),
            "OpenShift" => Ok(Self::OpenShift),
            _ => Err(crate::Error::validation(format!(
                "unknown orchestrator: {s}, expected one of: DCOS, Swarm, SwarmMode, Kubernetes, OpenShift"
            ))),
        }
    }
}

/// Operating system for an agent pool
///
/// Unset means the provisioning defaults decide (Linux in practice).
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum OsType {
    /// Not specified in the spec
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Linux nodes
    Linux,
    /// Windows nodes
    Windows,
}

impl std::fmt::Display for OsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, ""),
            Self::Linux => write!(f, "Linux"),
            Self::Windows => write!(f, "Windows"),
        }
    }
}

/// VM grouping and redundancy model for an agent pool
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum AvailabilityProfile {
    /// Not specified; treated as scale sets where the distinction matters
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Availability sets (classic VM grouping)
    AvailabilitySet,
    /// Virtual machine scale sets
    VirtualMachineScaleSets,
}

impl AvailabilityProfile {
    /// Returns true if this pool uses availability sets
    pub fn is_availability_sets(&self) -> bool {
        matches!(self, Self::AvailabilitySet)
    }

    /// Returns true if this pool uses (or defaults to) scale sets
    pub fn is_scale_sets_or_unset(&self) -> bool {
        matches!(self, Self::VirtualMachineScaleSets | Self::Unset)
    }
}

impl std::fmt::Display for AvailabilityProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, ""),
            Self::AvailabilitySet => write!(f, "AvailabilitySet"),
            Self::VirtualMachineScaleSets => write!(f, "VirtualMachineScaleSets"),
        }
    }
}

/// Disk storage model for a profile
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum StorageProfile {
    /// Not specified
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Unmanaged disks backed by storage accounts
    StorageAccount,
    /// Managed disks
    ManagedDisks,
}

impl std::fmt::Display for StorageProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, ""),
            Self::StorageAccount => write!(f, "StorageAccount"),
            Self::ManagedDisks => write!(f, "ManagedDisks"),
        }
    }
}

/// Role of an agent pool within the cluster
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum AgentPoolRole {
    /// Ordinary worker pool
    #[default]
    #[serde(rename = "")]
    Unset,
    /// OpenShift infrastructure pool
    #[serde(rename = "infra")]
    Infra,
}

impl std::fmt::Display for AgentPoolRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, ""),
            Self::Infra => write!(f, "infra"),
        }
    }
}

/// Component responsible for pod-level network connectivity
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NetworkPlugin {
    /// Not specified; provisioning defaults decide
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Azure CNI
    Azure,
    /// Kubenet
    Kubenet,
    /// Flannel
    Flannel,
    /// Cilium
    Cilium,
}

impl std::fmt::Display for NetworkPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, ""),
            Self::Azure => write!(f, "azure"),
            Self::Kubenet => write!(f, "kubenet"),
            Self::Flannel => write!(f, "flannel"),
            Self::Cilium => write!(f, "cilium"),
        }
    }
}

/// Component enforcing traffic rules between pods
///
/// The azure/none values exist for backward compatibility with specs that
/// expressed the plugin choice through the policy field.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NetworkPolicy {
    /// Not specified
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Calico
    Calico,
    /// Cilium
    Cilium,
    /// Legacy alias for the Azure CNI plugin
    Azure,
    /// Legacy alias for "no policy, default plugin"
    None,
    /// Flannel (legacy policy spelling)
    Flannel,
}

impl std::fmt::Display for NetworkPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, ""),
            Self::Calico => write!(f, "calico"),
            Self::Cilium => write!(f, "cilium"),
            Self::Azure => write!(f, "azure"),
            Self::None => write!(f, "none"),
            Self::Flannel => write!(f, "flannel"),
        }
    }
}

/// Container runtime for cluster nodes
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ContainerRuntime {
    /// Not specified; defaults to docker downstream
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Docker engine
    #[serde(rename = "docker")]
    Docker,
    /// Intel Clear Containers
    #[serde(rename = "clear-containers")]
    ClearContainers,
    /// containerd
    #[serde(rename = "containerd")]
    Containerd,
}

impl std::fmt::Display for ContainerRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, ""),
            Self::Docker => write!(f, "docker"),
            Self::ClearContainers => write!(f, "clear-containers"),
            Self::Containerd => write!(f, "containerd"),
        }
    }
}
