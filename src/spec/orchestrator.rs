//! Orchestrator profile and per-orchestrator configuration blocks

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{ContainerRuntime, NetworkPlugin, NetworkPolicy, OrchestratorType};

/// Orchestrator selection for a cluster
///
/// Carries the orchestrator type, the requested release (minor-version
/// channel) and/or fully qualified version, and at most one configuration
/// block matching the declared type.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorProfile {
    /// Which orchestrator to deploy
    pub orchestrator_type: OrchestratorType,

    /// Minor-version release channel, e.g. "1.9"
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub orchestrator_release: String,

    /// Fully qualified version, e.g. "1.9.3"
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub orchestrator_version: String,

    /// Kubernetes-specific configuration (Kubernetes and OpenShift only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_config: Option<KubernetesConfig>,

    /// DC/OS-specific configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dcos_config: Option<DcosConfig>,

    /// OpenShift-specific configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_shift_config: Option<OpenShiftConfig>,
}

/// Kubernetes cluster configuration
///
/// Everything here is optional; unset values fall back to provisioning
/// defaults downstream. Validation only rejects combinations that can never
/// provision successfully.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesConfig {
    /// Pod connectivity plugin
    #[serde(default)]
    pub network_plugin: NetworkPlugin,

    /// Pod traffic policy component
    #[serde(default)]
    pub network_policy: NetworkPolicy,

    /// Container runtime for the nodes
    #[serde(default)]
    pub container_runtime: ContainerRuntime,

    /// Pod address space, CIDR notation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_subnet: String,

    /// Docker bridge address space, CIDR notation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub docker_bridge_subnet: String,

    /// Service address space, CIDR notation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_cidr: String,

    /// Cluster DNS service address; must lie inside the service CIDR
    #[serde(
        rename = "dnsServiceIP",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub dns_service_ip: String,

    /// Maximum pods per node; 0 means default
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_pods: i32,

    /// etcd version to deploy; empty selects the default
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub etcd_version: String,

    /// Base64 (URL alphabet) key for etcd encryption at rest; empty
    /// auto-generates
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub etcd_encryption_key: String,

    /// Enable Kubernetes RBAC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_rbac: Option<bool>,

    /// Enable aggregated API servers
    #[serde(rename = "enableAggregatedAPIs", default)]
    pub enable_aggregated_apis: bool,

    /// Enable the PodSecurityPolicy admission controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_pod_security_policy: Option<bool>,

    /// Encrypt etcd data at rest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_data_encryption_at_rest: Option<bool>,

    /// Encrypt secrets with an external key-management service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_encryption_with_external_kms: Option<bool>,

    /// Use a managed identity instead of a service principal
    #[serde(default)]
    pub use_managed_identity: bool,

    /// Use the VM instance metadata service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_instance_metadata: Option<bool>,

    /// Run the external cloud controller manager
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_cloud_controller_manager: Option<bool>,

    /// Custom cloud controller manager image
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub custom_ccm_image: String,

    /// Enable cloud-provider API call backoff
    #[serde(default)]
    pub cloud_provider_backoff: bool,

    /// Enable cloud-provider API rate limiting
    #[serde(default)]
    pub cloud_provider_rate_limit: bool,

    /// Free-form kubelet flags, e.g. "--node-status-update-frequency"
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub kubelet_config: BTreeMap<String, String>,

    /// Free-form controller-manager flags, e.g. "--node-monitor-grace-period"
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub controller_manager_config: BTreeMap<String, String>,

    /// Optional cluster addons
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addons: Vec<KubernetesAddon>,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

/// A named, toggleable cluster addon
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesAddon {
    /// Addon name, e.g. "cluster-autoscaler"
    pub name: String,

    /// Whether the addon is enabled; unset keeps the addon default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl KubernetesAddon {
    /// Returns true if the addon is explicitly enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled == Some(true)
    }
}

/// DC/OS-specific configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DcosConfig {
    /// Custom bootstrap node settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap_profile: Option<BootstrapProfile>,
}

impl DcosConfig {
    /// Returns true if no DC/OS settings are present
    pub fn is_empty(&self) -> bool {
        self.bootstrap_profile.is_none()
    }
}

/// Bootstrap node settings for DC/OS
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapProfile {
    /// Static IP address for the bootstrap node
    #[serde(rename = "staticIP", default, skip_serializing_if = "String::is_empty")]
    pub static_ip: String,
}

/// OpenShift-specific configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenShiftConfig {
    /// Admin username for the cluster console
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_username: String,

    /// Admin password for the cluster console
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_password: String,
}
