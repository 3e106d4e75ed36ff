//! Root cluster deployment spec and its node, identity, and security profiles

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::orchestrator::OrchestratorProfile;
use super::types::{AgentPoolRole, AvailabilityProfile, OsType, StorageProfile};

/// A complete cluster deployment specification
///
/// This is the root object handed to validation, normally produced by
/// deserializing a user-supplied JSON document. The engine treats it as
/// read-only except for one defaulting step on agent pool ports.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Orchestrator selection and configuration
    pub orchestrator_profile: OrchestratorProfile,

    /// Master (control plane) node settings
    pub master_profile: MasterProfile,

    /// Agent (worker) node pools
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agent_pool_profiles: Vec<AgentPoolProfile>,

    /// Linux node settings; always required
    pub linux_profile: LinuxProfile,

    /// Windows node settings; required iff any pool runs Windows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows_profile: Option<WindowsProfile>,

    /// Service principal credentials for cloud API access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_principal_profile: Option<ServicePrincipalProfile>,

    /// Azure Active Directory integration (Kubernetes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aad_profile: Option<AadProfile>,

    /// Cloud account placement (OpenShift only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub az_profile: Option<AzProfile>,

    /// VM extensions to install on nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension_profiles: Vec<ExtensionProfile>,
}

impl ClusterSpec {
    /// Returns true if any agent pool runs Windows
    pub fn has_windows(&self) -> bool {
        self.agent_pool_profiles
            .iter()
            .any(|pool| pool.os_type == OsType::Windows)
    }
}

/// Master (control plane) node settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MasterProfile {
    /// Number of master nodes
    pub count: i32,

    /// DNS prefix for the cluster's public endpoints
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dns_prefix: String,

    /// VM size for master nodes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vm_size: String,

    /// Disk storage model for master nodes
    #[serde(default)]
    pub storage_profile: StorageProfile,

    /// Custom VM image to provision masters from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<ImageReference>,

    /// Custom VNET subnet resource id; empty for an auto-created network
    #[serde(
        rename = "vnetSubnetID",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub vnet_subnet_id: String,

    /// First static IP assigned to masters inside a custom VNET
    #[serde(
        rename = "firstConsecutiveStaticIP",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub first_consecutive_static_ip: String,

    /// Address space of the custom VNET, CIDR notation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vnet_cidr: String,
}

impl MasterProfile {
    /// Returns true if the masters are placed in a user-supplied VNET subnet
    pub fn is_custom_vnet(&self) -> bool {
        !self.vnet_subnet_id.is_empty()
    }
}

/// An agent (worker) node pool
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentPoolProfile {
    /// Pool name; becomes part of VM names
    pub name: String,

    /// Number of VMs in the pool
    pub count: i32,

    /// VM size for pool nodes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vm_size: String,

    /// Node operating system
    #[serde(default)]
    pub os_type: OsType,

    /// DNS prefix for pool endpoints; implies a public load balancer
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dns_prefix: String,

    /// Ports exposed on the pool load balancer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<i32>,

    /// VM grouping model
    #[serde(default)]
    pub availability_profile: AvailabilityProfile,

    /// Disk storage model
    #[serde(default)]
    pub storage_profile: StorageProfile,

    /// Sizes of data disks to attach, in GB
    #[serde(
        rename = "diskSizesGB",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub disk_sizes_gb: Vec<i32>,

    /// Pool role within the cluster
    #[serde(default)]
    pub role: AgentPoolRole,

    /// Custom labels applied to pool nodes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_node_labels: BTreeMap<String, String>,

    /// Custom VNET subnet resource id; empty for an auto-created network
    #[serde(
        rename = "vnetSubnetID",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub vnet_subnet_id: String,

    /// Custom VM image to provision pool nodes from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<ImageReference>,
}

impl AgentPoolProfile {
    /// Returns true if the pool is placed in a user-supplied VNET subnet
    pub fn is_custom_vnet(&self) -> bool {
        !self.vnet_subnet_id.is_empty()
    }
}

/// Reference to a custom VM image
///
/// Name and resource group must be set together.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    /// Image name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Resource group holding the image
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_group: String,
}

/// Linux node settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinuxProfile {
    /// Admin account name on Linux nodes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub admin_username: String,

    /// SSH access configuration
    #[serde(default)]
    pub ssh: SshConfig,

    /// Certificates to install from key vaults
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<KeyVaultSecrets>,
}

/// SSH public keys granting access to cluster nodes
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SshConfig {
    /// Authorized public keys; exactly one is expected
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub public_keys: Vec<PublicKey>,
}

/// A single SSH public key
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicKey {
    /// Key material in authorized_keys format
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key_data: String,
}

/// Windows node settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowsProfile {
    /// Admin account name on Windows nodes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub admin_username: String,

    /// Admin account password on Windows nodes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub admin_password: String,

    /// Custom Windows VHD to provision nodes from
    #[serde(
        rename = "windowsImageSourceURL",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub windows_image_source_url: String,

    /// Certificates to install from key vaults
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<KeyVaultSecrets>,
}

/// Certificates sourced from a key vault and installed on nodes
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyVaultSecrets {
    /// The vault the certificates live in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_vault: Option<SourceVault>,

    /// Certificates to install
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vault_certificates: Vec<KeyVaultCertificate>,
}

/// Resource id of a key vault
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceVault {
    /// Full vault resource id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
}

/// A certificate to install from a key vault
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyVaultCertificate {
    /// URL of the certificate (including version) in the vault
    #[serde(rename = "certificateUrl", default, skip_serializing_if = "String::is_empty")]
    pub certificate_url: String,

    /// Certificate store to install into (Windows only)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub certificate_store: String,
}

/// Service principal credentials for cloud API access
///
/// Exactly one of `secret` or `keyvault_secret_ref` must carry the credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePrincipalProfile {
    /// Application (client) id, UUID-shaped
    #[serde(rename = "clientId", default, skip_serializing_if = "String::is_empty")]
    pub client_id: String,

    /// Inline client secret
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret: String,

    /// Object id of the service principal, UUID-shaped; required when
    /// external key-management encryption is enabled
    #[serde(rename = "objectId", default, skip_serializing_if = "String::is_empty")]
    pub object_id: String,

    /// Key-vault reference to the client secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyvault_secret_ref: Option<KeyvaultSecretRef>,
}

/// Reference to a secret stored in a key vault
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyvaultSecretRef {
    /// Full vault resource id
    #[serde(rename = "vaultID", default, skip_serializing_if = "String::is_empty")]
    pub vault_id: String,

    /// Name of the secret within the vault
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret_name: String,

    /// Specific secret version; empty selects the latest
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

/// Azure Active Directory integration settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AadProfile {
    /// Client application id, UUID-shaped
    #[serde(rename = "clientAppID", default, skip_serializing_if = "String::is_empty")]
    pub client_app_id: String,

    /// Server application id, UUID-shaped
    #[serde(rename = "serverAppID", default, skip_serializing_if = "String::is_empty")]
    pub server_app_id: String,

    /// Tenant id, UUID-shaped; empty uses the subscription tenant
    #[serde(rename = "tenantID", default, skip_serializing_if = "String::is_empty")]
    pub tenant_id: String,

    /// Admin group object id, UUID-shaped; optional
    #[serde(rename = "adminGroupID", default, skip_serializing_if = "String::is_empty")]
    pub admin_group_id: String,
}

/// Cloud account placement for the deployment
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AzProfile {
    /// Tenant id
    #[serde(rename = "tenantId", default, skip_serializing_if = "String::is_empty")]
    pub tenant_id: String,

    /// Subscription id
    #[serde(
        rename = "subscriptionId",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub subscription_id: String,

    /// Resource group to deploy into
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_group: String,

    /// Region to deploy into
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
}

/// A VM extension and where its parameters come from
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionProfile {
    /// Extension name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Key-vault reference holding the extension parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_parameters_key_vault_ref: Option<KeyvaultSecretRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::types::OrchestratorType;

    fn minimal_spec_json() -> &'static str {
        r#"{
            "orchestratorProfile": {"orchestratorType": "Kubernetes"},
            "masterProfile": {"count": 1, "dnsPrefix": "clusterapi", "vmSize": "Standard_D2_v2"},
            "agentPoolProfiles": [
                {"name": "agentpool1", "count": 3, "vmSize": "Standard_D2_v2"}
            ],
            "linuxProfile": {
                "adminUsername": "azureuser",
                "ssh": {"publicKeys": [{"keyData": "ssh-rsa AAAA..."}]}
            },
            "servicePrincipalProfile": {
                "clientId": "8ff03994-5e21-4a71-a5b4-0d9dcbc0766f",
                "secret": "hunter2"
            }
        }"#
    }

    #[test]
    fn test_minimal_spec_deserializes() {
        let spec: ClusterSpec = serde_json::from_str(minimal_spec_json()).unwrap();
        assert_eq!(
            spec.orchestrator_profile.orchestrator_type,
            OrchestratorType::Kubernetes
        );
        assert_eq!(spec.master_profile.count, 1);
        assert_eq!(spec.agent_pool_profiles.len(), 1);
        assert_eq!(spec.agent_pool_profiles[0].name, "agentpool1");
        assert!(spec.windows_profile.is_none());
    }

    #[test]
    fn test_has_windows() {
        let mut spec: ClusterSpec = serde_json::from_str(minimal_spec_json()).unwrap();
        assert!(!spec.has_windows());

        spec.agent_pool_profiles[0].os_type = OsType::Windows;
        assert!(spec.has_windows());
    }

    #[test]
    fn test_custom_vnet_detection() {
        let mut master = MasterProfile::default();
        assert!(!master.is_custom_vnet());
        master.vnet_subnet_id =
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet/subnets/sub1"
                .to_string();
        assert!(master.is_custom_vnet());
    }

    #[test]
    fn test_wire_field_names() {
        let json = r#"{
            "name": "pool1",
            "count": 2,
            "diskSizesGB": [128],
            "vnetSubnetID": "/subscriptions/s/resourceGroups/r/providers/Microsoft.Network/virtualNetworks/v/subnets/n"
        }"#;
        let pool: AgentPoolProfile = serde_json::from_str(json).unwrap();
        assert_eq!(pool.disk_sizes_gb, vec![128]);
        assert!(pool.is_custom_vnet());
    }

    #[test]
    fn test_spec_survives_json_roundtrip() {
        let spec: ClusterSpec = serde_json::from_str(minimal_spec_json()).unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        let parsed: ClusterSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, parsed);
    }
}
