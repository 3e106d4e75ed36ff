//! Cluster deployment spec data model
//!
//! The spec is deserialized from a user-supplied JSON document upstream of
//! validation. Field names follow the wire format (camelCase); enums that the
//! wire format carried as open strings are closed sum types here.

mod cluster;
mod orchestrator;
mod types;

pub use cluster::{
    AadProfile, AgentPoolProfile, AzProfile, ClusterSpec, ExtensionProfile, ImageReference,
    KeyVaultCertificate, KeyVaultSecrets, KeyvaultSecretRef, LinuxProfile, MasterProfile,
    PublicKey, ServicePrincipalProfile, SourceVault, SshConfig, WindowsProfile,
};
pub use orchestrator::{
    BootstrapProfile, DcosConfig, KubernetesAddon, KubernetesConfig, OpenShiftConfig,
    OrchestratorProfile,
};
pub use types::{
    AgentPoolRole, AvailabilityProfile, ContainerRuntime, NetworkPlugin, NetworkPolicy,
    OrchestratorType, OsType, StorageProfile,
};
