//! Constraint validation over a [`ClusterSpec`]
//!
//! A single synchronous pass composed of small rule functions; the first
//! failing rule aborts the whole pass with a descriptive [`crate::Error`].
//! The pass mutates nothing except defaulting agent pool ports, see
//! [`crate::spec::AgentPoolProfile`].

pub mod fields;
mod network;
mod orchestrator;
mod profiles;
pub mod shape;

pub use shape::validate_shape;

use crate::spec::{
    AgentPoolRole, AvailabilityProfile, ClusterSpec, OrchestratorType, OsType, StorageProfile,
};
use crate::versions::{
    self, MIN_VERSION_SCALE_SETS, MIN_VERSION_SCALE_SET_INSTANCE_METADATA,
};
use crate::{Error, Result};

/// How strictly the orchestrator version selection is checked
///
/// Create mode demands a currently-offered version; update mode also accepts
/// any version whose minor release still has a supported patch, so existing
/// clusters on retired patches stay updatable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationMode {
    /// Validating a spec for a new deployment
    Create,
    /// Validating a spec for an update to an existing deployment
    Update,
}

impl ClusterSpec {
    /// Validate the whole specification
    ///
    /// Rules run in a fixed order and the first failure aborts the pass.
    /// The only mutation is filling default ports into agent pools that
    /// request a public endpoint without listing any.
    pub fn validate(&mut self, mode: ValidationMode) -> Result<()> {
        tracing::debug!(?mode, "validating cluster spec");

        shape::validate_shape(self)?;
        self.orchestrator_profile.validate(mode)?;

        // Plugin and policy values are closed enums, so membership is
        // settled at deserialization; only the pairing needs a check here.
        if let Some(config) = &self.orchestrator_profile.kubernetes_config {
            network::validate_network_policy(self)?;
            network::validate_network_plugin_plus_policy(
                config.network_plugin,
                config.network_policy,
            )?;
        }
        network::validate_container_runtime(self)?;
        network::validate_addons(self)?;

        self.master_profile.validate(&self.orchestrator_profile)?;
        fields::validate_unique_pool_names(&self.agent_pool_profiles)?;

        self.validate_kubernetes_identity()?;

        if self.orchestrator_profile.orchestrator_type == OrchestratorType::OpenShift
            && self.master_profile.storage_profile != StorageProfile::ManagedDisks
        {
            return Err(Error::validation(
                "OpenShift orchestrator supports only ManagedDisks",
            ));
        }

        self.validate_agent_pools()?;
        self.linux_profile.validate()?;
        network::validate_vnet(self)?;

        if let Some(aad) = &self.aad_profile {
            if self.orchestrator_profile.orchestrator_type != OrchestratorType::Kubernetes {
                return Err(Error::validation(format!(
                    "aadProfile is only supported by orchestrator '{}'",
                    OrchestratorType::Kubernetes
                )));
            }
            aad.validate()?;
        }

        self.validate_az_profile()?;
        self.validate_extension_profiles()?;

        if let Some(windows) = &self.windows_profile {
            if !windows.windows_image_source_url.is_empty()
                && !matches!(
                    self.orchestrator_profile.orchestrator_type,
                    OrchestratorType::Dcos | OrchestratorType::Kubernetes
                )
            {
                return Err(Error::validation(
                    "Windows Custom Images are only supported if the orchestrator type is DCOS or Kubernetes",
                ));
            }
        }

        Ok(())
    }

    /// Kubernetes clusters act on the cloud API and need a credential for it,
    /// unless a managed identity takes over
    fn validate_kubernetes_identity(&self) -> Result<()> {
        if self.orchestrator_profile.orchestrator_type != OrchestratorType::Kubernetes {
            return Ok(());
        }
        let config = self.orchestrator_profile.kubernetes_config.as_ref();
        if config.is_some_and(|c| c.use_managed_identity) {
            return Ok(());
        }

        let Some(principal) = &self.service_principal_profile else {
            return Err(Error::validation(
                "ServicePrincipalProfile must be specified with orchestrator Kubernetes",
            ));
        };
        if principal.client_id.is_empty() {
            return Err(Error::validation(
                "the service principal client ID must be specified with orchestrator Kubernetes",
            ));
        }
        match (&principal.keyvault_secret_ref, principal.secret.is_empty()) {
            (Some(_), false) => {
                return Err(Error::validation(
                    "service principal client secret and keyvault secret reference cannot both be specified",
                ));
            }
            (None, true) => {
                return Err(Error::validation(
                    "either the service principal client secret or a keyvault secret reference must be specified with orchestrator Kubernetes",
                ));
            }
            _ => {}
        }

        if config.is_some_and(|c| c.enable_encryption_with_external_kms == Some(true))
            && principal.object_id.is_empty()
        {
            return Err(Error::validation(
                "the service principal object ID must be specified when enableEncryptionWithExternalKms is true",
            ));
        }

        if let Some(secret_ref) = &principal.keyvault_secret_ref {
            if secret_ref.vault_id.is_empty() || secret_ref.secret_name.is_empty() {
                return Err(Error::validation(
                    "the service principal keyvault secret reference must specify the vault ID and secret name",
                ));
            }
            if !fields::is_valid_keyvault_id(&secret_ref.vault_id) {
                return Err(Error::validation(format!(
                    "service principal keyvault secret reference vaultID '{}' is of incorrect format",
                    secret_ref.vault_id
                )));
            }
        }
        Ok(())
    }

    fn validate_agent_pools(&mut self) -> Result<()> {
        let orchestrator_type = self.orchestrator_profile.orchestrator_type;
        let first_availability = self
            .agent_pool_profiles
            .first()
            .map(|pool| pool.availability_profile);
        let has_windows_profile = self.windows_profile.is_some();

        // the pool validator owns the one mutation (port defaulting), hence
        // the mutable loop
        for index in 0..self.agent_pool_profiles.len() {
            let pool = &mut self.agent_pool_profiles[index];
            pool.validate(orchestrator_type)?;
            let pool = &self.agent_pool_profiles[index];

            if orchestrator_type == OrchestratorType::OpenShift {
                if !pool.availability_profile.is_availability_sets() {
                    return Err(Error::validation(
                        "OpenShift requires all agent pools to use the AvailabilitySet availability profile",
                    ));
                }
                if pool.storage_profile != StorageProfile::ManagedDisks {
                    return Err(Error::validation(
                        "OpenShift orchestrator supports only ManagedDisks",
                    ));
                }
            } else if pool.role == AgentPoolRole::Infra {
                return Err(Error::validation(format!(
                    "agent pool role 'infra' is only supported by orchestrator '{}'",
                    OrchestratorType::OpenShift
                )));
            }

            if !pool.custom_node_labels.is_empty() {
                match orchestrator_type {
                    OrchestratorType::Dcos => {}
                    OrchestratorType::Kubernetes => {
                        for (key, value) in &pool.custom_node_labels {
                            fields::validate_kubernetes_label_key(key)?;
                            fields::validate_kubernetes_label_value(value)?;
                        }
                    }
                    _ => {
                        return Err(Error::validation(
                            "customNodeLabels are only supported for DCOS and Kubernetes",
                        ));
                    }
                }
            }

            if orchestrator_type == OrchestratorType::Kubernetes {
                self.validate_kubernetes_pool(index, first_availability)?;
            }

            if self.agent_pool_profiles[index].os_type == OsType::Windows {
                self.validate_windows_pool(has_windows_profile)?;
            }
        }
        Ok(())
    }

    fn validate_kubernetes_pool(
        &self,
        index: usize,
        first_availability: Option<AvailabilityProfile>,
    ) -> Result<()> {
        let pool = &self.agent_pool_profiles[index];

        if pool.availability_profile == AvailabilityProfile::VirtualMachineScaleSets {
            let version = self.orchestrator_profile.resolve_version(false)?;
            if !versions::meets_minimum(&version, MIN_VERSION_SCALE_SETS)? {
                return Err(Error::validation(format!(
                    "VirtualMachineScaleSets are only available in Kubernetes version \
                     {MIN_VERSION_SCALE_SETS} or greater; unable to validate for Kubernetes \
                     version {version}"
                )));
            }
            // instance metadata defaults on, so only an explicit opt-out
            // escapes the gate
            let uses_instance_metadata = self
                .orchestrator_profile
                .kubernetes_config
                .as_ref()
                .and_then(|c| c.use_instance_metadata)
                .unwrap_or(true);
            if uses_instance_metadata
                && !versions::meets_minimum(&version, MIN_VERSION_SCALE_SET_INSTANCE_METADATA)?
            {
                return Err(Error::validation(format!(
                    "VirtualMachineScaleSets with instance metadata is supported for Kubernetes \
                     version {MIN_VERSION_SCALE_SET_INSTANCE_METADATA} or greater; please set \
                     useInstanceMetadata to false or use a newer Kubernetes version"
                )));
            }
        }

        if pool.storage_profile == StorageProfile::StorageAccount
            && pool.availability_profile.is_scale_sets_or_unset()
        {
            return Err(Error::validation(format!(
                "VirtualMachineScaleSets does not support '{}' storage profile",
                StorageProfile::StorageAccount
            )));
        }

        if let Some(first) = first_availability {
            if pool.availability_profile != first {
                return Err(Error::validation(
                    "mixed mode availability profiles are not allowed. Please set either \
                     VirtualMachineScaleSets or AvailabilitySet in availabilityProfile for all \
                     agent pools",
                ));
            }
        }
        Ok(())
    }

    fn validate_windows_pool(&self, has_windows_profile: bool) -> Result<()> {
        let orchestrator = &self.orchestrator_profile;
        match orchestrator.orchestrator_type {
            OrchestratorType::Dcos | OrchestratorType::Swarm | OrchestratorType::SwarmMode => {}
            OrchestratorType::Kubernetes => {
                let version = orchestrator.resolve_version(true)?;
                if !versions::is_supported_windows_version(&version) {
                    return Err(Error::validation(format!(
                        "Orchestrator {} version {version} does not support Windows",
                        orchestrator.orchestrator_type
                    )));
                }
            }
            OrchestratorType::OpenShift => {
                return Err(Error::validation(
                    "orchestrator OpenShift does not support Windows",
                ));
            }
        }
        if !has_windows_profile {
            return Err(Error::validation(
                "WindowsProfile must not be empty since agent pool specifies windows",
            ));
        }
        if let Some(windows) = &self.windows_profile {
            windows.validate()?;
        }
        Ok(())
    }

    /// The cloud-account placement block exists only for OpenShift, where it
    /// must be complete
    fn validate_az_profile(&self) -> Result<()> {
        if self.orchestrator_profile.orchestrator_type == OrchestratorType::OpenShift {
            let complete = self.az_profile.as_ref().is_some_and(|az| {
                !az.tenant_id.is_empty()
                    && !az.subscription_id.is_empty()
                    && !az.resource_group.is_empty()
                    && !az.location.is_empty()
            });
            if !complete {
                return Err(Error::validation(
                    "azProfile with tenantId, subscriptionId, resourceGroup and location must \
                     be specified for OpenShift",
                ));
            }
        } else if self.az_profile.is_some() {
            return Err(Error::validation(
                "azProfile is only supported by orchestrator OpenShift",
            ));
        }
        Ok(())
    }

    fn validate_extension_profiles(&self) -> Result<()> {
        for extension in &self.extension_profiles {
            if let Some(secret_ref) = &extension.extension_parameters_key_vault_ref {
                if secret_ref.vault_id.is_empty() {
                    return Err(Error::validation(format!(
                        "the Keyvault ID must be specified for extension '{}'",
                        extension.name
                    )));
                }
                if secret_ref.secret_name.is_empty() {
                    return Err(Error::validation(format!(
                        "the Keyvault secret must be specified for extension '{}'",
                        extension.name
                    )));
                }
                if !fields::is_valid_keyvault_id(&secret_ref.vault_id) {
                    return Err(Error::validation(format!(
                        "extension '{}' has an invalid Keyvault ID '{}'",
                        extension.name, secret_ref.vault_id
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{
        AadProfile, AzProfile, ExtensionProfile, KeyvaultSecretRef, WindowsProfile,
    };

    const UUID: &str = "8ff03994-5e21-4a71-a5b4-0d9dcbc0766f";
    const VAULT_ID: &str =
        "/subscriptions/11111111-2222-3333-4444-555555555555/resourceGroups/rg/providers/Microsoft.KeyVault/vaults/myvault";

    fn kubernetes_spec() -> ClusterSpec {
        serde_json::from_str(
            r#"{
                "orchestratorProfile": {"orchestratorType": "Kubernetes"},
                "masterProfile": {"count": 1, "dnsPrefix": "unittestcluster", "vmSize": "Standard_D2_v2"},
                "agentPoolProfiles": [
                    {"name": "agentpool1", "count": 3, "vmSize": "Standard_D2_v2"}
                ],
                "linuxProfile": {
                    "adminUsername": "azureuser",
                    "ssh": {"publicKeys": [{"keyData": "ssh-rsa AAAAB3Nz"}]}
                },
                "servicePrincipalProfile": {
                    "clientId": "8ff03994-5e21-4a71-a5b4-0d9dcbc0766f",
                    "secret": "hunter2"
                }
            }"#,
        )
        .unwrap()
    }

    fn openshift_spec() -> ClusterSpec {
        let mut spec = kubernetes_spec();
        spec.orchestrator_profile.orchestrator_type = OrchestratorType::OpenShift;
        spec.orchestrator_profile.open_shift_config = Some(crate::spec::OpenShiftConfig {
            cluster_username: "admin".to_string(),
            cluster_password: "hunter2".to_string(),
        });
        spec.master_profile.storage_profile = StorageProfile::ManagedDisks;
        spec.agent_pool_profiles[0].availability_profile = AvailabilityProfile::AvailabilitySet;
        spec.agent_pool_profiles[0].storage_profile = StorageProfile::ManagedDisks;
        spec.az_profile = Some(AzProfile {
            tenant_id: UUID.to_string(),
            subscription_id: UUID.to_string(),
            resource_group: "myrg".to_string(),
            location: "eastus".to_string(),
        });
        spec
    }

    #[test]
    fn test_minimal_kubernetes_spec_validates() {
        let mut spec = kubernetes_spec();
        assert!(spec.validate(ValidationMode::Create).is_ok());
    }

    /// Story: Validation is idempotent
    ///
    /// A second pass over an already-validated spec succeeds and changes
    /// nothing further; the port defaulting only fires once.
    #[test]
    fn story_double_validation_is_stable() {
        let mut spec = kubernetes_spec();
        spec.validate(ValidationMode::Create).unwrap();
        let snapshot = spec.clone();
        spec.validate(ValidationMode::Create).unwrap();
        assert_eq!(spec, snapshot);
    }

    mod identity {
        use super::*;

        #[test]
        fn test_service_principal_required_for_kubernetes() {
            let mut spec = kubernetes_spec();
            spec.service_principal_profile = None;
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("ServicePrincipalProfile"));
        }

        #[test]
        fn test_managed_identity_waives_the_principal() {
            let mut spec = kubernetes_spec();
            spec.service_principal_profile = None;
            spec.orchestrator_profile.kubernetes_config =
                Some(crate::spec::KubernetesConfig {
                    use_managed_identity: true,
                    ..Default::default()
                });
            assert!(spec.validate(ValidationMode::Create).is_ok());
        }

        /// Story: Exactly one credential channel
        ///
        /// The client secret and a keyvault reference are alternative ways
        /// to carry the same credential; both or neither is a spec bug.
        #[test]
        fn story_secret_xor_keyvault_ref() {
            let mut spec = kubernetes_spec();
            let principal = spec.service_principal_profile.as_mut().unwrap();
            principal.keyvault_secret_ref = Some(KeyvaultSecretRef {
                vault_id: VAULT_ID.to_string(),
                secret_name: "sp-secret".to_string(),
                version: String::new(),
            });
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("cannot both be specified"));

            let mut spec = kubernetes_spec();
            spec.service_principal_profile.as_mut().unwrap().secret.clear();
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("either"));

            let mut spec = kubernetes_spec();
            let principal = spec.service_principal_profile.as_mut().unwrap();
            principal.secret.clear();
            principal.keyvault_secret_ref = Some(KeyvaultSecretRef {
                vault_id: VAULT_ID.to_string(),
                secret_name: "sp-secret".to_string(),
                version: String::new(),
            });
            assert!(spec.validate(ValidationMode::Create).is_ok());
        }

        #[test]
        fn test_keyvault_ref_shape() {
            let mut spec = kubernetes_spec();
            let principal = spec.service_principal_profile.as_mut().unwrap();
            principal.secret.clear();
            principal.keyvault_secret_ref = Some(KeyvaultSecretRef {
                vault_id: "/subscriptions/s/wrong/path".to_string(),
                secret_name: "sp-secret".to_string(),
                version: String::new(),
            });
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("incorrect format"));
        }

        #[test]
        fn test_object_id_required_with_external_kms() {
            let mut spec = kubernetes_spec();
            spec.orchestrator_profile.orchestrator_version = "1.10.0".to_string();
            spec.orchestrator_profile.kubernetes_config =
                Some(crate::spec::KubernetesConfig {
                    enable_encryption_with_external_kms: Some(true),
                    ..Default::default()
                });
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("object ID"));

            spec.service_principal_profile.as_mut().unwrap().object_id = UUID.to_string();
            assert!(spec.validate(ValidationMode::Create).is_ok());
        }
    }

    mod pools {
        use super::*;

        /// Story: Kubernetes pools must agree on an availability mode
        #[test]
        fn story_mixed_availability_rejected() {
            let mut spec = kubernetes_spec();
            spec.orchestrator_profile.orchestrator_version = "1.10.2".to_string();
            let mut second = spec.agent_pool_profiles[0].clone();
            second.name = "agentpool2".to_string();
            spec.agent_pool_profiles[0].availability_profile =
                AvailabilityProfile::VirtualMachineScaleSets;
            second.availability_profile = AvailabilityProfile::AvailabilitySet;
            spec.agent_pool_profiles.push(second);
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("mixed mode availability"));
        }

        #[test]
        fn test_scale_sets_version_gates() {
            let mut spec = kubernetes_spec();
            spec.orchestrator_profile.orchestrator_version = "1.9.7".to_string();
            spec.agent_pool_profiles[0].availability_profile =
                AvailabilityProfile::VirtualMachineScaleSets;
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("1.10.0"));

            // 1.10.0 passes the scale-set gate but not the instance
            // metadata gate, which defaults on
            let mut spec = kubernetes_spec();
            spec.orchestrator_profile.orchestrator_version = "1.10.0".to_string();
            spec.agent_pool_profiles[0].availability_profile =
                AvailabilityProfile::VirtualMachineScaleSets;
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("instance metadata"));

            spec.orchestrator_profile.kubernetes_config =
                Some(crate::spec::KubernetesConfig {
                    use_instance_metadata: Some(false),
                    ..Default::default()
                });
            assert!(spec.validate(ValidationMode::Create).is_ok());

            let mut spec = kubernetes_spec();
            spec.orchestrator_profile.orchestrator_version = "1.10.2".to_string();
            spec.agent_pool_profiles[0].availability_profile =
                AvailabilityProfile::VirtualMachineScaleSets;
            assert!(spec.validate(ValidationMode::Create).is_ok());
        }

        #[test]
        fn test_unmanaged_storage_incompatible_with_scale_sets() {
            let mut spec = kubernetes_spec();
            spec.agent_pool_profiles[0].storage_profile = StorageProfile::StorageAccount;
            // availability unset counts as scale sets for this rule
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("StorageAccount"));

            let mut spec = kubernetes_spec();
            spec.agent_pool_profiles[0].storage_profile = StorageProfile::StorageAccount;
            spec.agent_pool_profiles[0].availability_profile =
                AvailabilityProfile::AvailabilitySet;
            assert!(spec.validate(ValidationMode::Create).is_ok());
        }

        #[test]
        fn test_infra_role_is_openshift_only() {
            let mut spec = kubernetes_spec();
            spec.agent_pool_profiles[0].role = AgentPoolRole::Infra;
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("infra"));

            let mut spec = openshift_spec();
            spec.agent_pool_profiles[0].role = AgentPoolRole::Infra;
            assert!(spec.validate(ValidationMode::Create).is_ok());
        }

        #[test]
        fn test_custom_node_labels() {
            let mut spec = kubernetes_spec();
            spec.agent_pool_profiles[0]
                .custom_node_labels
                .insert("example.com/disktype".to_string(), "ssd".to_string());
            assert!(spec.validate(ValidationMode::Create).is_ok());

            let mut spec = kubernetes_spec();
            spec.agent_pool_profiles[0]
                .custom_node_labels
                .insert("-bad-key".to_string(), "ssd".to_string());
            assert!(spec.validate(ValidationMode::Create).is_err());

            let mut spec = kubernetes_spec();
            spec.orchestrator_profile.orchestrator_type = OrchestratorType::Swarm;
            spec.service_principal_profile = None;
            spec.agent_pool_profiles[0]
                .custom_node_labels
                .insert("disktype".to_string(), "ssd".to_string());
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("customNodeLabels"));
        }
    }

    mod windows {
        use super::*;

        fn windows_spec() -> ClusterSpec {
            let mut spec = kubernetes_spec();
            spec.agent_pool_profiles[0].os_type = OsType::Windows;
            spec.windows_profile = Some(WindowsProfile {
                admin_username: "winuser".to_string(),
                admin_password: "Password1!".to_string(),
                ..Default::default()
            });
            spec
        }

        #[test]
        fn test_windows_pool_needs_profile() {
            let mut spec = windows_spec();
            spec.windows_profile = None;
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("WindowsProfile"));
        }

        #[test]
        fn test_windows_capable_version_required() {
            // the default version line supports Windows
            let mut spec = windows_spec();
            assert!(spec.validate(ValidationMode::Create).is_ok());

            // 1.6.x never shipped Windows support
            let mut spec = windows_spec();
            spec.orchestrator_profile.orchestrator_version = "1.6.9".to_string();
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("not supported"));
        }

        #[test]
        fn test_openshift_has_no_windows() {
            let mut spec = openshift_spec();
            spec.agent_pool_profiles[0].os_type = OsType::Windows;
            spec.windows_profile = Some(WindowsProfile {
                admin_username: "winuser".to_string(),
                admin_password: "Password1!".to_string(),
                ..Default::default()
            });
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("does not support Windows"));
        }

        #[test]
        fn test_custom_image_orchestrator_restriction() {
            let mut spec = windows_spec();
            spec.windows_profile.as_mut().unwrap().windows_image_source_url =
                "https://example.com/win.vhd".to_string();
            assert!(spec.validate(ValidationMode::Create).is_ok());

            let mut spec = windows_spec();
            spec.orchestrator_profile.orchestrator_type = OrchestratorType::Swarm;
            spec.service_principal_profile = None;
            spec.windows_profile.as_mut().unwrap().windows_image_source_url =
                "https://example.com/win.vhd".to_string();
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("Custom Images"));
        }
    }

    mod openshift {
        use super::*;

        #[test]
        fn test_complete_openshift_spec_validates() {
            let mut spec = openshift_spec();
            assert!(spec.validate(ValidationMode::Create).is_ok());
        }

        #[test]
        fn test_requires_managed_disks_everywhere() {
            let mut spec = openshift_spec();
            spec.master_profile.storage_profile = StorageProfile::Unset;
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("ManagedDisks"));

            let mut spec = openshift_spec();
            spec.agent_pool_profiles[0].storage_profile = StorageProfile::StorageAccount;
            assert!(spec.validate(ValidationMode::Create).is_err());
        }

        #[test]
        fn test_requires_availability_sets() {
            let mut spec = openshift_spec();
            spec.agent_pool_profiles[0].availability_profile =
                AvailabilityProfile::VirtualMachineScaleSets;
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("AvailabilitySet"));
        }

        #[test]
        fn test_az_profile_required_and_exclusive() {
            let mut spec = openshift_spec();
            spec.az_profile = None;
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("azProfile"));

            let mut spec = openshift_spec();
            spec.az_profile.as_mut().unwrap().location.clear();
            assert!(spec.validate(ValidationMode::Create).is_err());

            let mut spec = kubernetes_spec();
            spec.az_profile = Some(AzProfile::default());
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("only supported"));
        }
    }

    mod aad {
        use super::*;

        #[test]
        fn test_aad_is_kubernetes_only() {
            let mut spec = kubernetes_spec();
            spec.aad_profile = Some(AadProfile {
                client_app_id: UUID.to_string(),
                server_app_id: UUID.to_string(),
                ..Default::default()
            });
            assert!(spec.validate(ValidationMode::Create).is_ok());

            let mut spec = kubernetes_spec();
            spec.orchestrator_profile.orchestrator_type = OrchestratorType::SwarmMode;
            spec.service_principal_profile = None;
            spec.aad_profile = Some(AadProfile {
                client_app_id: UUID.to_string(),
                server_app_id: UUID.to_string(),
                ..Default::default()
            });
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("aadProfile"));
        }
    }

    mod extensions {
        use super::*;

        #[test]
        fn test_extension_keyvault_refs() {
            let mut spec = kubernetes_spec();
            spec.extension_profiles = vec![ExtensionProfile {
                name: "winrm".to_string(),
                extension_parameters_key_vault_ref: Some(KeyvaultSecretRef {
                    vault_id: VAULT_ID.to_string(),
                    secret_name: "params".to_string(),
                    version: String::new(),
                }),
            }];
            assert!(spec.validate(ValidationMode::Create).is_ok());

            let mut spec = kubernetes_spec();
            spec.extension_profiles = vec![ExtensionProfile {
                name: "winrm".to_string(),
                extension_parameters_key_vault_ref: Some(KeyvaultSecretRef {
                    vault_id: String::new(),
                    secret_name: "params".to_string(),
                    version: String::new(),
                }),
            }];
            let err = spec.validate(ValidationMode::Create).unwrap_err();
            assert!(err.to_string().contains("Keyvault ID"));

            let mut spec = kubernetes_spec();
            spec.extension_profiles = vec![ExtensionProfile {
                name: "winrm".to_string(),
                extension_parameters_key_vault_ref: Some(KeyvaultSecretRef {
                    vault_id: "/subscriptions/bad".to_string(),
                    secret_name: "params".to_string(),
                    version: String::new(),
                }),
            }];
            assert!(spec.validate(ValidationMode::Create).is_err());
        }
    }
}
