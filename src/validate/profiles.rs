//! Per-profile validation rules
//!
//! Master, agent pool, Linux/Windows node, and AAD profile rules, plus the
//! key-vault secret checks shared by the node profiles. Cross-profile rules
//! (networking, VNET consistency, the pool loop) live in the module root.

use url::Url;
use uuid::Uuid;

use crate::spec::{
    AadProfile, AgentPoolProfile, AvailabilityProfile, ImageReference, KeyVaultSecrets,
    LinuxProfile, MasterProfile, OrchestratorProfile, OrchestratorType, StorageProfile,
    WindowsProfile,
};
use crate::validate::fields;
use crate::{Error, Result, DEFAULT_AGENT_POOL_PORTS};

/// A custom image reference must carry both the name and the resource group
fn validate_image_reference(image: Option<&ImageReference>) -> Result<()> {
    if let Some(image) = image {
        if image.name.is_empty() || image.resource_group.is_empty() {
            return Err(Error::validation(
                "imageName and imageResourceGroup must both be specified when referencing a custom image",
            ));
        }
    }
    Ok(())
}

impl MasterProfile {
    pub(crate) fn validate(&self, orchestrator: &OrchestratorProfile) -> Result<()> {
        if orchestrator.orchestrator_type == OrchestratorType::OpenShift && self.count != 1 {
            return Err(Error::validation(
                "openshift can only be deployed with one master",
            ));
        }
        validate_image_reference(self.image_reference.as_ref())?;
        fields::validate_dns_name(&self.dns_prefix)
    }
}

impl AgentPoolProfile {
    /// Validate one agent pool
    ///
    /// This is the only place the engine mutates the spec: a pool with a DNS
    /// prefix but no ports gets the standard web ports filled in.
    pub(crate) fn validate(&mut self, orchestrator_type: OrchestratorType) -> Result<()> {
        fields::validate_pool_name(&self.name)?;

        // Kubernetes exposes services through its own load balancing, so
        // per-pool public endpoints are meaningless there.
        if orchestrator_type == OrchestratorType::Kubernetes
            && (!self.dns_prefix.is_empty() || !self.ports.is_empty())
        {
            return Err(Error::validation(format!(
                "AgentPoolProfile.DNSPrefix and AgentPoolProfile.Ports are not supported for \
                 Kubernetes (pool '{}')",
                self.name
            )));
        }

        if !self.dns_prefix.is_empty() {
            fields::validate_dns_name(&self.dns_prefix)?;
            if !self.ports.is_empty() {
                fields::validate_unique_ports(&self.ports, &self.name)?;
            } else {
                tracing::debug!(pool = %self.name, ports = ?DEFAULT_AGENT_POOL_PORTS,
                    "defaulting agent pool ports");
                self.ports = DEFAULT_AGENT_POOL_PORTS.to_vec();
            }
        } else if !self.ports.is_empty() {
            return Err(Error::validation(format!(
                "AgentPoolProfile.Ports must be empty when AgentPoolProfile.DNSPrefix is empty \
                 for pool '{}'",
                self.name
            )));
        }

        if !self.disk_sizes_gb.is_empty() {
            if !matches!(
                self.storage_profile,
                StorageProfile::StorageAccount | StorageProfile::ManagedDisks
            ) {
                return Err(Error::validation(format!(
                    "property 'StorageProfile' must be set to either '{}' or '{}' when attaching disks",
                    StorageProfile::StorageAccount,
                    StorageProfile::ManagedDisks
                )));
            }
            if self.availability_profile == AvailabilityProfile::Unset {
                return Err(Error::validation(
                    "property 'AvailabilityProfile' must be set when attaching disks",
                ));
            }
            if self.storage_profile == StorageProfile::StorageAccount
                && !self.availability_profile.is_availability_sets()
            {
                return Err(Error::validation(format!(
                    "VirtualMachineScaleSets does not support storage account attached disks. \
                     Instead specify 'StorageAccount': '{}' or specify AvailabilityProfile '{}'",
                    StorageProfile::ManagedDisks,
                    AvailabilityProfile::AvailabilitySet
                )));
            }
        }

        validate_image_reference(self.image_reference.as_ref())
    }
}

/// Validate key-vault sourced certificates for a node profile
///
/// Windows nodes must say which certificate store each certificate lands in;
/// Linux nodes have a single well-known location.
pub(crate) fn validate_key_vault_secrets(
    secrets: &[KeyVaultSecrets],
    require_certificate_store: bool,
) -> Result<()> {
    for secret in secrets {
        if secret.vault_certificates.is_empty() {
            return Err(Error::validation(
                "Valid KeyVaultSecrets must have no empty VaultCertificates",
            ));
        }
        match &secret.source_vault {
            None => {
                return Err(Error::validation(
                    "missing SourceVault in KeyVaultSecrets",
                ))
            }
            Some(vault) => {
                if vault.id.is_empty() {
                    return Err(Error::validation(
                        "KeyVaultSecrets must have a SourceVault.ID",
                    ));
                }
            }
        }
        for cert in &secret.vault_certificates {
            Url::parse(&cert.certificate_url).map_err(|_| {
                Error::validation(format!(
                    "certificate url '{}' is invalid",
                    cert.certificate_url
                ))
            })?;
            if require_certificate_store {
                fields::validate_name(
                    &cert.certificate_store,
                    "KeyVaultCertificate.CertificateStore",
                )?;
            }
        }
    }
    Ok(())
}

impl LinuxProfile {
    pub(crate) fn validate(&self) -> Result<()> {
        // presence and arity of the keys is a shape concern; the key material
        // itself still has to be there
        if let Some(key) = self.ssh.public_keys.first() {
            if key.key_data.is_empty() {
                return Err(Error::validation(
                    "LinuxProfile.SSH.PublicKeys.KeyData must not be empty",
                ));
            }
        }
        validate_key_vault_secrets(&self.secrets, false)
    }
}

impl WindowsProfile {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.admin_username.is_empty() {
            return Err(Error::validation(
                "WindowsProfile.AdminUsername is required, when agent pool specifies windows",
            ));
        }
        if self.admin_password.is_empty() {
            return Err(Error::validation(
                "WindowsProfile.AdminPassword is required, when agent pool specifies windows",
            ));
        }
        validate_key_vault_secrets(&self.secrets, true)
    }
}

impl AadProfile {
    pub(crate) fn validate(&self) -> Result<()> {
        let check = |value: &str, label: &str| -> Result<()> {
            Uuid::parse_str(value)
                .map(|_| ())
                .map_err(|_| Error::validation(format!("{label} '{value}' is invalid")))
        };
        check(&self.client_app_id, "clientAppID")?;
        check(&self.server_app_id, "serverAppID")?;
        if !self.tenant_id.is_empty() {
            check(&self.tenant_id, "tenantID")?;
        }
        if !self.admin_group_id.is_empty() {
            check(&self.admin_group_id, "adminGroupID")?;
        }
        Ok(())
    }
}
