//! Orchestrator profile and Kubernetes configuration validation

use std::net::IpAddr;

use crate::net::Cidr;
use crate::spec::{KubernetesConfig, OrchestratorProfile, OrchestratorType};
use crate::validate::ValidationMode;
use crate::versions::{
    self, MIN_VERSION_AGGREGATED_APIS, MIN_VERSION_CLOUD_CONTROLLER_MANAGER,
    MIN_VERSION_DATA_ENCRYPTION_AT_REST, MIN_VERSION_EXTERNAL_KMS,
    MIN_VERSION_POD_SECURITY_POLICY, OPENSHIFT_VERSION_UNSTABLE,
};
use crate::{Error, Result, KUBERNETES_MIN_MAX_PODS, MIN_KUBELET_RETRIES};

impl OrchestratorProfile {
    /// The uniform diagnostic for an unsupported type/release/version triple
    pub(crate) fn unsupported_version_error(&self) -> Error {
        Error::validation(format!(
            "the following user supplied OrchestratorProfile configuration is not supported: \
             OrchestratorType: {}, OrchestratorRelease: {}, OrchestratorVersion: {}. Please \
             check supported Release or Version for this build",
            self.orchestrator_type, self.orchestrator_release, self.orchestrator_version
        ))
    }

    /// Resolve this profile's release/version to the canonical version
    pub(crate) fn resolve_version(&self, windows_only: bool) -> Result<String> {
        versions::rationalize_release_and_version(
            self.orchestrator_type,
            &self.orchestrator_release,
            &self.orchestrator_version,
            windows_only,
        )
        .ok_or_else(|| self.unsupported_version_error())
    }

    /// Validate the orchestrator selection and its configuration block
    ///
    /// In update mode only the version resolvability is re-checked (with the
    /// valid-patch fallback); create mode runs the full rule set.
    pub(crate) fn validate(&self, mode: ValidationMode) -> Result<()> {
        match mode {
            ValidationMode::Create => self.validate_create()?,
            ValidationMode::Update => self.validate_update()?,
        }

        // Config blocks for non-matching orchestrator types must be absent.
        // KubernetesConfig doubles as the config carrier for OpenShift.
        if !matches!(
            self.orchestrator_type,
            OrchestratorType::Kubernetes | OrchestratorType::OpenShift
        ) && self.kubernetes_config.is_some()
        {
            return Err(Error::validation(
                "KubernetesConfig can be specified only when OrchestratorType is Kubernetes or OpenShift",
            ));
        }
        if self.orchestrator_type != OrchestratorType::OpenShift && self.open_shift_config.is_some()
        {
            return Err(Error::validation(
                "OpenShiftConfig can be specified only when OrchestratorType is OpenShift",
            ));
        }
        if self.orchestrator_type != OrchestratorType::Dcos
            && self.dcos_config.as_ref().is_some_and(|c| !c.is_empty())
        {
            return Err(Error::validation(
                "DcosConfig can be specified only when OrchestratorType is DCOS",
            ));
        }

        Ok(())
    }

    fn validate_create(&self) -> Result<()> {
        match self.orchestrator_type {
            OrchestratorType::Dcos => {
                self.resolve_version(false)?;
                if let Some(bootstrap) = self
                    .dcos_config
                    .as_ref()
                    .and_then(|c| c.bootstrap_profile.as_ref())
                {
                    if !bootstrap.static_ip.is_empty()
                        && bootstrap.static_ip.parse::<IpAddr>().is_err()
                    {
                        return Err(Error::validation(format!(
                            "DcosConfig.BootstrapProfile.StaticIP '{}' is an invalid IP address",
                            bootstrap.static_ip
                        )));
                    }
                }
            }
            OrchestratorType::Swarm | OrchestratorType::SwarmMode => {}
            OrchestratorType::Kubernetes => {
                let version = self.resolve_version(false)?;
                if let Some(config) = &self.kubernetes_config {
                    config.validate(&version)?;
                    self.validate_feature_gates(config, &version)?;
                }
            }
            OrchestratorType::OpenShift => {
                if self.orchestrator_version != OPENSHIFT_VERSION_UNSTABLE {
                    self.resolve_version(false)?;
                }
                let configured = self
                    .open_shift_config
                    .as_ref()
                    .is_some_and(|c| !c.cluster_username.is_empty() && !c.cluster_password.is_empty());
                if !configured {
                    return Err(Error::validation(
                        "ClusterUsername and ClusterPassword must both be specified",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Update mode only needs a supported patch version for the minor release
    fn validate_update(&self) -> Result<()> {
        if matches!(
            self.orchestrator_type,
            OrchestratorType::Dcos | OrchestratorType::Kubernetes
        ) && versions::rationalize_release_and_version(
            self.orchestrator_type,
            &self.orchestrator_release,
            &self.orchestrator_version,
            false,
        )
        .is_none()
            && versions::get_valid_patch_version(self.orchestrator_type, &self.orchestrator_version)
                .is_none()
        {
            return Err(self.unsupported_version_error());
        }
        Ok(())
    }

    /// Feature flags expressed uniformly as "flag set -> minimum version"
    fn validate_feature_gates(&self, config: &KubernetesConfig, version: &str) -> Result<()> {
        if config.enable_aggregated_apis {
            if !versions::meets_minimum(version, MIN_VERSION_AGGREGATED_APIS)? {
                return Err(Error::validation(format!(
                    "enableAggregatedAPIs is only available in Kubernetes version \
                     {MIN_VERSION_AGGREGATED_APIS} or greater; unable to validate for \
                     Kubernetes version {version}"
                )));
            }
            if config.enable_rbac == Some(false) {
                return Err(Error::validation(
                    "enableAggregatedAPIs requires the enableRbac feature as a prerequisite",
                ));
            }
        }

        if config.enable_data_encryption_at_rest == Some(true) {
            if !versions::meets_minimum(version, MIN_VERSION_DATA_ENCRYPTION_AT_REST)? {
                return Err(Error::validation(format!(
                    "enableDataEncryptionAtRest is only available in Kubernetes version \
                     {MIN_VERSION_DATA_ENCRYPTION_AT_REST} or greater; unable to validate \
                     for Kubernetes version {version}"
                )));
            }
            if !config.etcd_encryption_key.is_empty() {
                use base64::Engine as _;
                if base64::engine::general_purpose::URL_SAFE
                    .decode(&config.etcd_encryption_key)
                    .is_err()
                {
                    return Err(Error::validation(
                        "etcdEncryptionKey must be base64 encoded. Please provide a valid \
                         base64 encoded value or leave the etcdEncryptionKey empty to \
                         auto-generate the value",
                    ));
                }
            }
        }

        if config.enable_encryption_with_external_kms == Some(true)
            && !versions::meets_minimum(version, MIN_VERSION_EXTERNAL_KMS)?
        {
            return Err(Error::validation(format!(
                "enableEncryptionWithExternalKms is only available in Kubernetes version \
                 {MIN_VERSION_EXTERNAL_KMS} or greater; unable to validate for Kubernetes \
                 version {version}"
            )));
        }

        if config.enable_pod_security_policy == Some(true) {
            if config.enable_rbac != Some(true) {
                return Err(Error::validation(
                    "enablePodSecurityPolicy requires the enableRbac feature as a prerequisite",
                ));
            }
            if !versions::meets_minimum(version, MIN_VERSION_POD_SECURITY_POLICY)? {
                return Err(Error::validation(format!(
                    "enablePodSecurityPolicy is only supported in Kubernetes version \
                     {MIN_VERSION_POD_SECURITY_POLICY} or greater; unable to validate for \
                     Kubernetes version {version}"
                )));
            }
        }

        Ok(())
    }
}

impl KubernetesConfig {
    /// Validate the Kubernetes configuration against the resolved version
    pub(crate) fn validate(&self, k8s_version: &str) -> Result<()> {
        use crate::spec::NetworkPlugin;

        if !self.cluster_subnet.is_empty() {
            let subnet = Cidr::parse(&self.cluster_subnet).map_err(|_| {
                Error::validation(format!(
                    "KubernetesConfig.ClusterSubnet '{}' is an invalid subnet",
                    self.cluster_subnet
                ))
            })?;
            if self.network_plugin == NetworkPlugin::Azure && subnet.host_bits() <= 8 {
                return Err(Error::validation(format!(
                    "KubernetesConfig.ClusterSubnet '{}' must reserve at least 9 bits for nodes",
                    self.cluster_subnet
                )));
            }
        }

        if !self.docker_bridge_subnet.is_empty()
            && Cidr::parse(&self.docker_bridge_subnet).is_err()
        {
            return Err(Error::validation(format!(
                "KubernetesConfig.DockerBridgeSubnet '{}' is an invalid subnet",
                self.docker_bridge_subnet
            )));
        }

        if self.max_pods != 0 && self.max_pods < KUBERNETES_MIN_MAX_PODS {
            return Err(Error::validation(format!(
                "KubernetesConfig.MaxPods '{}' must be at least {}",
                self.max_pods, KUBERNETES_MIN_MAX_PODS
            )));
        }

        self.validate_node_options()?;
        self.validate_cloud_provider_flags(k8s_version)?;
        self.validate_service_cidr()?;

        if !versions::is_supported_etcd_version(&self.etcd_version) {
            return Err(Error::validation(format!(
                "invalid etcd version '{}', valid versions are {:?}",
                self.etcd_version,
                versions::SUPPORTED_ETCD_VERSIONS
            )));
        }

        if (self.use_cloud_controller_manager == Some(true) || !self.custom_ccm_image.is_empty())
            && !versions::meets_minimum(k8s_version, MIN_VERSION_CLOUD_CONTROLLER_MANAGER)?
        {
            return Err(Error::validation(format!(
                "KubernetesConfig.UseCloudControllerManager and \
                 KubernetesConfig.CustomCcmImage are not available in Kubernetes version \
                 {k8s_version}"
            )));
        }

        Ok(())
    }

    /// Duration-valued kubelet/controller-manager options, plus the retry
    /// budget the two must leave between them
    fn validate_node_options(&self) -> Result<()> {
        let parse = |map: &std::collections::BTreeMap<String, String>,
                     key: &str|
         -> Result<Option<std::time::Duration>> {
            match map.get(key) {
                None => Ok(None),
                Some(val) => humantime::parse_duration(val)
                    .map(Some)
                    .map_err(|_| Error::validation(format!("{key} '{val}' is not a valid duration"))),
            }
        };

        let status_frequency = parse(&self.kubelet_config, "--node-status-update-frequency")?;
        let grace_period = parse(
            &self.controller_manager_config,
            "--node-monitor-grace-period",
        )?;

        if let (Some(frequency), Some(grace)) = (status_frequency, grace_period) {
            let retries = grace.as_secs_f64() / frequency.as_secs_f64();
            if retries < f64::from(MIN_KUBELET_RETRIES) {
                return Err(Error::validation(format!(
                    "--node-monitor-grace-period ({}s) must be larger than \
                     --node-status-update-frequency ({}s) by at least a factor of \
                     {MIN_KUBELET_RETRIES}",
                    grace.as_secs_f64(),
                    frequency.as_secs_f64()
                )));
            }
        }

        if let Some(cidr) = self.kubelet_config.get("--non-masquerade-cidr") {
            if Cidr::parse(cidr).is_err() {
                return Err(Error::validation(format!(
                    "--non-masquerade-cidr kubelet config '{cidr}' is an invalid CIDR string"
                )));
            }
        }

        parse(&self.controller_manager_config, "--pod-eviction-timeout")?;
        parse(
            &self.controller_manager_config,
            "--route-reconciliation-period",
        )?;

        Ok(())
    }

    fn validate_cloud_provider_flags(&self, k8s_version: &str) -> Result<()> {
        if self.cloud_provider_backoff && !versions::supports_cloud_provider_backoff(k8s_version) {
            return Err(Error::validation(format!(
                "cloudprovider backoff functionality is not available in Kubernetes version {k8s_version}"
            )));
        }
        if self.cloud_provider_rate_limit
            && !versions::supports_cloud_provider_rate_limit(k8s_version)
        {
            return Err(Error::validation(format!(
                "cloudprovider rate limiting functionality is not available in Kubernetes version {k8s_version}"
            )));
        }
        Ok(())
    }

    /// The DNS service IP must sit strictly inside the service CIDR,
    /// excluding the first usable address and the broadcast address
    fn validate_service_cidr(&self) -> Result<()> {
        if self.dns_service_ip.is_empty() && self.service_cidr.is_empty() {
            return Ok(());
        }
        if self.dns_service_ip.is_empty() {
            return Err(Error::validation(
                "KubernetesConfig.DNSServiceIP must be specified when ServiceCidr is",
            ));
        }
        if self.service_cidr.is_empty() {
            return Err(Error::validation(
                "KubernetesConfig.ServiceCidr must be specified when DNSServiceIP is",
            ));
        }

        let dns_ip: IpAddr = self.dns_service_ip.parse().map_err(|_| {
            Error::validation(format!(
                "KubernetesConfig.DNSServiceIP '{}' is an invalid IP address",
                self.dns_service_ip
            ))
        })?;

        let service_cidr = Cidr::parse(&self.service_cidr).map_err(|_| {
            Error::validation(format!(
                "KubernetesConfig.ServiceCidr '{}' is an invalid CIDR subnet",
                self.service_cidr
            ))
        })?;

        if !service_cidr.contains(dns_ip) {
            return Err(Error::validation(format!(
                "KubernetesConfig.DNSServiceIP '{}' is not within the ServiceCidr '{}'",
                self.dns_service_ip, self.service_cidr
            )));
        }

        if let Some(broadcast) = service_cidr.broadcast_v4() {
            if dns_ip == IpAddr::V4(broadcast) {
                return Err(Error::validation(format!(
                    "KubernetesConfig.DNSServiceIP '{}' cannot be the broadcast address of \
                     ServiceCidr '{}'",
                    self.dns_service_ip, self.service_cidr
                )));
            }
        }

        if let Some(first) = service_cidr.first_usable_v4() {
            if dns_ip == IpAddr::V4(first) {
                return Err(Error::validation(format!(
                    "KubernetesConfig.DNSServiceIP '{}' cannot be the first IP of \
                     ServiceCidr '{}'",
                    self.dns_service_ip, self.service_cidr
                )));
            }
        }

        Ok(())
    }
}
