//! Cluster-wide networking rules
//!
//! The plugin/policy compatibility matrix, the Windows feature exclusions,
//! addon placement constraints, and custom-VNET consistency.

use std::net::IpAddr;

use crate::net::Cidr;
use crate::spec::{ClusterSpec, ContainerRuntime, NetworkPlugin, NetworkPolicy};
use crate::validate::fields;
use crate::{Error, Result};

/// Network plugin/policy combinations that can actually provision
///
/// The unset policy pairs with every plugin; the legacy policy spellings
/// (azure, none) only pair with an unset plugin.
const ALLOWED_PLUGIN_POLICY_PAIRS: [(NetworkPlugin, NetworkPolicy); 11] = [
    (NetworkPlugin::Unset, NetworkPolicy::Unset),
    (NetworkPlugin::Azure, NetworkPolicy::Unset),
    (NetworkPlugin::Kubenet, NetworkPolicy::Unset),
    (NetworkPlugin::Flannel, NetworkPolicy::Unset),
    (NetworkPlugin::Cilium, NetworkPolicy::Unset),
    (NetworkPlugin::Cilium, NetworkPolicy::Cilium),
    (NetworkPlugin::Kubenet, NetworkPolicy::Calico),
    (NetworkPlugin::Unset, NetworkPolicy::Calico),
    (NetworkPlugin::Unset, NetworkPolicy::Cilium),
    (NetworkPlugin::Unset, NetworkPolicy::Azure),
    (NetworkPlugin::Unset, NetworkPolicy::None),
];

fn is_allowed_pair(plugin: NetworkPlugin, policy: NetworkPolicy) -> bool {
    ALLOWED_PLUGIN_POLICY_PAIRS.contains(&(plugin, policy))
}

/// Reject network policies that cannot run Windows nodes
pub(crate) fn validate_network_policy(spec: &ClusterSpec) -> Result<()> {
    let Some(config) = &spec.orchestrator_profile.kubernetes_config else {
        return Ok(());
    };
    if matches!(
        config.network_policy,
        NetworkPolicy::Calico | NetworkPolicy::Cilium | NetworkPolicy::Flannel
    ) && spec.has_windows()
    {
        return Err(Error::validation(format!(
            "networkPolicy '{}' is not supporting windows agents",
            config.network_policy
        )));
    }
    Ok(())
}

/// Check the plugin/policy pair against the compatibility matrix
pub(crate) fn validate_network_plugin_plus_policy(
    plugin: NetworkPlugin,
    policy: NetworkPolicy,
) -> Result<()> {
    if !is_allowed_pair(plugin, policy) {
        return Err(Error::validation(format!(
            "networkPolicy '{policy}' is not supported with networkPlugin '{plugin}'"
        )));
    }
    Ok(())
}

/// Reject container runtimes that cannot run Windows nodes
pub(crate) fn validate_container_runtime(spec: &ClusterSpec) -> Result<()> {
    let Some(config) = &spec.orchestrator_profile.kubernetes_config else {
        return Ok(());
    };
    if matches!(
        config.container_runtime,
        ContainerRuntime::ClearContainers | ContainerRuntime::Containerd
    ) && spec.has_windows()
    {
        return Err(Error::validation(format!(
            "containerRuntime '{}' is not supporting windows agents",
            config.container_runtime
        )));
    }
    Ok(())
}

/// The cluster autoscaler manages pools through the scale-set API, so it
/// cannot coexist with availability-set pools
pub(crate) fn validate_addons(spec: &ClusterSpec) -> Result<()> {
    let Some(config) = &spec.orchestrator_profile.kubernetes_config else {
        return Ok(());
    };
    for addon in &config.addons {
        if addon.name == "cluster-autoscaler" && addon.is_enabled() {
            for pool in &spec.agent_pool_profiles {
                // an unset profile may still default to availability sets
                // downstream, so only an explicit scale-set choice passes
                if pool.availability_profile
                    != crate::spec::AvailabilityProfile::VirtualMachineScaleSets
                {
                    return Err(Error::validation(format!(
                        "cluster autoscaler addon can only be used with VirtualMachineScaleSets. \
                         Please specify \"availabilityProfile\": \"VirtualMachineScaleSets\" \
                         (pool '{}')",
                        pool.name
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Custom-VNET placement must be all-or-nothing, and every subnet must live
/// in the same virtual network as the master subnet
pub(crate) fn validate_vnet(spec: &ClusterSpec) -> Result<()> {
    let master = &spec.master_profile;
    let custom_pools = spec
        .agent_pool_profiles
        .iter()
        .filter(|pool| pool.is_custom_vnet())
        .count();

    if !master.is_custom_vnet() && custom_pools == 0 {
        return Ok(());
    }
    if !master.is_custom_vnet() || custom_pools != spec.agent_pool_profiles.len() {
        return Err(Error::validation(
            "a custom VNET must be specified wholly: either both the master profile and all \
             agent pool profiles specify a vnetSubnetID, or none do",
        ));
    }

    let master_subnet = fields::vnet_subnet_id_components(&master.vnet_subnet_id)?;
    for pool in &spec.agent_pool_profiles {
        let pool_subnet = fields::vnet_subnet_id_components(&pool.vnet_subnet_id)?;
        if pool_subnet.subscription != master_subnet.subscription
            || pool_subnet.resource_group != master_subnet.resource_group
            || pool_subnet.vnet_name != master_subnet.vnet_name
        {
            return Err(Error::validation(format!(
                "pool '{}' has a vnetSubnetID in a different VNET than the master profile; all \
                 subnets must belong to the same virtual network",
                pool.name
            )));
        }
    }

    if master.first_consecutive_static_ip.parse::<IpAddr>().is_err() {
        return Err(Error::validation(format!(
            "MasterProfile.FirstConsecutiveStaticIP (with VNET Subnet specification) '{}' is \
             an invalid IP address",
            master.first_consecutive_static_ip
        )));
    }

    if !master.vnet_cidr.is_empty() && Cidr::parse(&master.vnet_cidr).is_err() {
        return Err(Error::validation(format!(
            "MasterProfile.VnetCidr '{}' contains invalid cidr notation",
            master.vnet_cidr
        )));
    }

    Ok(())
}
