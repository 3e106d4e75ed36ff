//! Explicit per-field shape checks
//!
//! These cover the simple presence/range constraints on the spec's data
//! structures. They run before any cross-field rule so the domain validators
//! can assume well-shaped input.

use crate::spec::ClusterSpec;
use crate::{Error, Result, MAX_AGENT_POOL_COUNT};

/// Master node counts that provisioning supports (quorum-friendly sizes)
const VALID_MASTER_COUNTS: [i32; 3] = [1, 3, 5];

/// Run every shape check over the spec, first failure wins
pub fn validate_shape(spec: &ClusterSpec) -> Result<()> {
    let master = &spec.master_profile;
    if !VALID_MASTER_COUNTS.contains(&master.count) {
        return Err(Error::validation(format!(
            "MasterProfile.Count {} is invalid, must be 1, 3, or 5",
            master.count
        )));
    }
    if master.dns_prefix.is_empty() {
        return Err(Error::validation("MasterProfile.DNSPrefix is required"));
    }
    if master.vm_size.is_empty() {
        return Err(Error::validation("MasterProfile.VMSize is required"));
    }

    if spec.agent_pool_profiles.is_empty() {
        return Err(Error::validation(
            "AgentPoolProfiles must contain at least one pool",
        ));
    }
    for pool in &spec.agent_pool_profiles {
        if pool.name.is_empty() {
            return Err(Error::validation("AgentPoolProfile.Name is required"));
        }
        if pool.count < 1 || pool.count > MAX_AGENT_POOL_COUNT {
            return Err(Error::validation(format!(
                "AgentPoolProfile.Count {} for pool '{}' is invalid, must be between 1 and {}",
                pool.count, pool.name, MAX_AGENT_POOL_COUNT
            )));
        }
        if pool.vm_size.is_empty() {
            return Err(Error::validation(format!(
                "AgentPoolProfile.VMSize is required for pool '{}'",
                pool.name
            )));
        }
    }

    if spec.linux_profile.admin_username.is_empty() {
        return Err(Error::validation("LinuxProfile.AdminUsername is required"));
    }
    if spec.linux_profile.ssh.public_keys.len() != 1 {
        return Err(Error::validation(
            "LinuxProfile.SSH.PublicKeys must contain exactly one public key",
        ));
    }

    Ok(())
}
