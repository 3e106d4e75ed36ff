//! Primitive field validators and the compiled pattern set
//!
//! Standalone predicate checks for isolated syntactic shapes: names, label
//! keys/values, resource-identifier strings, uniqueness. Everything pattern
//! based goes through [`Patterns`], compiled exactly once and shared
//! read-only across threads.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::spec::AgentPoolProfile;
use crate::{Error, Result, LABEL_KEY_PREFIX_MAX_LENGTH};

/// The compiled patterns the primitive validators match against
///
/// Built once at first use; immutable afterwards. The pattern literals encode
/// product-support decisions and must not be loosened.
struct Patterns {
    pool_name: Regex,
    dns_name: Regex,
    label_value: Regex,
    label_key: Regex,
    keyvault_id: Regex,
    vnet_subnet_id: Regex,
}

impl Patterns {
    fn new() -> Self {
        // Pool names cap at 12 chars and all lowercase since they make up VM names
        Self {
            pool_name: Regex::new(r"^[a-z][a-z0-9]{0,11}$").expect("pool name pattern"),
            dns_name: Regex::new(r"^[A-Za-z][A-Za-z0-9-]{1,43}[A-Za-z0-9]$")
                .expect("dns name pattern"),
            label_value: Regex::new(r"^([A-Za-z0-9][-A-Za-z0-9_.]{0,61})?[A-Za-z0-9]$")
                .expect("label value pattern"),
            label_key: Regex::new(
                r"^(([a-zA-Z0-9-]+[.])*[a-zA-Z0-9-]+[/])?([A-Za-z0-9][-A-Za-z0-9_.]{0,61})?[A-Za-z0-9]$",
            )
            .expect("label key pattern"),
            keyvault_id: Regex::new(
                r"^/subscriptions/\S+/resourceGroups/\S+/providers/Microsoft.KeyVault/vaults/[^/\s]+$",
            )
            .expect("keyvault id pattern"),
            vnet_subnet_id: Regex::new(
                r"^/subscriptions/([^/]*)/resourceGroups/([^/]*)/providers/Microsoft.Network/virtualNetworks/([^/]*)/subnets/([^/]*)$",
            )
            .expect("vnet subnet id pattern"),
        }
    }
}

static PATTERNS: Lazy<Patterns> = Lazy::new(Patterns::new);

/// Check an agent pool name: lowercase letter then up to 11 lowercase
/// alphanumerics
pub fn validate_pool_name(pool_name: &str) -> Result<()> {
    if !PATTERNS.pool_name.is_match(pool_name) {
        return Err(Error::validation(format!(
            "pool name '{pool_name}' is invalid. A pool name must start with a lowercase letter, \
             have max length of 12, and only have characters a-z0-9"
        )));
    }
    Ok(())
}

/// Check a DNS prefix: 3-45 chars, letters/digits/hyphens, starts with a
/// letter, ends with a letter or digit
pub fn validate_dns_name(dns_name: &str) -> Result<()> {
    if !PATTERNS.dns_name.is_match(dns_name) {
        return Err(Error::validation(format!(
            "DNS name '{dns_name}' is invalid. The DNS name must contain between 3 and 45 \
             characters, contain only letters, numbers, and hyphens, start with a letter, and \
             end with a letter or a number (length was {})",
            dns_name.len()
        )));
    }
    Ok(())
}

/// Check a Kubernetes node label value; the empty value is allowed
pub fn validate_kubernetes_label_value(value: &str) -> Result<()> {
    if !value.is_empty() && !PATTERNS.label_value.is_match(value) {
        return Err(Error::validation(format!(
            "label value '{value}' is invalid. Valid label values must be 63 characters or less \
             and must be empty or begin and end with an alphanumeric character ([a-z0-9A-Z]) \
             with dashes (-), underscores (_), dots (.), and alphanumerics between"
        )));
    }
    Ok(())
}

/// Check a Kubernetes node label key: optional DNS-subdomain prefix plus '/',
/// then a value-shaped name segment
pub fn validate_kubernetes_label_key(key: &str) -> Result<()> {
    if !PATTERNS.label_key.is_match(key) {
        return Err(Error::validation(format!(
            "label key '{key}' is invalid. Valid label keys have two segments: an optional \
             prefix and name, separated by a slash (/). The name segment is required and must \
             be 63 characters or less, beginning and ending with an alphanumeric character \
             ([a-z0-9A-Z]) with dashes (-), underscores (_), dots (.), and alphanumerics \
             between. The prefix is optional; if specified it must be a DNS subdomain not \
             longer than 253 characters in total, followed by a slash (/)"
        )));
    }
    if let Some((prefix, _)) = key.split_once('/') {
        if prefix.len() > LABEL_KEY_PREFIX_MAX_LENGTH {
            return Err(Error::validation(format!(
                "label key prefix '{key}' is invalid. If specified, the prefix must be no \
                 longer than {LABEL_KEY_PREFIX_MAX_LENGTH} characters in total"
            )));
        }
    }
    Ok(())
}

/// Returns true if the string is a well-formed key-vault resource id
pub fn is_valid_keyvault_id(vault_id: &str) -> bool {
    PATTERNS.keyvault_id.is_match(vault_id)
}

/// Components of a custom VNET subnet resource id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VnetSubnetId {
    /// Subscription id segment
    pub subscription: String,
    /// Resource group segment
    pub resource_group: String,
    /// Virtual network name segment
    pub vnet_name: String,
    /// Subnet name segment
    pub subnet_name: String,
}

/// Extract subscription, resource group, vnet and subnet names from a VNET
/// subnet resource id; fails on anything that does not match the full path
pub fn vnet_subnet_id_components(vnet_subnet_id: &str) -> Result<VnetSubnetId> {
    let caps = PATTERNS
        .vnet_subnet_id
        .captures(vnet_subnet_id)
        .ok_or_else(|| {
            Error::validation(format!(
                "vnetSubnetID '{vnet_subnet_id}' is not a valid VNET subnet resource id"
            ))
        })?;
    Ok(VnetSubnetId {
        subscription: caps[1].to_string(),
        resource_group: caps[2].to_string(),
        vnet_name: caps[3].to_string(),
        subnet_name: caps[4].to_string(),
    })
}

/// Reject duplicate ports within one agent pool
pub fn validate_unique_ports(ports: &[i32], name: &str) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for port in ports {
        if !seen.insert(*port) {
            return Err(Error::validation(format!(
                "agent profile '{name}' has duplicate port '{port}', ports must be unique"
            )));
        }
    }
    Ok(())
}

/// Reject duplicate pool names across the whole spec
pub fn validate_unique_pool_names(profiles: &[AgentPoolProfile]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for profile in profiles {
        if !seen.insert(profile.name.as_str()) {
            return Err(Error::validation(format!(
                "profile name '{}' already exists, profile names must be unique across pools",
                profile.name
            )));
        }
    }
    Ok(())
}

/// Require a non-empty value for the labeled field
pub fn validate_name(name: &str, label: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::validation(format!(
            "{label} must be a non-empty value"
        )));
    }
    Ok(())
}
