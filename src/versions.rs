//! Orchestrator version tables and compatibility logic
//!
//! All version gating goes through this module: the supported-version tables,
//! the release/version rationalizer, and the single [`meets_minimum`] helper
//! every feature gate uses, so parsing and comparison semantics are identical
//! at every call site.
//!
//! A "release" is a minor-version channel like "1.9"; a "version" is fully
//! qualified like "1.9.3". Rationalization reconciles the two into one
//! canonical supported version, or rejects the pair.

use semver::Version;

use crate::spec::OrchestratorType;
use crate::Error;

// =============================================================================
// Feature minimum-version gates
// =============================================================================
// Named constants, not inlined at call sites: new gates get added over the
// system's lifetime and must stay greppable in one place.

/// Minimum Kubernetes version for aggregated API servers
pub const MIN_VERSION_AGGREGATED_APIS: &str = "1.7.0";

/// Minimum Kubernetes version for etcd data encryption at rest
pub const MIN_VERSION_DATA_ENCRYPTION_AT_REST: &str = "1.7.0";

/// Minimum Kubernetes version for the PodSecurityPolicy admission controller
pub const MIN_VERSION_POD_SECURITY_POLICY: &str = "1.8.0";

/// Minimum Kubernetes version for external key-management encryption
pub const MIN_VERSION_EXTERNAL_KMS: &str = "1.10.0";

/// Minimum Kubernetes version for the external cloud controller manager
pub const MIN_VERSION_CLOUD_CONTROLLER_MANAGER: &str = "1.8.0";

/// Minimum Kubernetes version for scale-set agent pools
pub const MIN_VERSION_SCALE_SETS: &str = "1.10.0";

/// Minimum Kubernetes version for instance metadata on scale-set pools
pub const MIN_VERSION_SCALE_SET_INSTANCE_METADATA: &str = "1.10.2";

/// OpenShift version marker that opts out of version rationalization
pub const OPENSHIFT_VERSION_UNSTABLE: &str = "unstable";

// =============================================================================
// Supported-version tables
// =============================================================================

const KUBERNETES_VERSIONS: &[&str] = &[
    "1.6.6", "1.6.9", "1.6.11", "1.6.12", "1.6.13", //
    "1.7.0", "1.7.1", "1.7.2", "1.7.4", "1.7.5", "1.7.7", "1.7.9", "1.7.10", "1.7.12", "1.7.13",
    "1.7.14", "1.7.15", "1.7.16", //
    "1.8.0", "1.8.1", "1.8.2", "1.8.4", "1.8.6", "1.8.7", "1.8.8", "1.8.9", "1.8.10", "1.8.11", //
    "1.9.0", "1.9.1", "1.9.2", "1.9.3", "1.9.4", "1.9.5", "1.9.6", "1.9.7", //
    "1.10.0", "1.10.1", "1.10.2",
];

/// Kubernetes versions with working Windows node support
const KUBERNETES_WINDOWS_VERSIONS: &[&str] = &[
    "1.7.2", "1.7.4", "1.7.5", "1.7.7", "1.7.9", "1.7.10", "1.7.12", "1.7.13", "1.7.14", "1.7.15",
    "1.7.16", //
    "1.8.0", "1.8.1", "1.8.2", "1.8.4", "1.8.6", "1.8.7", "1.8.8", "1.8.9", "1.8.10", "1.8.11", //
    "1.9.0", "1.9.1", "1.9.2", "1.9.3", "1.9.4", "1.9.5", "1.9.6", "1.9.7", //
    "1.10.0", "1.10.1", "1.10.2",
];

const KUBERNETES_DEFAULT_VERSION: &str = "1.9.7";

const DCOS_VERSIONS: &[&str] = &["1.8.8", "1.9.0", "1.9.8", "1.10.0", "1.11.0"];

const DCOS_DEFAULT_VERSION: &str = "1.11.0";

const SWARM_VERSION: &str = "1.1.0";

const SWARM_MODE_VERSION: &str = "17.06.0";

const OPENSHIFT_VERSIONS: &[&str] = &["3.9.0"];

const OPENSHIFT_DEFAULT_VERSION: &str = "3.9.0";

/// Supported etcd versions; note 3.2.10 was never published for this target
pub const SUPPORTED_ETCD_VERSIONS: &[&str] = &[
    "2.2.5", //
    "2.3.0", "2.3.1", "2.3.2", "2.3.3", "2.3.4", "2.3.5", "2.3.6", "2.3.7", "2.3.8", //
    "3.0.0", "3.0.1", "3.0.2", "3.0.3", "3.0.4", "3.0.5", "3.0.6", "3.0.7", "3.0.8", "3.0.9",
    "3.0.10", "3.0.11", "3.0.12", "3.0.13", "3.0.14", "3.0.15", "3.0.16", "3.0.17", //
    "3.1.0", "3.1.1", "3.1.2", "3.1.3", "3.1.4", "3.1.5", "3.1.6", "3.1.7", "3.1.8", "3.1.9",
    "3.1.10", //
    "3.2.0", "3.2.1", "3.2.2", "3.2.3", "3.2.4", "3.2.5", "3.2.6", "3.2.7", "3.2.8", "3.2.9",
    "3.2.11", "3.2.12", "3.2.13", "3.2.14", "3.2.15", "3.2.16", //
    "3.3.0", "3.3.1",
];

// =============================================================================
// Operations
// =============================================================================

/// Resolve a (type, release, version) triple to the canonical supported version
///
/// - both unset: the orchestrator's default version
/// - release only: the latest supported patch of that release
/// - version set: the version itself, iff it is supported (and belongs to the
///   release when both are given)
///
/// `windows_only` restricts Kubernetes lookups to the Windows-capable table.
/// Returns None when the triple cannot be satisfied; the caller is expected
/// to produce a diagnostic naming all three inputs.
pub fn rationalize_release_and_version(
    orchestrator_type: OrchestratorType,
    release: &str,
    version: &str,
    windows_only: bool,
) -> Option<String> {
    match orchestrator_type {
        OrchestratorType::Kubernetes => {
            let table = if windows_only {
                KUBERNETES_WINDOWS_VERSIONS
            } else {
                KUBERNETES_VERSIONS
            };
            let default = if windows_only {
                latest(table)?
            } else {
                KUBERNETES_DEFAULT_VERSION.to_string()
            };
            rationalize_in(table, &default, release, version)
        }
        OrchestratorType::Dcos => {
            rationalize_in(DCOS_VERSIONS, DCOS_DEFAULT_VERSION, release, version)
        }
        OrchestratorType::OpenShift => rationalize_in(
            OPENSHIFT_VERSIONS,
            OPENSHIFT_DEFAULT_VERSION,
            release,
            version,
        ),
        OrchestratorType::Swarm => rationalize_fixed(SWARM_VERSION, release, version),
        OrchestratorType::SwarmMode => rationalize_fixed(SWARM_MODE_VERSION, release, version),
    }
}

/// Latest supported patch for the minor release of `version`
///
/// Update-mode fallback: a cluster already on an unsupported patch may still
/// be updated if its minor release has any supported patch. Empty input
/// yields the orchestrator default.
pub fn get_valid_patch_version(
    orchestrator_type: OrchestratorType,
    version: &str,
) -> Option<String> {
    if version.is_empty() {
        return rationalize_release_and_version(orchestrator_type, "", "", false);
    }
    let table = match orchestrator_type {
        OrchestratorType::Kubernetes => KUBERNETES_VERSIONS,
        OrchestratorType::Dcos => DCOS_VERSIONS,
        OrchestratorType::OpenShift => OPENSHIFT_VERSIONS,
        OrchestratorType::Swarm | OrchestratorType::SwarmMode => return None,
    };
    let v = Version::parse(version).ok()?;
    latest_patch(table, &format!("{}.{}", v.major, v.minor))
}

/// Returns true iff `version >= min_version`, both parsed as semantic versions
///
/// A parse failure on either side is a hard validation error, never a silent
/// false: a gate that cannot be evaluated must not pass.
pub fn meets_minimum(version: &str, min_version: &str) -> crate::Result<bool> {
    let v = Version::parse(version)
        .map_err(|_| Error::validation(format!("could not validate version {version}")))?;
    let min = Version::parse(min_version).map_err(|_| {
        Error::validation(format!(
            "could not apply version constraint >= {min_version} against version {version}"
        ))
    })?;
    Ok(v >= min)
}

/// Returns true if the Kubernetes version supports Windows nodes
pub fn is_supported_windows_version(version: &str) -> bool {
    KUBERNETES_WINDOWS_VERSIONS.contains(&version)
}

/// Returns true if the etcd version is deployable; empty selects the default
pub fn is_supported_etcd_version(version: &str) -> bool {
    version.is_empty() || SUPPORTED_ETCD_VERSIONS.contains(&version)
}

/// Kubernetes versions with cloud-provider backoff available
///
/// Currently every supported version; kept as a lookup so future versions can
/// opt out without touching the call sites.
pub fn supports_cloud_provider_backoff(version: &str) -> bool {
    KUBERNETES_VERSIONS.contains(&version)
}

/// Kubernetes versions with cloud-provider rate limiting available
/// (currently identical with the backoff-enabled set)
pub fn supports_cloud_provider_rate_limit(version: &str) -> bool {
    supports_cloud_provider_backoff(version)
}

// =============================================================================
// Table helpers
// =============================================================================

fn rationalize_in(
    table: &[&str],
    default: &str,
    release: &str,
    version: &str,
) -> Option<String> {
    match (release.is_empty(), version.is_empty()) {
        (true, true) => Some(default.to_string()),
        (false, true) => latest_patch(table, release),
        (_, false) => {
            if !table.contains(&version) {
                return None;
            }
            if !release.is_empty() {
                let v = Version::parse(version).ok()?;
                if format!("{}.{}", v.major, v.minor) != release {
                    return None;
                }
            }
            Some(version.to_string())
        }
    }
}

fn rationalize_fixed(fixed: &str, release: &str, version: &str) -> Option<String> {
    if !release.is_empty() {
        return None;
    }
    if version.is_empty() || version == fixed {
        Some(fixed.to_string())
    } else {
        None
    }
}

fn latest_patch(table: &[&str], release: &str) -> Option<String> {
    table
        .iter()
        .filter_map(|s| Version::parse(s).ok())
        .filter(|v| format!("{}.{}", v.major, v.minor) == release)
        .max()
        .map(|v| v.to_string())
}

fn latest(table: &[&str]) -> Option<String> {
    table
        .iter()
        .filter_map(|s| Version::parse(s).ok())
        .max()
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod rationalize {
        use super::*;

        #[test]
        fn test_defaults_when_unset() {
            let v = rationalize_release_and_version(OrchestratorType::Kubernetes, "", "", false);
            assert_eq!(v.as_deref(), Some(KUBERNETES_DEFAULT_VERSION));

            let v = rationalize_release_and_version(OrchestratorType::Dcos, "", "", false);
            assert_eq!(v.as_deref(), Some(DCOS_DEFAULT_VERSION));
        }

        #[test]
        fn test_release_selects_latest_patch() {
            let v = rationalize_release_and_version(OrchestratorType::Kubernetes, "1.8", "", false);
            assert_eq!(v.as_deref(), Some("1.8.11"));

            let v = rationalize_release_and_version(OrchestratorType::Kubernetes, "1.10", "", false);
            assert_eq!(v.as_deref(), Some("1.10.2"));
        }

        #[test]
        fn test_explicit_version_must_be_supported() {
            let v = rationalize_release_and_version(
                OrchestratorType::Kubernetes,
                "",
                "1.9.3",
                false,
            );
            assert_eq!(v.as_deref(), Some("1.9.3"));

            // 1.9.99 was never published
            let v = rationalize_release_and_version(
                OrchestratorType::Kubernetes,
                "",
                "1.9.99",
                false,
            );
            assert_eq!(v, None);
        }

        #[test]
        fn test_release_and_version_must_agree() {
            let v = rationalize_release_and_version(
                OrchestratorType::Kubernetes,
                "1.8",
                "1.9.3",
                false,
            );
            assert_eq!(v, None);

            let v = rationalize_release_and_version(
                OrchestratorType::Kubernetes,
                "1.9",
                "1.9.3",
                false,
            );
            assert_eq!(v.as_deref(), Some("1.9.3"));
        }

        #[test]
        fn test_unknown_release_rejected() {
            let v = rationalize_release_and_version(OrchestratorType::Kubernetes, "1.5", "", false);
            assert_eq!(v, None);
        }

        #[test]
        fn test_windows_only_restricts_table() {
            // 1.7.0 exists but never supported Windows nodes
            let v =
                rationalize_release_and_version(OrchestratorType::Kubernetes, "", "1.7.0", true);
            assert_eq!(v, None);

            let v =
                rationalize_release_and_version(OrchestratorType::Kubernetes, "", "1.9.7", true);
            assert_eq!(v.as_deref(), Some("1.9.7"));
        }

        #[test]
        fn test_swarm_fixed_versions() {
            let v = rationalize_release_and_version(OrchestratorType::Swarm, "", "", false);
            assert_eq!(v.as_deref(), Some(SWARM_VERSION));

            let v = rationalize_release_and_version(OrchestratorType::SwarmMode, "", "2.0.0", false);
            assert_eq!(v, None);
        }
    }

    mod patch_versions {
        use super::*;

        #[test]
        fn test_valid_patch_for_supported_minor() {
            // 1.8.3 itself is not in the table, but 1.8 has supported patches
            let v = get_valid_patch_version(OrchestratorType::Kubernetes, "1.8.3");
            assert_eq!(v.as_deref(), Some("1.8.11"));
        }

        #[test]
        fn test_no_patch_for_unknown_minor() {
            let v = get_valid_patch_version(OrchestratorType::Kubernetes, "1.5.0");
            assert_eq!(v, None);
        }

        #[test]
        fn test_empty_version_falls_back_to_default() {
            let v = get_valid_patch_version(OrchestratorType::Kubernetes, "");
            assert_eq!(v.as_deref(), Some(KUBERNETES_DEFAULT_VERSION));
        }
    }

    mod minimums {
        use super::*;

        #[test]
        fn test_meets_minimum() {
            assert!(meets_minimum("1.10.2", "1.10.0").unwrap());
            assert!(meets_minimum("1.10.0", "1.10.0").unwrap());
            assert!(!meets_minimum("1.9.7", "1.10.0").unwrap());
        }

        /// Story: A gate that cannot be evaluated must not pass
        ///
        /// An unparseable version is a hard validation error, not a silent
        /// false, so a typo in the spec never slips a feature past its gate.
        #[test]
        fn story_unparseable_version_is_an_error() {
            assert!(meets_minimum("one.ten", "1.10.0").is_err());
            assert!(meets_minimum("1.10.0", "not-a-version").is_err());
        }
    }

    mod tables {
        use super::*;

        #[test]
        fn test_etcd_versions() {
            assert!(is_supported_etcd_version(""));
            assert!(is_supported_etcd_version("2.2.5"));
            assert!(is_supported_etcd_version("3.1.10"));
            assert!(is_supported_etcd_version("3.3.1"));
            // 3.2.10 is deliberately absent from the supported list
            assert!(!is_supported_etcd_version("3.2.10"));
            assert!(!is_supported_etcd_version("3.4.0"));
        }

        #[test]
        fn test_windows_versions() {
            assert!(is_supported_windows_version("1.9.7"));
            assert!(!is_supported_windows_version("1.6.13"));
            assert!(!is_supported_windows_version("1.7.0"));
        }

        #[test]
        fn test_backoff_support_tracks_supported_versions() {
            assert!(supports_cloud_provider_backoff("1.8.11"));
            assert!(supports_cloud_provider_rate_limit("1.10.2"));
            assert!(!supports_cloud_provider_backoff("1.5.0"));
        }

        #[test]
        fn test_tables_are_valid_semver() {
            for v in KUBERNETES_VERSIONS
                .iter()
                .chain(KUBERNETES_WINDOWS_VERSIONS)
                .chain(DCOS_VERSIONS)
                .chain(OPENSHIFT_VERSIONS)
                .chain(SUPPORTED_ETCD_VERSIONS)
            {
                Version::parse(v).unwrap_or_else(|_| panic!("bad table entry: {v}"));
            }
        }
    }
}
