//! Error types for the capstan validation engine

use thiserror::Error;

/// Main error type for spec validation
///
/// Every failure the engine reports is a human-readable message naming the
/// offending field(s) and the rule that was violated. There is no structured
/// error code; callers surface the message as-is and abort before any
/// provisioning artifact is generated.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Validation error for a cluster deployment spec
    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Create a validation error with the given message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Story: Validation catches misconfigurations before provisioning
    ///
    /// When a user submits a cluster spec with an invalid field combination,
    /// the validation layer rejects it immediately with a message that names
    /// the field and the rule, so the user can fix the spec instead of
    /// watching a deployment fail half way through.
    #[test]
    fn story_validation_prevents_invalid_cluster_creation() {
        let err = Error::validation("pool name 'Web Pool!' contains invalid characters");
        assert!(err.to_string().contains("validation error"));
        assert!(err.to_string().contains("invalid characters"));

        let err = Error::validation("openshift can only be deployed with one master");
        assert!(err.to_string().contains("one master"));

        match Error::validation("any message") {
            Error::Validation(msg) => assert_eq!(msg, "any message"),
        }
    }

    /// Story: Error constructors accept both String and &str
    #[test]
    fn story_error_construction_ergonomics() {
        let dynamic_msg = format!("agent pool {} not found", "pool1");
        let err = Error::validation(dynamic_msg);
        assert!(err.to_string().contains("pool1"));

        let err = Error::validation("static message");
        assert!(err.to_string().contains("static message"));
    }
}
