//! Error types for setup and execution faults.
//!
//! A value that fails its rules is *not* an error: it is reported through
//! [`ValidationResult`](crate::ValidationResult) and friends. The types here
//! cover programmer mistakes (unknown or duplicate rules, validating before
//! bootstrap) and rules that crash while evaluating.

/// Error type for every fallible engine operation.
///
/// Distinguishes "bad setup" from "broken rule" so callers can route them
/// differently; neither is ever used to report invalid input.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ValidatorError {
    /// A binding names a rule the registry does not know.
    #[error("unknown rule `{name}`")]
    UnknownRule {
        /// The name that failed to resolve.
        name: String,
    },

    /// A different implementation is already registered under this name.
    #[error("rule `{name}` is already registered with a different implementation")]
    DuplicateRule {
        /// The contested rule name.
        name: String,
    },

    /// A rule was resolved before the registry's bootstrap step ran.
    #[error("rule registry used before bootstrap; call `ensure_rules_registered` first")]
    UninitializedRegistry,

    /// A rule faulted or panicked instead of producing an outcome.
    #[error("rule `{rule}` crashed: {reason}")]
    RuleCrashed {
        /// Name of the crashing rule.
        rule: String,
        /// Fault description or panic payload.
        reason: String,
    },

    /// A target instance did not serialize to an object.
    #[error("target `{type_name}` must serialize to an object, got {kind}")]
    TargetNotObject {
        /// Rust type name of the target.
        type_name: &'static str,
        /// Kind of value it serialized to.
        kind: &'static str,
    },

    /// Declaring a parent would make the inheritance chain loop.
    #[error("inheritance cycle through `{type_name}`")]
    InheritanceCycle {
        /// Type at which the cycle was detected.
        type_name: &'static str,
    },

    /// A type already inherits from a different parent.
    #[error("`{type_name}` already extends `{parent}`")]
    ParentConflict {
        /// Type whose parent was being set.
        type_name: &'static str,
        /// Parent it already has.
        parent: &'static str,
    },

    /// A target instance could not be serialized.
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ValidatorError {
    /// Create an unknown-rule error.
    pub fn unknown_rule(name: impl Into<String>) -> Self {
        Self::UnknownRule { name: name.into() }
    }

    /// Create a duplicate-rule error.
    pub fn duplicate_rule(name: impl Into<String>) -> Self {
        Self::DuplicateRule { name: name.into() }
    }

    /// Create a rule-crash error.
    pub fn rule_crashed(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RuleCrashed {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for setup mistakes (unknown/duplicate rules, missing
    /// bootstrap, broken inheritance).
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownRule { .. }
                | Self::DuplicateRule { .. }
                | Self::UninitializedRegistry
                | Self::InheritanceCycle { .. }
                | Self::ParentConflict { .. }
        )
    }

    /// Returns `true` if a rule crashed while checking a value.
    pub fn is_rule_crash(&self) -> bool {
        matches!(self, Self::RuleCrashed { .. })
    }
}

/// Raised by a rule that cannot evaluate its input.
///
/// Returning a fault means "this rule is broken or its dependency is
/// unavailable", not "the value is invalid".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct RuleFault {
    reason: String,
}

impl RuleFault {
    /// Create a fault with a description.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Fault for a missing or malformed rule parameter.
    pub fn bad_param(index: usize, expected: &str) -> Self {
        Self::new(format!("parameter #{index} must be {expected}"))
    }

    /// The fault description.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ValidatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ValidatorError::unknown_rule("Nope").is_configuration_error());
        assert!(ValidatorError::duplicate_rule("Boolean").is_configuration_error());
        assert!(ValidatorError::UninitializedRegistry.is_configuration_error());
        assert!(!ValidatorError::rule_crashed("Boolean", "boom").is_configuration_error());
        assert!(ValidatorError::rule_crashed("Boolean", "boom").is_rule_crash());
    }

    #[test]
    fn messages_name_the_rule() {
        let err = ValidatorError::unknown_rule("Bogus");
        assert_eq!(err.to_string(), "unknown rule `Bogus`");

        let err = ValidatorError::rule_crashed("Remote", "connection refused");
        assert_eq!(err.to_string(), "rule `Remote` crashed: connection refused");
    }

    #[test]
    fn fault_reason() {
        let fault = RuleFault::bad_param(0, "a non-negative number");
        assert_eq!(fault.reason(), "parameter #0 must be a non-negative number");
        assert_eq!(fault.to_string(), fault.reason());
    }
}
