//! Engine configuration
//!
//! [`ValidatorConfig`] controls how the facade drives pipelines. It
//! deserializes with serde (every field defaulted) and can be read from
//! `RULEGUARD_*` environment variables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a pipeline reacts to a failing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Stop at the first failing rule; at most one error is reported.
    #[default]
    FailFast,
    /// Run every rule and report every failure in binding order.
    CollectAll,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FailFast => "fail_fast",
            Self::CollectAll => "collect_all",
        })
    }
}

/// Error returned when parsing an unrecognised [`ValidationMode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown validation mode `{0}` (expected `fail_fast` or `collect_all`)")]
pub struct ParseModeError(String);

impl FromStr for ValidationMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fail_fast" | "failfast" => Ok(Self::FailFast),
            "collect_all" | "collectall" => Ok(Self::CollectAll),
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}

/// Validator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Mode used by [`Validator::validate_report`](crate::Validator::validate_report).
    ///
    /// [`Validator::validate`](crate::Validator::validate) is always fail-fast.
    pub mode: ValidationMode,
    /// Drive the pipelines of different target fields concurrently.
    ///
    /// Results are reported in declaration order either way.
    pub concurrent_fields: bool,
    /// Convert a panicking rule into [`ValidatorError::RuleCrashed`](crate::ValidatorError::RuleCrashed)
    /// instead of unwinding through the caller.
    pub catch_panics: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::FailFast,
            concurrent_fields: false,
            catch_panics: true,
        }
    }
}

impl ValidatorConfig {
    /// Create configuration from environment variables
    ///
    /// Reads `RULEGUARD_MODE`, `RULEGUARD_CONCURRENT_FIELDS` and
    /// `RULEGUARD_CATCH_PANICS`. Unset or unparsable variables keep their
    /// defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Strict preset: report every failure, evaluate fields concurrently.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            mode: ValidationMode::CollectAll,
            concurrent_fields: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_concurrent_fields(mut self, enabled: bool) -> Self {
        self.concurrent_fields = enabled;
        self
    }

    #[must_use]
    pub fn with_catch_panics(mut self, enabled: bool) -> Self {
        self.catch_panics = enabled;
        self
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(mode) = lookup("RULEGUARD_MODE").and_then(|v| v.parse().ok()) {
            config.mode = mode;
        }
        if let Some(flag) = lookup("RULEGUARD_CONCURRENT_FIELDS").and_then(|v| parse_flag(&v)) {
            config.concurrent_fields = flag;
        }
        if let Some(flag) = lookup("RULEGUARD_CATCH_PANICS").and_then(|v| parse_flag(&v)) {
            config.catch_panics = flag;
        }

        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
