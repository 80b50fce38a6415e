//! # ruleguard-validator
//!
//! A declarative validation engine: named rules are looked up in a registry
//! and run against single values or against the declared fields of typed
//! targets.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ruleguard_validator::prelude::*;
//!
//! ensure_rules_registered()?;
//!
//! assert!(validate(1, ["Boolean"]).await?.is_success());
//! assert!(!validate(" true ", ["Boolean"]).await?.is_success());
//! ```
//!
//! ## Declaring Targets
//!
//! Use the [`rules_for!`] macro, or implement [`Declare`] manually:
//!
//! ```rust,ignore
//! #[derive(serde::Serialize)]
//! struct Settings { enabled: String }
//!
//! rules_for! {
//!     Settings {
//!         enabled: [is_boolean()],
//!     }
//! }
//!
//! let report = validate_declared(&Settings { enabled: "false".into() }).await?;
//! assert!(report.is_success());
//! ```
//!
//! ## Failures vs Errors
//!
//! Input that breaks a rule is reported in the returned result
//! ([`ValidationResult`], [`ValueReport`], [`TargetReport`]); every failure
//! message contains the rule's name. `Err(`[`ValidatorError`]`)` is reserved
//! for setup mistakes (unknown or duplicate rules, missing bootstrap) and for
//! rules that crash.
//!
//! ## Built-in Rules
//!
//! - **Type**: [`Boolean`](rules::BooleanRule), [`String`](rules::StringRule),
//!   [`Number`](rules::NumberRule)
//! - **Size**: [`Length`](rules::LengthRule)
//! - **Presence**: [`Required`](rules::RequiredRule)

pub mod config;
pub mod error;
mod macros;
pub mod metadata;
pub mod pipeline;
pub mod prelude;
pub mod registry;
pub mod result;
pub mod rule;
pub mod rules;
pub mod target;
pub mod validator;
pub mod value;

use serde::Serialize;

pub use config::{ParseModeError, ValidationMode, ValidatorConfig};
pub use error::{Result, RuleFault, ValidatorError};
pub use metadata::{Declaration, Declare, FieldMetadataStore};
pub use pipeline::ValidationPipeline;
pub use registry::RuleRegistry;
pub use result::{FieldFailure, RuleFailure, TargetReport, ValidationResult, ValueReport};
pub use rule::{Outcome, Rule, RuleBinding, RuleParams};
pub use target::TargetValidator;
pub use validator::Validator;
pub use value::Value;

// ============================================================================
// PROCESS-WIDE SHORTCUTS
// ============================================================================

/// Bootstraps the [global](Validator::global) registry.
pub fn ensure_rules_registered() -> Result<()> {
    Validator::global().ensure_rules_registered()
}

/// Registers a custom rule with the global validator.
pub fn register_rule<R: Rule + 'static>(rule: R) -> Result<()> {
    Validator::global().register_rule(rule)
}

/// Records `T`'s field bindings in the global store.
pub fn register_target<T: Declare>() -> Result<()> {
    Validator::global().register_target::<T>()
}

/// Fail-fast validation of one value with the global validator.
pub async fn validate<V, I>(value: V, rules: I) -> Result<ValidationResult>
where
    V: Into<Value>,
    I: IntoIterator,
    I::Item: Into<RuleBinding>,
{
    Validator::global().validate(value, rules).await
}

/// Validates a target with the global validator.
pub async fn validate_target<T: Serialize + 'static>(data: &T) -> Result<TargetReport> {
    Validator::global().validate_target(data).await
}

/// Registers `T` if needed, then validates it with the global validator.
pub async fn validate_declared<T: Declare + Serialize>(data: &T) -> Result<TargetReport> {
    Validator::global().validate_declared(data).await
}
