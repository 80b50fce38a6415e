//! Prelude module for convenient imports.
//!
//! Provides a single `use ruleguard_validator::prelude::*;` import that
//! brings in the facade, the rule trait, results and the built-in binding
//! factories.
//!
//! # Examples
//!
//! ```rust,ignore
//! use ruleguard_validator::prelude::*;
//!
//! let validator = Validator::new(ValidatorConfig::default());
//! validator.ensure_rules_registered()?;
//! let report = validator.validate_all("", [is_string(), min_length(1)]).await?;
//! ```

// ============================================================================
// FACADE
// ============================================================================

pub use crate::{
    ensure_rules_registered, register_rule, register_target, validate, validate_declared,
    validate_target,
};
pub use crate::{ValidationMode, Validator, ValidatorConfig};

// ============================================================================
// RULES: Trait, bindings and built-ins
// ============================================================================

pub use crate::rule::{Outcome, Rule, RuleBinding, RuleParams};
pub use crate::rules::{is_boolean, is_number, is_string, length, min_length, required};
pub use async_trait::async_trait;

// ============================================================================
// TARGETS
// ============================================================================

pub use crate::metadata::{Declaration, Declare};
pub use crate::rules_for;

// ============================================================================
// RESULTS AND ERRORS
// ============================================================================

pub use crate::error::{RuleFault, ValidatorError};
pub use crate::result::{FieldFailure, RuleFailure, TargetReport, ValidationResult, ValueReport};
pub use crate::value::Value;
