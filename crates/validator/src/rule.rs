//! The rule abstraction
//!
//! A [`Rule`] is a named, stateless check over a [`Value`]. Rules are
//! registered once in a [`RuleRegistry`](crate::RuleRegistry) and referenced
//! everywhere else by name through [`RuleBinding`]s.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::RuleFault;
use crate::value::Value;

// ============================================================================
// RULE TRAIT
// ============================================================================

/// A named validation check.
///
/// `check` is async so a rule may await external lookups (uniqueness,
/// remote allow-lists). Purely computational rules simply return.
///
/// Implementations must be stateless and reentrant and must never mutate
/// the value. A failing value is reported as [`Outcome::Fail`]; `Err` is
/// reserved for rules that cannot evaluate at all.
///
/// # Examples
///
/// ```rust,ignore
/// use ruleguard_validator::prelude::*;
///
/// #[derive(Debug)]
/// struct Even;
///
/// #[async_trait]
/// impl Rule for Even {
///     fn name(&self) -> &str {
///         "Even"
///     }
///
///     async fn check(&self, value: &Value, _params: &RuleParams) -> Result<Outcome, RuleFault> {
///         Ok(match value.as_f64() {
///             Some(n) if n % 2.0 == 0.0 => Outcome::Pass,
///             _ => Outcome::fail(self.name(), "value must be an even number"),
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait Rule: Send + Sync + fmt::Debug {
    /// Canonical, case-sensitive rule name.
    fn name(&self) -> &str;

    /// Checks `value` against this rule.
    async fn check(&self, value: &Value, params: &RuleParams) -> Result<Outcome, RuleFault>;
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Verdict of a single rule check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The value satisfies the rule.
    Pass,
    /// The value violates the rule.
    Fail {
        /// Diagnostic message; always contains the rule name.
        message: String,
    },
}

impl Outcome {
    /// Builds a failure whose message is prefixed with the rule name.
    ///
    /// Consumers pattern-match on the rule name inside messages, so every
    /// built-in goes through this constructor.
    pub fn fail(rule: &str, detail: impl fmt::Display) -> Self {
        Self::Fail {
            message: format!("{rule}: {detail}"),
        }
    }

    /// Passes when `ok`, otherwise fails like [`Outcome::fail`].
    pub fn check(ok: bool, rule: &str, detail: impl fmt::Display) -> Self {
        if ok { Self::Pass } else { Self::fail(rule, detail) }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// The failure message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Pass => None,
            Self::Fail { message } => Some(message),
        }
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// Ordered positional parameters passed to a rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct RuleParams(Vec<Value>);

impl RuleParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }

    /// Parameter at `index`, if supplied.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Numeric parameter at `index`.
    pub fn number(&self, index: usize) -> Result<f64, RuleFault> {
        self.get(index)
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite())
            .ok_or_else(|| RuleFault::bad_param(index, "a finite number"))
    }

    /// Optional numeric parameter: `None` when absent or null.
    pub fn optional_number(&self, index: usize) -> Result<Option<f64>, RuleFault> {
        match self.get(index) {
            None | Some(Value::Null | Value::Undefined) => Ok(None),
            Some(_) => self.number(index).map(Some),
        }
    }

    /// Non-negative integral parameter at `index`.
    pub fn usize(&self, index: usize) -> Result<usize, RuleFault> {
        let n = self.number(index)?;
        if n < 0.0 || n.fract() != 0.0 {
            return Err(RuleFault::bad_param(index, "a non-negative integer"));
        }
        Ok(n as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }
}

impl<V: Into<Value>> FromIterator<V> for RuleParams {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// BINDING
// ============================================================================

/// A rule name paired with the parameters it is invoked with.
///
/// Bindings are what callers attach to a value (`validate`) or to a target
/// field (`add_binding`, `rules_for!`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleBinding {
    /// Name of the rule to resolve.
    pub rule: String,
    /// Parameters handed to `check`.
    #[serde(skip_serializing_if = "RuleParams::is_empty")]
    pub params: RuleParams,
}

impl RuleBinding {
    /// Binding without parameters.
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            params: RuleParams::new(),
        }
    }

    /// Appends a parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value);
        self
    }

    /// Rule name.
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }
}

impl From<&str> for RuleBinding {
    fn from(rule: &str) -> Self {
        Self::new(rule)
    }
}

impl From<String> for RuleBinding {
    fn from(rule: String) -> Self {
        Self::new(rule)
    }
}

impl From<&RuleBinding> for RuleBinding {
    fn from(binding: &RuleBinding) -> Self {
        binding.clone()
    }
}

impl fmt::Display for RuleBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rule)?;
        if !self.params.is_empty() {
            f.write_str("(")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{param}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_message_contains_rule_name() {
        let outcome = Outcome::fail("Boolean", "value must be a boolean");
        assert_eq!(outcome.message(), Some("Boolean: value must be a boolean"));
        assert!(!outcome.is_pass());
        assert!(Outcome::check(true, "Boolean", "unused").is_pass());
    }

    #[test]
    fn params_accessors() {
        let params: RuleParams = [Value::from(3), Value::Null, Value::from("x")]
            .into_iter()
            .collect();
        assert_eq!(params.len(), 3);
        assert_eq!(params.usize(0), Ok(3));
        assert_eq!(params.optional_number(1), Ok(None));
        assert_eq!(params.optional_number(5), Ok(None));
        assert!(params.number(2).is_err());
        assert!(params.number(9).is_err());
    }

    #[test]
    fn usize_rejects_fractions_and_negatives() {
        let params: RuleParams = [1.5, -2.0].into_iter().collect();
        assert!(params.usize(0).is_err());
        assert!(params.usize(1).is_err());
    }

    #[test]
    fn binding_display() {
        let binding = RuleBinding::new("Length").with_param(1).with_param(8);
        assert_eq!(binding.to_string(), "Length(1, 8)");
        assert_eq!(RuleBinding::from("Boolean").to_string(), "Boolean");
    }
}
