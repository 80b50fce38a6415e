//! The `Boolean` rule

use async_trait::async_trait;

use crate::error::RuleFault;
use crate::rule::{Outcome, Rule, RuleBinding, RuleParams};
use crate::value::Value;

/// Canonical name of [`BooleanRule`].
pub const BOOLEAN: &str = "Boolean";

/// Accepts values that unambiguously denote a boolean.
///
/// Passes for `true`/`false`, the numbers `0`, `-0` and `1`, and strings
/// equal (ignoring ASCII case) to `"0"`, `"1"`, `"true"` or `"false"`.
/// Whitespace is significant: `" true "` fails. Everything else fails,
/// including `NaN`, the infinities, `null`, `undefined`, arrays and objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BooleanRule;

impl BooleanRule {
    /// The predicate behind the rule. Total over every [`Value`].
    #[must_use]
    pub fn accepts(value: &Value) -> bool {
        match value {
            Value::Bool(_) => true,
            // `-0.0 == 0.0`; NaN compares unequal to both.
            Value::Number(n) => *n == 0.0 || *n == 1.0,
            Value::String(s) => ["0", "1", "true", "false"]
                .iter()
                .any(|literal| s.eq_ignore_ascii_case(literal)),
            Value::Undefined | Value::Null | Value::Array(_) | Value::Object(_) => false,
        }
    }
}

#[async_trait]
impl Rule for BooleanRule {
    fn name(&self) -> &str {
        BOOLEAN
    }

    async fn check(&self, value: &Value, _params: &RuleParams) -> Result<Outcome, RuleFault> {
        Ok(Outcome::check(
            Self::accepts(value),
            BOOLEAN,
            format!("expected a boolean-like value, got {} `{value}`", value.kind()),
        ))
    }
}

/// Binds a field to the `Boolean` rule.
#[must_use]
pub fn is_boolean() -> RuleBinding {
    RuleBinding::new(BOOLEAN)
}
