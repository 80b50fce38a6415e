//! Type and presence rules: `String`, `Number`, `Required`

use async_trait::async_trait;

use crate::error::RuleFault;
use crate::rule::{Outcome, Rule, RuleBinding, RuleParams};
use crate::value::Value;

/// Canonical name of [`StringRule`].
pub const STRING: &str = "String";
/// Canonical name of [`NumberRule`].
pub const NUMBER: &str = "Number";
/// Canonical name of [`RequiredRule`].
pub const REQUIRED: &str = "Required";

/// Passes iff the value is a string (empty strings included).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StringRule;

#[async_trait]
impl Rule for StringRule {
    fn name(&self) -> &str {
        STRING
    }

    async fn check(&self, value: &Value, _params: &RuleParams) -> Result<Outcome, RuleFault> {
        Ok(Outcome::check(
            matches!(value, Value::String(_)),
            STRING,
            format!("expected a string, got {}", value.kind()),
        ))
    }
}

/// Passes iff the value is a finite number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NumberRule;

#[async_trait]
impl Rule for NumberRule {
    fn name(&self) -> &str {
        NUMBER
    }

    async fn check(&self, value: &Value, _params: &RuleParams) -> Result<Outcome, RuleFault> {
        let ok = value.as_f64().is_some_and(f64::is_finite);
        Ok(Outcome::check(
            ok,
            NUMBER,
            format!("expected a finite number, got {} `{value}`", value.kind()),
        ))
    }
}

/// Fails for `undefined` and `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RequiredRule;

#[async_trait]
impl Rule for RequiredRule {
    fn name(&self) -> &str {
        REQUIRED
    }

    async fn check(&self, value: &Value, _params: &RuleParams) -> Result<Outcome, RuleFault> {
        Ok(Outcome::check(
            !value.is_nullish(),
            REQUIRED,
            format!("a value is required, got {}", value.kind()),
        ))
    }
}

#[must_use]
pub fn is_string() -> RuleBinding {
    RuleBinding::new(STRING)
}

#[must_use]
pub fn is_number() -> RuleBinding {
    RuleBinding::new(NUMBER)
}

#[must_use]
pub fn required() -> RuleBinding {
    RuleBinding::new(REQUIRED)
}
