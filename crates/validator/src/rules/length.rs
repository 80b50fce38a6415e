//! The `Length` rule

use async_trait::async_trait;

use crate::error::RuleFault;
use crate::rule::{Outcome, Rule, RuleBinding, RuleParams};
use crate::value::Value;

/// Canonical name of [`LengthRule`].
pub const LENGTH: &str = "Length";

/// Checks the length of a string (in chars) or an array.
///
/// Parameters: `min` (required, non-negative integer) and `max`
/// (optional; absent or null means unbounded). Values that have no length
/// fail. A malformed `min`/`max` is a [`RuleFault`], not a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LengthRule;

#[async_trait]
impl Rule for LengthRule {
    fn name(&self) -> &str {
        LENGTH
    }

    async fn check(&self, value: &Value, params: &RuleParams) -> Result<Outcome, RuleFault> {
        let min = params.usize(0)?;
        let max = match params.optional_number(1)? {
            Some(_) => Some(params.usize(1)?),
            None => None,
        };
        if let Some(max) = max.filter(|&max| max < min) {
            return Err(RuleFault::new(format!("max ({max}) is below min ({min})")));
        }

        let len = match value {
            Value::String(s) => s.chars().count(),
            Value::Array(items) => items.len(),
            other => {
                return Ok(Outcome::fail(
                    LENGTH,
                    format!("expected a string or array, got {}", other.kind()),
                ));
            }
        };

        let ok = len >= min && max.is_none_or(|max| len <= max);
        Ok(match max {
            Some(max) => Outcome::check(
                ok,
                LENGTH,
                format!("length must be between {min} and {max}, got {len}"),
            ),
            None => Outcome::check(
                ok,
                LENGTH,
                format!("length must be at least {min}, got {len}"),
            ),
        })
    }
}

/// Binds a field to `Length(min, max)`.
#[must_use]
pub fn length(min: usize, max: usize) -> RuleBinding {
    RuleBinding::new(LENGTH).with_param(min).with_param(max)
}

/// Binds a field to `Length(min)` with no upper bound.
#[must_use]
pub fn min_length(min: usize) -> RuleBinding {
    RuleBinding::new(LENGTH).with_param(min)
}
