//! Built-in rules
//!
//! Every built-in is a unit struct implementing [`Rule`](crate::Rule) plus a
//! binding factory (`is_boolean()`, `length(1, 8)`, ...) for attaching it to
//! target fields. [`RuleRegistry::bootstrap`](crate::RuleRegistry::bootstrap)
//! registers all of them.
//!
//! | Rule       | Factory                       |
//! |------------|-------------------------------|
//! | `Boolean`  | [`is_boolean`]                |
//! | `String`   | [`is_string`]                 |
//! | `Number`   | [`is_number`]                 |
//! | `Length`   | [`length`], [`min_length`]    |
//! | `Required` | [`required`]                  |

use std::sync::Arc;

use crate::rule::Rule;

pub mod boolean;
pub mod kind;
pub mod length;

pub use boolean::{BOOLEAN, BooleanRule, is_boolean};
pub use kind::{
    NUMBER, NumberRule, REQUIRED, RequiredRule, STRING, StringRule, is_number, is_string, required,
};
pub use length::{LENGTH, LengthRule, length, min_length};

/// Names of the built-in rules, in registration order.
pub const BUILTIN_RULES: [&str; 5] = [BOOLEAN, STRING, NUMBER, LENGTH, REQUIRED];

/// Fresh instances of every built-in rule, in [`BUILTIN_RULES`] order.
pub(crate) fn builtin_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(BooleanRule),
        Arc::new(StringRule),
        Arc::new(NumberRule),
        Arc::new(LengthRule),
        Arc::new(RequiredRule),
    ]
}
