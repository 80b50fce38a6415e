//! Macros for declaring field rules with minimal boilerplate.
//!
//! # Available Macros
//!
//! - [`rules_for!`]: implement [`Declare`](crate::Declare) from a field table
//!
//! # Examples
//!
//! ```rust,ignore
//! use ruleguard_validator::prelude::*;
//!
//! #[derive(serde::Serialize)]
//! struct Base { id: Option<u64> }
//!
//! #[derive(serde::Serialize)]
//! struct Settings { id: Option<u64>, enabled: String, name: String }
//!
//! rules_for! {
//!     Base {
//!         id: [required()],
//!     }
//! }
//!
//! rules_for! {
//!     Settings extends Base {
//!         enabled: [is_boolean()],
//!         name: [is_string(), length(1, 32)],
//!     }
//! }
//! ```

// ============================================================================
// RULES_FOR MACRO
// ============================================================================

/// Implements [`Declare`](crate::Declare) for a type from a field table.
///
/// Each entry lists the bindings of one field in evaluation order. Anything
/// convertible into a [`RuleBinding`](crate::RuleBinding) is accepted: a
/// factory call such as `length(1, 8)`, a rule name `"Boolean"`, or a built
/// binding.
///
/// Field names are taken verbatim from the identifiers, so they must match
/// the serialized names. For renamed serde fields, implement `Declare` by hand.
///
/// # Variants
///
/// **Standalone type**:
/// ```rust,ignore
/// rules_for! {
///     Flags {
///         enabled: [is_boolean()],
///     }
/// }
/// ```
///
/// **Inheriting type** (parent fields and bindings come first):
/// ```rust,ignore
/// rules_for! {
///     AdminFlags extends Flags {
///         enabled: [required()],
///         level: [is_number()],
///     }
/// }
/// ```
#[macro_export]
macro_rules! rules_for {
    (
        $target:ident extends $parent:ty {
            $( $field:ident : [ $( $binding:expr ),* $(,)? ] ),* $(,)?
        }
    ) => {
        impl $crate::Declare for $target {
            fn declare(decl: &mut $crate::Declaration<'_>) {
                decl.extends::<$parent>();
                $( $( decl.bind(stringify!($field), $binding); )* )*
            }
        }
    };

    (
        $target:ident {
            $( $field:ident : [ $( $binding:expr ),* $(,)? ] ),* $(,)?
        }
    ) => {
        impl $crate::Declare for $target {
            fn declare(decl: &mut $crate::Declaration<'_>) {
                let _ = &decl;
                $( $( decl.bind(stringify!($field), $binding); )* )*
            }
        }
    };
}
