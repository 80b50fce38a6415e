//! Validation results
//!
//! Three shapes, one invariant: `success` is never stored, it is derived
//! from the absence of errors.
//!
//! | Type               | Produced by                      | Wire shape |
//! |--------------------|----------------------------------|------------|
//! | [`ValidationResult`] | `validate` (fail-fast)         | `{"success", "error"?}` |
//! | [`ValueReport`]      | `validate_all` (collect-all)   | `{"success", "errors"}` |
//! | [`TargetReport`]     | `validate_target`              | `{"success", "errors"}` |

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::value::Value;

/// One rule rejecting one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFailure {
    /// Name of the rule that failed.
    pub rule_name: String,
    /// Diagnostic; contains `rule_name` verbatim.
    pub message: String,
    /// The rejected value.
    pub value: Value,
}

impl RuleFailure {
    pub fn new(rule_name: impl Into<String>, message: impl Into<String>, value: Value) -> Self {
        Self {
            rule_name: rule_name.into(),
            message: message.into(),
            value,
        }
    }

    /// Tags this failure with the field it came from.
    #[must_use]
    pub fn into_field(self, field: impl Into<String>) -> FieldFailure {
        FieldFailure {
            field: field.into(),
            rule_name: self.rule_name,
            message: self.message,
        }
    }
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One rule rejecting one field of a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFailure {
    /// Field name as declared.
    pub field: String,
    /// Name of the rule that failed.
    pub rule_name: String,
    /// Diagnostic; contains `rule_name` verbatim.
    pub message: String,
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

// ============================================================================
// SINGLE VALUE, FAIL-FAST
// ============================================================================

/// Outcome of fail-fast validation of a single value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationResult {
    error: Option<RuleFailure>,
}

impl ValidationResult {
    /// A passing result.
    #[must_use]
    pub fn passed() -> Self {
        Self::default()
    }

    /// A failing result carrying its single error.
    #[must_use]
    pub fn failed(error: RuleFailure) -> Self {
        Self { error: Some(error) }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The first failing rule, if any.
    #[must_use]
    pub fn error(&self) -> Option<&RuleFailure> {
        self.error.as_ref()
    }

    /// Converts into a `Result`, failing with the rule failure.
    pub fn into_result(self) -> Result<(), RuleFailure> {
        self.error.map_or(Ok(()), Err)
    }
}

impl From<ValueReport> for ValidationResult {
    /// Keeps only the first failure.
    fn from(report: ValueReport) -> Self {
        Self {
            error: report.errors.into_iter().next(),
        }
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.error.is_some() { 2 } else { 1 };
        let mut out = serializer.serialize_struct("ValidationResult", len)?;
        out.serialize_field("success", &self.is_success())?;
        if let Some(error) = &self.error {
            out.serialize_field("error", error)?;
        }
        out.end()
    }
}

// ============================================================================
// SINGLE VALUE, COLLECT-ALL
// ============================================================================

/// Every failure of a single value, in binding order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueReport {
    errors: Vec<RuleFailure>,
}

impl ValueReport {
    #[must_use]
    pub fn new(errors: Vec<RuleFailure>) -> Self {
        Self { errors }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[RuleFailure] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<RuleFailure> {
        self.errors
    }
}

impl Serialize for ValueReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_struct("ValueReport", 2)?;
        out.serialize_field("success", &self.is_success())?;
        out.serialize_field("errors", &self.errors)?;
        out.end()
    }
}

// ============================================================================
// TARGET
// ============================================================================

/// Every failure across a target's fields.
///
/// Ordered by field declaration order, then by rule order within a field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetReport {
    errors: Vec<FieldFailure>,
}

impl TargetReport {
    #[must_use]
    pub fn new(errors: Vec<FieldFailure>) -> Self {
        Self { errors }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldFailure] {
        &self.errors
    }

    /// Failures of one field.
    pub fn field_errors<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldFailure> {
        self.errors.iter().filter(move |error| error.field == field)
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<FieldFailure> {
        self.errors
    }
}

impl Serialize for TargetReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_struct("TargetReport", 2)?;
        out.serialize_field("success", &self.is_success())?;
        out.serialize_field("errors", &self.errors)?;
        out.end()
    }
}

impl fmt::Display for TargetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("validation passed");
        }
        writeln!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn failure() -> RuleFailure {
        RuleFailure::new("Boolean", "Boolean: expected a boolean-like value", Value::from("maybe"))
    }

    #[test]
    fn passed_result_shape() {
        let result = ValidationResult::passed();
        assert!(result.is_success());
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"success": true}));
    }

    #[test]
    fn failed_result_shape() {
        let result = ValidationResult::failed(failure());
        assert!(!result.is_success());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "success": false,
                "error": {
                    "ruleName": "Boolean",
                    "message": "Boolean: expected a boolean-like value",
                    "value": "maybe",
                },
            })
        );
        assert!(result.into_result().is_err());
    }

    #[test]
    fn report_success_follows_errors() {
        let report = ValueReport::default();
        assert!(report.is_success());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"success": true, "errors": []})
        );

        let report = ValueReport::new(vec![failure(), failure()]);
        assert!(!report.is_success());
        assert_eq!(ValidationResult::from(report).error(), Some(&failure()));
    }

    #[test]
    fn target_report_shape() {
        let report = TargetReport::new(vec![failure().into_field("enabled")]);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "success": false,
                "errors": [{
                    "field": "enabled",
                    "ruleName": "Boolean",
                    "message": "Boolean: expected a boolean-like value",
                }],
            })
        );
        assert_eq!(report.field_errors("enabled").count(), 1);
        assert_eq!(report.field_errors("other").count(), 0);
        assert!(report.to_string().contains("[enabled] Boolean"));
    }
}
