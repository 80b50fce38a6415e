//! Target validation: every declared field of a typed instance.

use std::any::type_name;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::ValidationMode;
use crate::error::{Result, ValidatorError};
use crate::metadata::FieldMetadataStore;
use crate::pipeline::ValidationPipeline;
use crate::result::{FieldFailure, TargetReport};
use crate::rule::RuleBinding;
use crate::value::Value;

/// Validates instances against the field bindings recorded for their type.
///
/// Fields without bindings are never looked at. Each declared field runs in
/// [`ValidationMode::CollectAll`], so one bad field never hides another, and
/// failures are reported in field declaration order, then rule order.
#[derive(Debug, Clone)]
pub struct TargetValidator {
    store: Arc<FieldMetadataStore>,
    pipeline: ValidationPipeline,
    concurrent_fields: bool,
}

impl TargetValidator {
    pub fn new(store: Arc<FieldMetadataStore>, pipeline: ValidationPipeline) -> Self {
        Self {
            store,
            pipeline,
            concurrent_fields: false,
        }
    }

    /// Drive the per-field pipelines concurrently instead of one by one.
    ///
    /// The report is identical either way.
    #[must_use]
    pub fn with_concurrent_fields(mut self, enabled: bool) -> Self {
        self.concurrent_fields = enabled;
        self
    }

    pub fn store(&self) -> &Arc<FieldMetadataStore> {
        &self.store
    }

    /// Validates `data` against the bindings declared for `T`.
    ///
    /// `data` must serialize to an object; missing fields read as
    /// [`Value::Undefined`].
    #[instrument(level = "debug", skip_all, fields(target_type = type_name::<T>()))]
    pub async fn validate<T: Serialize + 'static>(&self, data: &T) -> Result<TargetReport> {
        let instance = Value::from_serialize(data)?;
        if instance.as_object().is_none() {
            return Err(ValidatorError::TargetNotObject {
                type_name: type_name::<T>(),
                kind: instance.kind(),
            });
        }

        let plan = self.store.field_plan::<T>();
        let values: Vec<Value> = plan.iter().map(|(field, _)| instance.get(field)).collect();
        let runs = plan
            .iter()
            .zip(&values)
            .map(|((field, bindings), value)| self.check_field(field, value, bindings));

        let mut errors = Vec::new();
        if self.concurrent_fields {
            for failures in join_all(runs).await {
                errors.extend(failures?);
            }
        } else {
            for run in runs {
                errors.extend(run.await?);
            }
        }

        debug!(fields = plan.len(), failures = errors.len(), "target validated");
        Ok(TargetReport::new(errors))
    }

    async fn check_field(
        &self,
        field: &str,
        value: &Value,
        bindings: &[RuleBinding],
    ) -> Result<Vec<FieldFailure>> {
        let report = self
            .pipeline
            .run(value, bindings, ValidationMode::CollectAll)
            .await?;
        Ok(report
            .into_errors()
            .into_iter()
            .map(|failure| failure.into_field(field))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Declaration, Declare};
    use crate::registry::RuleRegistry;
    use crate::rules::{is_boolean, is_string, length, required};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Serialize)]
    struct Account {
        login: String,
        active: String,
        notes: Option<String>,
    }

    impl Declare for Account {
        fn declare(decl: &mut Declaration<'_>) {
            decl.field("login", [is_string(), length(3, 8)])
                .field("active", [is_boolean()])
                .field("nickname", [required()]);
        }
    }

    fn validator(concurrent: bool) -> TargetValidator {
        let registry = RuleRegistry::new();
        registry.bootstrap().unwrap();
        let store = FieldMetadataStore::new();
        store.register::<Account>().unwrap();
        TargetValidator::new(
            Arc::new(store),
            ValidationPipeline::new(Arc::new(registry)),
        )
        .with_concurrent_fields(concurrent)
    }

    fn account(login: &str, active: &str) -> Account {
        Account {
            login: login.to_owned(),
            active: active.to_owned(),
            notes: None,
        }
    }

    fn summary(report: &TargetReport) -> Vec<(&str, &str)> {
        report
            .errors()
            .iter()
            .map(|e| (e.field.as_str(), e.rule_name.as_str()))
            .collect()
    }

    #[tokio::test]
    async fn reports_in_declaration_order() {
        let report = validator(false)
            .validate(&account("x", "maybe"))
            .await
            .unwrap();
        assert_eq!(
            summary(&report),
            vec![
                ("login", "Length"),
                ("active", "Boolean"),
                ("nickname", "Required"),
            ]
        );
    }

    #[tokio::test]
    async fn concurrent_fields_give_the_same_report() {
        let data = account("x", "maybe");
        let sequential = validator(false).validate(&data).await.unwrap();
        let concurrent = validator(true).validate(&data).await.unwrap();
        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn undeclared_fields_are_ignored() {
        let mut data = account("alice", "true");
        data.notes = Some(String::new());
        let report = validator(false).validate(&data).await.unwrap();
        assert_eq!(summary(&report), vec![("nickname", "Required")]);
    }

    #[tokio::test]
    async fn type_without_bindings_passes() {
        #[derive(Serialize)]
        struct Bare {
            anything: u8,
        }
        let report = validator(false).validate(&Bare { anything: 1 }).await.unwrap();
        assert!(report.is_success());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"success": true, "errors": []})
        );
    }

    #[tokio::test]
    async fn non_object_targets_are_rejected() {
        let err = validator(false).validate(&vec![1, 2]).await.unwrap_err();
        assert!(matches!(
            err,
            ValidatorError::TargetNotObject { kind: "array", .. }
        ));
    }
}
