//! Validation pipeline: one value against an ordered list of bindings.
//!
//! Every binding is resolved before the first rule runs, so a misspelled
//! rule name aborts the run the same way regardless of mode or of what
//! earlier rules would have said. Rules are then awaited strictly one after
//! another in binding order; fail-fast relies on that ordering.
//!
//! Separate runs share nothing mutable and may be driven concurrently.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, instrument, trace, warn};

use crate::config::ValidationMode;
use crate::error::{Result, ValidatorError};
use crate::registry::RuleRegistry;
use crate::result::{RuleFailure, ValueReport};
use crate::rule::{Outcome, Rule, RuleBinding, RuleParams};
use crate::value::Value;

/// Runs bindings against a value using a shared [`RuleRegistry`].
#[derive(Debug, Clone)]
pub struct ValidationPipeline {
    registry: Arc<RuleRegistry>,
    catch_panics: bool,
}

impl ValidationPipeline {
    /// Create a pipeline that catches panicking rules.
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            catch_panics: true,
        }
    }

    /// Whether a panicking rule becomes [`ValidatorError::RuleCrashed`]
    /// (`true`) or unwinds into the caller (`false`).
    #[must_use]
    pub fn with_catch_panics(mut self, enabled: bool) -> Self {
        self.catch_panics = enabled;
        self
    }

    /// The registry bindings are resolved against.
    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// Checks `value` against `bindings` in order.
    ///
    /// In [`ValidationMode::FailFast`] the report holds at most one failure;
    /// in [`ValidationMode::CollectAll`] it holds every failure in binding
    /// order. Unknown rules, an un-bootstrapped registry and crashing rules
    /// are returned as `Err`, never as failures.
    #[instrument(level = "debug", skip_all, fields(rules = bindings.len(), mode = %mode))]
    pub async fn run(
        &self,
        value: &Value,
        bindings: &[RuleBinding],
        mode: ValidationMode,
    ) -> Result<ValueReport> {
        let resolved = bindings
            .iter()
            .map(|binding| {
                self.registry
                    .resolve(binding.rule())
                    .map(|rule| (rule, binding))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut errors = Vec::new();
        for (rule, binding) in resolved {
            trace!(rule = binding.rule(), "checking value");
            match self.invoke(rule.as_ref(), value, &binding.params).await? {
                Outcome::Pass => {}
                Outcome::Fail { message } => {
                    debug!(rule = binding.rule(), %message, "rule failed");
                    errors.push(RuleFailure::new(
                        binding.rule(),
                        ensure_named(binding.rule(), message),
                        value.clone(),
                    ));
                    if mode == ValidationMode::FailFast {
                        break;
                    }
                }
            }
        }

        Ok(ValueReport::new(errors))
    }

    async fn invoke(&self, rule: &dyn Rule, value: &Value, params: &RuleParams) -> Result<Outcome> {
        let checked = if self.catch_panics {
            // A rule may panic while building its future as well as while it runs.
            let started = panic::catch_unwind(AssertUnwindSafe(|| rule.check(value, params)));
            let finished = match started {
                Ok(future) => AssertUnwindSafe(future).catch_unwind().await,
                Err(payload) => Err(payload),
            };
            match finished {
                Ok(checked) => checked,
                Err(payload) => {
                    let reason = panic_reason(payload.as_ref());
                    warn!(rule = rule.name(), %reason, "rule panicked");
                    return Err(ValidatorError::rule_crashed(rule.name(), reason));
                }
            }
        } else {
            rule.check(value, params).await
        };

        checked.map_err(|fault| {
            warn!(rule = rule.name(), reason = fault.reason(), "rule faulted");
            ValidatorError::rule_crashed(rule.name(), fault.reason())
        })
    }
}

/// Prefixes `message` with the rule name unless it already mentions it.
fn ensure_named(rule: &str, message: String) -> String {
    if message.contains(rule) {
        message
    } else {
        format!("{rule}: {message}")
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleFault;
    use crate::rules::{is_boolean, is_number, is_string};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::future::Future;
    use std::pin::Pin;

    /// Fails with a message that omits its own name.
    #[derive(Debug)]
    struct Terse;

    #[async_trait]
    impl Rule for Terse {
        fn name(&self) -> &str {
            "Terse"
        }

        async fn check(
            &self,
            _value: &Value,
            _params: &RuleParams,
        ) -> std::result::Result<Outcome, RuleFault> {
            Ok(Outcome::Fail {
                message: "nope".to_owned(),
            })
        }
    }

    #[derive(Debug)]
    struct Broken;

    #[async_trait]
    impl Rule for Broken {
        fn name(&self) -> &str {
            "Broken"
        }

        async fn check(
            &self,
            _value: &Value,
            _params: &RuleParams,
        ) -> std::result::Result<Outcome, RuleFault> {
            Err(RuleFault::new("backing store unavailable"))
        }
    }

    #[derive(Debug)]
    struct Panicky;

    #[async_trait]
    impl Rule for Panicky {
        fn name(&self) -> &str {
            "Panicky"
        }

        async fn check(
            &self,
            _value: &Value,
            _params: &RuleParams,
        ) -> std::result::Result<Outcome, RuleFault> {
            panic!("index out of range");
        }
    }

    /// Implements the trait without `#[async_trait]` and panics before any
    /// future exists.
    #[derive(Debug)]
    struct EagerPanic;

    impl Rule for EagerPanic {
        fn name(&self) -> &str {
            "EagerPanic"
        }

        fn check<'life0, 'life1, 'life2, 'async_trait>(
            &'life0 self,
            _value: &'life1 Value,
            _params: &'life2 RuleParams,
        ) -> Pin<
            Box<dyn Future<Output = std::result::Result<Outcome, RuleFault>> + Send + 'async_trait>,
        >
        where
            'life0: 'async_trait,
            'life1: 'async_trait,
            'life2: 'async_trait,
            Self: 'async_trait,
        {
            panic!("parameters not prepared");
        }
    }

    fn pipeline() -> ValidationPipeline {
        let registry = RuleRegistry::new();
        registry.bootstrap().unwrap();
        registry.register_rule(Terse).unwrap();
        registry.register_rule(Broken).unwrap();
        registry.register_rule(Panicky).unwrap();
        registry.register_rule(EagerPanic).unwrap();
        ValidationPipeline::new(Arc::new(registry))
    }

    fn three_failing() -> Vec<RuleBinding> {
        vec![is_boolean(), is_number(), is_string()]
    }

    fn rule_names(report: &ValueReport) -> Vec<&str> {
        report.errors().iter().map(|e| e.rule_name.as_str()).collect()
    }

    #[tokio::test]
    async fn fail_fast_stops_at_first_failure() {
        let report = pipeline()
            .run(&Value::Null, &three_failing(), ValidationMode::FailFast)
            .await
            .unwrap();
        assert_eq!(rule_names(&report), vec!["Boolean"]);
    }

    #[tokio::test]
    async fn collect_all_reports_in_binding_order() {
        let report = pipeline()
            .run(&Value::Null, &three_failing(), ValidationMode::CollectAll)
            .await
            .unwrap();
        assert_eq!(rule_names(&report), vec!["Boolean", "Number", "String"]);
        assert!(report.errors().iter().all(|e| e.value == Value::Null));
    }

    #[tokio::test]
    async fn empty_bindings_pass() {
        let report = pipeline()
            .run(&Value::Undefined, &[], ValidationMode::FailFast)
            .await
            .unwrap();
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn unknown_rule_aborts_even_after_a_failure() {
        let bindings = vec![is_boolean(), RuleBinding::new("Missing")];
        let err = pipeline()
            .run(&Value::from("maybe"), &bindings, ValidationMode::FailFast)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidatorError::UnknownRule { ref name } if name == "Missing"));
    }

    #[tokio::test]
    async fn messages_always_name_the_rule() {
        let report = pipeline()
            .run(&Value::Null, &[RuleBinding::new("Terse")], ValidationMode::FailFast)
            .await
            .unwrap();
        assert_eq!(report.errors()[0].message, "Terse: nope");
    }

    #[tokio::test]
    async fn faults_are_crashes_not_failures() {
        let err = pipeline()
            .run(&Value::Null, &[RuleBinding::new("Broken")], ValidationMode::CollectAll)
            .await
            .unwrap_err();
        assert!(err.is_rule_crash());
        assert!(err.to_string().contains("backing store unavailable"));
    }

    #[tokio::test]
    async fn panics_are_caught_as_crashes() {
        let err = pipeline()
            .run(&Value::Null, &[RuleBinding::new("Panicky")], ValidationMode::FailFast)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ValidatorError::RuleCrashed { ref rule, ref reason }
                if rule == "Panicky" && reason.contains("index out of range")
        ));
    }

    #[tokio::test]
    async fn panics_while_building_the_future_are_caught() {
        let err = pipeline()
            .run(&Value::Null, &[RuleBinding::new("EagerPanic")], ValidationMode::FailFast)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ValidatorError::RuleCrashed { ref rule, ref reason }
                if rule == "EagerPanic" && reason.contains("parameters not prepared")
        ));
    }

    #[tokio::test]
    async fn uninitialized_registry() {
        let pipeline = ValidationPipeline::new(Arc::new(RuleRegistry::new()));
        let err = pipeline
            .run(&Value::Null, &[is_boolean()], ValidationMode::FailFast)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidatorError::UninitializedRegistry));
    }
}
