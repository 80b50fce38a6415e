//! The `Validator` facade.
//!
//! A `Validator` is an explicitly constructed context: it owns (or shares)
//! a [`RuleRegistry`] and a [`FieldMetadataStore`] and wires them into a
//! pipeline. Tests build their own; applications that want ambient state use
//! [`Validator::global`] or the crate-level free functions.

use std::sync::{Arc, LazyLock};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{ValidationMode, ValidatorConfig};
use crate::error::Result;
use crate::metadata::{Declare, FieldMetadataStore};
use crate::pipeline::ValidationPipeline;
use crate::registry::RuleRegistry;
use crate::result::{TargetReport, ValidationResult, ValueReport};
use crate::rule::{Rule, RuleBinding};
use crate::target::TargetValidator;
use crate::value::Value;

static GLOBAL: LazyLock<Validator> = LazyLock::new(|| {
    let validator = Validator::new(ValidatorConfig::from_env());
    if let Err(err) = validator.ensure_rules_registered() {
        warn!(error = %err, "global rule registry failed to bootstrap");
    }
    validator
});

/// Entry point for validating values and targets.
///
/// # Examples
///
/// ```rust,ignore
/// use ruleguard_validator::prelude::*;
///
/// let validator = Validator::new(ValidatorConfig::default());
/// validator.ensure_rules_registered()?;
///
/// let result = validator.validate(1, ["Boolean"]).await?;
/// assert!(result.is_success());
///
/// let result = validator.validate("maybe", ["Boolean"]).await?;
/// assert!(result.error().unwrap().message.contains("Boolean"));
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Arc<RuleRegistry>,
    store: Arc<FieldMetadataStore>,
    config: ValidatorConfig,
    pipeline: ValidationPipeline,
    targets: TargetValidator,
}

impl Validator {
    /// Create a validator with its own, un-bootstrapped registry and an
    /// empty metadata store.
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_parts(
            Arc::new(RuleRegistry::new()),
            Arc::new(FieldMetadataStore::new()),
            config,
        )
    }

    /// Create a validator over an existing registry and store.
    pub fn with_parts(
        registry: Arc<RuleRegistry>,
        store: Arc<FieldMetadataStore>,
        config: ValidatorConfig,
    ) -> Self {
        let pipeline =
            ValidationPipeline::new(Arc::clone(&registry)).with_catch_panics(config.catch_panics);
        let targets = TargetValidator::new(Arc::clone(&store), pipeline.clone())
            .with_concurrent_fields(config.concurrent_fields);
        debug!(mode = %config.mode, "validator created");
        Self {
            registry,
            store,
            config,
            pipeline,
            targets,
        }
    }

    /// The process-wide validator.
    ///
    /// Configured from the environment (see [`ValidatorConfig::from_env`])
    /// and bootstrapped on first access.
    pub fn global() -> &'static Validator {
        &GLOBAL
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<FieldMetadataStore> {
        &self.store
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Registers the built-in rules. Idempotent and safe to call
    /// concurrently; must happen before the first validation.
    pub fn ensure_rules_registered(&self) -> Result<()> {
        self.registry.bootstrap()
    }

    /// Registers a custom rule.
    pub fn register_rule<R: Rule + 'static>(&self, rule: R) -> Result<()> {
        self.registry.register_rule(rule)
    }

    /// Records the field bindings `T` declares. Runs once per type.
    pub fn register_target<T: Declare>(&self) -> Result<()> {
        self.store.register::<T>()
    }

    /// Validates a single value fail-fast, reporting the first failing rule.
    ///
    /// Rules after the first failure never run, whatever the configured mode.
    pub async fn validate<V, I>(&self, value: V, rules: I) -> Result<ValidationResult>
    where
        V: Into<Value>,
        I: IntoIterator,
        I::Item: Into<RuleBinding>,
    {
        self.validate_with(value, rules, ValidationMode::FailFast)
            .await
            .map(ValidationResult::from)
    }

    /// Validates a single value in the configured [`ValidatorConfig::mode`].
    pub async fn validate_report<V, I>(&self, value: V, rules: I) -> Result<ValueReport>
    where
        V: Into<Value>,
        I: IntoIterator,
        I::Item: Into<RuleBinding>,
    {
        self.validate_with(value, rules, self.config.mode).await
    }

    /// Validates a single value against every rule, reporting all failures.
    pub async fn validate_all<V, I>(&self, value: V, rules: I) -> Result<ValueReport>
    where
        V: Into<Value>,
        I: IntoIterator,
        I::Item: Into<RuleBinding>,
    {
        self.validate_with(value, rules, ValidationMode::CollectAll)
            .await
    }

    /// Validates a single value in an explicit mode.
    pub async fn validate_with<V, I>(
        &self,
        value: V,
        rules: I,
        mode: ValidationMode,
    ) -> Result<ValueReport>
    where
        V: Into<Value>,
        I: IntoIterator,
        I::Item: Into<RuleBinding>,
    {
        let value = value.into();
        let bindings: Vec<RuleBinding> = rules.into_iter().map(Into::into).collect();
        self.pipeline.run(&value, &bindings, mode).await
    }

    /// Validates every declared field of `data`.
    ///
    /// Uses whatever bindings are recorded for `T`; a type that was never
    /// declared has none and always passes.
    pub async fn validate_target<T: Serialize + 'static>(&self, data: &T) -> Result<TargetReport> {
        self.targets.validate(data).await
    }

    /// [`register_target`](Self::register_target) followed by
    /// [`validate_target`](Self::validate_target).
    pub async fn validate_declared<T: Declare + Serialize>(&self, data: &T) -> Result<TargetReport> {
        self.register_target::<T>()?;
        self.validate_target(data).await
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}
