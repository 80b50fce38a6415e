//! Rule registry
//!
//! Maps rule names to implementations. Lookups are exact and
//! case-sensitive; there is no aliasing or fuzzy matching.
//!
//! The registry has an explicit lifecycle: it must be bootstrapped (which
//! registers the built-in rules) before anything can be resolved from it.
//! Custom rules may be registered before or after bootstrap.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{Result, ValidatorError};
use crate::rule::Rule;
use crate::rules::builtin_rules;

/// Registry of rules keyed by name.
///
/// Written during setup, read on every validation. Rules are stored as
/// `Arc<dyn Rule>` so concurrent validations share them without copying.
///
/// # Duplicate policy
///
/// Registering the *same* `Arc` twice under its name is a no-op, so
/// re-running setup code is harmless. Registering a *different*
/// implementation under a taken name fails with
/// [`ValidatorError::DuplicateRule`].
///
/// # Examples
///
/// ```rust,ignore
/// use ruleguard_validator::RuleRegistry;
///
/// let registry = RuleRegistry::new();
/// registry.bootstrap()?;
///
/// let rule = registry.resolve("Boolean")?;
/// assert_eq!(rule.name(), "Boolean");
/// assert!(registry.resolve("boolean").is_err()); // case-sensitive
/// ```
#[derive(Default)]
pub struct RuleRegistry {
    rules: RwLock<HashMap<String, Arc<dyn Rule>>>,
    bootstrapped: AtomicBool,
}

impl RuleRegistry {
    /// Create an empty, un-bootstrapped registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the built-in rules. Idempotent and safe to call concurrently.
    ///
    /// Fails with [`ValidatorError::DuplicateRule`] if a custom rule already
    /// occupies a built-in name; in that case nothing is registered and the
    /// registry stays un-bootstrapped.
    pub fn bootstrap(&self) -> Result<()> {
        if self.is_bootstrapped() {
            return Ok(());
        }

        let mut rules = self.rules.write();
        // Another caller may have finished while we waited for the lock.
        if self.is_bootstrapped() {
            return Ok(());
        }

        let builtins = builtin_rules();
        if let Some(taken) = builtins.iter().find(|rule| rules.contains_key(rule.name())) {
            warn!(rule = taken.name(), "built-in rule name already taken");
            return Err(ValidatorError::duplicate_rule(taken.name()));
        }
        for rule in builtins {
            rules.insert(rule.name().to_owned(), rule);
        }

        self.bootstrapped.store(true, Ordering::Release);
        debug!(count = rules.len(), "rule registry bootstrapped");
        Ok(())
    }

    /// Returns `true` once [`bootstrap`](Self::bootstrap) has succeeded.
    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped.load(Ordering::Acquire)
    }

    /// Registers a rule under [`Rule::name`].
    pub fn register(&self, rule: Arc<dyn Rule>) -> Result<()> {
        let name = rule.name().to_owned();
        match self.rules.write().entry(name) {
            Entry::Occupied(existing) if Arc::ptr_eq(existing.get(), &rule) => {
                debug!(rule = existing.key().as_str(), "rule re-registered, ignoring");
                Ok(())
            }
            Entry::Occupied(existing) => {
                warn!(rule = existing.key().as_str(), "rejected duplicate rule registration");
                Err(ValidatorError::duplicate_rule(existing.key().clone()))
            }
            Entry::Vacant(slot) => {
                debug!(rule = slot.key().as_str(), "rule registered");
                slot.insert(rule);
                Ok(())
            }
        }
    }

    /// Wraps `rule` in an `Arc` and registers it.
    pub fn register_rule<R: Rule + 'static>(&self, rule: R) -> Result<()> {
        self.register(Arc::new(rule))
    }

    /// Looks up a rule by exact name.
    ///
    /// Every call for the same name returns the same `Arc`.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Rule>> {
        if !self.is_bootstrapped() {
            return Err(ValidatorError::UninitializedRegistry);
        }
        self.rules
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ValidatorError::unknown_rule(name))
    }

    /// Check whether a rule with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.read().contains_key(name)
    }

    /// Registered rule names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rules.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// Returns `true` if no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("count", &self.len())
            .field("bootstrapped", &self.is_bootstrapped())
            .field("names", &self.names())
            .finish()
    }
}
