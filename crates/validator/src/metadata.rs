//! Field metadata: which rules apply to which field of which type.
//!
//! Types declare their field rules once, either by calling
//! [`FieldMetadataStore::add_binding`] directly, by implementing [`Declare`],
//! or through the [`rules_for!`](crate::rules_for) macro that generates the
//! `Declare` impl.
//!
//! # Inheritance
//!
//! Rust has no subclassing, so a type opts in with
//! [`Declaration::extends`] (or [`FieldMetadataStore::set_parent`]). A child
//! then sees its parent's fields first, in the parent's order, and for every
//! field the parent's bindings run before its own.

use std::any::{TypeId, type_name};
use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Result, ValidatorError};
use crate::rule::RuleBinding;

/// A type whose field rules are declared in code.
///
/// Usually generated by [`rules_for!`](crate::rules_for).
///
/// # Examples
///
/// ```rust,ignore
/// use ruleguard_validator::prelude::*;
///
/// #[derive(serde::Serialize)]
/// struct Settings {
///     enabled: String,
/// }
///
/// impl Declare for Settings {
///     fn declare(decl: &mut Declaration<'_>) {
///         decl.field("enabled", [is_boolean()]);
///     }
/// }
/// ```
pub trait Declare: 'static {
    /// Records this type's field bindings.
    fn declare(decl: &mut Declaration<'_>);
}

#[derive(Debug, Clone)]
struct TargetEntry {
    type_name: &'static str,
    parent: Option<TypeId>,
    declared: bool,
    fields: IndexMap<String, Vec<RuleBinding>>,
}

impl TargetEntry {
    fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            parent: None,
            declared: false,
            fields: IndexMap::new(),
        }
    }
}

/// Per-type, per-field rule bindings.
///
/// Entries are additive: binding a field again appends to its list and never
/// replaces it. Reads never fail; a field without bindings simply has an
/// empty list and is always valid.
#[derive(Debug, Default)]
pub struct FieldMetadataStore {
    targets: RwLock<HashMap<TypeId, TargetEntry>>,
}

impl FieldMetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `binding` to `field` of `T`.
    pub fn add_binding<T: 'static>(&self, field: &str, binding: impl Into<RuleBinding>) {
        let binding = binding.into();
        debug!(target_type = type_name::<T>(), field, rule = binding.rule(), "field binding added");
        self.targets
            .write()
            .entry(TypeId::of::<T>())
            .or_insert_with(|| TargetEntry::new(type_name::<T>()))
            .fields
            .entry(field.to_owned())
            .or_default()
            .push(binding);
    }

    /// Declares `Parent` as the parent of `Child`.
    ///
    /// Setting the same parent again is a no-op. Fails with
    /// [`ValidatorError::ParentConflict`] if `Child` already has a different
    /// parent, and with [`ValidatorError::InheritanceCycle`] if `Parent`
    /// already (transitively) inherits from `Child`.
    pub fn set_parent<Child: 'static, Parent: 'static>(&self) -> Result<()> {
        self.link(
            (TypeId::of::<Child>(), type_name::<Child>()),
            (TypeId::of::<Parent>(), type_name::<Parent>()),
        )
    }

    /// Runs `T::declare` (and that of any parent it extends) exactly once.
    ///
    /// Later calls are no-ops, so registering from several call sites or
    /// threads never duplicates bindings. A type that (transitively) extends
    /// itself fails with [`ValidatorError::InheritanceCycle`] and nothing is
    /// recorded.
    pub fn register<T: Declare>(&self) -> Result<()> {
        self.register_along::<T>(&[])
    }

    /// `path` holds the types whose declarations are running further up
    /// this call chain.
    fn register_along<T: Declare>(&self, path: &[TypeId]) -> Result<()> {
        if self.is_declared::<T>() {
            return Ok(());
        }

        let mut path = path.to_vec();
        path.push(TypeId::of::<T>());
        let mut decl = Declaration {
            store: self,
            path,
            fields: IndexMap::new(),
            parent: None,
            error: None,
        };
        T::declare(&mut decl);
        let Declaration {
            fields,
            parent,
            error,
            ..
        } = decl;
        if let Some(err) = error {
            return Err(err);
        }

        if let Some(parent) = parent {
            self.link((TypeId::of::<T>(), type_name::<T>()), parent)?;
        }

        let mut targets = self.targets.write();
        let entry = targets
            .entry(TypeId::of::<T>())
            .or_insert_with(|| TargetEntry::new(type_name::<T>()));
        if entry.declared {
            // Lost a race with a concurrent register::<T>().
            return Ok(());
        }
        for (field, bindings) in fields {
            entry.fields.entry(field).or_default().extend(bindings);
        }
        entry.declared = true;
        debug!(
            target_type = entry.type_name,
            fields = entry.fields.len(),
            "target declared"
        );
        Ok(())
    }

    /// Returns `true` once [`register`](Self::register) has run for `T`.
    pub fn is_declared<T: 'static>(&self) -> bool {
        self.targets
            .read()
            .get(&TypeId::of::<T>())
            .is_some_and(|entry| entry.declared)
    }

    /// Bindings of `field` on `T`, parent bindings first.
    ///
    /// Empty when the field has no rules.
    pub fn bindings<T: 'static>(&self, field: &str) -> Vec<RuleBinding> {
        self.bindings_by_id(TypeId::of::<T>(), field)
    }

    /// Fields of `T` with at least one binding, in declaration order.
    ///
    /// Inherited fields come first, in the parent's order.
    pub fn fields<T: 'static>(&self) -> Vec<String> {
        self.fields_by_id(TypeId::of::<T>())
    }

    /// All `(field, bindings)` pairs of `T`, as [`fields`](Self::fields)
    /// and [`bindings`](Self::bindings) would report them.
    pub fn field_plan<T: 'static>(&self) -> Vec<(String, Vec<RuleBinding>)> {
        let id = TypeId::of::<T>();
        let targets = self.targets.read();
        let chain = chain(&targets, id);
        let mut plan: IndexMap<String, Vec<RuleBinding>> = IndexMap::new();
        for entry in chain {
            for (field, bindings) in &entry.fields {
                plan.entry(field.clone())
                    .or_default()
                    .extend(bindings.iter().cloned());
            }
        }
        plan.into_iter()
            .filter(|(_, bindings)| !bindings.is_empty())
            .collect()
    }

    fn bindings_by_id(&self, id: TypeId, field: &str) -> Vec<RuleBinding> {
        let targets = self.targets.read();
        let bindings = chain(&targets, id)
            .into_iter()
            .filter_map(|entry| entry.fields.get(field))
            .flatten()
            .cloned()
            .collect();
        bindings
    }

    fn fields_by_id(&self, id: TypeId) -> Vec<String> {
        let targets = self.targets.read();
        let mut fields: IndexSet<&str> = IndexSet::new();
        for entry in chain(&targets, id) {
            for (field, bindings) in &entry.fields {
                if !bindings.is_empty() {
                    fields.insert(field.as_str());
                }
            }
        }
        fields.into_iter().map(str::to_owned).collect()
    }

    fn link(
        &self,
        (child, child_name): (TypeId, &'static str),
        (parent, parent_name): (TypeId, &'static str),
    ) -> Result<()> {
        let mut targets = self.targets.write();

        match targets.get(&child).and_then(|entry| entry.parent) {
            Some(current) if current == parent => return Ok(()),
            Some(current) => {
                return Err(ValidatorError::ParentConflict {
                    type_name: child_name,
                    parent: targets
                        .get(&current)
                        .map_or("<unknown>", |entry| entry.type_name),
                });
            }
            None => {}
        }

        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(ValidatorError::InheritanceCycle {
                    type_name: child_name,
                });
            }
            cursor = targets.get(&id).and_then(|entry| entry.parent);
        }

        targets
            .entry(parent)
            .or_insert_with(|| TargetEntry::new(parent_name));
        targets
            .entry(child)
            .or_insert_with(|| TargetEntry::new(child_name))
            .parent = Some(parent);
        debug!(child = child_name, parent = parent_name, "target inheritance recorded");
        Ok(())
    }
}

/// Entries from the root-most ancestor down to `id` itself.
fn chain(targets: &HashMap<TypeId, TargetEntry>, id: TypeId) -> Vec<&TargetEntry> {
    let mut chain = Vec::new();
    let mut cursor = targets.get(&id);
    while let Some(entry) = cursor {
        chain.push(entry);
        cursor = entry.parent.and_then(|parent| targets.get(&parent));
    }
    chain.reverse();
    chain
}

// ============================================================================
// DECLARATION BUILDER
// ============================================================================

/// Collects a type's bindings while [`Declare::declare`] runs.
///
/// Nothing reaches the store until `declare` returns, so a type is either
/// fully declared or not at all.
pub struct Declaration<'a> {
    store: &'a FieldMetadataStore,
    path: Vec<TypeId>,
    fields: IndexMap<String, Vec<RuleBinding>>,
    parent: Option<(TypeId, &'static str)>,
    error: Option<ValidatorError>,
}

impl Declaration<'_> {
    /// Appends one binding to `field`.
    pub fn bind(&mut self, field: &str, binding: impl Into<RuleBinding>) -> &mut Self {
        self.fields
            .entry(field.to_owned())
            .or_default()
            .push(binding.into());
        self
    }

    /// Appends several bindings to `field`, in order.
    pub fn field<I>(&mut self, field: &str, bindings: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<RuleBinding>,
    {
        for binding in bindings {
            self.bind(field, binding);
        }
        self
    }

    /// Inherits the fields and bindings of `P`, registering `P` if needed.
    pub fn extends<P: Declare>(&mut self) -> &mut Self {
        let registered = if self.path.contains(&TypeId::of::<P>()) {
            Err(ValidatorError::InheritanceCycle {
                type_name: type_name::<P>(),
            })
        } else {
            self.store.register_along::<P>(&self.path)
        };
        if let Err(err) = registered {
            self.error.get_or_insert(err);
        }
        self.parent = Some((TypeId::of::<P>(), type_name::<P>()));
        self
    }
}

impl std::fmt::Debug for Declaration<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Declaration")
            .field("fields", &self.fields)
            .field("parent", &self.parent.map(|(_, name)| name))
            .finish_non_exhaustive()
    }
}
