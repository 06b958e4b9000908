use crate::{
    model::{NavigationSource, TypeRef},
    settings::BindSettings,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

///
/// RangeVariable
///
/// A named binding for "the current item" while evaluating an expression
/// over a collection.
///

#[derive(Clone, Debug, PartialEq)]
pub struct RangeVariable {
    pub name: String,
    pub type_ref: TypeRef,
    pub source: Option<Arc<NavigationSource>>,
}

impl RangeVariable {
    /// The implicit `$it` variable for a collection of `type_ref` elements.
    #[must_use]
    pub fn implicit(type_ref: TypeRef, source: Option<Arc<NavigationSource>>) -> Self {
        Self {
            name: "$it".to_string(),
            type_ref,
            source,
        }
    }
}

///
/// BindingContext
///
/// Per-bind mutable state threaded through the binder recursion.
///
/// Scoping contract:
/// - one context per top-level bind;
/// - `nested` builds a new independent value for filter/order-by/search
///   clauses inside an expand item. Sibling items never share a context,
///   so their binds are order-independent.
///

#[derive(Debug)]
pub struct BindingContext<'a> {
    settings: &'a BindSettings,
    implicit: RangeVariable,
    range_variables: Vec<RangeVariable>,
    /// Aliases produced by prior pipeline stages, with inferred types.
    /// `TypeRef::None` records an alias whose type could not be inferred,
    /// so lookups can distinguish "unknown type" from "unknown alias".
    aggregated_aliases: BTreeMap<String, TypeRef>,
    collapsed: bool,
}

impl<'a> BindingContext<'a> {
    #[must_use]
    pub const fn new(settings: &'a BindSettings, implicit: RangeVariable) -> Self {
        Self {
            settings,
            implicit,
            range_variables: Vec::new(),
            aggregated_aliases: BTreeMap::new(),
            collapsed: false,
        }
    }

    /// New independent context scoped to a narrower navigation target.
    ///
    /// The child starts with fresh alias state: pipeline aliases do not
    /// leak into nested expand scopes.
    #[must_use]
    pub const fn nested(&self, implicit: RangeVariable) -> BindingContext<'a> {
        BindingContext::new(self.settings, implicit)
    }

    #[must_use]
    pub const fn settings(&self) -> &'a BindSettings {
        self.settings
    }

    /// Innermost in-scope range variable.
    #[must_use]
    pub fn current_variable(&self) -> &RangeVariable {
        self.range_variables.last().unwrap_or(&self.implicit)
    }

    pub fn push_range_variable(&mut self, variable: RangeVariable) {
        self.range_variables.push(variable);
    }

    pub fn pop_range_variable(&mut self) -> Option<RangeVariable> {
        self.range_variables.pop()
    }

    /// Inferred type for an alias produced by a prior pipeline stage.
    #[must_use]
    pub fn aggregated_alias(&self, name: &str) -> Option<&TypeRef> {
        self.aggregated_aliases.get(name)
    }

    /// Full alias-to-type table produced by the pipeline so far.
    #[must_use]
    pub const fn aggregated_aliases(&self) -> &BTreeMap<String, TypeRef> {
        &self.aggregated_aliases
    }

    #[must_use]
    pub fn aggregated_names(&self) -> BTreeSet<String> {
        self.aggregated_aliases.keys().cloned().collect()
    }

    /// Replace the produced-alias set with one stage's output.
    pub fn set_aggregated_aliases(&mut self, aliases: BTreeMap<String, TypeRef>) {
        self.aggregated_aliases = aliases;
    }

    /// Union additional aliases into the produced set.
    pub fn extend_aggregated_aliases(&mut self, aliases: BTreeMap<String, TypeRef>) {
        self.aggregated_aliases.extend(aliases);
    }

    /// Mark the query as no longer a pass-through of raw entity rows.
    pub fn mark_collapsed(&mut self) {
        self.collapsed = true;
    }

    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.collapsed
    }
}
