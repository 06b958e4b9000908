//! Read-only entity metadata surface consumed by the binders.
//!
//! Model contract:
//! - the model is immutable once built; binders never mutate schema state.
//! - all cross-type references are qualified names resolved through `Model`,
//!   so self-referential navigations cannot form ownership cycles.
//! - `find_property` walks the base-type chain; shadowing is not allowed.

pub mod property;
pub mod source;
pub mod types;

pub use property::{Property, PropertyKind};
pub use source::NavigationSource;
pub use types::{PrimitiveKind, StructuredKind, StructuredType, TypeRef};

use std::{collections::BTreeMap, sync::Arc};

///
/// Model
///
/// Registry of structured types and navigation sources for one schema.
/// This is the *only* metadata surface the binders depend on.
///

#[derive(Clone, Debug, Default)]
pub struct Model {
    types: BTreeMap<String, Arc<StructuredType>>,
    sources: BTreeMap<String, Arc<NavigationSource>>,
}

impl Model {
    #[must_use]
    pub fn builder() -> ModelBuilder {
        ModelBuilder::default()
    }

    /// Resolve a qualified type name ("Ns.Type") to its declaration.
    #[must_use]
    pub fn resolve_type(&self, qualified: &str) -> Option<Arc<StructuredType>> {
        self.types.get(qualified).cloned()
    }

    /// Look up a navigation source (entity set or singleton) by name.
    #[must_use]
    pub fn source(&self, name: &str) -> Option<Arc<NavigationSource>> {
        self.sources.get(name).cloned()
    }

    /// Find a declared property, walking the base-type chain upward.
    #[must_use]
    pub fn find_property<'a>(
        &'a self,
        structured: &'a StructuredType,
        name: &str,
    ) -> Option<&'a Property> {
        let mut current = Some(structured);
        while let Some(ty) = current {
            if let Some(property) = ty.properties.iter().find(|p| p.name == name) {
                return Some(property);
            }
            current = ty
                .base
                .as_deref()
                .and_then(|base| self.types.get(base))
                .map(Arc::as_ref);
        }

        None
    }

    /// True when `candidate` is `base` or derives from it.
    ///
    /// Subtyping is reflexive and follows declared base chains only.
    #[must_use]
    pub fn is_subtype(&self, base: &str, candidate: &str) -> bool {
        let mut current = candidate.to_string();
        loop {
            if current == base {
                return true;
            }
            match self.types.get(&current).and_then(|ty| ty.base.clone()) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Element type of a collection reference, or the reference itself.
    #[must_use]
    pub fn element_type(&self, ty: &TypeRef) -> TypeRef {
        ty.element_type().clone()
    }

    /// Resolve the structured declaration behind a (possibly collection)
    /// type reference.
    #[must_use]
    pub fn structured_of(&self, ty: &TypeRef) -> Option<Arc<StructuredType>> {
        match ty.element_type() {
            TypeRef::Structured(name) => self.resolve_type(name),
            _ => None,
        }
    }
}

///
/// ModelBuilder
///
/// Incremental construction for models; used by hosts loading schemas and
/// by test fixtures. Name collisions are last-write-wins by design so
/// fixtures can patch a base schema.
///

#[derive(Debug, Default)]
pub struct ModelBuilder {
    types: BTreeMap<String, Arc<StructuredType>>,
    sources: BTreeMap<String, Arc<NavigationSource>>,
}

impl ModelBuilder {
    #[must_use]
    pub fn structured_type(mut self, ty: StructuredType) -> Self {
        self.types.insert(ty.qualified_name(), Arc::new(ty));
        self
    }

    #[must_use]
    pub fn navigation_source(mut self, source: NavigationSource) -> Self {
        self.sources.insert(source.name.clone(), Arc::new(source));
        self
    }

    #[must_use]
    pub fn build(self) -> Model {
        Model {
            types: self.types,
            sources: self.sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model {
        Model::builder()
            .structured_type(StructuredType::entity("Ns", "Base").with_property(
                Property::structural("Id", TypeRef::primitive(PrimitiveKind::Int32)),
            ))
            .structured_type(
                StructuredType::entity("Ns", "Derived")
                    .with_base("Ns.Base")
                    .with_property(Property::structural(
                        "Extra",
                        TypeRef::primitive(PrimitiveKind::String),
                    )),
            )
            .build()
    }

    #[test]
    fn find_property_walks_base_chain() {
        let model = model();
        let derived = model.resolve_type("Ns.Derived").expect("declared type");

        assert!(model.find_property(&derived, "Extra").is_some());
        assert!(model.find_property(&derived, "Id").is_some());
        assert!(model.find_property(&derived, "Missing").is_none());
    }

    #[test]
    fn subtyping_is_reflexive_and_follows_bases() {
        let model = model();

        assert!(model.is_subtype("Ns.Base", "Ns.Base"));
        assert!(model.is_subtype("Ns.Base", "Ns.Derived"));
        assert!(!model.is_subtype("Ns.Derived", "Ns.Base"));
        assert!(!model.is_subtype("Ns.Base", "Ns.Unknown"));
    }
}
