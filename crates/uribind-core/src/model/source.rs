use crate::model::Model;
use std::{collections::BTreeMap, sync::Arc};

///
/// NavigationSource
///
/// Entity set or singleton: a named collection of entities plus the
/// binding table that says where each navigation property's targets live.
/// Binding keys are slash-joined navigation paths as written in metadata.
///

#[derive(Clone, Debug, PartialEq)]
pub struct NavigationSource {
    pub name: String,
    /// Qualified name of the element entity type.
    pub element_type: String,
    bindings: BTreeMap<String, String>,
}

impl NavigationSource {
    #[must_use]
    pub fn new(name: impl Into<String>, element_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            element_type: element_type.into(),
            bindings: BTreeMap::new(),
        }
    }

    /// Bind a navigation path to a target source name.
    #[must_use]
    pub fn with_binding(mut self, path: impl Into<String>, target: impl Into<String>) -> Self {
        self.bindings.insert(path.into(), target.into());
        self
    }

    /// Resolve the navigation target for a bound path.
    ///
    /// Absent bindings are not an error: an expansion item may legally have
    /// no resolved target source.
    #[must_use]
    pub fn navigation_target(&self, model: &Model, path: &str) -> Option<Arc<NavigationSource>> {
        self.bindings
            .get(path)
            .and_then(|target| model.source(target))
    }
}
