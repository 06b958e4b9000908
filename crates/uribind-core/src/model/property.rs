use crate::model::types::{PrimitiveKind, TypeRef};

///
/// PropertyKind
///
/// Discriminates the three property shapes the binders care about.
/// Navigation targets live in the property's `TypeRef`; the kind only
/// records traversability.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PropertyKind {
    Structural,
    Stream,
    Navigation,
}

///
/// Property
///
/// One declared property on a structured type.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub name: String,
    pub ty: TypeRef,
    pub kind: PropertyKind,
}

impl Property {
    #[must_use]
    pub fn structural(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: PropertyKind::Structural,
        }
    }

    #[must_use]
    pub fn stream(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeRef::primitive(PrimitiveKind::Stream),
            kind: PropertyKind::Stream,
        }
    }

    /// Single-valued navigation to `target` (a qualified entity type name).
    #[must_use]
    pub fn navigation(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeRef::structured(target),
            kind: PropertyKind::Navigation,
        }
    }

    /// Collection-valued navigation to `target`.
    #[must_use]
    pub fn collection_navigation(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeRef::collection_of(TypeRef::structured(target)),
            kind: PropertyKind::Navigation,
        }
    }

    #[must_use]
    pub const fn is_navigation(&self) -> bool {
        matches!(self.kind, PropertyKind::Navigation)
    }

    #[must_use]
    pub const fn is_stream(&self) -> bool {
        matches!(self.kind, PropertyKind::Stream)
    }

    /// Qualified name of the navigated-to entity type, if any.
    #[must_use]
    pub fn navigation_target(&self) -> Option<&str> {
        if !self.is_navigation() {
            return None;
        }
        match self.ty.element_type() {
            TypeRef::Structured(name) => Some(name),
            _ => None,
        }
    }
}
