///
/// PathSegmentToken
///
/// One segment of a raw `$select`/`$expand` path.
/// Type casts carry the namespace-qualified type name as written.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathSegmentToken {
    Identifier(String),
    TypeCast(String),
    Wildcard,
}

impl PathSegmentToken {
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    #[must_use]
    pub fn type_cast(qualified: impl Into<String>) -> Self {
        Self::TypeCast(qualified.into())
    }

    #[must_use]
    pub const fn is_type_cast(&self) -> bool {
        matches!(self, Self::TypeCast(_))
    }
}
