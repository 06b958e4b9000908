use crate::model::{PrimitiveKind, TypeRef};
use serde::{Deserialize, Serialize};

///
/// Value
///
/// Literal scalar carried by expression tokens.
///
/// Decimal literals keep their source text: the binder never does decimal
/// arithmetic, and round-tripping through a float would lose precision.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(String),
    Text(String),
    Null,
}

impl Value {
    /// Declared type of the literal as the binder sees it.
    ///
    /// Integer literals widen to Int64; the aggregate type-inference rules
    /// operate on declared property types, not literal types, so the exact
    /// integer width of a literal is never observable downstream.
    #[must_use]
    pub const fn type_ref(&self) -> TypeRef {
        match self {
            Self::Bool(_) => TypeRef::primitive(PrimitiveKind::Boolean),
            Self::Int(_) => TypeRef::primitive(PrimitiveKind::Int64),
            Self::Float(_) => TypeRef::primitive(PrimitiveKind::Double),
            Self::Decimal(_) => TypeRef::primitive(PrimitiveKind::Decimal),
            Self::Text(_) => TypeRef::primitive(PrimitiveKind::String),
            Self::Null => TypeRef::None,
        }
    }
}
