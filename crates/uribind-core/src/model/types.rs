use crate::model::property::Property;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// PrimitiveKind
///
/// Closed scalar classification used by binding and type inference.
/// This is deliberately *smaller* than a full EDM type system and exists
/// only to support:
/// - aggregate result-type inference
/// - literal compatibility checks
/// - stream/structural discrimination during expand
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Date,
    DateTimeOffset,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    Stream,
    String,
    Untyped,
}

impl PrimitiveKind {
    /// True for kinds the aggregation pipeline treats as numeric.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Byte
                | Self::Decimal
                | Self::Double
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::SByte
                | Self::Single
        )
    }
}

///
/// TypeRef
///
/// Value type reference attached to properties and bound nodes.
/// `None` marks an unknown type: open/dynamic properties whose type could
/// not be inferred from any pipeline stage.
///

#[derive(Clone, Debug, PartialEq)]
pub enum TypeRef {
    Primitive { kind: PrimitiveKind, nullable: bool },
    /// Qualified name of a structured (entity or complex) type.
    Structured(String),
    Collection(Box<TypeRef>),
    None,
}

impl TypeRef {
    /// Non-nullable primitive reference.
    #[must_use]
    pub const fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive {
            kind,
            nullable: false,
        }
    }

    /// Nullable primitive reference.
    #[must_use]
    pub const fn nullable(kind: PrimitiveKind) -> Self {
        Self::Primitive {
            kind,
            nullable: true,
        }
    }

    #[must_use]
    pub fn structured(qualified: impl Into<String>) -> Self {
        Self::Structured(qualified.into())
    }

    #[must_use]
    pub fn collection_of(element: Self) -> Self {
        Self::Collection(Box::new(element))
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// Element type of a collection; non-collections are their own element.
    #[must_use]
    pub fn element_type(&self) -> &Self {
        match self {
            Self::Collection(inner) => inner.element_type(),
            other => other,
        }
    }

    #[must_use]
    pub const fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { kind, nullable } => {
                if *nullable {
                    write!(f, "{kind:?}?")
                } else {
                    write!(f, "{kind:?}")
                }
            }
            Self::Structured(name) => write!(f, "{name}"),
            Self::Collection(inner) => write!(f, "Collection({inner})"),
            Self::None => write!(f, "Unknown"),
        }
    }
}

///
/// StructuredKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StructuredKind {
    Entity,
    Complex,
}

///
/// StructuredType
///
/// Named entity or complex type declaration. Base types and navigation
/// targets are qualified-name references resolved through `Model`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct StructuredType {
    pub namespace: String,
    pub name: String,
    pub kind: StructuredKind,
    pub base: Option<String>,
    pub properties: Vec<Property>,
    /// Open types accept dynamic properties that have no declaration.
    pub is_open: bool,
}

impl StructuredType {
    #[must_use]
    pub fn entity(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, StructuredKind::Entity)
    }

    #[must_use]
    pub fn complex(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, StructuredKind::Complex)
    }

    fn new(namespace: impl Into<String>, name: impl Into<String>, kind: StructuredKind) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind,
            base: None,
            properties: Vec::new(),
            is_open: false,
        }
    }

    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub const fn open(mut self) -> Self {
        self.is_open = true;
        self
    }

    /// Namespace-qualified name, the form used in type-cast segments.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}
