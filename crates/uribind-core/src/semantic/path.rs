use crate::model::Property;
use std::fmt;

///
/// ResolvedSegment
///
/// One metadata-resolved segment of a select/expand path.
/// Open segments carry only their name; the declaring type was open and
/// no declaration exists.
///

#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedSegment {
    /// Type-cast segment, carrying the qualified target type name.
    TypeCast(String),
    Property(Property),
    Open(String),
}

impl ResolvedSegment {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::TypeCast(qualified) => qualified,
            Self::Property(property) => &property.name,
            Self::Open(name) => name,
        }
    }
}

///
/// ResolvedPath
///
/// Ordered resolved segments; displayed slash-joined, the form used for
/// merge keys and context-URL fragments.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedPath {
    pub segments: Vec<ResolvedSegment>,
}

impl ResolvedPath {
    #[must_use]
    pub const fn new(segments: Vec<ResolvedSegment>) -> Self {
        Self { segments }
    }

    #[must_use]
    pub fn single(property: Property) -> Self {
        Self {
            segments: vec![ResolvedSegment::Property(property)],
        }
    }

    /// Last resolved property in the path, skipping casts.
    #[must_use]
    pub fn last_property(&self) -> Option<&Property> {
        self.segments.iter().rev().find_map(|segment| match segment {
            ResolvedSegment::Property(property) => Some(property),
            _ => None,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, "/")?;
            }
            write!(f, "{}", segment.name())?;
            first = false;
        }

        Ok(())
    }
}
