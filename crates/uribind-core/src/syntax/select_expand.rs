use crate::syntax::{expr::ExprToken, path::PathSegmentToken};

///
/// SelectToken
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SelectToken {
    pub terms: Vec<SelectTermToken>,
}

impl SelectToken {
    #[must_use]
    pub const fn new(terms: Vec<SelectTermToken>) -> Self {
        Self { terms }
    }
}

///
/// SelectTermToken
///
/// One comma-separated `$select` path, possibly ending in a wildcard or
/// prefixed by type-cast segments.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectTermToken {
    pub path: Vec<PathSegmentToken>,
}

impl SelectTermToken {
    #[must_use]
    pub const fn new(path: Vec<PathSegmentToken>) -> Self {
        Self { path }
    }

    /// Plain single-identifier term.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            path: vec![PathSegmentToken::identifier(name)],
        }
    }

    #[must_use]
    pub fn wildcard() -> Self {
        Self {
            path: vec![PathSegmentToken::Wildcard],
        }
    }
}

///
/// OrderByDirection
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OrderByDirection {
    #[default]
    Asc,
    Desc,
}

///
/// LevelsToken
///
/// Raw `$levels` directive. Negative depths mean "unbounded/max".
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LevelsToken {
    Max,
    Depth(i64),
}

///
/// ExpandToken
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpandToken {
    pub terms: Vec<ExpandTermToken>,
}

impl ExpandToken {
    #[must_use]
    pub const fn new(terms: Vec<ExpandTermToken>) -> Self {
        Self { terms }
    }
}

///
/// ExpandTermToken
///
/// One `$expand` term: the navigation path plus every nested query option
/// written inside its parentheses.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ExpandTermToken {
    pub path: Vec<PathSegmentToken>,
    pub select: Option<SelectToken>,
    pub expand: Option<ExpandToken>,
    pub filter: Option<ExprToken>,
    pub order_by: Vec<(ExprToken, OrderByDirection)>,
    pub search: Option<ExprToken>,
    pub top: Option<i64>,
    pub skip: Option<i64>,
    pub count: Option<bool>,
    pub levels: Option<LevelsToken>,
}

impl ExpandTermToken {
    /// Bare term expanding a single navigation property.
    #[must_use]
    pub fn navigation(name: impl Into<String>) -> Self {
        Self::with_path(vec![PathSegmentToken::identifier(name)])
    }

    #[must_use]
    pub const fn with_path(path: Vec<PathSegmentToken>) -> Self {
        Self {
            path,
            select: None,
            expand: None,
            filter: None,
            order_by: Vec::new(),
            search: None,
            top: None,
            skip: None,
            count: None,
            levels: None,
        }
    }
}
