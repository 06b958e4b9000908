use crate::{
    model::NavigationSource,
    semantic::{expression::ValueNode, path::ResolvedPath},
    syntax::OrderByDirection,
};
use std::{fmt::Write as _, sync::Arc};

///
/// SelectItem
///

#[derive(Clone, Debug, PartialEq)]
pub enum SelectItem {
    Path(ResolvedPath),
    Wildcard,
}

///
/// Selection
///
/// What a clause selects at its own level.
///
/// `All` still carries an item list: the modern expand strategy records a
/// path-selection item per expansion there, so expansions are never
/// silently dropped even though everything is selected.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    /// Expanded but not yet selected by any ancestor.
    Unresolved,
    /// Every structural property is selected.
    All(Vec<SelectItem>),
    /// Nothing is selected beyond the listed expansions.
    ExpansionsOnly,
    /// An explicit property subset.
    Partial(Vec<SelectItem>),
}

impl Selection {
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All(_))
    }

    /// Explicitly listed selection items, if this kind carries any.
    #[must_use]
    pub fn items(&self) -> &[SelectItem] {
        match self {
            Self::All(items) | Self::Partial(items) => items,
            Self::Unresolved | Self::ExpansionsOnly => &[],
        }
    }
}

///
/// LevelsClause
///
/// Recursion-depth directive for self-referential expansions.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LevelsClause {
    pub level: i64,
    pub is_max: bool,
}

impl LevelsClause {
    #[must_use]
    pub const fn max() -> Self {
        Self {
            level: 0,
            is_max: true,
        }
    }

    #[must_use]
    pub const fn depth(level: i64) -> Self {
        Self {
            level,
            is_max: false,
        }
    }
}

///
/// OrderByItem
///

#[derive(Clone, Debug, PartialEq)]
pub struct OrderByItem {
    pub expr: ValueNode,
    pub direction: OrderByDirection,
}

///
/// ExpandedNavigationItem
///
/// One bound expansion: the resolved navigation path, its target source
/// (when the binding table resolves one), bound nested query options, and
/// the nested clause for the navigated-to type.
///
/// Invariant: `nested` is always present; an item with no explicit nested
/// select/expand defaults to "all properties, no sub-expansions".
///

#[derive(Clone, Debug, PartialEq)]
pub struct ExpandedNavigationItem {
    pub path: ResolvedPath,
    pub target: Option<Arc<NavigationSource>>,
    pub filter: Option<ValueNode>,
    pub order_by: Vec<OrderByItem>,
    pub search: Option<ValueNode>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub count: Option<bool>,
    pub levels: Option<LevelsClause>,
    pub nested: SelectExpandClause,
}

impl ExpandedNavigationItem {
    /// Bare item with default nested selection.
    #[must_use]
    pub fn new(path: ResolvedPath) -> Self {
        Self {
            path,
            target: None,
            filter: None,
            order_by: Vec::new(),
            search: None,
            top: None,
            skip: None,
            count: None,
            levels: None,
            nested: SelectExpandClause::all_selected(),
        }
    }
}

///
/// SelectExpandClause
///
/// Bound selection and expansion for one level of the query tree.
///

#[derive(Clone, Debug, PartialEq)]
pub struct SelectExpandClause {
    pub selection: Selection,
    pub expansion: Vec<ExpandedNavigationItem>,
}

impl SelectExpandClause {
    /// "All properties, no sub-expansions."
    #[must_use]
    pub const fn all_selected() -> Self {
        Self {
            selection: Selection::All(Vec::new()),
            expansion: Vec::new(),
        }
    }

    #[must_use]
    pub const fn unresolved() -> Self {
        Self {
            selection: Selection::Unresolved,
            expansion: Vec::new(),
        }
    }

    /// Comma-joined, parenthesis-nested projection summary for response
    /// metadata (context URLs). Deterministic for equal clauses.
    #[must_use]
    pub fn projection_string(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        match &self.selection {
            Selection::All(_) => parts.push("*".to_string()),
            Selection::Partial(items) => {
                for item in items {
                    match item {
                        SelectItem::Path(path) => parts.push(path.to_string()),
                        SelectItem::Wildcard => parts.push("*".to_string()),
                    }
                }
            }
            Selection::Unresolved | Selection::ExpansionsOnly => {}
        }

        for item in &self.expansion {
            let mut part = item.path.to_string();
            let _ = write!(part, "({})", item.nested.projection_string());
            parts.push(part);
        }

        parts.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Property;
    use crate::semantic::path::ResolvedSegment;

    fn nav_path(name: &str, target: &str) -> ResolvedPath {
        ResolvedPath::new(vec![ResolvedSegment::Property(
            Property::collection_navigation(name, target),
        )])
    }

    #[test]
    fn new_item_defaults_to_all_selected_nested_clause() {
        let item = ExpandedNavigationItem::new(nav_path("Orders", "Test.Order"));
        assert!(item.nested.selection.is_all());
        assert!(item.nested.expansion.is_empty());
    }

    #[test]
    fn projection_string_nests_expansions() {
        let mut clause = SelectExpandClause::all_selected();
        let mut item = ExpandedNavigationItem::new(nav_path("Orders", "Test.Order"));
        item.nested = SelectExpandClause {
            selection: Selection::Partial(vec![SelectItem::Path(ResolvedPath::new(vec![
                ResolvedSegment::Open("Amount".to_string()),
            ]))]),
            expansion: Vec::new(),
        };
        clause.expansion.push(item);

        assert_eq!(clause.projection_string(), "*,Orders(Amount)");
    }

    #[test]
    fn unresolved_clause_projects_nothing() {
        assert_eq!(SelectExpandClause::unresolved().projection_string(), "");
    }
}
