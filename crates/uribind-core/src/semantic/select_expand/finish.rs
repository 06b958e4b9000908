use crate::semantic::select_expand::clause::{SelectExpandClause, Selection};

/// Remove vestigial levels from a bound clause tree.
///
/// The legacy strategy leaves behind levels that select nothing and expand
/// nothing useful; this pass deletes them bottom-up. Rules, in order:
/// - an unresolved level was never selected by any ancestor and is removed;
/// - an all-selected level is kept as-is, children included;
/// - otherwise children are pruned post-order, dead items are dropped, and
///   an expansions-only level whose expansion list ends up empty is removed.
///
/// `None` means the whole clause was vestigial. The pass is idempotent and
/// never reorders surviving expansion items.
#[must_use]
pub fn prune(clause: &SelectExpandClause) -> Option<SelectExpandClause> {
    match &clause.selection {
        Selection::Unresolved => None,
        Selection::All(_) => Some(clause.clone()),
        Selection::ExpansionsOnly | Selection::Partial(_) => {
            let mut expansion = Vec::with_capacity(clause.expansion.len());
            for item in &clause.expansion {
                let Some(nested) = prune(&item.nested) else {
                    continue;
                };
                // Untouched subtrees are carried over whole, so a second
                // pass sees the exact same tree.
                if nested == item.nested {
                    expansion.push(item.clone());
                } else {
                    let mut kept = item.clone();
                    kept.nested = nested;
                    expansion.push(kept);
                }
            }

            if expansion.is_empty() && matches!(clause.selection, Selection::ExpansionsOnly) {
                return None;
            }

            Some(SelectExpandClause {
                selection: clause.selection.clone(),
                expansion,
            })
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::Property,
        semantic::{
            path::{ResolvedPath, ResolvedSegment},
            select_expand::clause::{ExpandedNavigationItem, SelectItem},
        },
    };

    fn item(name: &str, target: &str, nested: SelectExpandClause) -> ExpandedNavigationItem {
        let path = ResolvedPath::new(vec![ResolvedSegment::Property(
            Property::collection_navigation(name, target),
        )]);
        let mut item = ExpandedNavigationItem::new(path);
        item.nested = nested;
        item
    }

    fn expansions_only(expansion: Vec<ExpandedNavigationItem>) -> SelectExpandClause {
        SelectExpandClause {
            selection: Selection::ExpansionsOnly,
            expansion,
        }
    }

    #[test]
    fn unresolved_clause_is_removed() {
        assert_eq!(prune(&SelectExpandClause::unresolved()), None);
    }

    #[test]
    fn all_selected_clause_is_kept_verbatim() {
        let clause = SelectExpandClause {
            selection: Selection::All(Vec::new()),
            expansion: vec![item(
                "Orders",
                "Test.Order",
                SelectExpandClause::unresolved(),
            )],
        };

        // All-selected short-circuits; even dead children survive under it.
        assert_eq!(prune(&clause), Some(clause.clone()));
    }

    #[test]
    fn empty_expansions_only_tree_collapses_entirely() {
        let clause = expansions_only(vec![item(
            "Orders",
            "Test.Order",
            expansions_only(Vec::new()),
        )]);

        assert_eq!(prune(&clause), None);
    }

    #[test]
    fn live_grandchild_keeps_the_chain_alive() {
        let grandchild = item("Products", "Test.Product", SelectExpandClause::all_selected());
        let child = item("Orders", "Test.Order", expansions_only(vec![grandchild]));
        let clause = expansions_only(vec![child]);

        let pruned = prune(&clause).expect("chain survives");
        assert_eq!(pruned.expansion.len(), 1);
        assert_eq!(pruned.expansion[0].nested.expansion.len(), 1);
    }

    #[test]
    fn dead_sibling_is_dropped_without_reordering() {
        let dead = item("Orders", "Test.Order", SelectExpandClause::unresolved());
        let live = item("BestFriend", "Test.Customer", SelectExpandClause::all_selected());
        let clause = expansions_only(vec![dead, live]);

        let pruned = prune(&clause).expect("live sibling survives");
        assert_eq!(pruned.expansion.len(), 1);
        assert_eq!(pruned.expansion[0].path.to_string(), "BestFriend");
    }

    #[test]
    fn partial_selection_survives_losing_all_expansions() {
        let clause = SelectExpandClause {
            selection: Selection::Partial(vec![SelectItem::Wildcard]),
            expansion: vec![item(
                "Orders",
                "Test.Order",
                SelectExpandClause::unresolved(),
            )],
        };

        let pruned = prune(&clause).expect("explicit selection is kept");
        assert!(pruned.expansion.is_empty());
        assert_eq!(pruned.selection, clause.selection);
    }

    #[test]
    fn prune_is_idempotent() {
        let grandchild = item("Products", "Test.Product", SelectExpandClause::all_selected());
        let child = item("Orders", "Test.Order", expansions_only(vec![grandchild]));
        let dead = item("BestFriend", "Test.Customer", expansions_only(Vec::new()));
        let clause = expansions_only(vec![child, dead]);

        let once = prune(&clause).expect("tree survives");
        let twice = prune(&once).expect("pruned tree survives");
        assert_eq!(once, twice);
    }
}
