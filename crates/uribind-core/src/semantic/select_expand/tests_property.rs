use crate::{
    model::Property,
    semantic::{
        path::{ResolvedPath, ResolvedSegment},
        select_expand::{
            clause::{ExpandedNavigationItem, SelectExpandClause, SelectItem, Selection},
            finish::prune,
        },
    },
};
use proptest::prelude::*;

fn leaf_clause() -> impl Strategy<Value = SelectExpandClause> {
    prop_oneof![
        Just(SelectExpandClause::unresolved()),
        Just(SelectExpandClause::all_selected()),
        Just(SelectExpandClause {
            selection: Selection::ExpansionsOnly,
            expansion: Vec::new(),
        }),
        Just(SelectExpandClause {
            selection: Selection::Partial(vec![SelectItem::Wildcard]),
            expansion: Vec::new(),
        }),
    ]
}

fn arb_clause() -> impl Strategy<Value = SelectExpandClause> {
    leaf_clause().prop_recursive(3, 24, 3, |inner| {
        (
            leaf_clause(),
            prop::collection::vec(("[A-E][a-z]{0,3}", inner), 0..3),
        )
            .prop_map(|(base, children)| {
                let expansion = children
                    .into_iter()
                    .map(|(name, nested)| {
                        let mut item = ExpandedNavigationItem::new(ResolvedPath::new(vec![
                            ResolvedSegment::Property(Property::collection_navigation(
                                name,
                                "Test.Order",
                            )),
                        ]));
                        item.nested = nested;
                        item
                    })
                    .collect();

                SelectExpandClause {
                    selection: base.selection,
                    expansion,
                }
            })
    })
}

fn paths(clause: &SelectExpandClause) -> Vec<String> {
    clause
        .expansion
        .iter()
        .map(|item| item.path.to_string())
        .collect()
}

fn is_subsequence(needle: &[String], haystack: &[String]) -> bool {
    let mut iter = haystack.iter();
    needle.iter().all(|want| iter.any(|have| have == want))
}

proptest! {
    #[test]
    fn prune_is_idempotent(clause in arb_clause()) {
        let once = prune(&clause);
        let twice = once.as_ref().and_then(prune);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prune_never_reorders_surviving_items(clause in arb_clause()) {
        if let Some(pruned) = prune(&clause) {
            prop_assert!(is_subsequence(&paths(&pruned), &paths(&clause)));
        }
    }

    #[test]
    fn all_selected_roots_survive_unchanged(clause in arb_clause()) {
        if clause.selection.is_all() {
            prop_assert_eq!(prune(&clause), Some(clause));
        }
    }
}
