use crate::{
    semantic::apply::aggregate::{infer_result_type, merge_entity_set_aggregates},
    syntax::{AggregateExprToken, AggregationMethod, ExprToken},
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn arb_method() -> impl Strategy<Value = AggregationMethod> {
    prop_oneof![
        Just(AggregationMethod::Sum),
        Just(AggregationMethod::Min),
        Just(AggregationMethod::Max),
        Just(AggregationMethod::Average),
        Just(AggregationMethod::CountDistinct),
        Just(AggregationMethod::VirtualPropertyCount),
        "[a-z]{1,8}".prop_map(AggregationMethod::Custom),
    ]
}

fn arb_property() -> impl Strategy<Value = AggregateExprToken> {
    ("[A-D]", arb_method(), "[a-z]{1,6}").prop_map(|(name, method, alias)| {
        AggregateExprToken::property(ExprToken::property(name), method, alias)
    })
}

fn arb_expression() -> impl Strategy<Value = AggregateExprToken> {
    arb_property().prop_recursive(2, 8, 3, |inner| {
        prop_oneof![
            arb_property(),
            (
                prop::collection::vec("[A-C]", 1..3),
                prop::collection::vec(inner, 1..3),
            )
                .prop_map(|(path, children)| AggregateExprToken::entity_set(path, children)),
        ]
    })
}

fn alias_set(expressions: &[AggregateExprToken]) -> BTreeSet<String> {
    let mut aliases = BTreeSet::new();
    for expr in expressions {
        match expr {
            AggregateExprToken::Property { alias, .. } => {
                aliases.insert(alias.clone());
            }
            AggregateExprToken::EntitySet { children, .. } => {
                aliases.extend(alias_set(children));
            }
        }
    }
    aliases
}

proptest! {
    #[test]
    fn merge_is_idempotent(expressions in prop::collection::vec(arb_expression(), 0..6)) {
        let once = merge_entity_set_aggregates(&expressions);
        let twice = merge_entity_set_aggregates(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn merge_folds_associatively(
        left in prop::collection::vec(arb_expression(), 0..4),
        right in prop::collection::vec(arb_expression(), 0..4),
    ) {
        // Merging a prefix first must not change the final result.
        let mut staged = merge_entity_set_aggregates(&left);
        staged.extend(right.iter().cloned());
        let staged = merge_entity_set_aggregates(&staged);

        let mut whole = left.clone();
        whole.extend(right.iter().cloned());
        let whole = merge_entity_set_aggregates(&whole);

        prop_assert_eq!(staged, whole);
    }

    #[test]
    fn merge_preserves_alias_membership(expressions in prop::collection::vec(arb_expression(), 0..6)) {
        let merged = merge_entity_set_aggregates(&expressions);
        prop_assert_eq!(alias_set(&merged), alias_set(&expressions));
    }

    #[test]
    fn counting_methods_infer_int64_for_any_input(
        source in prop_oneof![
            Just(crate::model::TypeRef::None),
            Just(crate::model::TypeRef::primitive(crate::model::PrimitiveKind::String)),
            Just(crate::model::TypeRef::nullable(crate::model::PrimitiveKind::Decimal)),
        ],
        method in prop_oneof![
            Just(AggregationMethod::CountDistinct),
            Just(AggregationMethod::VirtualPropertyCount),
        ],
    ) {
        prop_assert_eq!(
            infer_result_type(&method, &source),
            Ok(crate::model::TypeRef::primitive(crate::model::PrimitiveKind::Int64))
        );
    }
}
