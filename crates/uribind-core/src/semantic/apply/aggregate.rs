use crate::{
    model::{PrimitiveKind, TypeRef},
    semantic::{
        apply::{method_name, ApplyError},
        expression::ValueNode,
        path::ResolvedPath,
    },
    syntax::{AggregateExprToken, AggregationMethod},
};
use std::collections::BTreeMap;

///
/// PropertyAggregate
///
/// One bound `expr with method as alias` aggregate expression.
///

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyAggregate {
    pub expr: ValueNode,
    pub method: AggregationMethod,
    pub alias: String,
    /// Inferred result type recorded in the alias table.
    pub type_ref: TypeRef,
}

///
/// EntitySetAggregate
///
/// Child aggregates grouped under a related collection navigation.
///

#[derive(Clone, Debug, PartialEq)]
pub struct EntitySetAggregate {
    pub path: ResolvedPath,
    pub children: Vec<AggregateExpression>,
}

///
/// AggregateExpression
///

#[derive(Clone, Debug, PartialEq)]
pub enum AggregateExpression {
    Property(PropertyAggregate),
    EntitySet(EntitySetAggregate),
}

/// Merge entity-set aggregate tokens that target the same navigation path.
///
/// Query text may repeat `Products(...)` across several aggregate
/// expressions; downstream stages require one entry per related set, so
/// equal-path tokens fuse into one with concatenated children, recursively.
/// The first occurrence keeps its position; property aggregates and
/// distinct paths pass through untouched.
#[must_use]
pub fn merge_entity_set_aggregates(expressions: &[AggregateExprToken]) -> Vec<AggregateExprToken> {
    let mut merged: Vec<AggregateExprToken> = Vec::new();
    let mut index_by_path: BTreeMap<String, usize> = BTreeMap::new();

    for expr in expressions {
        match expr {
            AggregateExprToken::Property { .. } => merged.push(expr.clone()),
            AggregateExprToken::EntitySet { path, children } => {
                let key = path.join("/");
                if let Some(&index) = index_by_path.get(&key) {
                    if let AggregateExprToken::EntitySet {
                        children: existing, ..
                    } = &mut merged[index]
                    {
                        existing.extend(children.iter().cloned());
                    }
                } else {
                    index_by_path.insert(key, merged.len());
                    merged.push(expr.clone());
                }
            }
        }
    }

    for expr in &mut merged {
        if let AggregateExprToken::EntitySet { children, .. } = expr {
            *children = merge_entity_set_aggregates(children);
        }
    }

    merged
}

/// Infer the alias type an aggregation method produces over `source`.
///
/// Counting methods always yield a non-nullable Int64. Min/max/sum keep
/// the source type. Custom methods are opaque and default to a nullable
/// Double. Average follows the numeric widening table; averaging a value
/// of unknown type stays unknown rather than failing.
pub fn infer_result_type(
    method: &AggregationMethod,
    source: &TypeRef,
) -> Result<TypeRef, ApplyError> {
    match method {
        AggregationMethod::CountDistinct | AggregationMethod::VirtualPropertyCount => {
            Ok(TypeRef::primitive(PrimitiveKind::Int64))
        }
        AggregationMethod::Custom(_) => Ok(TypeRef::nullable(PrimitiveKind::Double)),
        AggregationMethod::Min | AggregationMethod::Max | AggregationMethod::Sum => {
            Ok(source.clone())
        }
        AggregationMethod::Average => match source {
            TypeRef::None => Ok(TypeRef::None),
            _ => match source.primitive_kind() {
                Some(
                    PrimitiveKind::Int32 | PrimitiveKind::Int64 | PrimitiveKind::Double,
                ) => Ok(TypeRef::nullable(PrimitiveKind::Double)),
                Some(PrimitiveKind::Decimal) => Ok(TypeRef::nullable(PrimitiveKind::Decimal)),
                Some(PrimitiveKind::Single) => Ok(TypeRef::nullable(PrimitiveKind::Single)),
                _ => Err(ApplyError::UnsupportedAggregateType {
                    method: method_name(method),
                    type_ref: source.to_string(),
                }),
            },
        },
    }
}

///
/// TESTS
///
