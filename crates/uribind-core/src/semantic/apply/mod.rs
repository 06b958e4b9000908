//! `$apply` transformation pipeline binding.
//!
//! Pipeline contract:
//! - stages bind strictly in written order;
//! - each stage sees the row shape left behind by its predecessor through
//!   the context's produced-alias table;
//! - aggregate and group-by collapse the row shape, compute extends it,
//!   filter and expand leave it untouched.

pub mod aggregate;
pub mod binder;
pub mod group_by;

#[cfg(test)]
mod tests_property;

pub use aggregate::{AggregateExpression, EntitySetAggregate, PropertyAggregate};
pub use binder::ApplyBinder;
pub use group_by::GroupByPropertyNode;

use crate::{
    model::TypeRef,
    semantic::{expression::ValueNode, select_expand::SelectExpandClause},
    syntax::AggregationMethod,
};
use derive_more::Deref;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// ApplyError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ApplyError {
    #[error("aggregate alias '{alias}' is declared more than once")]
    DuplicateAlias { alias: String },

    #[error("aggregation method '{method}' cannot be applied to values of type '{type_ref}'")]
    UnsupportedAggregateType { method: String, type_ref: String },

    #[error("entity-set aggregate segment '{name}' is not a collection navigation")]
    InvalidEntitySetPath { name: String },

    #[error("entity-set aggregate path has no segments")]
    EmptyEntitySetPath,

    #[error("group-by keys must be property paths")]
    UnsupportedGroupByExpression,

    #[error("groupby accepts only an aggregate child transformation, found '{kind}'")]
    UnsupportedGroupByChild { kind: String },

    #[error("filter transformation requires a boolean expression, found '{found}'")]
    FilterNotBoolean { found: String },
}

///
/// TransformationNode
///
/// One bound pipeline stage.
///

#[derive(Clone, Debug, PartialEq)]
pub enum TransformationNode {
    Aggregate(AggregateTransformation),
    GroupBy(GroupByTransformation),
    Compute(ComputeTransformation),
    Expand(SelectExpandClause),
    Filter(ValueNode),
}

///
/// AggregateTransformation
///

#[derive(Clone, Debug, PartialEq)]
pub struct AggregateTransformation {
    pub expressions: Vec<AggregateExpression>,
}

///
/// GroupByTransformation
///
/// Group keys as a property-node forest plus the optional aggregate child.
///

#[derive(Clone, Debug, PartialEq)]
pub struct GroupByTransformation {
    pub properties: Vec<GroupByPropertyNode>,
    pub child: Option<Box<TransformationNode>>,
}

///
/// ComputeTransformation
///

#[derive(Clone, Debug, PartialEq)]
pub struct ComputeTransformation {
    pub expressions: Vec<ComputeExpression>,
}

///
/// ComputeExpression
///

#[derive(Clone, Debug, PartialEq)]
pub struct ComputeExpression {
    pub expr: ValueNode,
    pub alias: String,
    pub type_ref: TypeRef,
}

///
/// ApplyClause
///
/// The bound pipeline, plus the row shape it leaves behind: the alias
/// table visible to later query options and whether the raw entity shape
/// survived.
///

#[derive(Clone, Debug, Deref, PartialEq)]
pub struct ApplyClause {
    #[deref]
    transformations: Vec<TransformationNode>,
    last_aliases: BTreeMap<String, TypeRef>,
    collapsed: bool,
}

impl ApplyClause {
    #[must_use]
    pub const fn new(
        transformations: Vec<TransformationNode>,
        last_aliases: BTreeMap<String, TypeRef>,
        collapsed: bool,
    ) -> Self {
        Self {
            transformations,
            last_aliases,
            collapsed,
        }
    }

    #[must_use]
    pub fn transformations(&self) -> &[TransformationNode] {
        &self.transformations
    }

    /// Aliases visible after the final stage, with inferred types.
    #[must_use]
    pub const fn last_aggregated_aliases(&self) -> &BTreeMap<String, TypeRef> {
        &self.last_aliases
    }

    /// True when the pipeline no longer yields raw entity rows.
    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Comma-joined names visible after the final stage, for hosts
    /// building response context metadata. Deterministic for equal clauses.
    #[must_use]
    pub fn context_suffix(&self) -> String {
        self.last_aliases
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl<'a> IntoIterator for &'a ApplyClause {
    type Item = &'a TransformationNode;
    type IntoIter = std::slice::Iter<'a, TransformationNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.transformations.iter()
    }
}

/// Render an aggregation method the way query text spells it.
pub(crate) fn method_name(method: &AggregationMethod) -> String {
    match method {
        AggregationMethod::Sum => "sum".to_string(),
        AggregationMethod::Min => "min".to_string(),
        AggregationMethod::Max => "max".to_string(),
        AggregationMethod::Average => "average".to_string(),
        AggregationMethod::CountDistinct => "countdistinct".to_string(),
        AggregationMethod::VirtualPropertyCount => "$count".to_string(),
        AggregationMethod::Custom(name) => name.clone(),
    }
}
