use crate::{
    error::BindError,
    model::{Model, StructuredType, TypeRef},
    semantic::{
        apply::{
            aggregate::{infer_result_type, merge_entity_set_aggregates},
            group_by, AggregateExpression, AggregateTransformation, ApplyClause, ApplyError,
            ComputeExpression, ComputeTransformation, EntitySetAggregate, GroupByTransformation,
            PropertyAggregate, TransformationNode,
        },
        context::{BindingContext, RangeVariable},
        expression::{ExpressionBinder, ValueNode},
        path::{ResolvedPath, ResolvedSegment},
        select_expand::{expand::ExpandError, ExpandBinderFactory, SelectExpandClause},
    },
    settings::BindSettings,
    syntax::{
        AggregateExprToken, AggregateToken, AggregationMethod, ApplyToken, ComputeToken,
        ExpandToken, GroupByToken, TransformationToken,
    },
};
use std::{collections::BTreeMap, sync::Arc};

///
/// ApplyBinder
///
/// Binds the `$apply` pipeline stage by stage, threading the produced
/// row shape through the context so each stage resolves names against
/// its predecessor's output.
///

pub struct ApplyBinder<'m> {
    model: &'m Model,
    settings: &'m BindSettings,
    expressions: &'m dyn ExpressionBinder,
}

impl<'m> ApplyBinder<'m> {
    #[must_use]
    pub const fn new(
        model: &'m Model,
        settings: &'m BindSettings,
        expressions: &'m dyn ExpressionBinder,
    ) -> Self {
        Self {
            model,
            settings,
            expressions,
        }
    }

    /// Bind the whole pipeline in written order.
    pub fn bind(
        &self,
        token: &ApplyToken,
        ctx: &mut BindingContext<'_>,
    ) -> Result<ApplyClause, BindError> {
        let mut transformations = Vec::with_capacity(token.transformations.len());
        for transformation in &token.transformations {
            transformations.push(self.bind_transformation(transformation, ctx)?);
        }

        Ok(ApplyClause::new(
            transformations,
            ctx.aggregated_aliases().clone(),
            ctx.is_collapsed(),
        ))
    }

    fn bind_transformation(
        &self,
        token: &TransformationToken,
        ctx: &mut BindingContext<'_>,
    ) -> Result<TransformationNode, BindError> {
        match token {
            TransformationToken::Aggregate(aggregate) => self
                .bind_aggregate(aggregate, ctx)
                .map(TransformationNode::Aggregate),
            TransformationToken::GroupBy(group_by) => self
                .bind_group_by(group_by, ctx)
                .map(TransformationNode::GroupBy),
            TransformationToken::Compute(compute) => self
                .bind_compute(compute, ctx)
                .map(TransformationNode::Compute),
            TransformationToken::Expand(expand) => self
                .bind_expand(expand, ctx)
                .map(TransformationNode::Expand),
            TransformationToken::Filter(expr) => {
                let node = self.expressions.bind(expr, ctx).map_err(BindError::from)?;
                if !node.is_boolean_compatible() {
                    return Err(ApplyError::FilterNotBoolean {
                        found: node.type_ref().to_string(),
                    }
                    .into());
                }
                Ok(TransformationNode::Filter(node))
            }
        }
    }

    /// Aggregate replaces the row shape: afterwards only the stage's
    /// aliases resolve.
    fn bind_aggregate(
        &self,
        token: &AggregateToken,
        ctx: &mut BindingContext<'_>,
    ) -> Result<AggregateTransformation, BindError> {
        let merged = merge_entity_set_aggregates(&token.expressions);

        let mut aliases: BTreeMap<String, TypeRef> = BTreeMap::new();
        let mut expressions = Vec::with_capacity(merged.len());
        for expr in &merged {
            expressions.push(self.bind_aggregate_expr(expr, ctx, &mut aliases)?);
        }

        ctx.set_aggregated_aliases(aliases);
        ctx.mark_collapsed();

        Ok(AggregateTransformation { expressions })
    }

    fn bind_aggregate_expr(
        &self,
        token: &AggregateExprToken,
        ctx: &mut BindingContext<'_>,
        aliases: &mut BTreeMap<String, TypeRef>,
    ) -> Result<AggregateExpression, BindError> {
        match token {
            AggregateExprToken::Property {
                expr,
                method,
                alias,
            } => {
                // A virtual count aggregates the rows themselves; there is
                // no source expression to bind.
                let node = if matches!(method, AggregationMethod::VirtualPropertyCount) {
                    let origin = ctx.current_variable();
                    ValueNode::RangeVariableRef {
                        name: origin.name.clone(),
                        type_ref: origin.type_ref.clone(),
                    }
                } else {
                    self.expressions.bind(expr, ctx).map_err(BindError::from)?
                };

                let type_ref = infer_result_type(method, &node.type_ref())?;
                if aliases.insert(alias.clone(), type_ref.clone()).is_some() {
                    return Err(ApplyError::DuplicateAlias {
                        alias: alias.clone(),
                    }
                    .into());
                }

                Ok(AggregateExpression::Property(PropertyAggregate {
                    expr: node,
                    method: method.clone(),
                    alias: alias.clone(),
                    type_ref,
                }))
            }
            AggregateExprToken::EntitySet { path, children } => {
                let (resolved, target) = self.resolve_entity_set_path(path, ctx)?;

                // Children evaluate per related entity; aliases still land
                // in the enclosing stage's table.
                let implicit =
                    RangeVariable::implicit(TypeRef::structured(target.qualified_name()), None);
                let mut nested = ctx.nested(implicit);

                let mut bound = Vec::with_capacity(children.len());
                for child in children {
                    bound.push(self.bind_aggregate_expr(child, &mut nested, aliases)?);
                }

                Ok(AggregateExpression::EntitySet(EntitySetAggregate {
                    path: resolved,
                    children: bound,
                }))
            }
        }
    }

    fn resolve_entity_set_path(
        &self,
        path: &[String],
        ctx: &BindingContext<'_>,
    ) -> Result<(ResolvedPath, Arc<StructuredType>), BindError> {
        if path.is_empty() {
            return Err(ApplyError::EmptyEntitySetPath.into());
        }

        let mut current = self.model.structured_of(&ctx.current_variable().type_ref);
        let mut segments = Vec::with_capacity(path.len());

        for name in path {
            let property = current
                .as_deref()
                .and_then(|ty| self.model.find_property(ty, name))
                .cloned()
                .ok_or_else(|| ApplyError::InvalidEntitySetPath { name: name.clone() })?;

            if !property.is_navigation() || !property.ty.is_collection() {
                return Err(ApplyError::InvalidEntitySetPath { name: name.clone() }.into());
            }

            current = self.model.structured_of(&property.ty);
            segments.push(ResolvedSegment::Property(property));
        }

        let target = current.ok_or_else(|| ApplyError::InvalidEntitySetPath {
            name: path[path.len() - 1].clone(),
        })?;

        Ok((ResolvedPath::new(segments), target))
    }

    /// Group-by collapses the row shape to the group keys plus whatever
    /// aliases its aggregate child produced.
    fn bind_group_by(
        &self,
        token: &GroupByToken,
        ctx: &mut BindingContext<'_>,
    ) -> Result<GroupByTransformation, BindError> {
        // Keys bind against the pre-group-by shape, before any child
        // aggregate collapses it.
        let mut keys = Vec::with_capacity(token.properties.len());
        for property in &token.properties {
            keys.push(
                self.expressions
                    .bind(property, ctx)
                    .map_err(BindError::from)?,
            );
        }
        let properties = group_by::build_tree(&keys)?;

        let child = match token.child.as_deref() {
            Some(TransformationToken::Aggregate(aggregate)) => Some(Box::new(
                TransformationNode::Aggregate(self.bind_aggregate(aggregate, ctx)?),
            )),
            Some(other) => {
                return Err(ApplyError::UnsupportedGroupByChild {
                    kind: other.kind().to_string(),
                }
                .into());
            }
            None => None,
        };

        if child.is_none() {
            ctx.set_aggregated_aliases(BTreeMap::new());
        }
        let key_aliases: BTreeMap<String, TypeRef> = properties
            .iter()
            .map(|node| (node.name.clone(), node.type_ref.clone()))
            .collect();
        ctx.extend_aggregated_aliases(key_aliases);
        ctx.mark_collapsed();

        Ok(GroupByTransformation { properties, child })
    }

    /// Compute extends the row shape without collapsing it.
    fn bind_compute(
        &self,
        token: &ComputeToken,
        ctx: &mut BindingContext<'_>,
    ) -> Result<ComputeTransformation, BindError> {
        let mut added: BTreeMap<String, TypeRef> = BTreeMap::new();
        let mut expressions = Vec::with_capacity(token.expressions.len());

        for compute in &token.expressions {
            let node = self
                .expressions
                .bind(&compute.expr, ctx)
                .map_err(BindError::from)?;
            let type_ref = node.type_ref();

            if ctx.aggregated_alias(&compute.alias).is_some()
                || added.insert(compute.alias.clone(), type_ref.clone()).is_some()
            {
                return Err(ApplyError::DuplicateAlias {
                    alias: compute.alias.clone(),
                }
                .into());
            }

            expressions.push(ComputeExpression {
                expr: node,
                alias: compute.alias.clone(),
                type_ref,
            });
        }

        ctx.extend_aggregated_aliases(added);

        Ok(ComputeTransformation { expressions })
    }

    /// Expand always binds against the origin entity shape, even when an
    /// earlier stage has collapsed the row shape; the related entities are
    /// attached before the pipeline reshapes rows.
    fn bind_expand(
        &self,
        token: &ExpandToken,
        ctx: &mut BindingContext<'_>,
    ) -> Result<SelectExpandClause, BindError> {
        let origin = ctx.current_variable();
        let current_type = self.model.structured_of(&origin.type_ref).ok_or_else(|| {
            ExpandError::UnknownTargetType {
                name: origin.name.clone(),
            }
        })?;
        let source = origin.source.clone();

        let binder = ExpandBinderFactory::create(self.model, self.settings, self.expressions);
        binder.bind(token, &current_type, source.as_ref())
    }
}

///
/// TESTS
///
