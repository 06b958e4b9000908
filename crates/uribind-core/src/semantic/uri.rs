//! Top-level query bind: composes the pipeline, expression, select and
//! expand binders into one `BoundQuery` per request.
//!
//! Option order is fixed: `$apply` first, since it rewrites the row shape
//! every later option resolves against; then filter, order-by, search,
//! select/expand, and finally the scalar paging options.

use crate::{
    error::BindError,
    model::{Model, NavigationSource, StructuredType, TypeRef},
    semantic::{
        apply::{ApplyBinder, ApplyClause},
        context::{BindingContext, RangeVariable},
        expression::{ExpressionBinder, ExpressionError, ValueNode},
        path::{ResolvedPath, ResolvedSegment},
        select_expand::{
            prune, ExpandBinderFactory, ExpandStrategy, OrderByItem, SelectBinder,
            SelectExpandClause, SelectItem, Selection,
        },
    },
    settings::BindSettings,
    syntax::{
        ApplyToken, ExpandToken, ExprToken, OrderByDirection, PathSegmentToken, SelectToken,
    },
};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// OptionError
///
/// Failures in the scalar query options and in option/context mismatches
/// the per-clause binders cannot see.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum OptionError {
    #[error("${option} must not be negative, found {value}")]
    NegativeValue { option: &'static str, value: i64 },

    #[error("${option} is not applicable to the shape produced by the transformation pipeline")]
    OptionNotApplicable { option: &'static str },

    #[error("navigation source '{name}' was not found")]
    UnknownNavigationSource { name: String },
}

/// Validate a count-like option value, normalizing to unsigned.
pub(crate) fn validate_non_negative(
    option: &'static str,
    value: Option<i64>,
) -> Result<Option<u64>, BindError> {
    match value {
        None => Ok(None),
        Some(value) => u64::try_from(value).map(Some).map_err(|_| {
            OptionError::NegativeValue { option, value }.into()
        }),
    }
}

///
/// QueryOptionTokens
///
/// Every query option of one request, as tokenized upstream.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryOptionTokens {
    pub apply: Option<ApplyToken>,
    pub filter: Option<ExprToken>,
    pub order_by: Vec<(ExprToken, OrderByDirection)>,
    pub search: Option<ExprToken>,
    pub select: Option<SelectToken>,
    pub expand: Option<ExpandToken>,
    pub top: Option<i64>,
    pub skip: Option<i64>,
    pub count: Option<bool>,
}

///
/// BoundQuery
///
/// The fully bound request. `select_expand` is `None` when no projection
/// applies, including the legacy case where pruning removed everything.
///

#[derive(Clone, Debug, PartialEq)]
pub struct BoundQuery {
    pub apply: Option<ApplyClause>,
    pub filter: Option<ValueNode>,
    pub order_by: Vec<OrderByItem>,
    pub search: Option<ValueNode>,
    pub select_expand: Option<SelectExpandClause>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub count: Option<bool>,
}

///
/// UriBinder
///

pub struct UriBinder<'m> {
    model: &'m Model,
    settings: &'m BindSettings,
    expressions: &'m dyn ExpressionBinder,
}

impl<'m> UriBinder<'m> {
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

    /// Bind every query option of one request against a navigation source.
    pub fn bind(
        &self,
        source_name: &str,
        tokens: &QueryOptionTokens,
    ) -> Result<BoundQuery, BindError> {
        let source = self.model.source(source_name).ok_or_else(|| {
            OptionError::UnknownNavigationSource {
                name: source_name.to_string(),
            }
        })?;
        let element = self.model.resolve_type(&source.element_type).ok_or_else(|| {
            OptionError::UnknownNavigationSource {
                name: source_name.to_string(),
            }
        })?;

        let implicit = RangeVariable::implicit(
            TypeRef::collection_of(TypeRef::structured(element.qualified_name())),
            Some(source.clone()),
        );
        let mut ctx = BindingContext::new(self.settings, implicit);

        let apply = match &tokens.apply {
            Some(token) => Some(
                ApplyBinder::new(self.model, self.settings, self.expressions)
                    .bind(token, &mut ctx)?,
            ),
            None => None,
        };

        let filter = match &tokens.filter {
            Some(token) => {
                let node = self
                    .expressions
                    .bind(token, &mut ctx)
                    .map_err(BindError::from)?;
                if !node.is_boolean_compatible() {
                    return Err(ExpressionError::ExpectedBoolean {
                        found: node.type_ref().to_string(),
                    }
                    .into());
                }
                Some(node)
            }
            None => None,
        };

        let mut order_by = Vec::with_capacity(tokens.order_by.len());
        for (token, direction) in &tokens.order_by {
            order_by.push(OrderByItem {
                expr: self
                    .expressions
                    .bind(token, &mut ctx)
                    .map_err(BindError::from)?,
                direction: *direction,
            });
        }

        let search = match &tokens.search {
            Some(token) => Some(
                self.expressions
                    .bind(token, &mut ctx)
                    .map_err(BindError::from)?,
            ),
            None => None,
        };

        let select_expand = self.bind_select_expand(tokens, &ctx, &element, &source)?;

        Ok(BoundQuery {
            apply,
            filter,
            order_by,
            search,
            select_expand,
            top: validate_non_negative("top", tokens.top)?,
            skip: validate_non_negative("skip", tokens.skip)?,
            count: tokens.count,
        })
    }

    fn bind_select_expand(
        &self,
        tokens: &QueryOptionTokens,
        ctx: &BindingContext<'_>,
        element: &Arc<StructuredType>,
        source: &Arc<NavigationSource>,
    ) -> Result<Option<SelectExpandClause>, BindError> {
        if tokens.select.is_none() && tokens.expand.is_none() {
            return Ok(None);
        }

        // Collapsed rows no longer carry entities, so expansion is
        // meaningless and selection is limited to pipeline aliases.
        if ctx.is_collapsed() {
            if tokens.expand.is_some() {
                return Err(OptionError::OptionNotApplicable { option: "expand" }.into());
            }
            return match &tokens.select {
                Some(select) => Self::bind_collapsed_select(select, ctx).map(Some),
                None => Ok(None),
            };
        }

        let binder = ExpandBinderFactory::create(self.model, self.settings, self.expressions);
        let mut clause = match &tokens.expand {
            Some(expand) => binder.bind(expand, element, Some(source))?,
            None => match binder.strategy() {
                ExpandStrategy::Modern => SelectExpandClause::all_selected(),
                ExpandStrategy::Legacy => SelectExpandClause {
                    selection: Selection::ExpansionsOnly,
                    expansion: Vec::new(),
                },
            },
        };

        if let Some(select) = &tokens.select {
            clause = SelectBinder::new(self.model, self.settings).decorate(select, element, clause)?;
        }

        // The finisher exists for the legacy strategy only; the modern
        // strategy's path-selection decoration leaves nothing vestigial.
        match binder.strategy() {
            ExpandStrategy::Legacy => Ok(prune(&clause)),
            ExpandStrategy::Modern => Ok(Some(clause)),
        }
    }

    /// Selection over aggregated rows: every term must name an alias
    /// produced by the pipeline's final stage.
    fn bind_collapsed_select(
        select: &SelectToken,
        ctx: &BindingContext<'_>,
    ) -> Result<SelectExpandClause, BindError> {
        let mut items = Vec::with_capacity(select.terms.len());
        for term in &select.terms {
            match term.path.as_slice() {
                [PathSegmentToken::Identifier(name)] if ctx.aggregated_alias(name).is_some() => {
                    items.push(SelectItem::Path(ResolvedPath::new(vec![
                        ResolvedSegment::Open(name.clone()),
                    ])));
                }
                _ => {
                    return Err(OptionError::OptionNotApplicable { option: "select" }.into());
                }
            }
        }

        Ok(SelectExpandClause {
            selection: Selection::Partial(items),
            expansion: Vec::new(),
        })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::PrimitiveKind,
        semantic::expression::ModelExpressionBinder,
        syntax::{
            AggregateExprToken, AggregateToken, AggregationMethod, CompareOp, ExpandTermToken,
            GroupByToken, SelectTermToken, TransformationToken,
        },
        test_support::sample_model,
        value::Value,
    };

    fn bind(
        source: &str,
        tokens: &QueryOptionTokens,
        settings: &BindSettings,
    ) -> Result<BoundQuery, BindError> {
        let model = sample_model();
        let expressions = ModelExpressionBinder::new(&model);
        let binder = UriBinder::new(&model, settings, &expressions);
        binder.bind(source, tokens)
    }

    #[test]
    fn unknown_source_fails() {
        let settings = BindSettings::default();
        let err = bind("Nowhere", &QueryOptionTokens::default(), &settings)
            .expect_err("unknown source must fail");
        assert!(matches!(
            err,
            BindError::Option(inner) if matches!(
                *inner,
                OptionError::UnknownNavigationSource { ref name } if name == "Nowhere"
            )
        ));
    }

    #[test]
    fn empty_request_binds_to_empty_query() {
        let settings = BindSettings::default();
        let query = bind("Customers", &QueryOptionTokens::default(), &settings)
            .expect("empty request binds");
        assert!(query.apply.is_none());
        assert!(query.filter.is_none());
        assert!(query.select_expand.is_none());
    }

    #[test]
    fn filter_select_and_paging_bind_together() {
        let settings = BindSettings::default();
        let tokens = QueryOptionTokens {
            filter: Some(ExprToken::compare(
                CompareOp::Eq,
                ExprToken::property("Tier"),
                ExprToken::Literal(Value::Text("Gold".to_string())),
            )),
            order_by: vec![(ExprToken::property("Name"), OrderByDirection::Desc)],
            select: Some(SelectToken::new(vec![SelectTermToken::named("Name")])),
            top: Some(10),
            skip: Some(20),
            count: Some(true),
            ..QueryOptionTokens::default()
        };

        let query = bind("Customers", &tokens, &settings).expect("request binds");
        assert!(query.filter.is_some());
        assert_eq!(query.order_by.len(), 1);
        assert_eq!(query.top, Some(10));
        assert_eq!(query.skip, Some(20));
        assert_eq!(query.count, Some(true));

        let clause = query.select_expand.expect("projection present");
        assert!(matches!(clause.selection, Selection::Partial(_)));
        assert_eq!(clause.projection_string(), "Name");
    }

    #[test]
    fn negative_top_is_rejected() {
        let settings = BindSettings::default();
        let tokens = QueryOptionTokens {
            top: Some(-1),
            ..QueryOptionTokens::default()
        };

        let err = bind("Customers", &tokens, &settings).expect_err("negative top must fail");
        assert!(matches!(
            err,
            BindError::Option(inner) if matches!(
                *inner,
                OptionError::NegativeValue { option: "top", value: -1 }
            )
        ));
    }

    #[test]
    fn non_boolean_filter_is_rejected() {
        let settings = BindSettings::default();
        let tokens = QueryOptionTokens {
            filter: Some(ExprToken::property("Name")),
            ..QueryOptionTokens::default()
        };

        let err = bind("Customers", &tokens, &settings).expect_err("text filter must fail");
        assert!(matches!(
            err,
            BindError::Expression(inner) if matches!(*inner, ExpressionError::ExpectedBoolean { .. })
        ));
    }

    #[test]
    fn modern_expand_produces_decorated_clause() {
        let settings = BindSettings::default();
        let tokens = QueryOptionTokens {
            expand: Some(ExpandToken::new(vec![ExpandTermToken::navigation(
                "Orders",
            )])),
            ..QueryOptionTokens::default()
        };

        let query = bind("Customers", &tokens, &settings).expect("expand binds");
        let clause = query.select_expand.expect("projection present");
        assert!(clause.selection.is_all());
        assert_eq!(clause.expansion.len(), 1);
        assert_eq!(clause.projection_string(), "*,Orders(*)");
    }

    #[test]
    fn legacy_expand_without_select_prunes_away() {
        let settings = BindSettings::legacy();
        let tokens = QueryOptionTokens {
            expand: Some(ExpandToken::new(vec![ExpandTermToken::navigation(
                "Orders",
            )])),
            ..QueryOptionTokens::default()
        };

        let query = bind("Customers", &tokens, &settings).expect("expand binds");
        assert!(query.select_expand.is_none());
    }

    #[test]
    fn legacy_expand_survives_when_nested_select_is_written() {
        let settings = BindSettings::legacy();
        let mut term = ExpandTermToken::navigation("Orders");
        term.select = Some(SelectToken::new(vec![SelectTermToken::named("Amount")]));
        let tokens = QueryOptionTokens {
            expand: Some(ExpandToken::new(vec![term])),
            ..QueryOptionTokens::default()
        };

        let query = bind("Customers", &tokens, &settings).expect("expand binds");
        let clause = query.select_expand.expect("pruned clause survives");
        assert_eq!(clause.expansion.len(), 1);
        assert!(matches!(
            clause.expansion[0].nested.selection,
            Selection::Partial(_)
        ));
    }

    #[test]
    fn options_after_apply_see_the_collapsed_shape() {
        let settings = BindSettings::default();
        let apply = ApplyToken::new(vec![TransformationToken::GroupBy(
            GroupByToken::new(vec![ExprToken::property("Tier")]).with_aggregate(
                AggregateToken::new(vec![AggregateExprToken::property(
                    ExprToken::property("Id"),
                    AggregationMethod::CountDistinct,
                    "Members",
                )]),
            ),
        )]);

        let tokens = QueryOptionTokens {
            apply: Some(apply.clone()),
            order_by: vec![(ExprToken::property("Members"), OrderByDirection::Desc)],
            select: Some(SelectToken::new(vec![SelectTermToken::named("Members")])),
            ..QueryOptionTokens::default()
        };
        let query = bind("Customers", &tokens, &settings).expect("aggregated request binds");

        let clause = query.apply.expect("pipeline present");
        assert!(clause.is_collapsed());
        assert_eq!(
            clause.last_aggregated_aliases().get("Members"),
            Some(&TypeRef::primitive(PrimitiveKind::Int64))
        );
        assert_eq!(query.order_by[0].expr.type_ref(), TypeRef::primitive(PrimitiveKind::Int64));

        // Selecting a raw property that the pipeline erased is an error.
        let tokens = QueryOptionTokens {
            apply: Some(apply.clone()),
            select: Some(SelectToken::new(vec![SelectTermToken::named("Name")])),
            ..QueryOptionTokens::default()
        };
        let err = bind("Customers", &tokens, &settings).expect_err("raw select must fail");
        assert!(matches!(
            err,
            BindError::Option(inner) if matches!(
                *inner,
                OptionError::OptionNotApplicable { option: "select" }
            )
        ));

        // So is expanding.
        let tokens = QueryOptionTokens {
            apply: Some(apply),
            expand: Some(ExpandToken::new(vec![ExpandTermToken::navigation(
                "Orders",
            )])),
            ..QueryOptionTokens::default()
        };
        let err = bind("Customers", &tokens, &settings).expect_err("expand must fail");
        assert!(matches!(
            err,
            BindError::Option(inner) if matches!(
                *inner,
                OptionError::OptionNotApplicable { option: "expand" }
            )
        ));
    }
}
