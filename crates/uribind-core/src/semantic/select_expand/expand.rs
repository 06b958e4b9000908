use crate::{
    error::{BindError, LimitError},
    model::{Model, NavigationSource, Property, StructuredType, TypeRef},
    semantic::{
        context::{BindingContext, RangeVariable},
        expression::ExpressionBinder,
        path::{ResolvedPath, ResolvedSegment},
        select_expand::{
            clause::{
                ExpandedNavigationItem, LevelsClause, OrderByItem, SelectExpandClause, SelectItem,
                Selection,
            },
            select::SelectBinder,
        },
        uri::validate_non_negative,
    },
    settings::BindSettings,
    syntax::{ExpandTermToken, ExpandToken, LevelsToken, PathSegmentToken, SelectToken},
};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// ExpandError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ExpandError {
    /// A raw expand path may traverse exactly one navigation property,
    /// optionally preceded by type-cast segments.
    #[error("expand path '{path}' traverses more than one navigation property")]
    UnsupportedPathShape { path: String },

    #[error("expand term has no navigation segment")]
    MissingNavigationSegment,

    #[error("wildcards are not valid in expand paths")]
    WildcardSegment,

    #[error("expand type cast '{name}' does not name a declared type")]
    UnknownTypeCast { name: String },

    #[error("type cast '{to}' is not derived from '{from}'")]
    InvalidTypeCast { from: String, to: String },

    #[error("expand property '{name}' was not found on the current type")]
    UnresolvedProperty { name: String },

    #[error("'{name}' is not a navigation property and cannot be expanded")]
    NotANavigationProperty { name: String },

    #[error("navigation '{name}' has no resolvable target entity type")]
    UnknownTargetType { name: String },

    /// A levels directive requires the related type to be subtype-
    /// compatible with the declaring type.
    #[error("levels directive on '{navigation}' is incompatible: '{target}' is unrelated to the source type")]
    IncompatibleLevels { navigation: String, target: String },
}

///
/// ExpandStrategy
///
/// Default-selection policy per protocol generation. The set is closed:
/// strategies are fixed by protocol version, not user-extensible.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExpandStrategy {
    /// No explicit `$select` means "select nothing beyond the expansion";
    /// vestigial items are removed by the finisher afterwards.
    Legacy,
    /// No explicit `$select` means "select everything", and every expanded
    /// navigation adds a path-selection item for itself to the parent.
    Modern,
}

///
/// ExpandBinderFactory
///
/// Selects the strategy once per query from configuration flags.
///

pub struct ExpandBinderFactory;

impl ExpandBinderFactory {
    #[must_use]
    pub fn create<'m>(
        model: &'m Model,
        settings: &'m BindSettings,
        expression_binder: &'m dyn ExpressionBinder,
    ) -> ExpandBinder<'m> {
        let strategy = if settings.use_modern_semantics {
            ExpandStrategy::Modern
        } else {
            ExpandStrategy::Legacy
        };

        ExpandBinder {
            model,
            settings,
            strategy,
            expression_binder,
        }
    }
}

///
/// ExpandBinder
///
/// Walks an `$expand` token tree and produces the bound clause for one
/// level of the query, recursing into nested terms.
///
/// Failure semantics: any rejected term aborts the whole bind; callers
/// never see a partially-bound expansion list.
///

pub struct ExpandBinder<'m> {
    model: &'m Model,
    settings: &'m BindSettings,
    strategy: ExpandStrategy,
    expression_binder: &'m dyn ExpressionBinder,
}

impl ExpandBinder<'_> {
    #[must_use]
    pub const fn strategy(&self) -> ExpandStrategy {
        self.strategy
    }

    /// Bind a top-level expand token against the current type and source.
    pub fn bind(
        &self,
        token: &ExpandToken,
        current_type: &Arc<StructuredType>,
        source: Option<&Arc<NavigationSource>>,
    ) -> Result<SelectExpandClause, BindError> {
        self.bind_level(Some(token), None, current_type, source, 0)
    }

    /// Bind one nesting level: expansion items first, then the level's
    /// default selection, then decoration by the level's own `$select`.
    fn bind_level(
        &self,
        expand: Option<&ExpandToken>,
        select: Option<&SelectToken>,
        current_type: &Arc<StructuredType>,
        source: Option<&Arc<NavigationSource>>,
        depth: usize,
    ) -> Result<SelectExpandClause, BindError> {
        if depth > self.settings.max_expand_depth {
            return Err(LimitError::DepthExceeded {
                limit: self.settings.max_expand_depth,
            }
            .into());
        }

        let mut expansion: Vec<ExpandedNavigationItem> = Vec::new();
        let mut implicit_paths: Vec<SelectItem> = Vec::new();

        if let Some(token) = expand {
            // Output order must match token order; sibling terms are bound
            // independently and share no mutable state.
            for term in &token.terms {
                let Some(item) = self.bind_term(term, current_type, source, depth)? else {
                    continue;
                };
                if matches!(self.strategy, ExpandStrategy::Modern) {
                    implicit_paths.push(SelectItem::Path(item.path.clone()));
                }
                expansion.push(item);
            }
        }

        let selection = match self.strategy {
            ExpandStrategy::Modern => Selection::All(implicit_paths),
            ExpandStrategy::Legacy => Selection::ExpansionsOnly,
        };
        let clause = SelectExpandClause {
            selection,
            expansion,
        };

        match select {
            Some(token) => {
                SelectBinder::new(self.model, self.settings).decorate(token, current_type, clause)
            }
            None => Ok(clause),
        }
    }

    /// Bind a single expand term. `Ok(None)` is the lenient compat path:
    /// the term resolved to a droppable non-navigation property.
    fn bind_term(
        &self,
        term: &ExpandTermToken,
        current_type: &Arc<StructuredType>,
        source: Option<&Arc<NavigationSource>>,
        depth: usize,
    ) -> Result<Option<ExpandedNavigationItem>, BindError> {
        let (casts, nav_name) = split_expand_path(&term.path)?;

        let mut segments: Vec<ResolvedSegment> = Vec::new();
        let mut effective = current_type.clone();
        for qualified in casts {
            effective = self.resolve_cast(&effective, qualified)?;
            segments.push(ResolvedSegment::TypeCast(qualified.clone()));
        }

        let Some(property) = self.model.find_property(&effective, nav_name).cloned() else {
            return Err(ExpandError::UnresolvedProperty {
                name: nav_name.to_string(),
            }
            .into());
        };

        if !property.is_navigation() {
            if self.settings.lenient_expand_properties && !property.is_stream() {
                // Lenient legacy servers drop such terms; the expansion
                // list is simply shorter, no placeholder is produced.
                return Ok(None);
            }
            return Err(ExpandError::NotANavigationProperty {
                name: nav_name.to_string(),
            }
            .into());
        }

        let target_type = self.navigation_target_type(&property)?;
        segments.push(ResolvedSegment::Property(property.clone()));
        let path = ResolvedPath::new(segments);

        let target = source.and_then(|s| s.navigation_target(self.model, nav_name));

        let nested_expand = term
            .expand
            .as_ref()
            .filter(|_| self.settings.support_expand_options);
        let nested_select = term
            .select
            .as_ref()
            .filter(|_| self.settings.support_expand_options);
        let nested = self.bind_level(
            nested_expand,
            nested_select,
            &target_type,
            target.as_ref(),
            depth + 1,
        )?;

        let mut item = ExpandedNavigationItem::new(path);
        item.target = target.clone();
        item.nested = nested;

        if self.settings.support_expand_options {
            self.bind_term_options(term, &mut item, &effective, &target_type, target)?;
        }

        Ok(Some(item))
    }

    /// Bind the term's own query options inside a fresh iteration scope.
    fn bind_term_options(
        &self,
        term: &ExpandTermToken,
        item: &mut ExpandedNavigationItem,
        effective: &Arc<StructuredType>,
        target_type: &Arc<StructuredType>,
        target: Option<Arc<NavigationSource>>,
    ) -> Result<(), BindError> {
        if term.filter.is_some() || !term.order_by.is_empty() || term.search.is_some() {
            // CONTRACT: one fresh scope per expand item, never shared with
            // siblings; sibling binds are order-independent.
            let implicit = RangeVariable::implicit(
                TypeRef::structured(target_type.qualified_name()),
                target,
            );
            let mut nested_ctx = BindingContext::new(self.settings, implicit);

            if let Some(token) = &term.filter {
                item.filter = Some(self.expression_binder.bind(token, &mut nested_ctx)?);
            }
            for (token, direction) in &term.order_by {
                item.order_by.push(OrderByItem {
                    expr: self.expression_binder.bind(token, &mut nested_ctx)?,
                    direction: *direction,
                });
            }
            if let Some(token) = &term.search {
                item.search = Some(self.expression_binder.bind(token, &mut nested_ctx)?);
            }
        }

        item.top = validate_non_negative("top", term.top)?;
        item.skip = validate_non_negative("skip", term.skip)?;
        item.count = term.count;

        if let Some(levels) = term.levels {
            item.levels = Some(self.resolve_levels(levels, effective, target_type)?);
        }

        Ok(())
    }

    /// A levels directive only makes sense for recursive expansion: the
    /// related type must be subtype-compatible with the declaring type in
    /// either direction.
    fn resolve_levels(
        &self,
        levels: LevelsToken,
        effective: &Arc<StructuredType>,
        target_type: &Arc<StructuredType>,
    ) -> Result<LevelsClause, BindError> {
        let from = effective.qualified_name();
        let to = target_type.qualified_name();
        if !self.model.is_subtype(&from, &to) && !self.model.is_subtype(&to, &from) {
            return Err(ExpandError::IncompatibleLevels {
                navigation: from,
                target: to,
            }
            .into());
        }

        Ok(match levels {
            LevelsToken::Max => LevelsClause::max(),
            LevelsToken::Depth(depth) if depth < 0 => LevelsClause::max(),
            LevelsToken::Depth(depth) => LevelsClause::depth(depth),
        })
    }

    fn resolve_cast(
        &self,
        effective: &Arc<StructuredType>,
        qualified: &str,
    ) -> Result<Arc<StructuredType>, BindError> {
        let target = self
            .model
            .resolve_type(qualified)
            .ok_or_else(|| ExpandError::UnknownTypeCast {
                name: qualified.to_string(),
            })?;

        let from = effective.qualified_name();
        if !self.model.is_subtype(&from, qualified) {
            return Err(ExpandError::InvalidTypeCast {
                from,
                to: qualified.to_string(),
            }
            .into());
        }

        Ok(target)
    }

    fn navigation_target_type(
        &self,
        property: &Property,
    ) -> Result<Arc<StructuredType>, BindError> {
        property
            .navigation_target()
            .and_then(|name| self.model.resolve_type(name))
            .ok_or_else(|| {
                ExpandError::UnknownTargetType {
                    name: property.name.clone(),
                }
                .into()
            })
    }
}

/// Split a raw expand path into leading casts and the single navigation
/// identifier, rejecting every other shape.
fn split_expand_path(
    path: &[PathSegmentToken],
) -> Result<(Vec<&String>, &str), BindError> {
    let mut casts: Vec<&String> = Vec::new();
    let mut nav_name: Option<&str> = None;

    for segment in path {
        match segment {
            PathSegmentToken::TypeCast(qualified) => {
                if nav_name.is_some() {
                    return Err(unsupported_shape(path));
                }
                casts.push(qualified);
            }
            PathSegmentToken::Identifier(name) => {
                if nav_name.is_some() {
                    return Err(unsupported_shape(path));
                }
                nav_name = Some(name);
            }
            PathSegmentToken::Wildcard => return Err(ExpandError::WildcardSegment.into()),
        }
    }

    let nav_name = nav_name.ok_or(ExpandError::MissingNavigationSegment)?;

    Ok((casts, nav_name))
}

fn unsupported_shape(path: &[PathSegmentToken]) -> BindError {
    let rendered = path
        .iter()
        .map(|segment| match segment {
            PathSegmentToken::Identifier(name) | PathSegmentToken::TypeCast(name) => name.as_str(),
            PathSegmentToken::Wildcard => "*",
        })
        .collect::<Vec<_>>()
        .join("/");

    ExpandError::UnsupportedPathShape { path: rendered }.into()
}

///
/// TESTS
///
