use crate::{
    error::{BindError, LimitError},
    model::{Model, StructuredType},
    semantic::{
        path::{ResolvedPath, ResolvedSegment},
        select_expand::clause::{SelectExpandClause, SelectItem, Selection},
    },
    settings::BindSettings,
    syntax::{PathSegmentToken, SelectTermToken, SelectToken},
};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// SelectError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SelectError {
    #[error("select property '{name}' was not found on the current type")]
    UnresolvedProperty { name: String },

    #[error("select type cast '{name}' does not name a declared type")]
    UnknownTypeCast { name: String },

    #[error("type cast '{to}' is not derived from '{from}'")]
    InvalidTypeCast { from: String, to: String },

    #[error("wildcard must be the last segment of a select path")]
    WildcardNotLast,

    #[error("select path continues past primitive property '{name}'")]
    PathBeyondPrimitive { name: String },
}

///
/// SelectBinder
///
/// Resolves `$select` terms against the current type and decorates a
/// clause's selection kind:
/// - any explicit term downgrades "all properties" to a partial selection;
/// - a wildcard restores "all properties" for the level;
/// - the configured term limit is enforced before any resolution work.
///

pub struct SelectBinder<'m> {
    model: &'m Model,
    settings: &'m BindSettings,
}

impl<'m> SelectBinder<'m> {
    #[must_use]
    pub const fn new(model: &'m Model, settings: &'m BindSettings) -> Self {
        Self { model, settings }
    }

    /// Decorate `clause` with the token's selection.
    pub fn decorate(
        &self,
        token: &SelectToken,
        current_type: &Arc<StructuredType>,
        clause: SelectExpandClause,
    ) -> Result<SelectExpandClause, BindError> {
        if token.terms.len() > self.settings.max_select_terms {
            return Err(LimitError::TooManySelectTerms {
                limit: self.settings.max_select_terms,
            }
            .into());
        }

        let mut items: Vec<SelectItem> = Vec::new();
        let mut wildcard_seen = false;

        for term in &token.terms {
            match self.resolve_term(term, current_type)? {
                Some(path) => items.push(SelectItem::Path(path)),
                None => wildcard_seen = true,
            }
        }

        if !wildcard_seen && items.is_empty() {
            return Ok(clause);
        }

        // Prior items (for example the modern strategy's implicit
        // path-selection items) are preserved ahead of the new terms.
        let mut merged: Vec<SelectItem> = clause.selection.items().to_vec();
        merged.extend(items);

        let selection = if wildcard_seen {
            Selection::All(merged)
        } else {
            Selection::Partial(merged)
        };

        Ok(SelectExpandClause {
            selection,
            expansion: clause.expansion,
        })
    }

    /// Resolve one term; `None` means the term was a wildcard.
    fn resolve_term(
        &self,
        term: &SelectTermToken,
        current_type: &Arc<StructuredType>,
    ) -> Result<Option<ResolvedPath>, BindError> {
        let mut segments: Vec<ResolvedSegment> = Vec::new();
        let mut effective: Option<Arc<StructuredType>> = Some(current_type.clone());
        let last = term.path.len().saturating_sub(1);

        for (index, segment) in term.path.iter().enumerate() {
            match segment {
                PathSegmentToken::Wildcard => {
                    if index != last {
                        return Err(SelectError::WildcardNotLast.into());
                    }
                    return Ok(None);
                }
                PathSegmentToken::TypeCast(qualified) => {
                    effective = Some(self.resolve_cast(effective.as_ref(), qualified)?);
                    segments.push(ResolvedSegment::TypeCast(qualified.clone()));
                }
                PathSegmentToken::Identifier(name) => {
                    let Some(declaring) = effective.as_deref() else {
                        let prior = segments
                            .last()
                            .map_or_else(String::new, |s| s.name().to_string());
                        return Err(SelectError::PathBeyondPrimitive { name: prior }.into());
                    };

                    match self.model.find_property(declaring, name).cloned() {
                        Some(property) => {
                            effective = self.model.structured_of(&property.ty);
                            segments.push(ResolvedSegment::Property(property));
                        }
                        None if declaring.is_open => {
                            effective = None;
                            segments.push(ResolvedSegment::Open(name.clone()));
                        }
                        None => {
                            return Err(SelectError::UnresolvedProperty { name: name.clone() }
                                .into());
                        }
                    }
                }
            }
        }

        Ok(Some(ResolvedPath::new(segments)))
    }

    fn resolve_cast(
        &self,
        effective: Option<&Arc<StructuredType>>,
        qualified: &str,
    ) -> Result<Arc<StructuredType>, BindError> {
        let target = self
            .model
            .resolve_type(qualified)
            .ok_or_else(|| SelectError::UnknownTypeCast {
                name: qualified.to_string(),
            })?;

        if let Some(current) = effective {
            let from = current.qualified_name();
            if !self.model.is_subtype(&from, qualified) {
                return Err(SelectError::InvalidTypeCast {
                    from,
                    to: qualified.to_string(),
                }
                .into());
            }
        }

        Ok(target)
    }
}

///
/// TESTS
///
