//! Umbrella error surface for the binder.
//!
//! Error ownership contract:
//! - each binder module owns its error enum and its message wording.
//! - `BindError` only aggregates; it never reinterprets a nested error.
//! - every failure aborts the whole bind of the enclosing clause. Callers
//!   never receive partially-bound trees.

use crate::semantic::{
    apply::ApplyError, expression::ExpressionError, select_expand::expand::ExpandError,
    select_expand::select::SelectError, uri::OptionError,
};
use thiserror::Error as ThisError;

///
/// BindError
///
/// Caller-visible binding failures. These indicate that the query text
/// cannot be bound against the current schema; they are *not* binder bugs.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum BindError {
    #[error("{0}")]
    Expand(Box<ExpandError>),

    #[error("{0}")]
    Select(Box<SelectError>),

    #[error("{0}")]
    Apply(Box<ApplyError>),

    #[error("{0}")]
    Expression(Box<ExpressionError>),

    #[error("{0}")]
    Option(Box<OptionError>),

    #[error("{0}")]
    Limit(#[from] LimitError),
}

impl From<ExpandError> for BindError {
    fn from(err: ExpandError) -> Self {
        Self::Expand(Box::new(err))
    }
}

impl From<SelectError> for BindError {
    fn from(err: SelectError) -> Self {
        Self::Select(Box::new(err))
    }
}

impl From<ApplyError> for BindError {
    fn from(err: ApplyError) -> Self {
        Self::Apply(Box::new(err))
    }
}

impl From<ExpressionError> for BindError {
    fn from(err: ExpressionError) -> Self {
        Self::Expression(Box::new(err))
    }
}

impl From<OptionError> for BindError {
    fn from(err: OptionError) -> Self {
        Self::Option(Box::new(err))
    }
}

///
/// LimitError
///
/// Configured resource limits tripped during binding. These guard
/// against adversarial query text, not against schema mistakes.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum LimitError {
    /// Expand/select recursion exceeded `max_expand_depth`.
    #[error("expand/select nesting exceeds the configured depth limit of {limit}")]
    DepthExceeded { limit: usize },

    /// A `$select` clause listed more terms than `max_select_terms`.
    #[error("select list exceeds the configured limit of {limit} terms")]
    TooManySelectTerms { limit: usize },
}
