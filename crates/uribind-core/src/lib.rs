//! Core runtime for uribind: the metadata model surface, syntactic query
//! option tokens, and the semantic binders that turn those tokens into a
//! fully type-checked, metadata-bound query representation.
//!
//! Binding ownership contract:
//! - `semantic` owns all user-facing binding semantics and emits `BindError`.
//! - `model` is a read-only schema surface; it never validates query text.
//! - `syntax` is inert input produced by an upstream tokenizer.

// public exports are one module level down
pub mod error;
pub mod model;
pub mod semantic;
pub mod settings;
pub mod syntax;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Default bound on expand/select recursion depth.
///
/// This limit is a resource-exhaustion guard against pathological or
/// adversarial deeply-nested query text; exceeding it raises a structured
/// error instead of overflowing the call stack.
pub const DEFAULT_MAX_EXPAND_DEPTH: usize = 8;

/// Default bound on the number of `$select` terms accepted per clause.
pub const DEFAULT_MAX_SELECT_TERMS: usize = 64;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, binders, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{Model, NavigationSource, PrimitiveKind, Property, StructuredType, TypeRef},
        semantic::{
            apply::ApplyClause,
            select_expand::{SelectExpandClause, Selection},
            uri::BoundQuery,
        },
        settings::BindSettings,
        value::Value,
    };
}
