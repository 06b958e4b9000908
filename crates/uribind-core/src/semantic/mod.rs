//! Semantic binding: token trees in, metadata-bound clause trees out.
//!
//! Binding ownership contract:
//! - `select_expand` owns `$select`/`$expand` semantics and the finisher.
//! - `apply` owns the transformation pipeline (aggregate/group-by/compute).
//! - `expression` owns value-expression binding behind the
//!   `ExpressionBinder` seam; higher binders treat it as an opaque callback.
//! - `uri` composes the above into one top-level bind.
//!
//! Each top-level bind owns one `BindingContext`; nested scopes are new
//! independent values, never shared with parents or siblings.

pub mod apply;
pub mod context;
pub mod expression;
pub mod path;
pub mod select_expand;
pub mod uri;

pub use apply::{ApplyBinder, ApplyClause};
pub use context::{BindingContext, RangeVariable};
pub use expression::{ExpressionBinder, ModelExpressionBinder, ValueNode};
pub use path::{ResolvedPath, ResolvedSegment};
pub use uri::{BoundQuery, QueryOptionTokens, UriBinder};
