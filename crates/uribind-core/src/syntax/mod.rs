//! Syntactic token trees produced by an upstream tokenizer.
//!
//! Token contract:
//! - tokens are inert data: no schema lookups, no validation, no text.
//! - the binders never re-tokenize; malformed shapes surface as structured
//!   binding errors, not parse errors.

pub mod apply;
pub mod expr;
pub mod path;
pub mod select_expand;

pub use apply::{
    AggregateExprToken, AggregateToken, AggregationMethod, ApplyToken, ComputeExprToken,
    ComputeToken, GroupByToken, TransformationToken,
};
pub use expr::{ArithOp, CompareOp, ExprToken, LogicalOp};
pub use path::PathSegmentToken;
pub use select_expand::{
    ExpandTermToken, ExpandToken, LevelsToken, OrderByDirection, SelectTermToken, SelectToken,
};
