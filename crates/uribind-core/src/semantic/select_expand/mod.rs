//! `$select`/`$expand` binding: clause model, binder family, finisher.
//!
//! Ownership contract:
//! - `expand` owns expand-term semantics and strategy selection.
//! - `select` owns select-term resolution and clause decoration.
//! - `finish` owns legacy-strategy pruning; it is skipped under the
//!   modern strategy, whose path-selection decoration makes pruning moot.

pub mod clause;
pub mod expand;
pub mod finish;
pub mod select;

#[cfg(test)]
mod tests_property;

pub use clause::{
    ExpandedNavigationItem, LevelsClause, OrderByItem, SelectExpandClause, SelectItem, Selection,
};
pub use expand::{ExpandBinder, ExpandBinderFactory, ExpandStrategy};
pub use finish::prune;
pub use select::SelectBinder;
