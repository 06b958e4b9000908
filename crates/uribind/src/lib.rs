//! Facade crate for uribind.
//!
//! ## Crate layout
//! - `core::model`: the read-only entity metadata surface.
//! - `core::syntax`: inert query option tokens produced upstream.
//! - `core::semantic`: the binders turning tokens into bound clause trees.
//!
//! The `prelude` module mirrors the surface a host service needs to bind
//! one request end to end.

pub use uribind_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::error::BindError;

///
/// Host Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        model::{Model, NavigationSource, PrimitiveKind, Property, StructuredType, TypeRef},
        semantic::{
            apply::ApplyClause,
            select_expand::{SelectExpandClause, Selection},
            uri::{BoundQuery, QueryOptionTokens, UriBinder},
            ExpressionBinder as _, ModelExpressionBinder,
        },
        settings::BindSettings,
        value::Value,
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn version_is_wired_through() {
        assert_eq!(crate::VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn prelude_binds_a_request_end_to_end() {
        let model = Model::builder()
            .structured_type(
                StructuredType::entity("Shop", "Item").with_property(Property::structural(
                    "Label",
                    TypeRef::primitive(PrimitiveKind::String),
                )),
            )
            .navigation_source(NavigationSource::new("Items", "Shop.Item"))
            .build();

        let settings = BindSettings::default();
        let expressions = ModelExpressionBinder::new(&model);
        let binder = UriBinder::new(&model, &settings, &expressions);

        let query = binder
            .bind("Items", &QueryOptionTokens::default())
            .expect("empty request binds");
        assert!(query.select_expand.is_none());
    }
}
