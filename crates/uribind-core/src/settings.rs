use crate::{DEFAULT_MAX_EXPAND_DEPTH, DEFAULT_MAX_SELECT_TERMS};
use serde::{Deserialize, Serialize};

///
/// BindSettings
///
/// Parser configuration and limits, fixed for the lifetime of one bind.
///
/// Strategy flags are read once by the expand binder factory; limits are
/// consulted throughout recursion. Defaults match modern protocol
/// semantics with every compatibility quirk switched off.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct BindSettings {
    /// Select the modern default-selection strategy for `$expand`.
    pub use_modern_semantics: bool,
    /// Honor nested query options written inside `$expand` terms.
    pub support_expand_options: bool,
    /// Legacy soft-fail: silently drop expand terms that resolve to a
    /// non-navigation, non-stream property instead of erroring.
    pub lenient_expand_properties: bool,
    /// Maximum expand/select recursion depth.
    pub max_expand_depth: usize,
    /// Maximum number of `$select` terms per clause.
    pub max_select_terms: usize,
}

impl Default for BindSettings {
    fn default() -> Self {
        Self {
            use_modern_semantics: true,
            support_expand_options: true,
            lenient_expand_properties: false,
            max_expand_depth: DEFAULT_MAX_EXPAND_DEPTH,
            max_select_terms: DEFAULT_MAX_SELECT_TERMS,
        }
    }
}

impl BindSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Legacy preset: v3-era default selection plus expand options.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            use_modern_semantics: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_modern_semantics(mut self, on: bool) -> Self {
        self.use_modern_semantics = on;
        self
    }

    #[must_use]
    pub const fn with_expand_options(mut self, on: bool) -> Self {
        self.support_expand_options = on;
        self
    }

    #[must_use]
    pub const fn with_lenient_expand_properties(mut self, on: bool) -> Self {
        self.lenient_expand_properties = on;
        self
    }

    #[must_use]
    pub const fn with_max_expand_depth(mut self, depth: usize) -> Self {
        self.max_expand_depth = depth;
        self
    }

    #[must_use]
    pub const fn with_max_select_terms(mut self, terms: usize) -> Self {
        self.max_select_terms = terms;
        self
    }
}
