use super::pattern::{CompiledPattern, Component, Constraint};
use super::{Assembly, RouteMatch};
use crate::error::RouterError;
use crate::params::Params;
use std::collections::HashMap;

/// Placeholder route over path segments, e.g. `/users/:id<int>[/:tab]`.
///
/// See the [pattern grammar](super::pattern) for the syntax. Placeholders
/// match a single segment unless marked as wildcards, captured values are
/// percent-decoded, and route defaults fill params the path left unset.
#[derive(Debug, Clone)]
pub struct Segment {
    pattern: CompiledPattern,
    defaults: Params,
}

impl Segment {
    /// Compile `route`. `constraints` override inline `<...>` constraints.
    pub fn new(
        route: &str,
        constraints: HashMap<String, Constraint>,
        defaults: Params,
    ) -> Result<Self, RouterError> {
        Ok(Self {
            pattern: CompiledPattern::compile(route, Component::Path, &constraints)?,
            defaults,
        })
    }

    #[must_use]
    pub fn route(&self) -> &str {
        self.pattern.source()
    }

    pub fn match_path(&self, path: &str, offset: Option<usize>) -> Option<RouteMatch> {
        let (length, mut params) = match offset {
            None => self.pattern.captures(path, true)?,
            Some(offset) => self.pattern.captures(path.get(offset..)?, false)?,
        };
        params.merge_missing(&self.defaults);
        Some(RouteMatch::new(params, length))
    }

    /// Build the path for `params`, falling back to route defaults.
    ///
    /// `has_child` forces optional groups to be emitted, since a child path
    /// about to be appended would otherwise change meaning.
    pub fn assemble(&self, params: &Params, has_child: bool) -> Result<Assembly, RouterError> {
        let mut merged = self.defaults.clone();
        merged.merge(params);
        self.pattern.build(&merged, &self.defaults, has_child)
    }
}
