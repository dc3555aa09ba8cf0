use crate::params::{ParamValue, Params};
use std::sync::Arc;

/// Result of a successful match: parameters, consumed length and the name
/// path of the route that matched.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    params: Params,
    length: usize,
    matched_route_name: Option<String>,
}

impl RouteMatch {
    #[must_use]
    pub fn new(params: Params, length: usize) -> Self {
        Self {
            params,
            length,
            matched_route_name: None,
        }
    }

    /// Number of path bytes consumed.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    pub fn set_param(&mut self, name: impl Into<Arc<str>>, value: impl Into<ParamValue>) {
        self.params.insert(name, value);
    }

    #[must_use]
    pub fn into_params(self) -> Params {
        self.params
    }

    /// Composite name such as `blog/post/edit`, when matched through a stack.
    #[must_use]
    pub fn matched_route_name(&self) -> Option<&str> {
        self.matched_route_name.as_deref()
    }

    /// Prefix `name` onto the matched route name (`name` or `name/<existing>`).
    pub fn prepend_route_name(&mut self, name: &str) {
        self.matched_route_name = Some(match self.matched_route_name.take() {
            Some(existing) => format!("{name}/{existing}"),
            None => name.to_string(),
        });
    }

    /// Fold a nested match into this one.
    ///
    /// The child's params override ours on collision, lengths add up and the
    /// child's route name replaces ours.
    #[must_use]
    pub fn merge(mut self, child: RouteMatch) -> RouteMatch {
        self.params.merge(&child.params);
        self.length += child.length;
        self.matched_route_name = child.matched_route_name;
        self
    }

    pub(crate) fn fill_defaults(&mut self, defaults: &Params) {
        self.params.merge_missing(defaults);
    }
}
