use super::{AssembleContext, Assembly, MatchContext, Route, RouteMatch};
use crate::error::RouterError;
use crate::params::Params;
use crate::priority_list::PriorityList;
use crate::request::RequestView;

/// Named routes tried in priority order, plus default params.
///
/// This is the aggregate the router is built on; it can also be nested as a
/// route of its own, in which case composite names descend into it.
#[derive(Debug, Clone, Default)]
pub struct RouteStack {
    routes: PriorityList<Route>,
    default_params: Params,
}

impl RouteStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a route. Returns the replaced route.
    pub fn add_route(&mut self, name: &str, route: impl Into<Route>, priority: i32) -> Option<Route> {
        self.routes.insert(name, route.into(), priority)
    }

    pub fn remove_route(&mut self, name: &str) -> Option<Route> {
        self.routes.remove(name)
    }

    #[must_use]
    pub fn route(&self, name: &str) -> Option<&Route> {
        self.routes.get(name)
    }

    #[must_use]
    pub fn routes(&self) -> &PriorityList<Route> {
        &self.routes
    }

    #[must_use]
    pub fn default_params(&self) -> &Params {
        &self.default_params
    }

    pub fn set_default_params(&mut self, params: Params) {
        self.default_params = params;
    }

    pub fn set_default_param(&mut self, name: &str, value: impl Into<crate::params::ParamValue>) {
        self.default_params.insert(name, value);
    }

    /// First route in priority order that matches wins.
    pub fn match_request(
        &self,
        request: &dyn RequestView,
        offset: Option<usize>,
        ctx: &mut MatchContext,
    ) -> Option<RouteMatch> {
        self.routes.iter().find_map(|(name, route)| {
            let mut matched = route.match_request(request, offset, ctx)?;
            matched.prepend_route_name(name);
            matched.fill_defaults(&self.default_params);
            Some(matched)
        })
    }

    /// Assemble the route named by the context (`name` or `name/child/..`).
    pub fn assemble(
        &self,
        params: &Params,
        ctx: &mut AssembleContext<'_>,
    ) -> Result<Assembly, RouterError> {
        let name = ctx.take_child().ok_or(RouterError::MissingRouteName)?;
        let (head, rest) = match name.split_once('/') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };
        let route = self
            .routes
            .get(head)
            .ok_or_else(|| RouterError::RouteNotFound(head.to_string()))?;
        if rest.is_some() && !route.has_children() {
            return Err(RouterError::NoChildRoutes(head.to_string()));
        }

        let mut merged = self.default_params.clone();
        merged.merge(params);
        ctx.set_child(rest);
        route.assemble(&merged, ctx)
    }
}
