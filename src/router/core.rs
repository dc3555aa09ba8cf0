use crate::config::{RouteSpec, RouterConfig};
use crate::encoding;
use crate::error::RouterError;
use crate::factory::RouteFactory;
use crate::params::{ParamValue, Params};
use crate::request::RequestView;
use crate::route::{AssembleContext, MatchContext, Route, RouteMatch, RouteStack};
use http::Method;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of [`Router::route`].
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Matched(RouteMatch),
    /// No route matched, but method routes on the way rejected the request;
    /// `allowed` lists what they would have accepted
    MethodNotAllowed { allowed: Vec<Method> },
    NotFound,
}

impl RouteOutcome {
    #[must_use]
    pub fn into_match(self) -> Option<RouteMatch> {
        match self {
            RouteOutcome::Matched(m) => Some(m),
            _ => None,
        }
    }
}

/// Options for [`Router::assemble`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Always produce `scheme://host/path`, even without scheme or hostname routes
    pub force_canonical: bool,
    /// Query pairs, form-encoded after `?`
    pub query: Vec<(String, String)>,
    pub fragment: Option<String>,
    /// Scheme of the current request, used to complete absolute URIs
    pub scheme: Option<String>,
    /// Host of the current request, used to complete absolute URIs
    pub host: Option<String>,
}

impl AssembleOptions {
    /// Options that complete absolute URIs from `request`.
    pub fn for_request(request: &dyn RequestView) -> Self {
        Self {
            scheme: request.scheme().map(str::to_string),
            host: request.host().map(str::to_string),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn canonical(mut self) -> Self {
        self.force_canonical = true;
        self
    }

    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }
}

/// Frozen set of named routes.
///
/// Built with [`RouterBuilder`]; immutable afterwards and safe to share
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct Router {
    stack: RouteStack,
    base_url: String,
}

impl Router {
    #[must_use]
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Build a router from a parsed config using the built-in route kinds.
    pub fn from_config(config: &RouterConfig) -> Result<Self, RouterError> {
        Self::from_config_with(config, &RouteFactory::default())
    }

    pub fn from_config_with(
        config: &RouterConfig,
        factory: &RouteFactory,
    ) -> Result<Self, RouterError> {
        let mut builder = RouterBuilder::new()
            .base_url(&config.base_url)
            .default_params(config.default_params.clone());
        for (name, spec) in config.routes.iter() {
            builder = builder.add_route(name, factory.from_spec(spec)?, spec.priority.unwrap_or(0));
        }
        Ok(builder.build())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn default_params(&self) -> &Params {
        self.stack.default_params()
    }

    #[must_use]
    pub fn route_by_name(&self, name: &str) -> Option<&Route> {
        self.stack.route(name)
    }

    /// Top-level route names in match order.
    pub fn route_names(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.stack.routes().names()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.routes().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.routes().is_empty()
    }

    /// Match `request`, returning `None` when nothing matched.
    #[must_use]
    pub fn match_request(&self, request: &dyn RequestView) -> Option<RouteMatch> {
        self.match_with(request, &mut MatchContext::new())
    }

    /// Match `request`, distinguishing "not found" from "method not allowed".
    #[must_use]
    pub fn route(&self, request: &dyn RequestView) -> RouteOutcome {
        let mut ctx = MatchContext::new();
        if let Some(matched) = self.match_with(request, &mut ctx) {
            return RouteOutcome::Matched(matched);
        }
        let allowed = ctx.into_allowed_methods();
        if allowed.is_empty() {
            return RouteOutcome::NotFound;
        }
        debug!(
            method = %request.method(),
            path = %request.path(),
            allowed = ?allowed,
            "Method not allowed"
        );
        RouteOutcome::MethodNotAllowed { allowed }
    }

    fn match_with(&self, request: &dyn RequestView, ctx: &mut MatchContext) -> Option<RouteMatch> {
        let path = request.path();
        debug!(
            method = %request.method(),
            path = %path,
            "Route match attempt"
        );
        let match_start = Instant::now();

        let result = self.match_routes(request, ctx);
        let match_duration = match_start.elapsed();

        match &result {
            Some(matched) => {
                let route_name = matched.matched_route_name().unwrap_or_default();
                if match_duration > Duration::from_millis(1) {
                    warn!(
                        method = %request.method(),
                        path = %path,
                        route_name = %route_name,
                        duration_us = match_duration.as_micros(),
                        "Slow route matching detected"
                    );
                } else {
                    info!(
                        method = %request.method(),
                        path = %path,
                        route_name = %route_name,
                        path_params = ?matched.params(),
                        duration_us = match_duration.as_micros(),
                        "Route matched"
                    );
                }
            }
            None => debug!(
                method = %request.method(),
                path = %path,
                duration_us = match_duration.as_micros(),
                "No route matched"
            ),
        }
        result
    }

    fn match_routes(&self, request: &dyn RequestView, ctx: &mut MatchContext) -> Option<RouteMatch> {
        let path = request.path();
        if !path.starts_with(&self.base_url) {
            return None;
        }
        // No base URL: each route spans the whole request on its own.
        let offset = (!self.base_url.is_empty()).then_some(self.base_url.len());
        let remaining = path.len() - self.base_url.len();

        for (name, route) in self.stack.routes() {
            let Some(mut matched) = route.match_request(request, offset, ctx) else {
                continue;
            };
            if offset.is_some() && matched.length() != remaining {
                continue;
            }
            matched.prepend_route_name(name);
            matched.fill_defaults(self.stack.default_params());
            return Some(matched);
        }
        None
    }

    /// Assemble the URI for route `name` (`parent/child` for nested routes).
    ///
    /// Router default params sit under `params`. The result is a path
    /// prefixed by the base URL, or an absolute URI when
    /// `options.force_canonical` is set or a scheme or hostname route
    /// contributed a component. Missing components are taken from
    /// `options`; if still unknown the call fails with
    /// [`RouterError::MissingRequestUri`].
    pub fn assemble(
        &self,
        name: &str,
        params: &Params,
        options: &AssembleOptions,
    ) -> Result<String, RouterError> {
        let mut ctx = AssembleContext::named(name);
        let assembly = self.stack.assemble(params, &mut ctx)?;
        let uri = ctx.into_uri();

        let path = format!("{}{}", self.base_url, assembly.path());
        let mut out = if options.force_canonical || uri.scheme.is_some() || uri.host.is_some() {
            let scheme = uri
                .scheme
                .or_else(|| options.scheme.clone())
                .ok_or(RouterError::MissingRequestUri)?;
            let host = uri
                .host
                .or_else(|| options.host.clone())
                .ok_or(RouterError::MissingRequestUri)?;
            format!("{scheme}://{host}{path}")
        } else {
            path
        };

        if !options.query.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&options.query)
                .finish();
            out.push('?');
            out.push_str(&query);
        }
        if let Some(fragment) = &options.fragment {
            out.push('#');
            out.push_str(&encoding::encode_path(fragment));
        }
        Ok(out)
    }
}

/// Mutable route collection that freezes into a [`Router`].
#[derive(Debug, Default)]
pub struct RouterBuilder {
    stack: RouteStack,
    base_url: String,
    factory: Option<RouteFactory>,
}

impl RouterBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix for every route. Trailing slashes are dropped.
    #[must_use]
    pub fn base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = base_url.as_ref().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn default_param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.stack.set_default_param(name, value);
        self
    }

    #[must_use]
    pub fn default_params(mut self, params: Params) -> Self {
        self.stack.set_default_params(params);
        self
    }

    /// Factory used by [`RouterBuilder::add_route_spec`]; defaults to the
    /// built-in kinds.
    #[must_use]
    pub fn factory(mut self, factory: RouteFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    #[must_use]
    pub fn add_route(mut self, name: &str, route: impl Into<Route>, priority: i32) -> Self {
        if self.stack.add_route(name, route, priority).is_some() {
            warn!(route_name = %name, "Route replaced while building router");
        }
        self
    }

    /// Construct a route from `spec` and add it under `name`.
    pub fn add_route_spec(self, name: &str, spec: &RouteSpec) -> Result<Self, RouterError> {
        let route = match &self.factory {
            Some(factory) => factory.from_spec(spec)?,
            None => RouteFactory::default().from_spec(spec)?,
        };
        Ok(self.add_route(name, route, spec.priority.unwrap_or(0)))
    }

    #[must_use]
    pub fn build(self) -> Router {
        let router = Router {
            stack: self.stack,
            base_url: self.base_url,
        };
        let routes_summary: Vec<&str> = router.route_names().take(10).collect();
        info!(
            routes_count = router.len(),
            base_url = %router.base_url,
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );
        router
    }
}
