//! # Route Module
//!
//! Every route kind implements the same two operations:
//!
//! - **match**: try to match a request starting at an optional path offset,
//!   returning a [`RouteMatch`] (consumed length plus extracted params) or
//!   `None`
//! - **assemble**: build the path fragment for a set of params, reporting
//!   which params it consumed
//!
//! The kinds form a closed set behind [`Route`]:
//!
//! | Kind | Matches against | Length consumed |
//! |------|-----------------|-----------------|
//! | [`Literal`] | exact path text | literal length |
//! | [`Segment`] | `/:name[/:optional]` patterns | matched text |
//! | [`RegexRoute`] | a regex with named groups | matched text |
//! | [`Scheme`] | URI scheme | 0 |
//! | [`MethodRoute`] | HTTP method | 0 |
//! | [`Hostname`] | host, `:sub.example.com` patterns | 0 |
//! | [`Part`] | root route, then prioritized children | root + child |
//! | [`Chain`] | routes back to back | sum |
//! | [`RouteStack`] | first child in priority order | child |
//!
//! ## Offsets
//!
//! `offset = None` means "the whole path": the route must consume all of it.
//! `offset = Some(n)` means "starting at byte `n`": the route may stop
//! anywhere, and the caller checks whether the path was fully consumed. Part,
//! Chain and the router use the second form to compose routes.
//!
//! Routes are immutable once built. Per-call state (the set of methods a
//! rejected request would have been allowed, the scheme and host collected
//! while assembling) lives in [`MatchContext`] and [`AssembleContext`].

mod chain;
mod hostname;
mod literal;
mod method;
mod part;
pub(crate) mod pattern;
mod regex_route;
mod route_match;
mod scheme;
mod segment;
mod stack;

pub use chain::Chain;
pub use hostname::Hostname;
pub use literal::Literal;
pub use method::MethodRoute;
pub use part::Part;
pub use pattern::Constraint;
pub use regex_route::RegexRoute;
pub use route_match::RouteMatch;
pub use scheme::Scheme;
pub use segment::Segment;
pub use stack::RouteStack;

use crate::error::RouterError;
use crate::params::Params;
use crate::request::RequestView;
use http::Method;
use std::sync::Arc;

/// Per-call diagnostics gathered while matching.
#[derive(Debug, Clone, Default)]
pub struct MatchContext {
    allowed_methods: Vec<Method>,
    ignore_methods: bool,
}

impl MatchContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember methods a method route would have accepted.
    pub fn record_allowed(&mut self, methods: &[Method]) {
        for method in methods {
            if !self.allowed_methods.contains(method) {
                self.allowed_methods.push(method.clone());
            }
        }
    }

    /// While set, method routes accept every request.
    pub(crate) fn ignores_methods(&self) -> bool {
        self.ignore_methods
    }

    /// Record `methods` if `rest` matches with method checks switched off.
    ///
    /// Used when a method route rejected the request before the rest of the
    /// path was tried: the verbs only count as allowed when nothing but the
    /// method stood in the way.
    pub(crate) fn record_allowed_if(
        &mut self,
        methods: &[Method],
        rest: impl FnOnce(&mut Self) -> bool,
    ) {
        if self.ignore_methods {
            return;
        }
        self.ignore_methods = true;
        let reaches_end = rest(&mut *self);
        self.ignore_methods = false;
        if reaches_end {
            self.record_allowed(methods);
        }
    }

    /// Methods that would have matched, in the order first seen.
    #[must_use]
    pub fn allowed_methods(&self) -> &[Method] {
        &self.allowed_methods
    }

    #[must_use]
    pub fn into_allowed_methods(self) -> Vec<Method> {
        self.allowed_methods
    }
}

/// Scheme and host set by [`Scheme`] and [`Hostname`] routes during assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriParts {
    pub scheme: Option<String>,
    pub host: Option<String>,
}

/// Per-call state threaded through assembly.
#[derive(Debug, Clone, Default)]
pub struct AssembleContext<'a> {
    child: Option<&'a str>,
    has_child: bool,
    uri: UriParts,
}

impl<'a> AssembleContext<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for assembling `name`, which may be composite (`parent/child`)
    /// when handed to a [`RouteStack`] or [`Part`].
    #[must_use]
    pub fn named(name: &'a str) -> Self {
        Self {
            child: Some(name),
            ..Self::default()
        }
    }

    /// Whether a child route will be appended after the current one.
    #[must_use]
    pub fn has_child(&self) -> bool {
        self.has_child
    }

    #[must_use]
    pub fn uri(&self) -> &UriParts {
        &self.uri
    }

    #[must_use]
    pub fn into_uri(self) -> UriParts {
        self.uri
    }

    pub(crate) fn take_child(&mut self) -> Option<&'a str> {
        self.child.take()
    }

    pub(crate) fn set_child(&mut self, child: Option<&'a str>) {
        self.child = child;
    }

    pub(crate) fn set_has_child(&mut self, has_child: bool) {
        self.has_child = has_child;
    }

    pub(crate) fn set_scheme(&mut self, scheme: &str) {
        self.uri.scheme = Some(scheme.to_string());
    }

    pub(crate) fn set_host(&mut self, host: String) {
        self.uri.host = Some(host);
    }
}

/// Output of assembling a route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    path: String,
    assembled_params: Vec<Arc<str>>,
}

impl Assembly {
    #[must_use]
    pub fn new(path: String, assembled_params: Vec<Arc<str>>) -> Self {
        Self {
            path,
            assembled_params,
        }
    }

    pub(crate) fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn into_path(self) -> String {
        self.path
    }

    /// Names of the params this route substituted, in substitution order.
    #[must_use]
    pub fn assembled_params(&self) -> &[Arc<str>] {
        &self.assembled_params
    }

    /// Append a following fragment, e.g. a child route's output.
    pub(crate) fn append(&mut self, next: Assembly) {
        self.path.push_str(&next.path);
        for name in next.assembled_params {
            if !self.assembled_params.contains(&name) {
                self.assembled_params.push(name);
            }
        }
    }
}

/// A route of any kind.
#[derive(Debug, Clone)]
pub enum Route {
    Literal(Literal),
    Segment(Segment),
    Regex(RegexRoute),
    Scheme(Scheme),
    Method(MethodRoute),
    Hostname(Hostname),
    Part(Part),
    Chain(Chain),
    Stack(RouteStack),
}

impl Route {
    /// Try to match `request` starting at `offset`.
    pub fn match_request(
        &self,
        request: &dyn RequestView,
        offset: Option<usize>,
        ctx: &mut MatchContext,
    ) -> Option<RouteMatch> {
        match self {
            Route::Literal(route) => route.match_path(request.path(), offset),
            Route::Segment(route) => route.match_path(request.path(), offset),
            Route::Regex(route) => route.match_path(request.path(), offset),
            Route::Scheme(route) => route.match_request(request),
            Route::Method(route) => route.match_request(request, offset, ctx),
            Route::Hostname(route) => route.match_request(request),
            Route::Part(route) => route.match_request(request, offset, ctx),
            Route::Chain(route) => route.match_request(request, offset, ctx),
            Route::Stack(route) => route.match_request(request, offset, ctx),
        }
    }

    /// [`Route::match_request`] with a throwaway context.
    pub fn matches(&self, request: &dyn RequestView, offset: Option<usize>) -> Option<RouteMatch> {
        self.match_request(request, offset, &mut MatchContext::new())
    }

    /// Assemble the fragment for `params`.
    pub fn assemble(
        &self,
        params: &Params,
        ctx: &mut AssembleContext<'_>,
    ) -> Result<Assembly, RouterError> {
        match self {
            Route::Literal(route) => Ok(route.assemble()),
            Route::Segment(route) => route.assemble(params, ctx.has_child()),
            Route::Regex(route) => route.assemble(params),
            Route::Scheme(route) => Ok(route.assemble(ctx)),
            Route::Method(_) => Ok(Assembly::empty()),
            Route::Hostname(route) => route.assemble(params, ctx),
            Route::Part(route) => route.assemble(params, ctx),
            Route::Chain(route) => route.assemble(params, ctx),
            Route::Stack(route) => route.assemble(params, ctx),
        }
    }

    /// [`Route::assemble`] with a fresh, unnamed context.
    pub fn assemble_params(&self, params: &Params) -> Result<Assembly, RouterError> {
        self.assemble(params, &mut AssembleContext::new())
    }

    /// Type identifier, as used by [`RouteFactory`](crate::factory::RouteFactory).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Route::Literal(_) => "literal",
            Route::Segment(_) => "segment",
            Route::Regex(_) => "regex",
            Route::Scheme(_) => "scheme",
            Route::Method(_) => "method",
            Route::Hostname(_) => "hostname",
            Route::Part(_) => "part",
            Route::Chain(_) => "chain",
            Route::Stack(_) => "stack",
        }
    }

    /// Whether composite names (`this/child`) can descend into this route.
    #[must_use]
    pub fn has_children(&self) -> bool {
        matches!(self, Route::Part(_) | Route::Stack(_))
    }
}

macro_rules! impl_from_route_kind {
    ($($kind:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$kind> for Route {
                fn from(route: $kind) -> Self {
                    Route::$variant(route)
                }
            }
        )*
    };
}

impl_from_route_kind! {
    Literal => Literal,
    Segment => Segment,
    RegexRoute => Regex,
    Scheme => Scheme,
    MethodRoute => Method,
    Hostname => Hostname,
    Part => Part,
    Chain => Chain,
    RouteStack => Stack,
}
