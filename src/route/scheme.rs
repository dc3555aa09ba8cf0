use super::{AssembleContext, Assembly, RouteMatch};
use crate::params::Params;
use crate::request::RequestView;

/// Matches the URI scheme exactly (case-sensitive). Consumes no path.
#[derive(Debug, Clone)]
pub struct Scheme {
    scheme: String,
    defaults: Params,
}

impl Scheme {
    pub fn new(scheme: impl Into<String>, defaults: Params) -> Self {
        Self {
            scheme: scheme.into(),
            defaults,
        }
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn match_request(&self, request: &dyn RequestView) -> Option<RouteMatch> {
        (request.scheme() == Some(self.scheme.as_str()))
            .then(|| RouteMatch::new(self.defaults.clone(), 0))
    }

    /// Contributes no path; records the scheme for absolute URIs.
    pub fn assemble(&self, ctx: &mut AssembleContext<'_>) -> Assembly {
        ctx.set_scheme(&self.scheme);
        Assembly::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    #[test]
    fn matches_scheme_only() {
        let route = Scheme::new("https", Params::new());
        let secure = Request::get("/").with_scheme("https");
        let plain = Request::get("/").with_scheme("http");
        assert_eq!(route.match_request(&secure).unwrap().length(), 0);
        assert!(route.match_request(&plain).is_none());
        assert!(route.match_request(&Request::get("/")).is_none());
        assert!(route
            .match_request(&Request::get("/").with_scheme("HTTPS"))
            .is_none());
    }

    #[test]
    fn assemble_sets_scheme() {
        let mut ctx = AssembleContext::new();
        let out = Scheme::new("https", Params::new()).assemble(&mut ctx);
        assert_eq!(out.path(), "");
        assert_eq!(ctx.uri().scheme.as_deref(), Some("https"));
    }
}
