use super::pattern::{CompiledPattern, Component, Constraint};
use super::{AssembleContext, Assembly, RouteMatch};
use crate::error::RouterError;
use crate::params::Params;
use crate::request::RequestView;
use std::collections::HashMap;

/// Placeholder route over the host, e.g. `:subdomain.example.com`.
///
/// Uses the segment grammar with `.` as the separator. Matching is
/// case-insensitive, always spans the whole host and consumes no path.
#[derive(Debug, Clone)]
pub struct Hostname {
    pattern: CompiledPattern,
    defaults: Params,
}

impl Hostname {
    pub fn new(
        route: &str,
        constraints: HashMap<String, Constraint>,
        defaults: Params,
    ) -> Result<Self, RouterError> {
        Ok(Self {
            pattern: CompiledPattern::compile(route, Component::Host, &constraints)?,
            defaults,
        })
    }

    #[must_use]
    pub fn route(&self) -> &str {
        self.pattern.source()
    }

    pub fn match_request(&self, request: &dyn RequestView) -> Option<RouteMatch> {
        let (_, mut params) = self.pattern.captures(request.host()?, true)?;
        params.merge_missing(&self.defaults);
        Some(RouteMatch::new(params, 0))
    }

    /// Contributes no path; records the built host for absolute URIs.
    pub fn assemble(
        &self,
        params: &Params,
        ctx: &mut AssembleContext<'_>,
    ) -> Result<Assembly, RouterError> {
        let mut merged = self.defaults.clone();
        merged.merge(params);
        let host = self.pattern.build(&merged, &self.defaults, false)?;
        let used = host.assembled_params().to_vec();
        ctx.set_host(host.into_path());
        Ok(Assembly::new(String::new(), used))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    fn hostname(route: &str) -> Hostname {
        Hostname::new(route, HashMap::new(), Params::new()).unwrap()
    }

    #[test]
    fn extracts_subdomain() {
        let route = hostname(":tenant.example.com");
        let m = route
            .match_request(&Request::get("/x").with_host("acme.example.com"))
            .unwrap();
        assert_eq!(m.length(), 0);
        assert_eq!(m.param("tenant").unwrap(), "acme");
        assert!(route
            .match_request(&Request::get("/x").with_host("a.b.example.com"))
            .is_none());
        assert!(route.match_request(&Request::get("/x")).is_none());
    }

    #[test]
    fn optional_label() {
        let route = hostname("[:sub.]example.com");
        assert!(route
            .match_request(&Request::get("/").with_host("example.com"))
            .is_some());
        assert!(route
            .match_request(&Request::get("/").with_host("www.example.com"))
            .is_some());
    }

    #[test]
    fn assemble_sets_host() {
        let route = hostname(":tenant.example.com");
        let mut ctx = AssembleContext::new();
        let params: Params = [("tenant", "acme")].into_iter().collect();
        let out = route.assemble(&params, &mut ctx).unwrap();
        assert_eq!(out.path(), "");
        assert_eq!(ctx.uri().host.as_deref(), Some("acme.example.com"));
        assert_eq!(out.assembled_params().len(), 1);
    }
}
