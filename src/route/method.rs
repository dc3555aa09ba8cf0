use super::{MatchContext, RouteMatch};
use crate::error::RouterError;
use crate::params::Params;
use crate::request::RequestView;
use http::Method;

/// Matches the request method against an allowed set. Consumes no path.
///
/// A request rejected at the end of its path (or with no offset, where the
/// route stands for the whole request) records the allowed set in the
/// [`MatchContext`] so the caller can answer `405 Method Not Allowed` with an
/// `Allow` header. With path left over, the enclosing [`Part`](super::Part)
/// or [`Chain`](super::Chain) decides whether the rest would have matched.
#[derive(Debug, Clone)]
pub struct MethodRoute {
    verbs: Vec<Method>,
    defaults: Params,
}

impl MethodRoute {
    pub fn new(verbs: Vec<Method>, defaults: Params) -> Self {
        Self { verbs, defaults }
    }

    /// Parse a comma separated verb list such as `"get, post"`.
    pub fn from_verbs(verbs: &str, defaults: Params) -> Result<Self, RouterError> {
        let mut parsed = Vec::new();
        for verb in verbs.split(',').map(str::trim).filter(|v| !v.is_empty()) {
            let method = Method::from_bytes(verb.to_ascii_uppercase().as_bytes())
                .map_err(|e| RouterError::invalid_option("method", "verb", e))?;
            if !parsed.contains(&method) {
                parsed.push(method);
            }
        }
        if parsed.is_empty() {
            return Err(RouterError::invalid_option(
                "method",
                "verb",
                "no HTTP methods given",
            ));
        }
        Ok(Self::new(parsed, defaults))
    }

    #[must_use]
    pub fn verbs(&self) -> &[Method] {
        &self.verbs
    }

    pub fn match_request(
        &self,
        request: &dyn RequestView,
        offset: Option<usize>,
        ctx: &mut MatchContext,
    ) -> Option<RouteMatch> {
        if ctx.ignores_methods() || self.accepts(request.method()) {
            return Some(RouteMatch::new(self.defaults.clone(), 0));
        }
        if !matches!(offset, Some(offset) if offset != request.path().len()) {
            ctx.record_allowed(&self.verbs);
        }
        None
    }

    fn accepts(&self, requested: &str) -> bool {
        self.verbs
            .iter()
            .any(|verb| verb.as_str().eq_ignore_ascii_case(requested))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    #[test]
    fn parses_and_normalizes_verbs() {
        let route = MethodRoute::from_verbs(" get ,POST,get", Params::new()).unwrap();
        assert_eq!(route.verbs(), &[Method::GET, Method::POST]);
    }

    #[test]
    fn rejects_empty_verb_list() {
        assert!(MethodRoute::from_verbs(" , ", Params::new()).is_err());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let route = MethodRoute::from_verbs("get", Params::new()).unwrap();
        let mut ctx = MatchContext::new();
        assert!(route.match_request(&Request::get("/"), Some(1), &mut ctx).is_some());
        assert!(ctx.allowed_methods().is_empty());
    }

    #[test]
    fn mismatch_records_allowed_methods() {
        let route = MethodRoute::from_verbs("GET,PUT", Params::new()).unwrap();
        let mut ctx = MatchContext::new();
        assert!(route
            .match_request(&Request::new(Method::DELETE, "/"), Some(1), &mut ctx)
            .is_none());
        assert_eq!(ctx.allowed_methods(), &[Method::GET, Method::PUT]);
    }

    #[test]
    fn mismatch_without_offset_is_recorded() {
        let route = MethodRoute::from_verbs("GET", Params::new()).unwrap();
        let mut ctx = MatchContext::new();
        let request = Request::new(Method::DELETE, "/items/3");
        assert!(route.match_request(&request, None, &mut ctx).is_none());
        assert_eq!(ctx.allowed_methods(), &[Method::GET]);
    }

    #[test]
    fn ignored_methods_accept_any_verb() {
        let route = MethodRoute::from_verbs("GET", Params::new()).unwrap();
        let mut ctx = MatchContext::new();
        let request = Request::new(Method::DELETE, "/");
        let mut matched = false;
        ctx.record_allowed_if(&[Method::HEAD], |ctx| {
            matched = route.match_request(&request, Some(1), ctx).is_some();
            matched
        });
        assert!(matched);
        assert_eq!(ctx.allowed_methods(), &[Method::HEAD]);
        assert!(route.match_request(&request, Some(0), &mut ctx).is_none());
    }

    #[test]
    fn mismatch_with_remaining_path_is_not_recorded() {
        let route = MethodRoute::from_verbs("GET", Params::new()).unwrap();
        let mut ctx = MatchContext::new();
        let request = Request::new(Method::DELETE, "/items/3");
        assert!(route.match_request(&request, Some(6), &mut ctx).is_none());
        assert!(ctx.allowed_methods().is_empty());
    }
}
