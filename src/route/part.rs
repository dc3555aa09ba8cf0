use super::{AssembleContext, Assembly, MatchContext, Route, RouteMatch};
use crate::error::RouterError;
use crate::params::Params;
use crate::priority_list::PriorityList;
use crate::request::RequestView;

/// A root route with a prioritized set of child routes.
///
/// The root matches a prefix of the path and the remainder is offered to each
/// child in priority order. A match only counts when root and child together
/// consume the path to its end. With `may_terminate` the root alone is a valid
/// match once it reaches the end of the path.
#[derive(Debug, Clone)]
pub struct Part {
    root: Box<Route>,
    may_terminate: bool,
    children: PriorityList<Route>,
}

impl Part {
    pub fn new(root: impl Into<Route>, may_terminate: bool) -> Self {
        Self {
            root: Box::new(root.into()),
            may_terminate,
            children: PriorityList::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, name: &str, route: impl Into<Route>, priority: i32) -> Self {
        self.add_child(name, route, priority);
        self
    }

    /// Add or replace a child route. Returns the replaced route.
    pub fn add_child(&mut self, name: &str, route: impl Into<Route>, priority: i32) -> Option<Route> {
        self.children.insert(name, route.into(), priority)
    }

    #[must_use]
    pub fn root(&self) -> &Route {
        &self.root
    }

    #[must_use]
    pub fn may_terminate(&self) -> bool {
        self.may_terminate
    }

    #[must_use]
    pub fn children(&self) -> &PriorityList<Route> {
        &self.children
    }

    pub fn match_request(
        &self,
        request: &dyn RequestView,
        offset: Option<usize>,
        ctx: &mut MatchContext,
    ) -> Option<RouteMatch> {
        let offset = offset.unwrap_or(0);
        let Some(root) = self.root.match_request(request, Some(offset), ctx) else {
            if let Route::Method(method) = self.root.as_ref() {
                ctx.record_allowed_if(method.verbs(), |ctx| {
                    self.match_children(request, offset, ctx).is_some()
                });
            }
            return None;
        };
        let next = offset + root.length();

        if self.may_terminate && next == request.path().len() {
            return Some(root);
        }
        let sub = self.match_children(request, next, ctx)?;
        Some(root.merge(sub))
    }

    /// First child that consumes the path from `offset` to its end, named.
    fn match_children(
        &self,
        request: &dyn RequestView,
        offset: usize,
        ctx: &mut MatchContext,
    ) -> Option<RouteMatch> {
        let path_len = request.path().len();
        if ctx.ignores_methods() && self.may_terminate && offset == path_len {
            return Some(RouteMatch::new(Params::new(), 0));
        }
        for (name, child) in &self.children {
            let Some(mut sub) = child.match_request(request, Some(offset), ctx) else {
                continue;
            };
            if offset + sub.length() == path_len {
                sub.prepend_route_name(name);
                return Some(sub);
            }
        }
        None
    }

    /// Assemble the root, then the child named by the context, if any.
    ///
    /// The child sees the params minus those the root substituted.
    pub fn assemble(
        &self,
        params: &Params,
        ctx: &mut AssembleContext<'_>,
    ) -> Result<Assembly, RouterError> {
        let child_name = ctx.take_child();
        ctx.set_has_child(child_name.is_some());
        let mut assembly = self.root.assemble(params, ctx)?;
        ctx.set_has_child(false);

        let Some(child_name) = child_name else {
            if !self.may_terminate {
                return Err(RouterError::PartMayNotTerminate);
            }
            return Ok(assembly);
        };

        let (head, rest) = match child_name.split_once('/') {
            Some((head, rest)) => (head, Some(rest)),
            None => (child_name, None),
        };
        let child = self
            .children
            .get(head)
            .ok_or_else(|| RouterError::RouteNotFound(head.to_string()))?;
        if rest.is_some() && !child.has_children() {
            return Err(RouterError::NoChildRoutes(head.to_string()));
        }

        let remaining = params.without(assembly.assembled_params());
        ctx.set_child(rest);
        let child_assembly = child.assemble(&remaining, ctx)?;
        assembly.append(child_assembly);
        Ok(assembly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use crate::route::{Literal, MethodRoute, Segment};
    use std::collections::HashMap;

    fn segment(route: &str) -> Segment {
        Segment::new(route, HashMap::new(), Params::new()).unwrap()
    }

    fn users(may_terminate: bool) -> Part {
        Part::new(Literal::new("/users", Params::new()), may_terminate)
            .with_child("show", segment("/:id<int>"), 0)
            .with_child("new", Literal::new("/new", Params::new()), 10)
    }

    #[test]
    fn root_alone_requires_may_terminate() {
        assert!(users(false).match_request(&Request::get("/users"), None, &mut MatchContext::new()).is_none());
        let m = users(true)
            .match_request(&Request::get("/users"), None, &mut MatchContext::new())
            .unwrap();
        assert_eq!(m.length(), 6);
        assert_eq!(m.matched_route_name(), None);
    }

    #[test]
    fn child_match_merges_and_names() {
        let m = users(false)
            .match_request(&Request::get("/users/7"), None, &mut MatchContext::new())
            .unwrap();
        assert_eq!(m.length(), 8);
        assert_eq!(m.param("id").unwrap(), &7i64);
        assert_eq!(m.matched_route_name(), Some("show"));
    }

    #[test]
    fn child_must_consume_rest() {
        assert!(users(true)
            .match_request(&Request::get("/users/7/edit"), None, &mut MatchContext::new())
            .is_none());
    }

    #[test]
    fn method_child_records_allowed() {
        let part = Part::new(Literal::new("/items", Params::new()), false).with_child(
            "post",
            MethodRoute::from_verbs("post", Params::new()).unwrap(),
            0,
        );
        let mut ctx = MatchContext::new();
        assert!(part.match_request(&Request::get("/items"), None, &mut ctx).is_none());
        assert_eq!(ctx.allowed_methods(), &[http::Method::POST]);
    }

    #[test]
    fn method_root_rejection_records_allowed() {
        let part = Part::new(MethodRoute::from_verbs("put", Params::new()).unwrap(), false)
            .with_child("item", segment("/:id<int>"), 0);
        let mut ctx = MatchContext::new();
        let request = Request::get("/5");
        assert!(part.match_request(&request, None, &mut ctx).is_none());
        assert_eq!(ctx.allowed_methods(), &[http::Method::PUT]);

        let mut ctx = MatchContext::new();
        assert!(part.match_request(&Request::get("/five"), None, &mut ctx).is_none());
        assert!(ctx.allowed_methods().is_empty());
    }

    #[test]
    fn assemble_names_child() {
        let params: Params = [("id", "7")].into_iter().collect();
        let out = users(false)
            .assemble(&params, &mut AssembleContext::named("show"))
            .unwrap();
        assert_eq!(out.path(), "/users/7");
    }

    #[test]
    fn assemble_without_child() {
        assert_eq!(
            users(false).assemble(&Params::new(), &mut AssembleContext::new()).unwrap_err(),
            RouterError::PartMayNotTerminate
        );
        let out = users(true).assemble(&Params::new(), &mut AssembleContext::new()).unwrap();
        assert_eq!(out.path(), "/users");
    }

    #[test]
    fn assemble_unknown_and_childless() {
        let part = users(true);
        assert_eq!(
            part.assemble(&Params::new(), &mut AssembleContext::named("nope")).unwrap_err(),
            RouterError::RouteNotFound("nope".into())
        );
        assert_eq!(
            part.assemble(&Params::new(), &mut AssembleContext::named("new/deeper")).unwrap_err(),
            RouterError::NoChildRoutes("new".into())
        );
    }

    #[test]
    fn root_optionals_are_forced_when_child_follows() {
        let root = Segment::new(
            "/:lang[/:section]",
            HashMap::new(),
            [("section", "home")].into_iter().collect(),
        )
        .unwrap();
        let part = Part::new(root, true).with_child("page", segment("/:page"), 0);
        let params: Params = [("lang", "en"), ("page", "about")].into_iter().collect();
        let out = part.assemble(&params, &mut AssembleContext::named("page")).unwrap();
        assert_eq!(out.path(), "/en/home/about");
        let out = part.assemble(&params, &mut AssembleContext::new()).unwrap();
        assert_eq!(out.path(), "/en");
    }
}
