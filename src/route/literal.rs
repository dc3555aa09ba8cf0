use super::{Assembly, RouteMatch};
use crate::params::Params;

/// Matches an exact piece of path text.
#[derive(Debug, Clone)]
pub struct Literal {
    route: String,
    defaults: Params,
}

impl Literal {
    pub fn new(route: impl Into<String>, defaults: Params) -> Self {
        Self {
            route: route.into(),
            defaults,
        }
    }

    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Without an offset the whole path must equal the literal; with one, the
    /// literal must start exactly at it.
    pub fn match_path(&self, path: &str, offset: Option<usize>) -> Option<RouteMatch> {
        let matched = match offset {
            None => path == self.route,
            Some(offset) => {
                !self.route.is_empty()
                    && path
                        .get(offset..)
                        .is_some_and(|rest| rest.starts_with(&self.route))
            }
        };
        matched.then(|| RouteMatch::new(self.defaults.clone(), self.route.len()))
    }

    pub fn assemble(&self) -> Assembly {
        Assembly::new(self.route.clone(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(route: &str) -> Literal {
        Literal::new(route, Params::new())
    }

    #[test]
    fn full_match_requires_equality() {
        assert_eq!(literal("/foo").match_path("/foo", None).unwrap().length(), 4);
        assert!(literal("/foo").match_path("/foo/bar", None).is_none());
        assert!(literal("/foo").match_path("/fo", None).is_none());
    }

    #[test]
    fn offset_match_is_prefix_at_offset() {
        let route = literal("/bar");
        assert_eq!(route.match_path("/foo/bar/baz", Some(4)).unwrap().length(), 4);
        assert!(route.match_path("/foo/bar", Some(3)).is_none());
        assert!(route.match_path("/foo", Some(10)).is_none());
    }

    #[test]
    fn empty_literal_never_matches_at_offset() {
        assert!(literal("").match_path("/foo", Some(0)).is_none());
    }

    #[test]
    fn defaults_are_returned() {
        let route = Literal::new("/", [("controller", "index")].into_iter().collect());
        let m = route.match_path("/", None).unwrap();
        assert_eq!(m.param("controller").unwrap(), "index");
    }

    #[test]
    fn assembles_verbatim() {
        assert_eq!(literal("/foo").assemble().path(), "/foo");
    }
}
