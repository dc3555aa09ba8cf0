use routestack::route::{Constraint, Hostname, Segment};
use routestack::{Params, Request, Route, RouterError};
use std::collections::HashMap;

fn segment(route: &str) -> Segment {
    Segment::new(route, HashMap::new(), Params::new()).unwrap()
}

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

fn assert_match(route: &Segment, path: &str, expected: &[(&str, &str)]) {
    let m = route
        .match_path(path, None)
        .unwrap_or_else(|| panic!("{} should match {path}", route.route()));
    assert_eq!(m.length(), path.len());
    for (key, value) in expected {
        assert_eq!(
            m.param(key).map(ToString::to_string).as_deref(),
            Some(*value),
            "param {key} for {path}"
        );
    }
}

#[test]
fn test_segment_simple_and_nested_optionals() {
    let route = segment("/:controller[/:action[/:id]]");
    assert_match(&route, "/blog", &[("controller", "blog")]);
    assert_match(&route, "/blog/show", &[("controller", "blog"), ("action", "show")]);
    assert_match(
        &route,
        "/blog/show/9",
        &[("controller", "blog"), ("action", "show"), ("id", "9")],
    );
    assert!(route.match_path("/blog/show/9/more", None).is_none());
}

#[test]
fn test_segment_unset_optional_is_absent_from_match() {
    let m = segment("/:a[/:b]").match_path("/x", None).unwrap();
    assert!(m.param("b").is_none());
}

#[test]
fn test_segment_literal_text_between_params() {
    let route = segment("/:year-:month.html");
    assert_match(&route, "/2024-05.html", &[("year", "2024"), ("month", "05")]);
    assert!(route.match_path("/2024-05.htm", None).is_none());
}

#[test]
fn test_segment_constraint_keywords() {
    let uuid = segment("/orders/:id<uuid>");
    assert!(uuid
        .match_path("/orders/123e4567-e89b-12d3-a456-426614174000", None)
        .is_some());
    assert!(uuid.match_path("/orders/not-a-uuid", None).is_none());

    let slug = segment("/posts/:slug<slug>");
    assert!(slug.match_path("/posts/hello-world-2", None).is_some());
    assert!(slug.match_path("/posts/hello.world", None).is_none());

    let alpha = segment("/:name<alpha>");
    assert!(alpha.match_path("/abc", None).is_some());
    assert!(alpha.match_path("/abc1", None).is_none());
}

#[test]
fn test_segment_constraints_option_overrides_inline() {
    let mut constraints = HashMap::new();
    constraints.insert("id".to_string(), Constraint::parse("[a-f]+"));
    let route = Segment::new("/:id<int>", constraints, Params::new()).unwrap();
    assert!(route.match_path("/12", None).is_none());
    assert!(route.match_path("/beef", None).is_some());
}

#[test]
fn test_segment_decodes_once() {
    let route = segment("/:q");
    assert_match(&route, "/%2523", &[("q", "%23")]);
    assert_match(&route, "/a%3Fb%23c", &[("q", "a?b#c")]);
}

#[test]
fn test_segment_assemble_round_trip() {
    let route = segment("/search/:q[/page/:page]");
    let out = route
        .assemble(&params(&[("q", "rust lang/1"), ("page", "3")]), false)
        .unwrap();
    assert_eq!(out.path(), "/search/rust%20lang%2F1/page/3");
    assert_match(&route, out.path(), &[("q", "rust lang/1"), ("page", "3")]);
}

#[test]
fn test_segment_assemble_optional_with_later_required() {
    let route = segment("/a[/:b/:c]");
    let out = route.assemble(&params(&[("b", "1")]), false);
    assert_eq!(out.unwrap().path(), "/a");
    let out = route.assemble(&params(&[("b", "1"), ("c", "2")]), false).unwrap();
    assert_eq!(out.path(), "/a/1/2");
}

#[test]
fn test_segment_assemble_missing_required() {
    let err = segment("/:a/:b").assemble(&params(&[("a", "1")]), false).unwrap_err();
    assert_eq!(err, RouterError::MissingParameter("b".into()));
    assert_eq!(err.kind(), routestack::ErrorKind::Assembly);
}

#[test]
fn test_segment_invalid_patterns() {
    assert!(matches!(
        Segment::new("/:a[", HashMap::new(), Params::new()),
        Err(RouterError::InvalidPattern { .. })
    ));
    assert!(matches!(
        Segment::new("/:a/:a", HashMap::new(), Params::new()),
        Err(RouterError::InvalidPattern { .. })
    ));
}

#[test]
fn test_hostname_route_through_enum() {
    let route: Route = Hostname::new(
        ":sub.example.:tld",
        HashMap::new(),
        params(&[("tld", "com")]),
    )
    .unwrap()
    .into();
    let req = Request::get("/").with_host("API.Example.org");
    let m = route.matches(&req, None).unwrap();
    assert_eq!(m.length(), 0);
    assert_eq!(m.param("sub").unwrap(), "API");
    assert_eq!(m.param("tld").unwrap(), "org");
    assert!(route
        .matches(&Request::get("/").with_host("example.org"), None)
        .is_none());
}
