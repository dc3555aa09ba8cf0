use routestack::{
    AssembleOptions, Params, Request, RouteFactory, RouteOptions, RouteOutcome, Router,
    RouterConfig, RouterError, SharedRouter,
};
use std::io::Write;

const YAML: &str = r#"
base_url: /shop
default_params:
  currency: EUR
routes:
  home:
    type: literal
    options:
      route: /
      defaults: { page: home }
  catalog:
    type: segment
    priority: 5
    options:
      route: "/catalog[/:category<slug>]"
      defaults: { category: all }
    may_terminate: true
    child_routes:
      product:
        type: regex
        options:
          regex: "/(?<sku>[A-Z]{3}-\\d+)"
          spec: "/%sku%"
  cart:
    type: literal
    options: { route: /cart }
    child_routes:
      view:
        type: method
        options: { verb: "get, head" }
      add:
        type: method
        options: { verb: post }
"#;

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_load_yaml_file() {
    let file = write_temp(".yaml", YAML);
    let config = RouterConfig::load(file.path()).unwrap();
    let router = Router::from_config(&config).unwrap();

    let names: Vec<&str> = router.route_names().collect();
    assert_eq!(names, ["catalog", "home", "cart"]);

    let m = router.match_request(&Request::get("/shop/")).unwrap();
    assert_eq!(m.matched_route_name(), Some("home"));
    assert_eq!(m.param("currency").unwrap(), "EUR");

    let m = router.match_request(&Request::get("/shop/catalog")).unwrap();
    assert_eq!(m.matched_route_name(), Some("catalog"));
    assert_eq!(m.param("category").unwrap(), "all");

    let m = router
        .match_request(&Request::get("/shop/catalog/shoes/ABC-12"))
        .unwrap();
    assert_eq!(m.matched_route_name(), Some("catalog/product"));
    assert_eq!(m.param("category").unwrap(), "shoes");
    assert_eq!(m.param("sku").unwrap(), "ABC-12");

    match router.route(&Request::new(http::Method::DELETE, "/shop/cart")) {
        RouteOutcome::MethodNotAllowed { allowed } => assert_eq!(
            allowed,
            vec![http::Method::GET, http::Method::HEAD, http::Method::POST]
        ),
        other => panic!("expected MethodNotAllowed, got {other:?}"),
    }
}

#[test]
fn test_config_assemble_from_yaml() {
    let router = Router::from_config(&RouterConfig::from_yaml_str(YAML).unwrap()).unwrap();
    let opts = AssembleOptions::default();
    let sku: Params = [("sku", "XYZ-9")].into_iter().collect();
    assert_eq!(
        router.assemble("catalog/product", &sku, &opts).unwrap(),
        "/shop/catalog/all/XYZ-9"
    );
    assert_eq!(router.assemble("catalog", &Params::new(), &opts).unwrap(), "/shop/catalog");
    assert_eq!(router.assemble("cart/add", &Params::new(), &opts).unwrap(), "/shop/cart");
}

#[test]
fn test_config_load_json_file() {
    let json = r#"{
        "routes": {
            "post": {
                "type": "Segment",
                "options": {"route": "/post/:id", "constraints": {"id": "int"}}
            }
        }
    }"#;
    let file = write_temp(".json", json);
    let router = Router::from_config(&RouterConfig::load(file.path()).unwrap()).unwrap();
    assert!(router.match_request(&Request::get("/post/12")).is_some());
    assert!(router.match_request(&Request::get("/post/abc")).is_none());
}

#[test]
fn test_config_load_errors_name_the_file() {
    let file = write_temp(".yaml", "routes: [not, a, mapping]");
    let err = RouterConfig::load(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains(&file.path().display().to_string()));

    let err = RouterConfig::load("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read router config"));
}

#[test]
fn test_config_missing_option_aborts_build() {
    let config = RouterConfig::from_yaml_str(
        "routes:\n  broken:\n    type: regex\n    options: { regex: /x }\n",
    )
    .unwrap();
    let err = Router::from_config(&config).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"missing "spec" in options for route type "regex""#
    );
}

#[test]
fn test_config_unknown_type_and_custom_factory() {
    let yaml = "routes:\n  ping:\n    type: ping\n";
    let config = RouterConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(
        Router::from_config(&config).unwrap_err(),
        RouterError::UnknownRouteType("ping".into())
    );

    let mut factory = RouteFactory::default();
    factory.register("ping", |_: &RouteOptions, f: &RouteFactory| {
        let mut options = RouteOptions::new();
        options.insert("route".into(), "/ping".into());
        f.construct("literal", &options)
    });
    let router = Router::from_config_with(&config, &factory).unwrap();
    assert!(router.match_request(&Request::get("/ping")).is_some());
}

#[test]
fn test_config_chain_routes() {
    let yaml = r#"
routes:
  localized:
    type: segment
    options: { route: "/:lang<[a-z]{2}>" }
    chain_routes:
      - type: literal
        options: { route: /docs }
"#;
    let router = Router::from_config(&RouterConfig::from_yaml_str(yaml).unwrap()).unwrap();
    let m = router.match_request(&Request::get("/en/docs")).unwrap();
    assert_eq!(m.param("lang").unwrap(), "en");
    let lang: Params = [("lang", "de")].into_iter().collect();
    assert_eq!(
        router
            .assemble("localized", &lang, &AssembleOptions::default())
            .unwrap(),
        "/de/docs"
    );
}

#[test]
fn test_config_round_trips_through_serde() {
    let config = RouterConfig::from_yaml_str(YAML).unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let back = RouterConfig::from_json_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_shared_router_reload() {
    let shared = SharedRouter::new(Router::builder().build());
    let config = RouterConfig::from_yaml_str(YAML).unwrap();
    let previous = shared.reload(&config).unwrap();
    assert!(previous.is_empty());
    assert_eq!(shared.load().len(), 3);

    let broken = RouterConfig::from_yaml_str("routes:\n  x:\n    type: nope\n").unwrap();
    assert!(shared.reload(&broken).is_err());
    assert_eq!(shared.load().len(), 3);
}
