//! Route construction from a type identifier and an options map.
//!
//! [`RouteFactory::default`] knows the built-in kinds:
//!
//! | type | required options | optional options |
//! |------|------------------|------------------|
//! | `literal` | `route` | `defaults` |
//! | `segment` | `route` | `constraints`, `defaults` |
//! | `regex` | `regex`, `spec` | `defaults` |
//! | `scheme` | `scheme` | `defaults` |
//! | `method` | `verb` | `defaults` |
//! | `hostname` | `route` | `constraints`, `defaults` |
//! | `part` | `route` (a nested route spec) | `may_terminate`, `child_routes` |
//! | `chain` | `routes` (a list of route specs) | |
//!
//! Type identifiers are case-insensitive. Missing options fail before any
//! route is built, naming the key that is absent.

use crate::config::{NamedRoutes, RouteOptions, RouteSpec};
use crate::error::RouterError;
use crate::params::Params;
use crate::route::{
    Chain, Constraint, Hostname, Literal, MethodRoute, Part, RegexRoute, Route, Scheme, Segment,
};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds one route from its options. Receives the factory so nested specs
/// can be resolved.
pub type RouteConstructor =
    Arc<dyn Fn(&RouteOptions, &RouteFactory) -> Result<Route, RouterError> + Send + Sync>;

/// Registry of route constructors keyed by lowercase type identifier.
#[derive(Clone)]
pub struct RouteFactory {
    constructors: HashMap<String, RouteConstructor>,
}

impl fmt::Debug for RouteFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("RouteFactory").field("kinds", &kinds).finish()
    }
}

impl Default for RouteFactory {
    fn default() -> Self {
        let mut factory = Self::empty();
        factory.register("literal", build_literal);
        factory.register("segment", build_segment);
        factory.register("regex", build_regex);
        factory.register("scheme", build_scheme);
        factory.register("method", build_method);
        factory.register("hostname", build_hostname);
        factory.register("part", build_part);
        factory.register("chain", build_chain);
        factory
    }
}

impl RouteFactory {
    /// A factory with no kinds registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register (or replace) the constructor for `route_type`.
    pub fn register<F>(&mut self, route_type: &str, constructor: F)
    where
        F: Fn(&RouteOptions, &RouteFactory) -> Result<Route, RouterError> + Send + Sync + 'static,
    {
        self.constructors
            .insert(route_type.to_ascii_lowercase(), Arc::new(constructor));
    }

    #[must_use]
    pub fn supports(&self, route_type: &str) -> bool {
        self.constructors
            .contains_key(&route_type.to_ascii_lowercase())
    }

    /// Build a single route of `route_type`.
    pub fn construct(&self, route_type: &str, options: &RouteOptions) -> Result<Route, RouterError> {
        let constructor = self
            .constructors
            .get(&route_type.to_ascii_lowercase())
            .ok_or_else(|| RouterError::UnknownRouteType(route_type.to_string()))?;
        constructor(options, self)
    }

    /// Build a route from a full spec, wrapping it in a [`Chain`] when
    /// `chain_routes` are present and then in a [`Part`] when `child_routes`
    /// are present.
    pub fn from_spec(&self, spec: &RouteSpec) -> Result<Route, RouterError> {
        let mut route = self.construct(&spec.route_type, &spec.options)?;

        if !spec.chain_routes.is_empty() {
            let mut links = Vec::with_capacity(spec.chain_routes.len() + 1);
            links.push(route);
            for link in &spec.chain_routes {
                links.push(self.from_spec(link)?);
            }
            route = Chain::new(links).into();
        }

        if !spec.child_routes.is_empty() {
            let mut part = Part::new(route, spec.may_terminate);
            self.add_children(&mut part, &spec.child_routes)?;
            route = part.into();
        }

        Ok(route)
    }

    fn add_children(&self, part: &mut Part, children: &NamedRoutes) -> Result<(), RouterError> {
        for (name, child) in children.iter() {
            let route = self.from_spec(child)?;
            part.add_child(name, route, child.priority.unwrap_or(0));
        }
        Ok(())
    }
}

fn required_str<'a>(
    options: &'a RouteOptions,
    route_type: &str,
    key: &'static str,
) -> Result<&'a str, RouterError> {
    match options.get(key) {
        None | Some(Value::Null) => Err(RouterError::missing_option(route_type, key)),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(RouterError::invalid_option(
            route_type,
            key,
            format!("expected a string, got {other}"),
        )),
    }
}

fn defaults(options: &RouteOptions, route_type: &str) -> Result<Params, RouterError> {
    match options.get("defaults") {
        None | Some(Value::Null) => Ok(Params::new()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| RouterError::invalid_option(route_type, "defaults", e)),
    }
}

fn constraints(
    options: &RouteOptions,
    route_type: &str,
) -> Result<HashMap<String, Constraint>, RouterError> {
    match options.get("constraints") {
        None | Some(Value::Null) => Ok(HashMap::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, value)| match value {
                Value::String(s) => Ok((name.clone(), Constraint::parse(s))),
                other => Err(RouterError::invalid_option(
                    route_type,
                    "constraints",
                    format!("constraint for \"{name}\" must be a string, got {other}"),
                )),
            })
            .collect(),
        Some(_) => Err(RouterError::invalid_option(
            route_type,
            "constraints",
            "expected a mapping",
        )),
    }
}

fn nested_spec(value: &Value, route_type: &str, key: &str) -> Result<RouteSpec, RouterError> {
    serde_json::from_value(value.clone()).map_err(|e| RouterError::invalid_option(route_type, key, e))
}

fn build_literal(options: &RouteOptions, _: &RouteFactory) -> Result<Route, RouterError> {
    let route = required_str(options, "literal", "route")?;
    Ok(Literal::new(route, defaults(options, "literal")?).into())
}

fn build_segment(options: &RouteOptions, _: &RouteFactory) -> Result<Route, RouterError> {
    let route = required_str(options, "segment", "route")?;
    Ok(Segment::new(
        route,
        constraints(options, "segment")?,
        defaults(options, "segment")?,
    )?
    .into())
}

fn build_regex(options: &RouteOptions, _: &RouteFactory) -> Result<Route, RouterError> {
    let regex = required_str(options, "regex", "regex")?;
    let spec = required_str(options, "regex", "spec")?;
    Ok(RegexRoute::new(regex, spec, defaults(options, "regex")?)?.into())
}

fn build_scheme(options: &RouteOptions, _: &RouteFactory) -> Result<Route, RouterError> {
    let scheme = required_str(options, "scheme", "scheme")?;
    Ok(Scheme::new(scheme, defaults(options, "scheme")?).into())
}

fn build_method(options: &RouteOptions, _: &RouteFactory) -> Result<Route, RouterError> {
    let verbs = required_str(options, "method", "verb")?;
    Ok(MethodRoute::from_verbs(verbs, defaults(options, "method")?)?.into())
}

fn build_hostname(options: &RouteOptions, _: &RouteFactory) -> Result<Route, RouterError> {
    let route = required_str(options, "hostname", "route")?;
    Ok(Hostname::new(
        route,
        constraints(options, "hostname")?,
        defaults(options, "hostname")?,
    )?
    .into())
}

fn build_part(options: &RouteOptions, factory: &RouteFactory) -> Result<Route, RouterError> {
    let root = options
        .get("route")
        .filter(|v| !v.is_null())
        .ok_or_else(|| RouterError::missing_option("part", "route"))?;
    let root = factory.from_spec(&nested_spec(root, "part", "route")?)?;

    let may_terminate = match options.get("may_terminate") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            return Err(RouterError::invalid_option(
                "part",
                "may_terminate",
                format!("expected a boolean, got {other}"),
            ))
        }
    };

    let mut part = Part::new(root, may_terminate);
    if let Some(children) = options.get("child_routes").filter(|v| !v.is_null()) {
        let children: NamedRoutes = serde_json::from_value(children.clone())
            .map_err(|e| RouterError::invalid_option("part", "child_routes", e))?;
        factory.add_children(&mut part, &children)?;
    }
    Ok(part.into())
}

fn build_chain(options: &RouteOptions, factory: &RouteFactory) -> Result<Route, RouterError> {
    let links = match options.get("routes") {
        None | Some(Value::Null) => return Err(RouterError::missing_option("chain", "routes")),
        Some(Value::Array(links)) => links,
        Some(_) => {
            return Err(RouterError::invalid_option(
                "chain",
                "routes",
                "expected a list of route definitions",
            ))
        }
    };
    let routes = links
        .iter()
        .map(|link| factory.from_spec(&nested_spec(link, "chain", "routes")?))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Chain::new(routes).into())
}
