//! Declarative router configuration.
//!
//! A router can be described in YAML or JSON and turned into a
//! [`Router`](crate::router::Router) with
//! [`Router::from_config`](crate::router::Router::from_config):
//!
//! ```yaml
//! base_url: /app
//! default_params:
//!   locale: en
//! routes:
//!   home:
//!     type: literal
//!     options:
//!       route: /
//!   users:
//!     type: literal
//!     options: { route: /users }
//!     may_terminate: true
//!     child_routes:
//!       show:
//!         type: segment
//!         options: { route: "/:id<int>" }
//! ```
//!
//! Mapping order is preserved: routes of equal priority are tried in the
//! order they appear in the document.

use crate::params::Params;
use anyhow::{Context, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// Options handed to a route constructor.
pub type RouteOptions = serde_json::Map<String, serde_json::Value>;

/// Top-level router description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Prefix every matched path must start with and every assembled path gets
    pub base_url: String,
    pub default_params: Params,
    pub routes: NamedRoutes,
}

/// One route: its type, constructor options and optional nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSpec {
    #[serde(rename = "type")]
    pub route_type: String,
    #[serde(default)]
    pub options: RouteOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default)]
    pub may_terminate: bool,
    #[serde(default, skip_serializing_if = "NamedRoutes::is_empty")]
    pub child_routes: NamedRoutes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chain_routes: Vec<RouteSpec>,
}

impl RouteSpec {
    pub fn new(route_type: impl Into<String>, options: RouteOptions) -> Self {
        Self {
            route_type: route_type.into(),
            options,
            priority: None,
            may_terminate: false,
            child_routes: NamedRoutes::default(),
            chain_routes: Vec::new(),
        }
    }
}

/// Name to spec mapping that keeps document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedRoutes(pub Vec<(String, RouteSpec)>);

impl NamedRoutes {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteSpec)> + '_ {
        self.0.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RouteSpec> {
        self.iter().find(|(n, _)| *n == name).map(|(_, spec)| spec)
    }

    /// Later definitions of a name replace earlier ones in place.
    pub fn push(&mut self, name: impl Into<String>, spec: RouteSpec) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = spec,
            None => self.0.push((name, spec)),
        }
    }
}

impl Serialize for NamedRoutes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, spec) in &self.0 {
            map.serialize_entry(name, spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NamedRoutes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NamedRoutesVisitor;

        impl<'de> Visitor<'de> for NamedRoutesVisitor {
            type Value = NamedRoutes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of route names to route definitions")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<NamedRoutes, E> {
                Ok(NamedRoutes::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<NamedRoutes, A::Error> {
                let mut routes = NamedRoutes::default();
                while let Some((name, spec)) = access.next_entry::<String, RouteSpec>()? {
                    routes.push(name, spec);
                }
                Ok(routes)
            }
        }

        deserializer.deserialize_any(NamedRoutesVisitor)
    }
}

impl RouterConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).context("Failed to parse YAML router config")
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("Failed to parse JSON router config")
    }

    /// Load a config file; `.yaml`/`.yml` is read as YAML, anything else as
    /// JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read router config {}", path.display()))?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        let parsed = if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        };
        parsed.with_context(|| format!("Invalid router config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_route_order() {
        let config = RouterConfig::from_yaml_str(
            r#"
routes:
  zeta: { type: literal, options: { route: /z } }
  alpha: { type: literal, options: { route: /a } }
  mid: { type: literal, options: { route: /m } }
"#,
        )
        .unwrap();
        let names: Vec<&str> = config.routes.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn nested_children_and_defaults() {
        let config = RouterConfig::from_json_str(
            r#"{
                "base_url": "/app",
                "default_params": {"locale": "en", "page": 1},
                "routes": {
                    "users": {
                        "type": "literal",
                        "options": {"route": "/users"},
                        "priority": 3,
                        "may_terminate": true,
                        "child_routes": {
                            "show": {"type": "segment", "options": {"route": "/:id"}}
                        }
                    }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "/app");
        assert_eq!(config.default_params.get("page").unwrap(), &1i64);
        let users = config.routes.get("users").unwrap();
        assert_eq!(users.priority, Some(3));
        assert!(users.may_terminate);
        assert_eq!(users.child_routes.get("show").unwrap().route_type, "segment");
    }

    #[test]
    fn empty_document_sections_default() {
        let config = RouterConfig::from_yaml_str("routes:\n").unwrap();
        assert!(config.routes.is_empty());
        assert!(config.base_url.is_empty());
    }

    #[test]
    fn missing_type_is_an_error() {
        let err = RouterConfig::from_yaml_str("routes:\n  x:\n    options: {}\n").unwrap_err();
        assert!(format!("{err:#}").contains("type"));
    }
}
