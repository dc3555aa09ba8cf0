//! # routestack
//!
//! **routestack** is a tree-structured HTTP route matcher and URI assembler.
//! Given a request (method, path, scheme, host) it finds the named route that
//! matches and extracts its parameters; given a route name and parameter
//! values it builds the URI back.
//!
//! ## Overview
//!
//! Routes are small, composable pieces that each match one fragment of a URI:
//!
//! - **Literal** text (`/about`)
//! - **Segment** placeholders with constraints and optional groups
//!   (`/users/:id<int>[/:tab]`)
//! - **Regex** routes with named groups and a `%name%` assembly template
//! - **Scheme**, **Method** and **Hostname** constraints
//! - **Part** routes, a root with prioritized children, and **Chain** routes
//!   that match back to back
//!
//! Named top-level routes live in a priority-ordered [`RouteStack`]; the
//! [`Router`] tries them highest priority first (FIFO among equal
//! priorities) and returns the first full match.
//!
//! ## Architecture
//!
//! - **[`priority_list`]** - name-keyed list ordered by priority then insertion
//! - **[`params`]** - scalar parameter values and the parameter map
//! - **[`encoding`]** - percent decoding of captures and encoding for assembly
//! - **[`request`]** - the read-only request view routes match against
//! - **[`route`]** - every route kind behind the closed [`Route`] enum
//! - **[`factory`]** - construct routes from a type name and options
//! - **[`config`]** - YAML/JSON router definitions
//! - **[`router`]** - the frozen router, its builder and a hot-swappable handle
//! - **[`error`]** - configuration, lookup and assembly errors
//! - **[`telemetry`]** - tracing subscriber setup
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Router
//!     participant Stack as RouteStack
//!     participant Part
//!     participant Child as Child route
//!
//!     App->>Router: route(&request)
//!     Router->>Stack: routes in priority order
//!     Stack->>Part: match_request(request, offset)
//!     Part->>Part: match root at offset
//!     Part->>Child: match_request(request, offset + root.length)
//!     Child-->>Part: RouteMatch { params, length }
//!     Part-->>Router: merged RouteMatch (child params win)
//!     Router->>Router: require full path consumed,<br/>prefix route name, fill defaults
//!     Router-->>App: RouteOutcome::Matched / MethodNotAllowed / NotFound
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use routestack::{AssembleOptions, Params, Request, Router, RouterConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = RouterConfig::from_yaml_str(r#"
//! routes:
//!   article:
//!     type: regex
//!     options:
//!       regex: "/article/(?<id>\\d+)"
//!       spec: "/article/%id%"
//!   user:
//!     type: segment
//!     options:
//!       route: "/user/:name[/:tab]"
//!       defaults: { tab: profile }
//! "#)?;
//! let router = Router::from_config(&config)?;
//!
//! let m = router.match_request(&Request::get("/article/42")).unwrap();
//! assert_eq!(m.matched_route_name(), Some("article"));
//! assert_eq!(m.param("id").unwrap(), &42i64);
//!
//! let m = router.match_request(&Request::get("/user/ada")).unwrap();
//! assert_eq!(m.param("tab").unwrap(), "profile");
//!
//! let params: Params = [("name", "ada lovelace")].into_iter().collect();
//! let uri = router.assemble("user", &params, &AssembleOptions::default())?;
//! assert_eq!(uri, "/user/ada%20lovelace");
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Matching and assembly are synchronous and never block. Routes are
//! immutable once built, so a [`Router`] can be shared across threads as is;
//! [`SharedRouter`] swaps in a rebuilt router without locking readers.
//!
//! ## Logging
//!
//! Matching emits `tracing` events (`Route match attempt`, `Route matched`,
//! `No route matched`) with `method`, `path`, `route_name` and `duration_us`
//! fields. See [`telemetry`] for installing a subscriber.

pub mod config;
pub mod encoding;
pub mod error;
pub mod factory;
pub mod params;
pub mod priority_list;
pub mod request;
pub mod route;
pub mod router;
pub mod telemetry;

pub use config::{NamedRoutes, RouteOptions, RouteSpec, RouterConfig};
pub use error::{ErrorKind, RouterError};
pub use factory::RouteFactory;
pub use params::{ParamValue, Params};
pub use priority_list::PriorityList;
pub use request::{Request, RequestView};
pub use route::{Route, RouteMatch, RouteStack};
pub use router::{AssembleOptions, RouteOutcome, Router, RouterBuilder, SharedRouter};
