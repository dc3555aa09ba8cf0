//! # Router Module
//!
//! The router ties the route kinds together: it owns a priority-ordered
//! [`RouteStack`](crate::route::RouteStack) of named top-level routes plus
//! router-wide default params, matches requests against it and assembles URIs
//! by route name.
//!
//! ## Lifecycle
//!
//! Routers are built once and then frozen:
//!
//! 1. **Building**: [`RouterBuilder`] collects routes (directly, from
//!    [`RouteSpec`](crate::config::RouteSpec)s or from a whole
//!    [`RouterConfig`](crate::config::RouterConfig)). Re-adding a name
//!    replaces the earlier route.
//! 2. **Serving**: [`Router`] is immutable, `Send + Sync` and can be shared across threads.
//!    [`SharedRouter`] adds lock-free replacement for configurations that are
//!    reloaded at runtime.
//!
//! ## Example
//!
//! ```rust
//! use routestack::router::{AssembleOptions, Router};
//! use routestack::route::{Literal, Part, Segment};
//! use routestack::{Params, Request};
//! use std::collections::HashMap;
//!
//! # fn main() -> Result<(), routestack::RouterError> {
//! let users = Part::new(Literal::new("/users", Params::new()), true).with_child(
//!     "show",
//!     Segment::new("/:id<int>", HashMap::new(), Params::new())?,
//!     0,
//! );
//! let router = Router::builder().add_route("users", users, 0).build();
//!
//! let m = router.match_request(&Request::get("/users/42")).unwrap();
//! assert_eq!(m.matched_route_name(), Some("users/show"));
//! assert_eq!(m.param("id").unwrap(), &42i64);
//!
//! let params: Params = [("id", 7i64)].into_iter().collect();
//! let uri = router.assemble("users/show", &params, &AssembleOptions::default())?;
//! assert_eq!(uri, "/users/7");
//! # Ok(())
//! # }
//! ```
//!
//! ## 405 handling
//!
//! [`Router::route`] returns a [`RouteOutcome`]. When no route matched but
//! method routes rejected the request, the outcome carries the methods that
//! would have been accepted so an HTTP layer can answer with an `Allow` header.

mod core;
mod shared;

pub use core::{AssembleOptions, RouteOutcome, Router, RouterBuilder};
pub use shared::SharedRouter;
