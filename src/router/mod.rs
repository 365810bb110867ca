//! # Router Module
//!
//! Resolves console locations to route records.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Parsing locations (path, query, hash) and stripping the history base
//! - Matching paths against every pattern in the route table
//! - Following redirects transitively, up to a hop ceiling
//! - Extracting and percent-decoding path parameters
//! - Resolving named targets and building URLs from route names
//!
//! ## Architecture
//!
//! At construction every pattern of the [`RouteTable`](crate::route::RouteTable)
//! is inserted into a segment radix tree in registration order. Matching is
//! O(k) in the number of path segments, with backtracking only where a
//! literal branch dead-ends.
//!
//! ## Example
//!
//! ```rust
//! use banyandb_ui_router::router::Router;
//! use banyandb_ui_router::runtime_config::RouterConfig;
//!
//! let router = Router::console(RouterConfig::default());
//! let resolution = router.resolve("/").unwrap();
//! assert_eq!(resolution.name(), Some("dashboard"));
//! assert_eq!(resolution.location.path, "/banyandb/dashboard");
//! ```

mod core;
mod location;
mod radix;

pub use self::core::{NavigationTarget, Resolution, Router, RouterError};
pub use location::Location;
pub use radix::{ParamVec, RadixRouter, MAX_INLINE_PARAMS};
