//! # banyandb-ui-router
//!
//! The navigation router of the BanyanDB web console: the console's route
//! table plus the engine that resolves locations against it, follows
//! redirects, binds path parameters and activates lazily loaded views in
//! nested slots.
//!
//! ## Architecture
//!
//! - **[`route`]** - Route records, the path-pattern grammar and the immutable route table
//! - **[`console`]** - The BanyanDB console table, assembled from per-domain builders
//! - **[`router`]** - Radix-tree matching, redirect chains, named navigation
//! - **[`view`]** - The `View` / `ViewLoader` contract and memoizing lazy views
//! - **[`navigator`]** - Async navigation with latest-request-wins and a mounted-view stack
//! - **[`linter`]** - Structural checks of a route table
//! - **[`runtime_config`]** - Router settings from a TOML file and environment variables
//! - **[`otel`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `banyandb-ui-routes` operator commands
//!
//! ### Navigation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Nav as Navigator
//!     participant Router
//!     participant Views as ViewRegistry
//!
//!     App->>Nav: navigate("/banyandb/stream")
//!     Nav->>Router: resolve(target)
//!     Router->>Router: match streamHome, redirect to /banyandb/stream/start
//!     Router-->>Nav: Resolution (matched chain, params)
//!     Nav->>Views: load each view on the chain
//!     Views-->>Nav: Arc<dyn View> (memoized per module)
//!     Nav->>Nav: unmount / suspend leaving views, mount / resume entering ones
//!     Nav-->>App: Arc<Resolution>
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use banyandb_ui_router::router::Router;
//! use banyandb_ui_router::runtime_config::RouterConfig;
//!
//! let router = Router::console(RouterConfig::default());
//!
//! let res = router
//!     .resolve("/banyandb/measure/operator-read/measure/read/sw_metric/service_cpm")
//!     .unwrap();
//! assert_eq!(res.name(), Some("measure"));
//! assert_eq!(res.get_param("group"), Some("sw_metric"));
//!
//! // Unknown paths land on the not-found view
//! assert_eq!(router.resolve("/no/such/page").unwrap().name(), Some("error"));
//! ```

pub mod cli;
pub mod console;
pub mod ids;
pub mod linter;
pub mod navigator;
pub mod otel;
pub mod route;
pub mod router;
pub mod runtime_config;
pub mod view;

pub use console::{console_routes, console_table};
pub use ids::NavigationId;
pub use navigator::{NavigationError, Navigator};
pub use route::{RouteId, RouteRecord, RouteTable};
pub use router::{NavigationTarget, Resolution, Router, RouterError};
pub use runtime_config::RouterConfig;
pub use view::{View, ViewLoadError, ViewLoader, ViewProps};
