//! # View Module
//!
//! The contract between the router and the renderable units it activates.
//!
//! A route references a view by [`ViewModule`]. The application supplies a
//! [`ViewLoader`] that turns a module id into a [`View`]; the
//! [`ViewRegistry`] memoizes one load per module so every route that shares a
//! module shares the loaded view.

mod lazy;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::ids::NavigationId;
use crate::route::{RouteId, RouteMeta, ViewModule};

pub use lazy::{LazyView, ViewRegistry};

/// A view module failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load view `{module}`: {reason}")]
pub struct ViewLoadError {
    pub module: ViewModule,
    pub reason: String,
}

impl ViewLoadError {
    pub fn new(module: ViewModule, reason: impl Into<String>) -> Self {
        Self {
            module,
            reason: reason.into(),
        }
    }
}

/// What a mounted view is told about its activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewProps {
    /// Navigation that produced these props
    pub navigation: NavigationId,
    /// Record the view is mounted for
    pub route: RouteId,
    pub name: Option<Arc<str>>,
    /// Path parameters of the whole resolution
    pub params: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    /// Metadata of the record the view is mounted for
    pub meta: RouteMeta,
}

impl ViewProps {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// True when `other` carries different params or query.
    #[must_use]
    pub fn differs_from(&self, other: &ViewProps) -> bool {
        self.params != other.params || self.query != other.query
    }
}

/// A loaded, renderable unit. All hooks default to no-ops.
///
/// Hooks run synchronously during activation, deepest view first when
/// leaving and shallowest first when entering.
pub trait View: Send + Sync {
    fn mount(&self, _props: &ViewProps) {}

    /// The view stays mounted but its params or query changed.
    fn update(&self, _props: &ViewProps) {}

    /// Navigated away from a `keepAlive` record; the instance is kept.
    fn suspend(&self, _props: &ViewProps) {}

    /// Navigated back to a suspended `keepAlive` record.
    fn resume(&self, _props: &ViewProps) {}

    fn unmount(&self, _props: &ViewProps) {}
}

/// Loads view modules on demand.
#[async_trait]
pub trait ViewLoader: Send + Sync {
    async fn load(&self, module: &ViewModule) -> Result<Arc<dyn View>, ViewLoadError>;
}
