//! # Route Module
//!
//! Route records, the path-pattern grammar and the immutable route table.
//!
//! A table is authored as a tree of [`RouteRecord`]s (absolute paths, unique
//! names, optional redirect, optional lazily loaded view, metadata and
//! children) and frozen into a [`RouteTable`] arena at startup. Nothing is
//! added, removed or mutated afterwards; the [`crate::router`] reads it
//! without locking.

mod pattern;
mod table;
mod types;

pub use pattern::{BuildError, Constraint, PathPattern, PatternError, Segment};
pub use table::{RouteId, RouteNode, RouteTable, TableError};
pub use types::{Loading, ResourceKind, RouteMeta, RouteRecord, ViewModule, ViewRef};
