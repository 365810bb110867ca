//! Radix tree for matching console paths against route patterns
//!
//! The tree is built by splitting patterns into segments:
//! - Each node represents one path segment
//! - Static segments (e.g., `dashboard`) match exactly (ASCII case-insensitive
//!   unless the router is case-sensitive)
//! - Parameter segments (e.g., `:group`) match any single segment; a
//!   constrained parameter (`:schema(measure)`) only matches values accepted
//!   by its regex
//! - A catch-all (`:pathMatch(.*)`) swallows every remaining segment
//!
//! ## Precedence
//!
//! At every depth the search tries static children first, then constrained
//! parameters, then plain parameters, then the catch-all, backtracking when a
//! branch dead-ends. A literal match therefore always beats a parameterized
//! one, and the catch-all only wins when nothing else can consume the path.
//!
//! When two routes have the same pattern shape the one registered first owns
//! the terminal; the other can only be reached by name.

use std::borrow::Cow;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::debug;

use crate::route::{Constraint, RouteId, RouteTable, Segment};

/// Maximum number of path parameters before heap allocation.
/// Console routes carry at most five (`schema`, `type`, `operator`, `group`, `name`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage.
///
/// Param names use `Arc<str>` because they come from the static route tree;
/// values are per-navigation data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A path segment as written and percent-decoded.
type PathSegment<'a> = (&'a str, Cow<'a, str>);

#[derive(Debug, Clone)]
struct CatchAll {
    name: Arc<str>,
    route: RouteId,
}

/// Node in the radix tree
#[derive(Debug, Clone)]
struct RadixNode {
    /// The path segment this node represents (without leading /)
    segment: Cow<'static, str>,
    /// Route terminating at this node
    route: Option<RouteId>,
    /// Parameter name and constraint if this is a parameter node
    param: Option<(Arc<str>, Option<Constraint>)>,
    /// Static children
    children: Vec<RadixNode>,
    /// Parameter children, constrained ones first
    param_children: Vec<RadixNode>,
    /// Catch-all terminal hanging off this node
    catch_all: Option<CatchAll>,
}

impl RadixNode {
    fn new(segment: Cow<'static, str>) -> Self {
        Self {
            segment,
            route: None,
            param: None,
            children: Vec::new(),
            param_children: Vec::new(),
            catch_all: None,
        }
    }

    fn new_param(name: Arc<str>, constraint: Option<Constraint>) -> Self {
        Self {
            param: Some((name, constraint)),
            ..Self::new(Cow::Borrowed(""))
        }
    }

    /// Insert a route; returns the route already owning the same terminal.
    fn insert(&mut self, segments: &[Segment], route: RouteId, sensitive: bool) -> Option<RouteId> {
        let Some((segment, remaining)) = segments.split_first() else {
            return match self.route {
                Some(existing) => Some(existing),
                None => {
                    self.route = Some(route);
                    None
                }
            };
        };

        match segment {
            Segment::Static(literal) => {
                let key = if sensitive {
                    literal.clone()
                } else {
                    literal.to_ascii_lowercase()
                };
                if let Some(child) = self.children.iter_mut().find(|c| c.segment == key.as_str()) {
                    return child.insert(remaining, route, sensitive);
                }
                let mut child = RadixNode::new(Cow::Owned(key));
                let shadowed = child.insert(remaining, route, sensitive);
                self.children.push(child);
                shadowed
            }
            Segment::Param { name, constraint } => {
                if let Some(child) = self.param_children.iter_mut().find(|c| {
                    c.param
                        .as_ref()
                        .is_some_and(|(n, k)| n == name && k == constraint)
                }) {
                    return child.insert(remaining, route, sensitive);
                }
                let mut child = RadixNode::new_param(Arc::clone(name), constraint.clone());
                let shadowed = child.insert(remaining, route, sensitive);
                let position = if constraint.is_some() {
                    self.param_children
                        .iter()
                        .position(|c| c.param.as_ref().is_some_and(|(_, k)| k.is_none()))
                        .unwrap_or(self.param_children.len())
                } else {
                    self.param_children.len()
                };
                self.param_children.insert(position, child);
                shadowed
            }
            Segment::CatchAll { name } => match &self.catch_all {
                Some(existing) => Some(existing.route),
                None => {
                    self.catch_all = Some(CatchAll {
                        name: Arc::clone(name),
                        route,
                    });
                    None
                }
            },
        }
    }

    fn matches_static(&self, segment: &str, sensitive: bool) -> bool {
        if sensitive {
            self.segment == segment
        } else {
            self.segment.eq_ignore_ascii_case(segment)
        }
    }

    /// Search for a matching route in the tree
    fn search(
        &self,
        segments: &[PathSegment<'_>],
        sensitive: bool,
        params: &mut ParamVec,
    ) -> Option<RouteId> {
        let Some(((_, segment), remaining)) = segments.split_first() else {
            if self.route.is_some() {
                return self.route;
            }
            return self.catch_all.as_ref().map(|c| {
                params.push((Arc::clone(&c.name), String::new()));
                c.route
            });
        };

        // First, try exact match with static children
        for child in &self.children {
            if child.matches_static(segment, sensitive) {
                if let Some(route) = child.search(remaining, sensitive, params) {
                    return Some(route);
                }
            }
        }

        // Then parameter children, constrained before plain
        for child in &self.param_children {
            let Some((name, constraint)) = &child.param else {
                continue;
            };
            if constraint.as_ref().is_some_and(|c| !c.matches(segment, sensitive)) {
                continue;
            }
            let mark = params.len();
            params.push((Arc::clone(name), segment.to_string()));
            if let Some(route) = child.search(remaining, sensitive, params) {
                return Some(route);
            }
            // Backtrack: drop the binding if the branch failed
            params.truncate(mark);
        }

        // Last resort: swallow the rest, keeping the path as written
        self.catch_all.as_ref().map(|c| {
            let rest: Vec<&str> = segments.iter().map(|(raw, _)| *raw).collect();
            params.push((Arc::clone(&c.name), rest.join("/")));
            c.route
        })
    }
}

/// Radix tree over every pattern of a [`RouteTable`].
#[derive(Debug, Clone)]
pub struct RadixRouter {
    root: RadixNode,
    sensitive: bool,
}

impl RadixRouter {
    /// Build the tree, inserting routes in the table's registration order.
    #[must_use]
    pub fn new(table: &RouteTable, sensitive: bool) -> Self {
        let mut root = RadixNode::new(Cow::Borrowed(""));

        for id in table.registration_order() {
            let node = table.node(*id);
            if let Some(owner) = root.insert(node.pattern.segments(), *id, sensitive) {
                debug!(
                    route = node.label(),
                    pattern = %node.pattern,
                    owner = table.node(owner).label(),
                    "Pattern already registered; route reachable by name only"
                );
            }
        }

        Self { root, sensitive }
    }

    /// Match a path, returning the route and its decoded parameters.
    ///
    /// Empty segments are ignored, so `//a/` matches `/a`. A catch-all binds
    /// the rest of the path still percent-encoded.
    #[must_use]
    pub fn route(&self, path: &str) -> Option<(RouteId, ParamVec)> {
        let segments: SmallVec<[PathSegment<'_>; 12]> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| (s, urlencoding::decode(s).unwrap_or(Cow::Borrowed(s))))
            .collect();

        let mut params = ParamVec::new();
        let route = self.root.search(&segments, self.sensitive, &mut params)?;
        Some((route, params))
    }
}
