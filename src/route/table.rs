use super::pattern::{PathPattern, PatternError};
use super::types::{RouteMeta, RouteRecord, ViewRef};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Index of a node in a [`RouteTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(usize);

impl RouteId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised while building a [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("route name `{name}` is used by both `{first}` and `{second}`")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },
    #[error("route `{0}` has an empty name")]
    EmptyName(String),
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// A route record placed in the table arena.
#[derive(Debug, Clone)]
pub struct RouteNode {
    pub id: RouteId,
    pub parent: Option<RouteId>,
    pub children: Vec<RouteId>,
    pub depth: usize,
    pub pattern: PathPattern,
    pub name: Option<Arc<str>>,
    pub redirect: Option<String>,
    pub view: Option<ViewRef>,
    pub meta: RouteMeta,
}

impl RouteNode {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Name for log lines and reports; anonymous routes show their path.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.pattern.as_str())
    }
}

/// Immutable arena of routes, built once from a literal record tree.
///
/// Node ids follow declaration order (pre-order). The registration order
/// used by the matcher lists children before their parent, so when a child
/// and its parent share a pattern the child wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    nodes: Vec<RouteNode>,
    roots: Vec<RouteId>,
    by_name: HashMap<Arc<str>, RouteId>,
    registration: Vec<RouteId>,
    fallback: Option<RouteId>,
}

impl RouteTable {
    /// Build the arena, validating patterns and name uniqueness.
    pub fn new(records: Vec<RouteRecord>) -> Result<Self, TableError> {
        let mut table = Self {
            nodes: Vec::new(),
            roots: Vec::with_capacity(records.len()),
            by_name: HashMap::new(),
            registration: Vec::new(),
            fallback: None,
        };

        for record in records {
            let id = table.insert(record, None, 0)?;
            table.roots.push(id);
        }

        table.registration = Vec::with_capacity(table.nodes.len());
        for root in table.roots.clone() {
            table.register_post_order(root);
        }

        table.fallback = table
            .registration
            .iter()
            .copied()
            .find(|id| table.node(*id).pattern.is_catch_all_only());

        info!(
            routes_count = table.nodes.len(),
            roots_count = table.roots.len(),
            named_count = table.by_name.len(),
            fallback = ?table.fallback.map(|id| table.node(id).label().to_string()),
            "Route table built"
        );

        Ok(table)
    }

    fn insert(
        &mut self,
        record: RouteRecord,
        parent: Option<RouteId>,
        depth: usize,
    ) -> Result<RouteId, TableError> {
        let pattern = PathPattern::parse(&record.path)?;
        let id = RouteId(self.nodes.len());

        let name: Option<Arc<str>> = match record.name {
            Some(name) if name.is_empty() => return Err(TableError::EmptyName(record.path)),
            Some(name) => {
                let name: Arc<str> = name.into();
                if let Some(existing) = self.by_name.get(&name) {
                    return Err(TableError::DuplicateName {
                        name: name.to_string(),
                        first: self.nodes[existing.0].pattern.to_string(),
                        second: record.path,
                    });
                }
                self.by_name.insert(Arc::clone(&name), id);
                Some(name)
            }
            None => None,
        };

        debug!(route_id = id.0, path = %pattern, name = ?name, depth, "Route registered");

        self.nodes.push(RouteNode {
            id,
            parent,
            children: Vec::with_capacity(record.children.len()),
            depth,
            pattern,
            name,
            redirect: record.redirect,
            view: record.view,
            meta: record.meta,
        });

        for child in record.children {
            let child_id = self.insert(child, Some(id), depth + 1)?;
            self.nodes[id.0].children.push(child_id);
        }

        Ok(id)
    }

    fn register_post_order(&mut self, id: RouteId) {
        for child in self.nodes[id.0].children.clone() {
            self.register_post_order(child);
        }
        self.registration.push(id);
    }

    /// Panics on an id from another table.
    #[must_use]
    pub fn node(&self, id: RouteId) -> &RouteNode {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn get(&self, id: RouteId) -> Option<&RouteNode> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<RouteId> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn roots(&self) -> &[RouteId] {
        &self.roots
    }

    /// Nodes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteNode> {
        self.nodes.iter()
    }

    /// Order in which patterns are handed to the matcher.
    #[must_use]
    pub fn registration_order(&self) -> &[RouteId] {
        &self.registration
    }

    /// The record that catches paths nothing else matches.
    #[must_use]
    pub fn fallback(&self) -> Option<RouteId> {
        self.fallback
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node from the root down to `id`, inclusive.
    #[must_use]
    pub fn chain(&self, id: RouteId) -> Vec<RouteId> {
        let mut chain = Vec::with_capacity(self.node(id).depth + 1);
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.node(current).parent;
        }
        chain.reverse();
        chain
    }

    /// Distinct view references, keyed by module. The first declaration of a
    /// module decides its loading mode.
    #[must_use]
    pub fn views(&self) -> BTreeMap<&str, &ViewRef> {
        let mut views = BTreeMap::new();
        for node in &self.nodes {
            if let Some(view) = &node.view {
                views.entry(view.module.as_str()).or_insert(view);
            }
        }
        views
    }
}
