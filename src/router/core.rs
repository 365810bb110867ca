//! Router core: location parsing, pattern matching, redirect chains and
//! named navigation.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::location::Location;
use super::radix::{ParamVec, RadixRouter};
use crate::console::console_table;
use crate::route::{BuildError, RouteId, RouteNode, RouteTable, Segment};
use crate::runtime_config::RouterConfig;

/// Matches slower than this are logged as warnings.
const SLOW_MATCH: Duration = Duration::from_millis(1);

/// Errors raised while resolving a navigation target.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("invalid location `{input}`: {source}")]
    InvalidLocation {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("no route matches `{0}`")]
    Unmatched(String),
    #[error("redirect limit of {limit} exceeded: {}", .chain.join(" -> "))]
    RedirectLoop { limit: usize, chain: Vec<String> },
    #[error("no route named `{0}`")]
    UnknownRoute(String),
    #[error("cannot build a path for route `{route}`: {source}")]
    Build {
        route: String,
        #[source]
        source: BuildError,
    },
}

/// Where a navigation wants to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// A location string, matched against the table.
    Path(String),
    /// A route by name; the record is used directly, its path is built from
    /// `params`.
    Named {
        name: String,
        params: Vec<(String, String)>,
        query: Vec<(String, String)>,
    },
}

impl NavigationTarget {
    pub fn named<K, V>(name: impl Into<String>, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        NavigationTarget::Named {
            name: name.into(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            query: Vec::new(),
        }
    }

    /// Attach query pairs to a named target; path targets carry their own.
    #[must_use]
    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        if let NavigationTarget::Named { query, .. } = &mut self {
            query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        self
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        NavigationTarget::Path(path.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        NavigationTarget::Path(path)
    }
}

/// Outcome of resolving a target: the record to activate and everything its
/// views need.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Deepest matched record
    pub route: RouteId,
    pub name: Option<Arc<str>>,
    /// Final location after redirects, relative to the base
    pub location: Location,
    /// Decoded path parameters in pattern order
    pub params: ParamVec,
    /// Matched records from the root down to `route`
    pub matched: Vec<RouteId>,
    /// Location originally asked for, when at least one redirect was followed
    pub redirected_from: Option<Location>,
    /// Paths visited by each redirect hop
    pub redirects: Vec<String>,
    /// True when only the catch-all record matched
    pub fallback: bool,
}

impl Resolution {
    /// Get a path parameter by name. The last binding wins.
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn params_map(&self) -> BTreeMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn full_path(&self) -> String {
        self.location.full_path()
    }
}

struct Hit {
    route: RouteId,
    params: ParamVec,
}

/// Resolves navigation targets against an immutable [`RouteTable`].
///
/// Cheap to share: the table sits behind an `Arc` and nothing is mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct Router {
    table: Arc<RouteTable>,
    radix: RadixRouter,
    config: RouterConfig,
}

impl Router {
    #[must_use]
    pub fn new(table: Arc<RouteTable>, config: RouterConfig) -> Self {
        let radix = RadixRouter::new(&table, config.sensitive);

        info!(
            routes_count = table.len(),
            base = %config.base,
            max_redirects = config.max_redirects,
            sensitive = config.sensitive,
            routing_algorithm = "radix_tree",
            "Router ready"
        );

        Self {
            table,
            radix,
            config,
        }
    }

    /// Router over the BanyanDB console table.
    #[must_use]
    pub fn console(config: RouterConfig) -> Self {
        Self::new(console_table(), config)
    }

    #[must_use]
    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Match a bare path without following redirects.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(RouteId, ParamVec)> {
        self.radix.route(path)
    }

    /// Resolve a target, following redirects up to the configured ceiling.
    pub fn resolve(&self, target: impl Into<NavigationTarget>) -> Result<Resolution, RouterError> {
        let match_start = Instant::now();

        let (mut location, mut hit) = match target.into() {
            NavigationTarget::Path(input) => {
                let mut location = parse(&input)?;
                location.strip_base(&self.config.base);
                let hit = self.match_location(&location)?;
                (location, hit)
            }
            NavigationTarget::Named {
                name,
                params,
                query,
            } => self.resolve_named(&name, &params, query)?,
        };

        let original = location.clone();
        let mut redirects: Vec<String> = Vec::new();

        while let Some(target) = self.table.node(hit.route).redirect.as_deref() {
            if redirects.len() >= self.config.max_redirects {
                let mut chain = Vec::with_capacity(redirects.len() + 2);
                chain.push(original.path.clone());
                chain.extend(redirects);
                chain.push(target.to_string());
                warn!(
                    path = %original.path,
                    limit = self.config.max_redirects,
                    chain = ?chain,
                    "Redirect limit exceeded"
                );
                return Err(RouterError::RedirectLoop {
                    limit: self.config.max_redirects,
                    chain,
                });
            }

            let mut next = parse(target)?;
            if next.query.is_empty() {
                next.query = location.query.clone();
            }
            if next.hash.is_none() {
                next.hash = location.hash.clone();
            }

            debug!(
                from = %location.path,
                to = %next.path,
                route = self.table.node(hit.route).label(),
                hop = redirects.len() + 1,
                "Following redirect"
            );

            hit = self.match_location(&next)?;
            redirects.push(next.path.clone());
            location = next;
        }

        let match_duration = match_start.elapsed();
        let node = self.table.node(hit.route);
        let fallback = self.table.fallback() == Some(hit.route);

        if fallback {
            warn!(
                path = %location.path,
                route = node.label(),
                duration_us = match_duration.as_micros(),
                "No route matched, using fallback"
            );
        } else if match_duration > SLOW_MATCH {
            warn!(
                path = %location.path,
                route = node.label(),
                route_pattern = %node.pattern,
                path_params = ?hit.params,
                redirects = redirects.len(),
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        } else {
            info!(
                path = %location.path,
                route = node.label(),
                route_pattern = %node.pattern,
                path_params = ?hit.params,
                redirects = redirects.len(),
                duration_us = match_duration.as_micros(),
                "Route matched"
            );
        }

        Ok(Resolution {
            route: hit.route,
            name: node.name.clone(),
            matched: self.table.chain(hit.route),
            redirected_from: (!redirects.is_empty()).then_some(original),
            location,
            params: hit.params,
            redirects,
            fallback,
        })
    }

    /// Build the URL of a named route, base included.
    pub fn url_for(&self, name: &str, params: &[(String, String)]) -> Result<String, RouterError> {
        let node = self.named_node(name)?;
        let path = build(node, name, params)?;
        Ok(self.with_base(&path))
    }

    /// Prefix a base-relative path with the configured base.
    #[must_use]
    pub fn with_base(&self, path: &str) -> String {
        let base = self.config.normalized_base();
        if base.is_empty() {
            path.to_string()
        } else if path == "/" {
            base.to_string()
        } else {
            format!("{base}{path}")
        }
    }

    /// Write every route in declaration order, indented by depth.
    pub fn dump_routes<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "[routes] base={} count={}",
            self.config.base,
            self.table.len()
        )?;
        for node in self.table.iter() {
            let indent = "  ".repeat(node.depth);
            write!(out, "[route] {indent}{}", node.pattern)?;
            if let Some(name) = &node.name {
                write!(out, " name={name}")?;
            }
            if let Some(target) = &node.redirect {
                write!(out, " -> {target}")?;
            }
            if let Some(view) = &node.view {
                write!(out, " view={} ({:?})", view.module, view.loading)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn named_node(&self, name: &str) -> Result<&RouteNode, RouterError> {
        self.table
            .by_name(name)
            .map(|id| self.table.node(id))
            .ok_or_else(|| RouterError::UnknownRoute(name.to_string()))
    }

    fn resolve_named(
        &self,
        name: &str,
        params: &[(String, String)],
        query: Vec<(String, String)>,
    ) -> Result<(Location, Hit), RouterError> {
        let node = self.named_node(name)?;
        let path = build(node, name, params)?;

        let mut bound = ParamVec::new();
        for segment in node.pattern.segments() {
            let (Segment::Param { name, .. } | Segment::CatchAll { name }) = segment else {
                continue;
            };
            if let Some((_, value)) = params.iter().rfind(|(k, _)| k.as_str() == name.as_ref()) {
                bound.push((Arc::clone(name), value.clone()));
            }
        }

        debug!(route = name, path = %path, "Resolving named route");

        let location = Location {
            path,
            query,
            hash: None,
        };
        Ok((
            location,
            Hit {
                route: node.id,
                params: bound,
            },
        ))
    }

    fn match_location(&self, location: &Location) -> Result<Hit, RouterError> {
        debug!(path = %location.path, algorithm = "radix_tree", "Route match attempt");

        match self.radix.route(&location.path) {
            Some((route, params)) => Ok(Hit { route, params }),
            None => {
                warn!(path = %location.path, "No route matched");
                Err(RouterError::Unmatched(location.path.clone()))
            }
        }
    }
}

fn parse(input: &str) -> Result<Location, RouterError> {
    Location::parse(input).map_err(|source| RouterError::InvalidLocation {
        input: input.to_string(),
        source,
    })
}

fn build(node: &RouteNode, name: &str, params: &[(String, String)]) -> Result<String, RouterError> {
    node.pattern
        .build(params)
        .map_err(|source| RouterError::Build {
            route: name.to_string(),
            source,
        })
}
