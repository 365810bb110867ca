use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;

/// Resource domain a shared view instance is operating on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Stream,
    Measure,
    Property,
}

impl ResourceKind {
    /// Every console domain, in declaration order.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Stream,
        ResourceKind::Measure,
        ResourceKind::Property,
    ];

    /// The path segment (and `type` tag) used for this domain.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Stream => "stream",
            ResourceKind::Measure => "measure",
            ResourceKind::Property => "property",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static flags attached to a route and handed to its view on activation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    /// Suspend instead of destroying the view when navigating away.
    #[serde(rename = "keepAlive", default)]
    pub keep_alive: bool,
    /// Domain tag for polymorphic views such as the onboarding page.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceKind>,
}

impl RouteMeta {
    #[must_use]
    pub fn keep_alive(keep_alive: bool) -> Self {
        Self {
            keep_alive,
            resource_type: None,
        }
    }

    #[must_use]
    pub fn for_resource(kind: ResourceKind) -> Self {
        Self {
            keep_alive: false,
            resource_type: Some(kind),
        }
    }
}

/// Identifier of a renderable unit, e.g. `views/Stream/createEdit`.
///
/// Two routes referencing the same module share one loaded view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewModule(Cow<'static, str>);

impl ViewModule {
    #[must_use]
    pub const fn from_static(module: &'static str) -> Self {
        Self(Cow::Borrowed(module))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory the module lives in (`views/Stream/index` -> `views/Stream`).
    #[must_use]
    pub fn folder(&self) -> &str {
        self.0.rsplit_once('/').map_or("", |(dir, _)| dir)
    }
}

impl From<String> for ViewModule {
    fn from(module: String) -> Self {
        Self(Cow::Owned(module))
    }
}

impl From<&'static str> for ViewModule {
    fn from(module: &'static str) -> Self {
        Self::from_static(module)
    }
}

impl Borrow<str> for ViewModule {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// When a view module gets loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loading {
    /// Loaded on the first navigation that activates it.
    #[default]
    Lazy,
    /// Loaded up front by `Navigator::preload`.
    Eager,
}

/// A route's reference to its view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRef {
    pub module: ViewModule,
    #[serde(default)]
    pub loading: Loading,
}

impl ViewRef {
    #[must_use]
    pub const fn lazy(module: &'static str) -> Self {
        Self {
            module: ViewModule::from_static(module),
            loading: Loading::Lazy,
        }
    }

    #[must_use]
    pub const fn eager(module: &'static str) -> Self {
        Self {
            module: ViewModule::from_static(module),
            loading: Loading::Eager,
        }
    }
}

/// One authored route: the literal form a table is written in.
///
/// Paths are absolute even for children. Build with the chained setters:
///
/// ```
/// use banyandb_ui_router::route::{RouteRecord, ViewRef};
///
/// let record = RouteRecord::new("/banyandb/dashboard")
///     .name("dashboard")
///     .view(ViewRef::lazy("views/Dashboard/index"));
/// assert_eq!(record.name.as_deref(), Some("dashboard"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewRef>,
    #[serde(default)]
    pub meta: RouteMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            redirect: None,
            view: None,
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    #[must_use]
    pub fn view(mut self, view: ViewRef) -> Self {
        self.view = Some(view);
        self
    }

    #[must_use]
    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn children(mut self, children: Vec<RouteRecord>) -> Self {
        self.children = children;
        self
    }
}
