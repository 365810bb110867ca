//! # Console Routes
//!
//! The navigation tree of the BanyanDB web console.
//!
//! ```text
//! /                                   -> /banyandb
//! /banyandb                           -> /banyandb/dashboard      (layout/Header)
//! ├── /banyandb/dashboard
//! ├── /banyandb/stream                -> /banyandb/stream/start
//! ├── /banyandb/measure               -> /banyandb/measure/start
//! └── /banyandb/property              -> /banyandb/property/start
//! /:pathMatch(.*)                                                 (layout/Header)
//! └── /:pathMatch(.*)                 error
//! ```
//!
//! Every domain repeats the same shape: a `start` onboarding page shared by
//! all domains (told apart by `meta.type`), then `operator-read`,
//! `operator-create` and `operator-edit` leaves keyed by
//! `:type/:operator/:group[/:name]`. Sub-resource editors are mounted under
//! `/banyandb/:schema/...` so one editor serves both streams and measures.
//!
//! Quirks kept as authored:
//! - `edit-measure` renders `views/Stream/createEdit`.
//! - Property declares its edit leaf before its create leaf.
//! - The measure copies of the `:schema` editor routes share their pattern
//!   with the stream copies; path matching lands on the stream ones and the
//!   measure ones are reachable by name.

use crate::route::{ResourceKind, RouteMeta, RouteRecord, RouteTable, ViewRef};
use once_cell::sync::Lazy;
use std::sync::Arc;

pub const HEADER_VIEW: &str = "layout/Header";
pub const START_VIEW: &str = "components/Start/index";
pub const NOT_FOUND_VIEW: &str = "views/Errors/NotFound";

/// Dependent resources attached to streams and measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubResource {
    IndexRule,
    IndexRuleBinding,
    TopNAggregation,
}

impl SubResource {
    /// URL segment of the sub-resource.
    #[must_use]
    pub fn segment(&self) -> &'static str {
        match self {
            SubResource::IndexRule => "index-rule",
            SubResource::IndexRuleBinding => "index-rule-binding",
            SubResource::TopNAggregation => "topn-agg",
        }
    }

    /// Viewer and editor modules, shared across domains.
    fn views(&self) -> (&'static str, &'static str) {
        match self {
            SubResource::IndexRule => ("components/IndexRule/index", "components/IndexRule/Editor"),
            SubResource::IndexRuleBinding => (
                "components/IndexRuleBinding/index",
                "components/IndexRuleBinding/Editor",
            ),
            SubResource::TopNAggregation => (
                "components/TopNAggregation/index",
                "components/TopNAggregation/Editor",
            ),
        }
    }

    /// `:schema` segment of the create/edit leaves. Top-N aggregations only
    /// exist for measures.
    fn schema_segment(&self) -> &'static str {
        match self {
            SubResource::TopNAggregation => ":schema(measure)",
            _ => ":schema",
        }
    }
}

/// Views backing a domain's own entity leaves.
struct EntityViews {
    home: &'static str,
    read: &'static str,
    create: &'static str,
    edit: &'static str,
}

fn start(kind: ResourceKind) -> RouteRecord {
    RouteRecord::new(format!("/banyandb/{kind}/start"))
        .name(format!("{kind}Start"))
        .view(ViewRef::lazy(START_VIEW))
        .meta(RouteMeta::for_resource(kind))
}

fn read_leaf(kind: ResourceKind, name: String, view: &'static str) -> RouteRecord {
    RouteRecord::new(format!(
        "/banyandb/{kind}/operator-read/:type/:operator/:group/:name"
    ))
    .name(name)
    .view(ViewRef::lazy(view))
}

fn create_leaf(kind: ResourceKind, view: &'static str) -> RouteRecord {
    RouteRecord::new(format!("/banyandb/{kind}/operator-create/:type/:operator/:group"))
        .name(format!("create-{kind}"))
        .view(ViewRef::lazy(view))
}

fn edit_leaf(kind: ResourceKind, view: &'static str) -> RouteRecord {
    RouteRecord::new(format!(
        "/banyandb/{kind}/operator-edit/:type/:operator/:group/:name"
    ))
    .name(format!("edit-{kind}"))
    .view(ViewRef::lazy(view))
}

/// Read / create / edit triple for a sub-resource of `kind`.
fn sub_resource(kind: ResourceKind, resource: SubResource) -> [RouteRecord; 3] {
    let seg = resource.segment();
    let schema = resource.schema_segment();
    let (viewer, editor) = resource.views();
    [
        RouteRecord::new(format!(
            "/banyandb/{kind}/{seg}/operator-read/:type/:operator/:group/:name"
        ))
        .name(format!("{kind}-{seg}"))
        .view(ViewRef::lazy(viewer)),
        RouteRecord::new(format!(
            "/banyandb/{schema}/{seg}/operator-create/:type/:operator/:group"
        ))
        .name(format!("{kind}-create-{seg}"))
        .view(ViewRef::lazy(editor)),
        RouteRecord::new(format!(
            "/banyandb/{schema}/{seg}/operator-edit/:type/:operator/:group/:name"
        ))
        .name(format!("{kind}-edit-{seg}"))
        .view(ViewRef::lazy(editor)),
    ]
}

fn domain(
    kind: ResourceKind,
    home_name: &str,
    views: &EntityViews,
    resources: &[SubResource],
) -> RouteRecord {
    let mut children = vec![
        start(kind),
        read_leaf(kind, kind.to_string(), views.read),
        create_leaf(kind, views.create),
        edit_leaf(kind, views.edit),
    ];
    for resource in resources {
        children.extend(sub_resource(kind, *resource));
    }

    RouteRecord::new(format!("/banyandb/{kind}"))
        .name(home_name)
        .redirect(format!("/banyandb/{kind}/start"))
        .view(ViewRef::lazy(views.home))
        .children(children)
}

fn stream() -> RouteRecord {
    domain(
        ResourceKind::Stream,
        "streamHome",
        &EntityViews {
            home: "views/Stream/index",
            read: "views/Stream/stream",
            create: "views/Stream/createEdit",
            edit: "views/Stream/createEdit",
        },
        &[SubResource::IndexRule, SubResource::IndexRuleBinding],
    )
}

fn measure() -> RouteRecord {
    domain(
        ResourceKind::Measure,
        "measureHome",
        &EntityViews {
            home: "views/Measure/index",
            read: "views/Measure/measure",
            create: "views/Measure/createEdit",
            edit: "views/Stream/createEdit",
        },
        &[
            SubResource::IndexRule,
            SubResource::IndexRuleBinding,
            SubResource::TopNAggregation,
        ],
    )
}

fn property() -> RouteRecord {
    let kind = ResourceKind::Property;
    RouteRecord::new("/banyandb/property")
        .name("Property")
        .redirect("/banyandb/property/start")
        .view(ViewRef::lazy("views/Property/index"))
        .children(vec![
            start(kind),
            read_leaf(kind, kind.to_string(), "components/Property/PropertyRead"),
            edit_leaf(kind, "views/Property/createEdit"),
            create_leaf(kind, "views/Property/createEdit"),
        ])
}

/// The console's route records, in declaration order.
#[must_use]
pub fn console_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/").redirect("/banyandb"),
        RouteRecord::new("/banyandb")
            .name("banyandb")
            .redirect("/banyandb/dashboard")
            .view(ViewRef::eager(HEADER_VIEW))
            .meta(RouteMeta::keep_alive(false))
            .children(vec![
                RouteRecord::new("/banyandb/dashboard")
                    .name("dashboard")
                    .view(ViewRef::lazy("views/Dashboard/index")),
                stream(),
                measure(),
                property(),
            ]),
        RouteRecord::new("/:pathMatch(.*)")
            .name("NotFound")
            .view(ViewRef::eager(HEADER_VIEW))
            .meta(RouteMeta::keep_alive(false))
            .children(vec![RouteRecord::new("/:pathMatch(.*)")
                .name("error")
                .view(ViewRef::lazy(NOT_FOUND_VIEW))]),
    ]
}

#[allow(clippy::expect_used)]
static CONSOLE_TABLE: Lazy<Arc<RouteTable>> = Lazy::new(|| {
    Arc::new(RouteTable::new(console_routes()).expect("console route records are well-formed"))
});

/// The console table, built on first use and shared for the process lifetime.
#[must_use]
pub fn console_table() -> Arc<RouteTable> {
    Arc::clone(&CONSOLE_TABLE)
}
