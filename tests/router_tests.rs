use banyandb_ui_router::console::{console_table, NOT_FOUND_VIEW};
use banyandb_ui_router::route::{RouteRecord, RouteTable, TableError};
use banyandb_ui_router::router::{Resolution, Router};
use banyandb_ui_router::runtime_config::RouterConfig;
use std::collections::HashSet;

fn router() -> Router {
    Router::console(RouterConfig::default())
}

fn resolve(path: &str) -> Resolution {
    router()
        .resolve(path)
        .unwrap_or_else(|e| panic!("resolve {path}: {e}"))
}

fn view_of(router: &Router, res: &Resolution) -> String {
    router
        .table()
        .node(res.route)
        .view
        .as_ref()
        .map(|v| v.module.to_string())
        .unwrap_or_default()
}

#[test]
fn test_leaf_paths_resolve_to_names_and_params() {
    let cases: &[(&str, &str, &[(&str, &str)])] = &[
        ("/banyandb/dashboard", "dashboard", &[]),
        ("/banyandb/stream/start", "streamStart", &[]),
        (
            "/banyandb/stream/operator-read/stream/read/sw_record/segment",
            "stream",
            &[
                ("type", "stream"),
                ("operator", "read"),
                ("group", "sw_record"),
                ("name", "segment"),
            ],
        ),
        (
            "/banyandb/stream/operator-create/stream/create/sw_record",
            "create-stream",
            &[("group", "sw_record")],
        ),
        (
            "/banyandb/measure/operator-edit/measure/edit/sw_metric/service_cpm",
            "edit-measure",
            &[("name", "service_cpm")],
        ),
        (
            "/banyandb/measure/index-rule-binding/operator-read/measure/read/sw_metric/b1",
            "measure-index-rule-binding",
            &[("group", "sw_metric"), ("name", "b1")],
        ),
        (
            "/banyandb/stream/index-rule/operator-read/stream/read/sw_record/trace_id",
            "stream-index-rule",
            &[("name", "trace_id")],
        ),
        (
            "/banyandb/measure/topn-agg/operator-read/measure/read/sw_metric/top_endpoints",
            "measure-topn-agg",
            &[("name", "top_endpoints")],
        ),
        (
            "/banyandb/measure/topn-agg/operator-edit/measure/edit/sw_metric/top_endpoints",
            "measure-edit-topn-agg",
            &[("schema", "measure"), ("name", "top_endpoints")],
        ),
        (
            "/banyandb/stream/index-rule-binding/operator-edit/stream/edit/sw_record/b2",
            "stream-edit-index-rule-binding",
            &[("schema", "stream"), ("name", "b2")],
        ),
        (
            "/banyandb/property/operator-read/property/read/sw_property/ui_template",
            "property",
            &[("group", "sw_property"), ("name", "ui_template")],
        ),
        (
            "/banyandb/property/operator-create/property/create/sw_property",
            "create-property",
            &[("operator", "create")],
        ),
    ];

    for (path, name, params) in cases {
        let res = resolve(path);
        assert_eq!(res.name(), Some(*name), "path {path}");
        assert!(res.redirects.is_empty(), "path {path}");
        for (key, value) in *params {
            assert_eq!(res.get_param(key), Some(*value), "param {key} of {path}");
        }
    }
}

#[test]
fn test_root_is_dashboard_after_two_redirects() {
    let root = resolve("/");
    let dashboard = resolve("/banyandb/dashboard");
    assert_eq!(root.route, dashboard.route);
    assert_eq!(root.matched, dashboard.matched);
    assert_eq!(root.location.path, dashboard.location.path);
    assert_eq!(root.redirects.len(), 2);
}

#[test]
fn test_domain_homes_redirect_to_start_with_type_meta() {
    let router = router();
    for domain in ["stream", "measure", "property"] {
        let res = router.resolve(format!("/banyandb/{domain}")).unwrap();
        assert_eq!(res.name(), Some(format!("{domain}Start").as_str()));
        let meta = &router.table().node(res.route).meta;
        assert_eq!(meta.resource_type.map(|k| k.as_str()), Some(domain));
        assert_eq!(view_of(&router, &res), "components/Start/index");
    }
}

#[test]
fn test_create_needs_no_name_and_read_edit_need_one() {
    assert_eq!(
        resolve("/banyandb/measure/operator-create/measure/create/sw_metric").name(),
        Some("create-measure")
    );
    for path in [
        "/banyandb/measure/operator-read/measure/read/sw_metric",
        "/banyandb/measure/operator-edit/measure/edit/sw_metric",
        "/banyandb/property/operator-read/property/read/sw_property",
        "/banyandb/stream/index-rule/operator-read/stream/read/sw_record",
    ] {
        let res = resolve(path);
        assert_eq!(res.name(), Some("error"), "path {path}");
        assert!(res.fallback);
    }
}

#[test]
fn test_names_are_unique() {
    let table = console_table();
    let names: Vec<&str> = table.iter().filter_map(|n| n.name.as_deref()).collect();
    let unique: HashSet<&str> = names.iter().copied().collect();
    assert_eq!(names.len(), unique.len());
    assert_eq!(names.len(), table.len() - 1);

    let err = RouteTable::new(vec![
        RouteRecord::new("/a").name("stream"),
        RouteRecord::new("/b").name("stream"),
    ])
    .unwrap_err();
    assert!(matches!(err, TableError::DuplicateName { .. }));
}

#[test]
fn test_index_rule_editors_are_shared_across_domains() {
    let router = router();
    let stream = router
        .resolve("/banyandb/stream/index-rule/operator-create/stream/create/sw_record")
        .unwrap();
    let measure = router
        .resolve("/banyandb/measure/index-rule/operator-create/measure/create/sw_metric")
        .unwrap();
    assert_eq!(view_of(&router, &stream), "components/IndexRule/Editor");
    assert_eq!(view_of(&router, &stream), view_of(&router, &measure));
    assert_eq!(stream.get_param("schema"), Some("stream"));
    assert_eq!(measure.get_param("schema"), Some("measure"));
}

#[test]
fn test_unknown_paths_resolve_to_error_only() {
    let router = router();
    for path in [
        "/nope",
        "/banyandb/unknown",
        "/banyandb/dashboard/extra",
        "/banyandb/stream/start/extra",
        "/banyandb/stream/operator-delete/stream/delete/g/n",
        "/banyandb/trace/operator-read/trace/read/g/n",
        "/banyandb/property/index-rule/operator-read/property/read/g/n",
        "/deeply/nested/unknown/path/with/many/segments",
    ] {
        let res = router.resolve(path).unwrap();
        assert_eq!(res.name(), Some("error"), "path {path}");
        assert!(res.fallback);
        assert_eq!(view_of(&router, &res), NOT_FOUND_VIEW);
        let chain: Vec<&str> = res
            .matched
            .iter()
            .map(|id| router.table().node(*id).label())
            .collect();
        assert_eq!(chain, vec!["NotFound", "error"]);
    }
}

#[test]
fn test_topn_agg_exists_only_under_measure() {
    let router = router();
    let measure = router
        .resolve("/banyandb/measure/topn-agg/operator-create/measure/create/sw_metric")
        .unwrap();
    assert_eq!(measure.name(), Some("measure-create-topn-agg"));

    for path in [
        "/banyandb/stream/topn-agg/operator-read/stream/read/sw_record/t",
        "/banyandb/stream/topn-agg/operator-create/stream/create/sw_record",
        "/banyandb/stream/topn-agg/operator-edit/stream/edit/sw_record/t",
    ] {
        assert_eq!(router.resolve(path).unwrap().name(), Some("error"), "path {path}");
    }
}

#[test]
fn test_topn_agg_matches_mixed_case_measure() {
    let router = router();
    for (path, name) in [
        (
            "/banyandb/Measure/topn-agg/operator-read/measure/read/sw_metric/top",
            "measure-topn-agg",
        ),
        (
            "/banyandb/Measure/topn-agg/operator-create/measure/create/sw_metric",
            "measure-create-topn-agg",
        ),
        (
            "/banyandb/Measure/topn-agg/operator-edit/measure/edit/sw_metric/top",
            "measure-edit-topn-agg",
        ),
    ] {
        assert_eq!(router.resolve(path).unwrap().name(), Some(name), "path {path}");
    }

    let sensitive = Router::console(RouterConfig {
        sensitive: true,
        ..RouterConfig::default()
    });
    assert_eq!(
        sensitive
            .resolve("/banyandb/Measure/topn-agg/operator-create/measure/create/sw_metric")
            .unwrap()
            .name(),
        Some("error")
    );
}

#[test]
fn test_matched_chain_includes_every_ancestor() {
    let router = router();
    let res = router
        .resolve("/banyandb/measure/index-rule/operator-read/measure/read/sw_metric/r1")
        .unwrap();
    let chain: Vec<&str> = res
        .matched
        .iter()
        .map(|id| router.table().node(*id).label())
        .collect();
    assert_eq!(chain, vec!["banyandb", "measureHome", "measure-index-rule"]);
}

#[test]
fn test_path_normalisation() {
    assert_eq!(resolve("/BanyanDB/Dashboard").name(), Some("dashboard"));
    assert_eq!(resolve("//banyandb//dashboard/").name(), Some("dashboard"));
    assert_eq!(
        resolve("/banyandb/stream/operator-read/stream/read/sw%20record/seg%2Fment").get_param("name"),
        Some("seg/ment")
    );
    assert_eq!(
        resolve("/banyandb/stream/operator-read/stream/read/sw%20record/x").get_param("group"),
        Some("sw record")
    );
}

#[test]
fn test_case_sensitive_config() {
    let router = Router::console(RouterConfig {
        sensitive: true,
        ..RouterConfig::default()
    });
    assert_eq!(router.resolve("/BanyanDB/Dashboard").unwrap().name(), Some("error"));
    assert_eq!(router.resolve("/banyandb/dashboard").unwrap().name(), Some("dashboard"));
}

#[test]
fn test_param_values_keep_their_case() {
    let res = resolve("/banyandb/measure/operator-read/MEASURE/Read/SW_Metric/Service");
    assert_eq!(res.get_param("type"), Some("MEASURE"));
    assert_eq!(res.get_param("group"), Some("SW_Metric"));
}
