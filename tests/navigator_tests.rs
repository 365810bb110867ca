mod common;

use banyandb_ui_router::console::{HEADER_VIEW, START_VIEW};
use banyandb_ui_router::navigator::{NavigationError, Navigator};
use banyandb_ui_router::router::{NavigationTarget, Router, RouterError};
use banyandb_ui_router::runtime_config::RouterConfig;
use common::tables::keep_alive_table;
use common::views::RecordingLoader;
use std::sync::Arc;

const STREAM_READ: &str = "/banyandb/stream/operator-read/stream/read/sw_record/segment";
const STREAM_VIEW: &str = "views/Stream/stream";

fn console_navigator() -> (Arc<Navigator>, Arc<RecordingLoader>) {
    let loader = RecordingLoader::new();
    let router = Arc::new(Router::console(RouterConfig::default()));
    let navigator = Arc::new(Navigator::new(router, loader.clone()));
    (navigator, loader)
}

fn modules(navigator: &Navigator) -> Vec<String> {
    navigator
        .mounted_modules()
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[tokio::test]
async fn test_root_mounts_header_and_dashboard() {
    let (nav, loader) = console_navigator();
    let res = nav.navigate("/").await.unwrap();
    assert_eq!(res.name(), Some("dashboard"));
    assert_eq!(modules(&nav), vec![HEADER_VIEW, "views/Dashboard/index"]);
    assert_eq!(
        loader.take_events(),
        vec!["mount layout/Header", "mount views/Dashboard/index"]
    );
    assert_eq!(nav.current().unwrap().name(), Some("dashboard"));
}

#[tokio::test]
async fn test_shared_start_view_loads_once() {
    let (nav, loader) = console_navigator();
    for domain in ["stream", "measure", "property"] {
        let res = nav.navigate(format!("/banyandb/{domain}")).await.unwrap();
        assert_eq!(res.name(), Some(format!("{domain}Start").as_str()));
    }
    assert_eq!(loader.loads(START_VIEW), 1);
    assert_eq!(loader.loads(HEADER_VIEW), 1);
    assert!(nav.views().get(START_VIEW).unwrap().is_loaded());
    assert!(!nav.views().get(STREAM_VIEW).unwrap().is_loaded());
}

#[tokio::test]
async fn test_preload_loads_only_eager_views() {
    let (nav, loader) = console_navigator();
    assert_eq!(nav.preload().await.unwrap(), 1);
    assert_eq!(nav.views().loaded_count(), 1);
    assert_eq!(loader.loads(HEADER_VIEW), 1);

    nav.navigate("/banyandb/dashboard").await.unwrap();
    assert_eq!(loader.loads(HEADER_VIEW), 1);
    assert!(nav.views().get(HEADER_VIEW).unwrap().is_loaded());
}

#[tokio::test]
async fn test_failed_load_keeps_previous_state_and_retries() {
    let (nav, loader) = console_navigator();
    nav.navigate("/banyandb/dashboard").await.unwrap();
    loader.take_events();

    loader.fail(STREAM_VIEW);
    let err = nav.navigate(STREAM_READ).await.unwrap_err();
    match &err {
        NavigationError::ViewLoad { source, .. } => assert_eq!(source.module.as_str(), STREAM_VIEW),
        other => panic!("expected a view load error, got {other}"),
    }
    assert_eq!(nav.current().unwrap().name(), Some("dashboard"));
    assert_eq!(modules(&nav), vec![HEADER_VIEW, "views/Dashboard/index"]);
    assert!(loader.take_events().is_empty());

    loader.heal(STREAM_VIEW);
    let res = nav.navigate(STREAM_READ).await.unwrap();
    assert_eq!(res.name(), Some("stream"));
    assert_eq!(loader.loads(STREAM_VIEW), 2);
    assert_eq!(nav.views().get(STREAM_VIEW).unwrap().attempts(), 2);
}

#[tokio::test]
async fn test_newer_navigation_supersedes_pending_one() {
    let (nav, loader) = console_navigator();
    let gate = loader.gate(STREAM_VIEW);

    let pending = tokio::spawn({
        let nav = Arc::clone(&nav);
        async move { nav.navigate(STREAM_READ).await }
    });
    while loader.loads(STREAM_VIEW) == 0 {
        tokio::task::yield_now().await;
    }

    let res = nav.navigate("/banyandb/dashboard").await.unwrap();
    assert_eq!(res.name(), Some("dashboard"));

    gate.notify_one();
    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, NavigationError::Superseded { .. }));

    assert_eq!(nav.current().unwrap().name(), Some("dashboard"));
    assert_eq!(modules(&nav), vec![HEADER_VIEW, "views/Dashboard/index"]);
    // The superseded load still fills the cache
    assert!(nav.views().get(STREAM_VIEW).unwrap().is_loaded());
}

#[tokio::test]
async fn test_concurrent_navigations_share_one_load() {
    let (nav, loader) = console_navigator();
    let gate = loader.gate(START_VIEW);

    let (first, second, ()) = tokio::join!(
        nav.navigate("/banyandb/stream"),
        nav.navigate("/banyandb/measure"),
        async {
            while loader.loads(START_VIEW) == 0 {
                tokio::task::yield_now().await;
            }
            gate.notify_one();
        }
    );

    assert!(matches!(first, Err(NavigationError::Superseded { .. })));
    assert_eq!(second.unwrap().name(), Some("measureStart"));
    assert_eq!(loader.loads(START_VIEW), 1);
    assert_eq!(
        modules(&nav),
        vec![HEADER_VIEW, "views/Measure/index", START_VIEW]
    );
}

#[tokio::test]
async fn test_hook_sequence_across_navigations() {
    let (nav, loader) = console_navigator();

    nav.navigate(STREAM_READ).await.unwrap();
    assert_eq!(
        loader.take_events(),
        vec![
            "mount layout/Header",
            "mount views/Stream/index",
            "mount views/Stream/stream",
        ]
    );

    // Same record, new params: every view stays and is updated
    nav.navigate("/banyandb/stream/operator-read/stream/read/sw_record/other")
        .await
        .unwrap();
    assert_eq!(
        loader.take_events(),
        vec![
            "update layout/Header",
            "update views/Stream/index",
            "update views/Stream/stream",
        ]
    );

    // Same location again: nothing changes
    nav.navigate("/banyandb/stream/operator-read/stream/read/sw_record/other")
        .await
        .unwrap();
    assert!(loader.take_events().is_empty());

    nav.navigate("/banyandb/dashboard").await.unwrap();
    assert_eq!(
        loader.take_events(),
        vec![
            "unmount views/Stream/stream",
            "unmount views/Stream/index",
            "update layout/Header",
            "mount views/Dashboard/index",
        ]
    );

    // The not-found shell is a different record, so the header remounts
    let res = nav.navigate("/no/such/page").await.unwrap();
    assert!(res.fallback);
    assert_eq!(
        loader.take_events(),
        vec![
            "unmount views/Dashboard/index",
            "unmount layout/Header",
            "mount layout/Header",
            "mount views/Errors/NotFound",
        ]
    );
}

#[tokio::test]
async fn test_query_change_updates_views() {
    let (nav, loader) = console_navigator();
    nav.navigate("/banyandb/dashboard").await.unwrap();
    loader.take_events();

    let res = nav.navigate("/banyandb/dashboard?range=1h").await.unwrap();
    assert_eq!(res.location.query_param("range"), Some("1h"));
    assert_eq!(
        loader.take_events(),
        vec!["update layout/Header", "update views/Dashboard/index"]
    );
}

#[tokio::test]
async fn test_keep_alive_views_suspend_and_resume() {
    let loader = RecordingLoader::new();
    let router = Arc::new(Router::new(
        Arc::new(keep_alive_table()),
        RouterConfig::default(),
    ));
    let list = router.table().by_name("list").unwrap();
    let nav = Navigator::new(router, loader.clone());

    nav.navigate("/app/list").await.unwrap();
    assert_eq!(
        loader.take_events(),
        vec!["mount layout/App", "mount views/List"]
    );

    nav.navigate("/app/detail/7").await.unwrap();
    assert_eq!(
        loader.take_events(),
        vec![
            "suspend views/List",
            "update layout/App",
            "mount views/Detail",
        ]
    );
    assert!(nav.is_suspended(list));

    nav.navigate("/app/list").await.unwrap();
    assert_eq!(
        loader.take_events(),
        vec![
            "unmount views/Detail",
            "update layout/App",
            "resume views/List",
        ]
    );
    assert!(!nav.is_suspended(list));
    assert_eq!(loader.loads("views/List"), 1);

    nav.navigate("/app/detail/8").await.unwrap();
    loader.take_events();
    nav.teardown();
    assert_eq!(
        loader.take_events(),
        vec![
            "unmount views/Detail",
            "unmount layout/App",
            "unmount views/List",
        ]
    );
    assert!(nav.current().is_none());
    assert!(nav.mounted().is_empty());
    assert!(!nav.is_suspended(list));
}

#[tokio::test]
async fn test_named_navigation() {
    let (nav, _loader) = console_navigator();
    let target = NavigationTarget::named(
        "edit-measure",
        [
            ("type", "measure"),
            ("operator", "edit"),
            ("group", "sw_metric"),
            ("name", "service_cpm"),
        ],
    );
    let res = nav.navigate(target).await.unwrap();
    assert_eq!(res.name(), Some("edit-measure"));
    assert_eq!(
        res.location.path,
        "/banyandb/measure/operator-edit/measure/edit/sw_metric/service_cpm"
    );
    assert_eq!(
        modules(&nav),
        vec![HEADER_VIEW, "views/Measure/index", "views/Stream/createEdit"]
    );
}

#[tokio::test]
async fn test_unknown_route_name_is_an_error() {
    let (nav, loader) = console_navigator();
    let err = nav
        .navigate(NavigationTarget::named(
            "no-such-route",
            std::iter::empty::<(String, String)>(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        NavigationError::Route(RouterError::UnknownRoute(ref name)) if name == "no-such-route"
    ));
    assert!(nav.current().is_none());
    assert!(loader.take_events().is_empty());
}
