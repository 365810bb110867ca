#![allow(dead_code, clippy::unwrap_used)]

pub mod views {
    use async_trait::async_trait;
    use banyandb_ui_router::route::ViewModule;
    use banyandb_ui_router::view::{View, ViewLoadError, ViewLoader, ViewProps};
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    pub type EventLog = Arc<Mutex<Vec<String>>>;

    /// Records every hook as `"<hook> <module>"`.
    pub struct RecordingView {
        module: String,
        log: EventLog,
    }

    impl RecordingView {
        fn record(&self, hook: &str) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{hook} {}", self.module));
        }
    }

    impl View for RecordingView {
        fn mount(&self, _props: &ViewProps) {
            self.record("mount");
        }

        fn update(&self, _props: &ViewProps) {
            self.record("update");
        }

        fn suspend(&self, _props: &ViewProps) {
            self.record("suspend");
        }

        fn resume(&self, _props: &ViewProps) {
            self.record("resume");
        }

        fn unmount(&self, _props: &ViewProps) {
            self.record("unmount");
        }
    }

    /// Loader that counts loads, can fail chosen modules and can hold a
    /// module's load until its gate is notified.
    #[derive(Default)]
    pub struct RecordingLoader {
        log: EventLog,
        loads: Mutex<HashMap<String, usize>>,
        failing: Mutex<HashSet<String>>,
        gates: Mutex<HashMap<String, Arc<Notify>>>,
    }

    impl RecordingLoader {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn fail(&self, module: &str) {
            self.failing.lock().unwrap().insert(module.to_string());
        }

        pub fn heal(&self, module: &str) {
            self.failing.lock().unwrap().remove(module);
        }

        pub fn gate(&self, module: &str) -> Arc<Notify> {
            let notify = Arc::new(Notify::new());
            self.gates
                .lock()
                .unwrap()
                .insert(module.to_string(), Arc::clone(&notify));
            notify
        }

        pub fn loads(&self, module: &str) -> usize {
            self.loads.lock().unwrap().get(module).copied().unwrap_or(0)
        }

        /// Drain the recorded hook events.
        pub fn take_events(&self) -> Vec<String> {
            std::mem::take(&mut *self.log.lock().unwrap())
        }
    }

    #[async_trait]
    impl ViewLoader for RecordingLoader {
        async fn load(&self, module: &ViewModule) -> Result<Arc<dyn View>, ViewLoadError> {
            *self
                .loads
                .lock()
                .unwrap()
                .entry(module.to_string())
                .or_default() += 1;

            let gate = self.gates.lock().unwrap().get(module.as_str()).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }

            if self.failing.lock().unwrap().contains(module.as_str()) {
                return Err(ViewLoadError::new(module.clone(), "chunk failed to load"));
            }

            Ok(Arc::new(RecordingView {
                module: module.to_string(),
                log: Arc::clone(&self.log),
            }))
        }
    }
}

pub mod tables {
    use banyandb_ui_router::route::{RouteMeta, RouteRecord, RouteTable, ViewRef};

    /// A small table with a keep-alive list page next to a detail page.
    pub fn keep_alive_table() -> RouteTable {
        RouteTable::new(vec![
            RouteRecord::new("/app")
                .name("app")
                .view(ViewRef::eager("layout/App"))
                .children(vec![
                    RouteRecord::new("/app/list")
                        .name("list")
                        .view(ViewRef::lazy("views/List"))
                        .meta(RouteMeta::keep_alive(true)),
                    RouteRecord::new("/app/detail/:id")
                        .name("detail")
                        .view(ViewRef::lazy("views/Detail")),
                ]),
            RouteRecord::new("/:pathMatch(.*)")
                .name("missing")
                .view(ViewRef::lazy("views/NotFound")),
        ])
        .unwrap()
    }
}
