//! # Navigator
//!
//! Turns resolutions into mounted views.
//!
//! [`Navigator::navigate`] resolves a target, loads every view on the matched
//! chain, then activates the chain against the currently mounted stack:
//! shared ancestors stay mounted (and get an `update` when params or query
//! changed), views leaving the chain are unmounted (or suspended when their
//! record is `keepAlive`), and new views are mounted (or resumed).
//!
//! The latest navigation wins. Each call takes a generation number and only
//! activates if no newer navigation started while its views were loading.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwapOption;
use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::ids::NavigationId;
use crate::route::{RouteId, ViewModule};
use crate::router::{NavigationTarget, Resolution, Router, RouterError};
use crate::view::{View, ViewLoadError, ViewLoader, ViewProps, ViewRegistry};

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error(transparent)]
    Route(#[from] RouterError),
    #[error("navigation {navigation} failed: {source}")]
    ViewLoad {
        navigation: NavigationId,
        #[source]
        source: ViewLoadError,
    },
    #[error("navigation {navigation} was superseded by a newer navigation")]
    Superseded { navigation: NavigationId },
}

/// A view instance attached to one record of the active chain.
#[derive(Clone)]
struct MountedView {
    module: ViewModule,
    view: Arc<dyn View>,
    props: ViewProps,
}

/// Drives navigation for one console session.
pub struct Navigator {
    router: Arc<Router>,
    views: ViewRegistry,
    generation: AtomicU64,
    current: ArcSwapOption<Resolution>,
    mounted: Mutex<Vec<MountedView>>,
    suspended: DashMap<RouteId, MountedView>,
}

impl Navigator {
    #[must_use]
    pub fn new(router: Arc<Router>, loader: Arc<dyn ViewLoader>) -> Self {
        let views = ViewRegistry::from_table(router.table(), loader);
        Self {
            router,
            views,
            generation: AtomicU64::new(0),
            current: ArcSwapOption::empty(),
            mounted: Mutex::new(Vec::new()),
            suspended: DashMap::new(),
        }
    }

    #[must_use]
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    #[must_use]
    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    /// Load every eager view up front.
    pub async fn preload(&self) -> Result<usize, ViewLoadError> {
        let loaded = self.views.preload_eager().await?;
        info!(loaded, "Eager views preloaded");
        Ok(loaded)
    }

    /// The last activated resolution.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Resolution>> {
        self.current.load_full()
    }

    /// Records with a mounted view, root first.
    #[must_use]
    pub fn mounted(&self) -> Vec<RouteId> {
        self.lock_mounted().iter().map(|m| m.props.route).collect()
    }

    /// Modules of the mounted views, root first.
    #[must_use]
    pub fn mounted_modules(&self) -> Vec<ViewModule> {
        self.lock_mounted().iter().map(|m| m.module.clone()).collect()
    }

    #[must_use]
    pub fn is_suspended(&self, route: RouteId) -> bool {
        self.suspended.contains_key(&route)
    }

    /// Resolve `target`, load its views and activate it.
    pub async fn navigate(
        &self,
        target: impl Into<NavigationTarget>,
    ) -> Result<Arc<Resolution>, NavigationError> {
        let navigation = NavigationId::new();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let target = target.into();
        debug!(%navigation, generation, target = ?target, "Navigation started");

        let resolution = self.router.resolve(target).map_err(|err| {
            warn!(%navigation, error = %err, "Navigation failed to resolve");
            NavigationError::Route(err)
        })?;

        let table = self.router.table();
        let params = resolution.params_map();
        let mut chain = Vec::with_capacity(resolution.matched.len());
        for id in &resolution.matched {
            let node = table.node(*id);
            let Some(view_ref) = &node.view else {
                continue;
            };
            let view = self.views.load(&view_ref.module).await.map_err(|source| {
                error!(
                    %navigation,
                    route = node.label(),
                    module = %view_ref.module,
                    error = %source,
                    "Navigation aborted by view load failure"
                );
                NavigationError::ViewLoad { navigation, source }
            })?;
            chain.push(MountedView {
                module: view_ref.module.clone(),
                view,
                props: ViewProps {
                    navigation,
                    route: *id,
                    name: node.name.clone(),
                    params: params.clone(),
                    query: resolution.location.query.clone(),
                    meta: node.meta.clone(),
                },
            });
        }

        let resolution = Arc::new(resolution);
        {
            let mut mounted = self.lock_mounted();
            if self.generation.load(Ordering::SeqCst) != generation {
                info!(%navigation, generation, "Navigation superseded");
                return Err(NavigationError::Superseded { navigation });
            }
            self.activate(&mut mounted, chain);
            self.current.store(Some(Arc::clone(&resolution)));
        }

        info!(
            %navigation,
            route = resolution.name().unwrap_or_default(),
            path = %resolution.location.path,
            mounted = resolution.matched.len(),
            "Navigation complete"
        );
        Ok(resolution)
    }

    /// Unmount every mounted and suspended view.
    pub fn teardown(&self) {
        let mut mounted = self.lock_mounted();
        while let Some(old) = mounted.pop() {
            old.view.unmount(&old.props);
        }
        let suspended: Vec<RouteId> = self.suspended.iter().map(|e| *e.key()).collect();
        for route in suspended {
            if let Some((_, old)) = self.suspended.remove(&route) {
                old.view.unmount(&old.props);
            }
        }
        self.current.store(None);
        debug!("Navigator torn down");
    }

    fn activate(&self, mounted: &mut Vec<MountedView>, chain: Vec<MountedView>) {
        let shared = mounted
            .iter()
            .zip(&chain)
            .take_while(|(old, new)| old.props.route == new.props.route && old.module == new.module)
            .count();

        for old in mounted.drain(shared..).rev() {
            if old.props.meta.keep_alive {
                debug!(route = ?old.props.name, module = %old.module, "Suspending view");
                old.view.suspend(&old.props);
                self.suspended.insert(old.props.route, old);
            } else {
                debug!(route = ?old.props.name, module = %old.module, "Unmounting view");
                old.view.unmount(&old.props);
            }
        }

        for (index, new) in chain.into_iter().enumerate() {
            if index < shared {
                let current = &mut mounted[index];
                if current.props.differs_from(&new.props) {
                    debug!(route = ?new.props.name, module = %new.module, "Updating view");
                    current.view.update(&new.props);
                }
                current.props = new.props;
                continue;
            }

            let kept = self
                .suspended
                .remove(&new.props.route)
                .and_then(|(_, kept)| {
                    if kept.module == new.module {
                        Some(kept)
                    } else {
                        kept.view.unmount(&kept.props);
                        None
                    }
                });
            match kept {
                Some(kept) => {
                    debug!(route = ?new.props.name, module = %new.module, "Resuming view");
                    kept.view.resume(&new.props);
                    mounted.push(MountedView {
                        props: new.props,
                        ..kept
                    });
                }
                None => {
                    debug!(route = ?new.props.name, module = %new.module, "Mounting view");
                    new.view.mount(&new.props);
                    mounted.push(new);
                }
            }
        }
    }

    fn lock_mounted(&self) -> std::sync::MutexGuard<'_, Vec<MountedView>> {
        self.mounted.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .field("mounted", &self.mounted())
            .field("suspended", &self.suspended.len())
            .finish_non_exhaustive()
    }
}
