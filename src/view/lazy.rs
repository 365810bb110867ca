use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use super::{View, ViewLoadError, ViewLoader};
use crate::route::{Loading, RouteTable, ViewModule, ViewRef};

/// Memoizing cell around one view module.
///
/// The first successful load is cached for the cell's lifetime. Callers that
/// arrive while a load is in flight wait for it. A failed load leaves the
/// cell empty so the next caller tries again.
pub struct LazyView {
    view: ViewRef,
    cell: OnceCell<Arc<dyn View>>,
    attempts: AtomicUsize,
}

impl LazyView {
    #[must_use]
    pub fn new(view: ViewRef) -> Self {
        Self {
            view,
            cell: OnceCell::new(),
            attempts: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn module(&self) -> &ViewModule {
        &self.view.module
    }

    #[must_use]
    pub fn loading(&self) -> Loading {
        self.view.loading
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// The loaded view, if any.
    #[must_use]
    pub fn get(&self) -> Option<Arc<dyn View>> {
        self.cell.get().map(Arc::clone)
    }

    /// How many times the loader has been invoked for this module.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    pub async fn load(&self, loader: &dyn ViewLoader) -> Result<Arc<dyn View>, ViewLoadError> {
        let view = self
            .cell
            .get_or_try_init(|| async {
                let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
                let start = Instant::now();
                debug!(module = %self.view.module, attempt, "Loading view");

                match loader.load(&self.view.module).await {
                    Ok(view) => {
                        info!(
                            module = %self.view.module,
                            loading = ?self.view.loading,
                            attempt,
                            duration_us = start.elapsed().as_micros(),
                            "View loaded"
                        );
                        Ok(view)
                    }
                    Err(err) => {
                        error!(
                            module = %self.view.module,
                            attempt,
                            error = %err,
                            "View load failed"
                        );
                        Err(err)
                    }
                }
            })
            .await?;
        Ok(Arc::clone(view))
    }
}

impl fmt::Debug for LazyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyView")
            .field("module", &self.view.module)
            .field("loading", &self.view.loading)
            .field("loaded", &self.is_loaded())
            .field("attempts", &self.attempts())
            .finish()
    }
}

/// One [`LazyView`] per distinct module of a route table.
pub struct ViewRegistry {
    loader: Arc<dyn ViewLoader>,
    views: BTreeMap<ViewModule, Arc<LazyView>>,
}

impl ViewRegistry {
    #[must_use]
    pub fn from_table(table: &RouteTable, loader: Arc<dyn ViewLoader>) -> Self {
        let views: BTreeMap<ViewModule, Arc<LazyView>> = table
            .views()
            .into_values()
            .map(|view| (view.module.clone(), Arc::new(LazyView::new(view.clone()))))
            .collect();

        info!(
            modules_count = views.len(),
            eager_count = views
                .values()
                .filter(|v| v.loading() == Loading::Eager)
                .count(),
            "View registry ready"
        );

        Self { loader, views }
    }

    #[must_use]
    pub fn get(&self, module: &str) -> Option<&Arc<LazyView>> {
        self.views.get(module)
    }

    /// Load a module through its cell.
    pub async fn load(&self, module: &ViewModule) -> Result<Arc<dyn View>, ViewLoadError> {
        let cell = self
            .views
            .get(module.as_str())
            .ok_or_else(|| ViewLoadError::new(module.clone(), "module is not referenced by any route"))?;
        cell.load(self.loader.as_ref()).await
    }

    /// Load every eager module; returns how many were loaded.
    pub async fn preload_eager(&self) -> Result<usize, ViewLoadError> {
        let mut loaded = 0;
        for cell in self.views.values().filter(|v| v.loading() == Loading::Eager) {
            cell.load(self.loader.as_ref()).await?;
            loaded += 1;
        }
        Ok(loaded)
    }

    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.views.values().filter(|v| v.is_loaded()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<LazyView>> {
        self.views.values()
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("views", &self.views)
            .finish_non_exhaustive()
    }
}
