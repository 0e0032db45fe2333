//! Two-stage page loading: fetch a parent, then the children it points at.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use super::state::{Composite, LoadState, Stage, Stages};
use crate::error::Result;

/// Result of the first stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentOutcome<P> {
    pub page: P,
    /// Identifier to fetch dependent children by, if this page has any.
    pub children_of: Option<String>,
}

impl<P> ParentOutcome<P> {
    /// A page with no dependent fetch.
    pub fn standalone(page: P) -> Self {
        Self {
            page,
            children_of: None,
        }
    }

    /// A page whose children are fetched by `parent_id`.
    pub fn with_children(page: P, parent_id: impl Into<String>) -> Self {
        Self {
            page,
            children_of: Some(parent_id.into()),
        }
    }
}

/// Child type for pages that never fetch children.
pub type NoChildren = ();

/// A page made of a parent fetch and an optional dependent child fetch.
#[async_trait]
pub trait DependentPage: Send + Sync {
    type Page: Clone + Default + Send + Sync + 'static;
    type Child: Clone + Send + Sync + 'static;

    /// First stage.
    async fn fetch_page(&self) -> Result<ParentOutcome<Self::Page>>;

    /// Second stage. Only called after [`DependentPage::fetch_page`] succeeded
    /// and returned a parent id.
    async fn fetch_children(&self, _parent_id: &str) -> Result<Vec<Self::Child>> {
        Ok(Vec::new())
    }
}

/// Runs page loads and publishes their combined state.
///
/// Each call to [`ComposedLoader::load`] starts a new generation and resets
/// both slots. Results belonging to an older generation are dropped, so a
/// slow response for a previous identifier can never overwrite the current
/// page.
pub struct ComposedLoader<S: DependentPage> {
    stages: watch::Sender<Stages<S::Page, S::Child>>,
    generation: AtomicU64,
}

impl<S: DependentPage> ComposedLoader<S> {
    #[must_use]
    pub fn new() -> Self {
        let (stages, _) = watch::channel(Stages::default());
        Self {
            stages,
            generation: AtomicU64::new(0),
        }
    }

    /// Watch raw stage transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Stages<S::Page, S::Child>> {
        self.stages.subscribe()
    }

    /// Current combined view.
    #[must_use]
    pub fn view(&self) -> LoadState<Composite<S::Page, S::Child>> {
        self.stages.borrow().view()
    }

    /// Load `source`, replacing whatever was loaded before.
    ///
    /// Returns the combined view once this load settles or is superseded.
    pub async fn load(&self, source: &S) -> LoadState<Composite<S::Page, S::Child>> {
        // Bump and reset under the channel lock, so no older load can reset
        // the slots after a newer one has already written to them.
        let mut generation = 0;
        self.stages.send_modify(|stages| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *stages = Stages {
                parent: Stage::Loading,
                children: Stage::Idle,
                children_required: false,
            };
        });

        let parent_id = match source.fetch_page().await {
            Ok(outcome) => {
                let children_of = outcome.children_of;
                let required = children_of.is_some();
                let applied = self.apply(generation, |stages| {
                    stages.parent = Stage::Ready(outcome.page);
                    stages.children_required = required;
                    if required {
                        stages.children = Stage::Loading;
                    }
                });
                match children_of {
                    Some(parent_id) if applied => parent_id,
                    _ => return self.view(),
                }
            }
            Err(e) => {
                self.apply(generation, |stages| {
                    stages.parent = Stage::Failed(e.to_string());
                });
                return self.view();
            }
        };

        let children = source.fetch_children(&parent_id).await;
        self.apply(generation, |stages| {
            stages.children = match children {
                Ok(children) => Stage::Ready(children),
                Err(e) => Stage::Failed(e.to_string()),
            };
        });

        self.view()
    }

    /// Apply `update` if `generation` is still current.
    fn apply(
        &self,
        generation: u64,
        update: impl FnOnce(&mut Stages<S::Page, S::Child>),
    ) -> bool {
        let applied = self.stages.send_if_modified(|stages| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            update(stages);
            true
        });
        if !applied {
            debug!(generation, "Discarding stale page load result");
        }
        applied
    }
}

impl<S: DependentPage> Default for ComposedLoader<S> {
    fn default() -> Self {
        Self::new()
    }
}
