//! Load states and the combinator that merges a parent and a child fetch.

use serde::Serialize;

use crate::error::Error;

/// The externally visible state of a page load.
///
/// `data` holds its default value until the load resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T: Default> LoadState<T> {
    #[must_use]
    pub fn loading() -> Self {
        Self {
            data: T::default(),
            loading: true,
            error: None,
        }
    }

    #[must_use]
    pub fn loaded(data: T) -> Self {
        Self {
            data,
            loading: false,
            error: None,
        }
    }

    #[must_use]
    pub fn errored(message: impl Into<String>) -> Self {
        Self {
            data: T::default(),
            loading: false,
            error: Some(message.into()),
        }
    }

    /// Settle a single fetch into a terminal state.
    #[must_use]
    pub fn from_result(result: Result<T, Error>) -> Self {
        match result {
            Ok(data) => Self::loaded(data),
            Err(e) => Self::errored(e.to_string()),
        }
    }
}

impl<T> LoadState<T> {
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}

/// One fetch slot owned by the composed loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage<T> {
    /// Not started. For the child slot this means the parent id is not known yet.
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Stage<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed(_))
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// A page together with its dependent children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Composite<P, C> {
    pub page: P,
    pub children: Vec<C>,
}

impl<P: Default, C> Default for Composite<P, C> {
    fn default() -> Self {
        Self {
            page: P::default(),
            children: Vec::new(),
        }
    }
}

/// Both fetch slots of a page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stages<P, C> {
    pub parent: Stage<P>,
    pub children: Stage<Vec<C>>,
    /// Set once the parent has resolved and declared a dependent fetch.
    pub children_required: bool,
}

impl<P, C> Default for Stages<P, C> {
    fn default() -> Self {
        Self {
            parent: Stage::Idle,
            children: Stage::Idle,
            children_required: false,
        }
    }
}

impl<P: Clone + Default, C: Clone> Stages<P, C> {
    #[must_use]
    pub fn view(&self) -> LoadState<Composite<P, C>> {
        combine(&self.parent, &self.children, self.children_required)
    }
}

/// Merge the parent and child slots into one view.
///
/// The view is loading while the parent has not settled, and, once the
/// parent has succeeded with a dependent fetch, until the children settle.
/// A child slot that never started because the parent is unresolved adds
/// nothing on its own. The first error wins and data stays at its default
/// until every required slot is ready.
#[must_use]
pub fn combine<P: Clone + Default, C: Clone>(
    parent: &Stage<P>,
    children: &Stage<Vec<C>>,
    children_required: bool,
) -> LoadState<Composite<P, C>> {
    if let Some(message) = parent.error().or_else(|| children.error()) {
        return LoadState::errored(message);
    }

    let Some(page) = parent.value() else {
        return LoadState::loading();
    };

    if !children_required {
        return LoadState::loaded(Composite {
            page: page.clone(),
            children: Vec::new(),
        });
    }

    match children.value() {
        Some(children) => LoadState::loaded(Composite {
            page: page.clone(),
            children: children.clone(),
        }),
        None => LoadState::loading(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type View = LoadState<Composite<String, u32>>;

    fn view(parent: &Stage<String>, children: &Stage<Vec<u32>>, required: bool) -> View {
        combine(parent, children, required)
    }

    fn page() -> Stage<String> {
        Stage::Ready("page".to_string())
    }

    #[test]
    fn test_load_state_lifecycle() {
        let state: LoadState<Vec<u32>> = LoadState::loading();
        assert!(state.loading);
        assert!(state.data.is_empty());

        let done = LoadState::from_result(Ok(vec![1]));
        assert!(done.is_settled());
        assert_eq!(done.data, vec![1]);
        assert_eq!(done.error, None);

        let failed: LoadState<Vec<u32>> = LoadState::from_result(Err(Error::NotFound));
        assert!(failed.is_settled());
        assert_eq!(failed.error.as_deref(), Some("Content not found"));
    }

    #[test]
    fn test_parent_idle_is_loading() {
        let v = view(&Stage::Idle, &Stage::Idle, false);
        assert!(v.loading);
        assert_eq!(v.error, None);
        assert_eq!(v.data, Composite::default());
    }

    #[test]
    fn test_parent_loading_children_idle() {
        for required in [false, true] {
            let v = view(&Stage::Loading, &Stage::Idle, required);
            assert!(v.loading);
            assert_eq!(v.data, Composite::default());
        }
    }

    #[test]
    fn test_parent_ready_without_children() {
        let v = view(&page(), &Stage::Idle, false);
        assert!(!v.loading);
        assert_eq!(v.error, None);
        assert_eq!(v.data.page, "page");
        assert!(v.data.children.is_empty());
    }

    #[test]
    fn test_parent_ready_children_not_started_stays_loading() {
        let v = view(&page(), &Stage::Idle, true);
        assert!(v.loading);
        assert_eq!(v.data, Composite::default());
    }

    #[test]
    fn test_parent_ready_children_loading() {
        let v = view(&page(), &Stage::Loading, true);
        assert!(v.loading);
        assert_eq!(v.error, None);
        assert_eq!(v.data, Composite::default());
    }

    #[test]
    fn test_both_ready() {
        let v = view(&page(), &Stage::Ready(vec![1, 2]), true);
        assert!(!v.loading);
        assert_eq!(v.error, None);
        assert_eq!(v.data.page, "page");
        assert_eq!(v.data.children, vec![1, 2]);
    }

    #[test]
    fn test_both_ready_empty_children() {
        let v = view(&page(), &Stage::Ready(vec![]), true);
        assert!(!v.loading);
        assert!(v.data.children.is_empty());
        assert_eq!(v.data.page, "page");
    }

    #[test]
    fn test_parent_failed() {
        for children in [Stage::Idle, Stage::Loading, Stage::Ready(vec![1])] {
            let v = view(&Stage::Failed("boom".to_string()), &children, true);
            assert!(!v.loading);
            assert_eq!(v.error.as_deref(), Some("boom"));
            assert_eq!(v.data, Composite::default());
        }
    }

    #[test]
    fn test_children_failed() {
        let v = view(&page(), &Stage::Failed("no children".to_string()), true);
        assert!(!v.loading);
        assert_eq!(v.error.as_deref(), Some("no children"));
        assert_eq!(v.data, Composite::default());
    }

    #[test]
    fn test_parent_error_wins_over_child_error() {
        let v = view(
            &Stage::Failed("parent".to_string()),
            &Stage::Failed("child".to_string()),
            true,
        );
        assert_eq!(v.error.as_deref(), Some("parent"));
    }

    #[test]
    fn test_stage_helpers() {
        let stage: Stage<u32> = Stage::Failed("x".to_string());
        assert!(stage.is_settled());
        assert!(!stage.is_ready());
        assert_eq!(stage.error(), Some("x"));
        assert!(Stage::<u32>::Loading.is_loading());
        assert!(!Stage::<u32>::Idle.is_settled());
        assert_eq!(Stage::Ready(3).value(), Some(&3));
    }
}
