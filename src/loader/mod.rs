//! Composed page loading: one `{data, loading, error}` view over a parent
//! fetch and its dependent child fetch.

mod composed;
mod pages;
mod state;

pub use composed::{ComposedLoader, DependentPage, NoChildren, ParentOutcome};
pub use pages::{HomePageSource, NewsIndexSource, NewsItemSource, VideoChannelIndexSource};
pub use state::{combine, Composite, LoadState, Stage, Stages};
