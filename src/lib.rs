//! Content aggregation over a headless CMS delivery API, plus a caching
//! YouTube proxy restricted to the channels configured in that CMS.

pub mod config;
pub mod constants;
pub mod content;
pub mod error;
pub mod loader;
pub mod video;
pub mod web;
