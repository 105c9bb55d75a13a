//! CLI command implementations.

mod display;

pub mod cache;
pub mod crawl;
pub mod depths;
