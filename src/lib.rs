//! tagsync: Version-controllable tag configuration snapshots
//!
//! Exports tag configuration trees to disk in one of three layouts, re-exports a single
//! selected path into previously written output without disturbing anything else, and
//! imports exported trees back under configurable collision policies.

pub mod cli;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod layout;
pub mod logging;
pub mod merge;
pub mod store;
pub mod tree;
pub mod types;
