//! Integration tests for tagsync

mod config_integration;
mod dependency_order;
mod export_layouts;
mod import_roundtrip;
mod merge_properties;
mod selective_merge;
