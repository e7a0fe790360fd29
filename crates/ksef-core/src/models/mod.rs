//! Data models: configuration, records and datasets.

pub mod config;
pub mod record;
