//! Configuration module for storefront search
//!
//! This module provides the `SearchConfig` struct and its type-safe builder
//! for configuring the search orchestrator with validation and sensible defaults.

pub mod builder;
pub mod getters;
pub mod types;

pub use builder::{NeedsBaseUrl, SearchConfigBuilder, WithBaseUrl};
pub use types::{ConfigError, SearchConfig};
