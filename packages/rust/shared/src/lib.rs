//! Shared types, error model, and configuration for cims.
//!
//! This crate is the foundation depended on by all other cims crates.
//! It provides:
//! - [`CimsError`] — the unified error type
//! - Domain types ([`BasicMountainRecord`], [`GeoFields`], [`EnrichedMountainRecord`])
//! - Configuration ([`AppConfig`], [`RunConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_BOOTSTRAP_URL, DEFAULT_CATALOG_URL, DEFAULT_CONCURRENCY,
    DEFAULT_OUTPUT_FILE, DefaultsConfig, RunConfig, SiteConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, validate,
};
pub use error::{CimsError, Result};
pub use types::{BasicMountainRecord, EnrichedMountainRecord, GeoFields};
