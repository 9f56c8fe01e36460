//! Shared types, error model, and configuration for docfuse.
//!
//! This crate is the foundation depended on by all other docfuse crates.
//! It provides:
//! - [`DocfuseError`] — the unified error type
//! - Domain types ([`NavNode`], [`FlatLeaf`], [`PageRecord`])
//! - Per-set profiles ([`ProjectProfile`], the built-in profile table)
//! - Configuration ([`AppConfig`], [`ProfileTable`], config loading)

pub mod config;
pub mod error;
pub mod profile;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, ProfileTable, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{DocfuseError, Result};
pub use profile::{DEFAULT_FILE_STEM, IndexConvention, ProjectProfile, builtin_profiles};
pub use types::{FlatLeaf, NavGroup, NavLeaf, NavNode, PageRecord, title_from_path};
