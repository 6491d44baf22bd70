//! Shared types, error model, and configuration for mdgen.
//!
//! This crate is the foundation depended on by all other mdgen crates.
//! It provides:
//! - [`MdGenError`]: the unified error type
//! - Domain types ([`Header`], [`Row`], [`Delimiter`])
//! - Configuration ([`AppConfig`], [`GenerateConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ConversionConfig, DefaultsConfig, GenerateConfig, PathsConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{MdGenError, Result};
pub use types::{Delimiter, Header, Row};
