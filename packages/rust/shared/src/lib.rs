//! Shared types, error model, and configuration for pagemark.
//!
//! This crate is the foundation depended on by all other pagemark crates.
//! It provides:
//! - [`PagemarkError`] — the unified error type
//! - Domain types ([`ConversionRequest`], [`ConversionResult`], [`ModelName`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, OllamaConfig, ProxyConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{PagemarkError, Result};
pub use types::{ConversionRequest, ConversionResult, ModelName, artifact_filename};
