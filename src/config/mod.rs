// src/config/mod.rs

//! Configuration for turbo-reload.
//!
//! Responsibilities:
//! - Define the plugin options and the TOML-backed file model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants before a watch session starts (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, PluginConfig, RawConfigFile};
