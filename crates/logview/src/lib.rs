//! # logview
//!
//! Command-line front end for the [`viewer`] core: configuration loading,
//! the startup gate, tracing setup and text rendering.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: tracing subscriber setup
//! - [`startup`]: enable gate and log root checks
//! - [`render`]: plain-text output for directory and file views

pub mod config;
pub mod logging;
pub mod render;
pub mod startup;

pub use config::{default_config_path, Config, ConfigError};
pub use startup::open_viewer;
