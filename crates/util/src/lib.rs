//! Configuration loading and small helpers shared by the admin panel crates.

pub mod config;
mod path_processing;
pub mod redaction;

pub use config::{ApiSection, ConfigError, NavigationSection, PanelConfig};
pub use path_processing::expand_tilde;
pub use redaction::redact_sensitive;
