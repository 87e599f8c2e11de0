//! Configuration management for the car advisor
//!
//! Supports loading configuration from:
//! - TOML files
//! - Environment variables (CAR_ADVISOR_ prefix, `__` separator)
//! - Built-in defaults
//!
//! Also carries the static market tables (regional price bands) that the
//! context assembler renders into model context.

pub mod pricing;
pub mod settings;

pub use pricing::{price_guidance, PriceBand, FALLBACK_CURRENCY};
pub use settings::{
    load_settings, ContextSettings, GatewaySettings, RetrievalSettings, SessionSettings, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
