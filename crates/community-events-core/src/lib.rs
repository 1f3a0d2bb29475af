//! Shared plumbing: service configuration and tracing setup

pub mod config;
pub mod tracing;

pub use config::{ConfigError, ConfigResult, ServiceConfig};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
