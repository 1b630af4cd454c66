//! Configuration module for vpcinfo
//!
//! - `root`: Main configuration and CLI overrides
//! - `registry`: Lookup timeout, cache TTL, record names and nameservers
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod errors;
pub mod logging;
pub mod registry;
pub mod root;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use registry::{RecordNames, RegistryConfig};
pub use root::{CliOverrides, Config};
