//! vpcinfo Domain Layer
pub mod config;
pub mod errors;
pub mod metadata_key;
pub mod platform;
pub mod subnet;
pub mod zone;

pub use config::{CliOverrides, Config, ConfigError, RecordNames, RegistryConfig};
pub use errors::DomainError;
pub use metadata_key::MetadataKey;
pub use platform::Platform;
pub use subnet::SubnetList;
pub use zone::Zone;

pub use ipnetwork::IpNetwork;
