//! # vpcinfo
//!
//! VPC metadata (subnets, availability zone, platform) published as DNS TXT
//! records, resolved through a coalescing TTL cache.
//!
//! The free functions share one process-wide registry over the system
//! resolver:
//!
//! ```no_run
//! # async fn example() -> Result<(), vpcinfo::DomainError> {
//! let cancel = tokio_util::sync::CancellationToken::new();
//! let zone = vpcinfo::lookup_zone(&cancel).await?;
//! println!("running in {}", zone);
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod report;

pub use vpcinfo_application::{CacheStats, Registry, RegistryBuilder, TxtResolver};
pub use vpcinfo_domain::{
    Config, ConfigError, DomainError, IpNetwork, MetadataKey, Platform, RegistryConfig,
    SubnetList, Zone,
};
pub use vpcinfo_infrastructure::{
    default_registry, lookup_platform, lookup_subnets, lookup_zone, DmiPlatformResolver,
    UdpTxtResolver,
};
