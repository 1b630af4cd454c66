//! vpcinfo Infrastructure Layer
pub mod defaults;
pub mod dns;
pub mod system;

pub use defaults::{default_registry, lookup_platform, lookup_subnets, lookup_zone};
pub use dns::UdpTxtResolver;
pub use system::DmiPlatformResolver;
