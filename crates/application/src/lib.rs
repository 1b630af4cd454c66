//! vpcinfo Application Layer
pub mod ports;
pub mod services;

pub use ports::TxtResolver;
pub use services::{CacheStats, CoalescingEntry, Registry, RegistryBuilder, TxtValues};
