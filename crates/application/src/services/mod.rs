pub mod coalescing_entry;
pub mod registry;
pub mod registry_builder;

pub use coalescing_entry::{CacheStats, CoalescingEntry, TxtValues};
pub use registry::Registry;
pub use registry_builder::RegistryBuilder;
