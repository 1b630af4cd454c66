//! Process-wide registry over the system resolver.
//!
//! Built on first use with the default timeout, TTL and record names; every
//! lookup in the process then shares its cache.

use crate::dns::UdpTxtResolver;
use crate::system::DmiPlatformResolver;
use std::sync::{Arc, LazyLock};
use tokio_util::sync::CancellationToken;
use vpcinfo_application::{Registry, TxtResolver};
use vpcinfo_domain::{DomainError, Platform, RecordNames, SubnetList, Zone};

static DEFAULT_REGISTRY: LazyLock<Registry> = LazyLock::new(|| Registry::new(system_resolver()));

/// UDP resolver over the system nameservers, with the DMI shortcut for the
/// default platform record.
pub fn system_resolver() -> Arc<dyn TxtResolver> {
    let udp: Arc<dyn TxtResolver> = Arc::new(UdpTxtResolver::from_system());
    Arc::new(DmiPlatformResolver::new(udp, &RecordNames::default()))
}

pub fn default_registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}

pub async fn lookup_platform(cancel: &CancellationToken) -> Result<Platform, DomainError> {
    DEFAULT_REGISTRY.lookup_platform(cancel).await
}

pub async fn lookup_zone(cancel: &CancellationToken) -> Result<Zone, DomainError> {
    DEFAULT_REGISTRY.lookup_zone(cancel).await
}

pub async fn lookup_subnets(cancel: &CancellationToken) -> Result<SubnetList, DomainError> {
    DEFAULT_REGISTRY.lookup_subnets(cancel).await
}
