use super::coalescing_entry::{CacheStats, CoalescingEntry, TxtValues};
use super::registry_builder::RegistryBuilder;
use crate::ports::TxtResolver;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};
use vpcinfo_domain::{DomainError, MetadataKey, Platform, SubnetList, Zone};

/// VPC metadata lookups over one cached TXT record per [`MetadataKey`].
///
/// Each key refreshes independently; lookups that need several keys resolve
/// them concurrently.
pub struct Registry {
    ipv4_subnets: CoalescingEntry,
    ipv6_subnets: CoalescingEntry,
    zone: CoalescingEntry,
    platform: CoalescingEntry,
    timeout: Duration,
    ttl: Duration,
}

impl Registry {
    /// Registry with the default timeout, TTL and record names.
    pub fn new(resolver: Arc<dyn TxtResolver>) -> Self {
        RegistryBuilder::new(resolver).build_unchecked()
    }

    pub fn builder(resolver: Arc<dyn TxtResolver>) -> RegistryBuilder {
        RegistryBuilder::new(resolver)
    }

    pub(crate) fn from_entries(
        [ipv4_subnets, ipv6_subnets, zone, platform]: [CoalescingEntry; 4],
        timeout: Duration,
        ttl: Duration,
    ) -> Self {
        Self {
            ipv4_subnets,
            ipv6_subnets,
            zone,
            platform,
            timeout,
            ttl,
        }
    }

    fn entry(&self, key: MetadataKey) -> &CoalescingEntry {
        match key {
            MetadataKey::Ipv4Subnets => &self.ipv4_subnets,
            MetadataKey::Ipv6Subnets => &self.ipv6_subnets,
            MetadataKey::Zone => &self.zone,
            MetadataKey::Platform => &self.platform,
        }
    }

    /// Raw TXT values of one key.
    pub async fn lookup(
        &self,
        key: MetadataKey,
        cancel: &CancellationToken,
    ) -> Result<TxtValues, DomainError> {
        self.entry(key).get(cancel).await
    }

    /// IPv4 subnets followed by IPv6 subnets.
    ///
    /// Both records are resolved concurrently. The first error is returned
    /// as soon as it arrives; the other record keeps resolving in the
    /// background so its answer still reaches the cache.
    #[instrument(skip(self, cancel))]
    pub async fn lookup_subnets(
        &self,
        cancel: &CancellationToken,
    ) -> Result<SubnetList, DomainError> {
        let mut ipv4 = owned_get(self.ipv4_subnets.clone(), cancel.clone());
        let mut ipv6 = owned_get(self.ipv6_subnets.clone(), cancel.clone());

        let (ipv4, ipv6) = tokio::select! {
            biased;
            first = &mut ipv4 => match first {
                Ok(ipv4) => (ipv4, ipv6.await?),
                Err(e) => {
                    detach(MetadataKey::Ipv6Subnets, ipv6);
                    return Err(e);
                }
            },
            first = &mut ipv6 => match first {
                Ok(ipv6) => (ipv4.await?, ipv6),
                Err(e) => {
                    detach(MetadataKey::Ipv4Subnets, ipv4);
                    return Err(e);
                }
            },
        };

        let ipv4 = SubnetList::classify(MetadataKey::Ipv4Subnets, &ipv4[..])?;
        let ipv6 = SubnetList::classify(MetadataKey::Ipv6Subnets, &ipv6[..])?;

        let subnets = ipv4.merge(ipv6);
        debug!(subnets = subnets.len(), "Subnets resolved");
        Ok(subnets)
    }

    #[instrument(skip(self, cancel))]
    pub async fn lookup_zone(&self, cancel: &CancellationToken) -> Result<Zone, DomainError> {
        let values = self.zone.get(cancel).await?;
        Zone::classify(&values[..])
    }

    #[instrument(skip(self, cancel))]
    pub async fn lookup_platform(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Platform, DomainError> {
        let values = self.platform.get(cancel).await?;
        Ok(Platform::classify(&values[..]))
    }

    pub fn stats(&self, key: MetadataKey) -> CacheStats {
        self.entry(key).stats()
    }

    pub fn record_name(&self, key: MetadataKey) -> &str {
        self.entry(key).record()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

type PendingGet = Pin<Box<dyn Future<Output = Result<TxtValues, DomainError>> + Send>>;

fn owned_get(entry: CoalescingEntry, cancel: CancellationToken) -> PendingGet {
    Box::pin(async move { entry.get(&cancel).await })
}

/// Moves an in-flight get into its own task so it keeps its waiter slot
/// after the caller has returned.
fn detach(key: MetadataKey, pending: PendingGet) {
    trace!(key = %key, "Finishing sibling subnet lookup in background");
    tokio::spawn(async move {
        if let Err(e) = pending.await {
            debug!(key = %key, error = %e, "Background subnet lookup failed");
        }
    });
}
