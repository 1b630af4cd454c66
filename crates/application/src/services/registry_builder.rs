use super::coalescing_entry::CoalescingEntry;
use super::registry::Registry;
use crate::ports::TxtResolver;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use vpcinfo_domain::{ConfigError, MetadataKey, RecordNames, RegistryConfig};

pub struct RegistryBuilder {
    resolver: Arc<dyn TxtResolver>,
    timeout: Duration,
    ttl: Duration,
    records: RecordNames,
}

impl RegistryBuilder {
    pub fn new(resolver: Arc<dyn TxtResolver>) -> Self {
        let defaults = RegistryConfig::default();
        Self {
            resolver,
            timeout: defaults.timeout(),
            ttl: defaults.ttl(),
            records: defaults.records,
        }
    }

    /// Take timeout, TTL and record names from `config`.
    /// Nameservers are not used here; they configure the resolver.
    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.timeout = config.timeout();
        self.ttl = config.ttl();
        self.records = config.records;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_records(mut self, records: RecordNames) -> Self {
        self.records = records;
        self
    }

    /// Rejects a zero timeout or TTL and empty record names. Sub-millisecond
    /// durations are kept as given.
    pub fn build(self) -> Result<Registry, ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "registry timeout must be greater than zero".to_string(),
            ));
        }

        if self.ttl.is_zero() {
            return Err(ConfigError::InvalidValue(
                "registry TTL must be greater than zero".to_string(),
            ));
        }

        for key in MetadataKey::ALL {
            if self.records.get(key).trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "record name for {} cannot be empty",
                    key
                )));
            }
        }

        Ok(self.build_unchecked())
    }

    pub(crate) fn build_unchecked(self) -> Registry {
        info!(
            timeout_us = self.timeout.as_micros() as u64,
            ttl_us = self.ttl.as_micros() as u64,
            "Building metadata registry"
        );

        let entries = MetadataKey::ALL.map(|key| {
            CoalescingEntry::new(
                self.records.get(key),
                Arc::clone(&self.resolver),
                self.timeout,
                self.ttl,
            )
        });

        Registry::from_entries(entries, self.timeout, self.ttl)
    }
}
