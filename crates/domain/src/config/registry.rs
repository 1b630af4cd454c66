use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use super::errors::ConfigError;
use crate::MetadataKey;

/// DNS record names queried for each metadata key
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecordNames {
    #[serde(default = "default_ipv4_record")]
    pub ipv4: String,

    #[serde(default = "default_ipv6_record")]
    pub ipv6: String,

    #[serde(default = "default_zone_record")]
    pub zone: String,

    #[serde(default = "default_platform_record")]
    pub platform: String,
}

impl RecordNames {
    pub fn get(&self, key: MetadataKey) -> &str {
        match key {
            MetadataKey::Ipv4Subnets => &self.ipv4,
            MetadataKey::Ipv6Subnets => &self.ipv6,
            MetadataKey::Zone => &self.zone,
            MetadataKey::Platform => &self.platform,
        }
    }
}

impl Default for RecordNames {
    fn default() -> Self {
        Self {
            ipv4: default_ipv4_record(),
            ipv6: default_ipv6_record(),
            zone: default_zone_record(),
            platform: default_platform_record(),
        }
    }
}

/// Lookup registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// Upper bound for one underlying TXT resolution, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// How long a resolved value stays fresh, in milliseconds.
    /// Zero is rejected: there is no "cache forever" or "never cache" mode.
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,

    #[serde(default)]
    pub records: RecordNames,

    /// Nameservers ("10.0.0.2" or "10.0.0.2:53").
    /// Empty means the system configuration (/etc/resolv.conf).
    #[serde(default)]
    pub nameservers: Vec<String>,
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Configured nameservers as socket addresses, port 53 when omitted.
    pub fn nameserver_addrs(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        self.nameservers
            .iter()
            .map(|ns| parse_nameserver(ns))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "registry.timeout_ms must be greater than zero".to_string(),
            ));
        }

        if self.ttl_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "registry.ttl_ms must be greater than zero".to_string(),
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

        self.nameserver_addrs()?;

        Ok(())
    }
}

fn parse_nameserver(value: &str) -> Result<SocketAddr, ConfigError> {
    let value = value.trim();
    if let Ok(addr) = value.parse::<SocketAddr>() {
        return Ok(addr);
    }
    value
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, 53))
        .map_err(|_| ConfigError::InvalidValue(format!("invalid nameserver address: {}", value)))
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            ttl_ms: default_ttl_ms(),
            records: RecordNames::default(),
            nameservers: vec![],
        }
    }
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_ttl_ms() -> u64 {
    60_000
}

fn default_ipv4_record() -> String {
    "ipv4.vpcinfo".to_string()
}

fn default_ipv6_record() -> String {
    "ipv6.vpcinfo".to_string()
}

fn default_zone_record() -> String {
    "zone.vpcinfo".to_string()
}

fn default_platform_record() -> String {
    "platform.vpcinfo".to_string()
}
