use std::fmt;

/// One kind of VPC metadata, backed by one DNS TXT record and one cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKey {
    Ipv4Subnets,
    Ipv6Subnets,
    Zone,
    Platform,
}

impl MetadataKey {
    pub const ALL: [MetadataKey; 4] = [
        MetadataKey::Ipv4Subnets,
        MetadataKey::Ipv6Subnets,
        MetadataKey::Zone,
        MetadataKey::Platform,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataKey::Ipv4Subnets => "ipv4-subnets",
            MetadataKey::Ipv6Subnets => "ipv6-subnets",
            MetadataKey::Zone => "zone",
            MetadataKey::Platform => "platform",
        }
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
