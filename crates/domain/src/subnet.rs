use crate::{DomainError, MetadataKey};
use ipnetwork::IpNetwork;
use std::fmt;
use std::net::IpAddr;

/// Ordered list of VPC subnets.
///
/// Built from the IPv4 and IPv6 subnet records; IPv4 networks always come
/// first, each family in record order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetList {
    networks: Vec<IpNetwork>,
}

impl SubnetList {
    pub fn new(networks: Vec<IpNetwork>) -> Self {
        Self { networks }
    }

    /// Parses one subnet record. Every value must be a CIDR of the family the
    /// key names; an empty payload is an empty list.
    pub fn classify<S: AsRef<str>>(
        key: MetadataKey,
        values: &[S],
    ) -> Result<SubnetList, DomainError> {
        let want_v4 = match key {
            MetadataKey::Ipv4Subnets => true,
            MetadataKey::Ipv6Subnets => false,
            other => {
                return Err(DomainError::classification(
                    other.as_str(),
                    "not a subnet record",
                ))
            }
        };

        let mut networks = Vec::with_capacity(values.len());
        for value in values {
            let network = Self::parse_cidr(key, value.as_ref().trim())?;
            if network.is_ipv4() != want_v4 {
                return Err(DomainError::classification(
                    key.as_str(),
                    format!("{} is not an {} network", network, family(want_v4)),
                ));
            }
            networks.push(network);
        }

        Ok(Self { networks })
    }

    fn parse_cidr(key: MetadataKey, cidr: &str) -> Result<IpNetwork, DomainError> {
        if cidr.is_empty() {
            return Err(DomainError::classification(
                key.as_str(),
                "CIDR cannot be empty",
            ));
        }

        if !cidr.contains('/') {
            return Err(DomainError::classification(
                key.as_str(),
                format!("CIDR must include prefix (e.g., 10.0.0.0/16): '{}'", cidr),
            ));
        }

        cidr.parse().map_err(|e| {
            DomainError::classification(key.as_str(), format!("Invalid CIDR {}: {}", cidr, e))
        })
    }

    /// Concatenates `self` followed by `other`.
    pub fn merge(mut self, other: SubnetList) -> SubnetList {
        self.networks.extend(other.networks);
        self
    }

    pub fn contains(&self, ip: IpAddr) -> bool {
        self.networks.iter().any(|network| network.contains(ip))
    }

    /// Most specific subnet containing `ip`.
    pub fn find(&self, ip: IpAddr) -> Option<&IpNetwork> {
        self.networks
            .iter()
            .filter(|network| network.contains(ip))
            .max_by_key(|network| network.prefix())
    }

    pub fn ipv4(&self) -> impl Iterator<Item = &IpNetwork> {
        self.networks.iter().filter(|n| n.is_ipv4())
    }

    pub fn ipv6(&self) -> impl Iterator<Item = &IpNetwork> {
        self.networks.iter().filter(|n| n.is_ipv6())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IpNetwork> {
        self.networks.iter()
    }

    pub fn as_slice(&self) -> &[IpNetwork] {
        &self.networks
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

fn family(v4: bool) -> &'static str {
    if v4 {
        "IPv4"
    } else {
        "IPv6"
    }
}

impl fmt::Display for SubnetList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, network) in self.networks.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", network)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SubnetList {
    type Item = &'a IpNetwork;
    type IntoIter = std::slice::Iter<'a, IpNetwork>;

    fn into_iter(self) -> Self::IntoIter {
        self.networks.iter()
    }
}

impl IntoIterator for SubnetList {
    type Item = IpNetwork;
    type IntoIter = std::vec::IntoIter<IpNetwork>;

    fn into_iter(self) -> Self::IntoIter {
        self.networks.into_iter()
    }
}
