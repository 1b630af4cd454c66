//! Nameserver discovery from resolv.conf

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

pub const RESOLV_CONF_PATH: &str = "/etc/resolv.conf";

/// Resolver every VPC exposes at the link-local address.
pub const VPC_RESOLVER: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(169, 254, 169, 253)), 53);

/// `nameserver` entries of a resolv.conf file, in file order.
///
/// Scoped IPv6 addresses (`fe80::1%eth0`) are skipped since they cannot be
/// expressed as a plain socket address.
pub fn parse(contents: &str) -> Vec<SocketAddr> {
    contents
        .lines()
        .map(|line| line.split(['#', ';']).next().unwrap_or_default().trim())
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("nameserver") => fields.next(),
                _ => None,
            }
        })
        .filter_map(|addr| addr.parse::<IpAddr>().ok())
        .map(|ip| SocketAddr::new(ip, 53))
        .collect()
}

pub fn read(path: impl AsRef<Path>) -> io::Result<Vec<SocketAddr>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse(&contents))
}
