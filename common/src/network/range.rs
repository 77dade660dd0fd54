//! Host enumeration for CIDR networks.
//!
//! Networks are taken as given, host bits and all; every function here masks
//! the address with the prefix first, so `192.168.1.77/30` behaves exactly
//! like `192.168.1.76/30`.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::ops::RangeInclusive;

use pnet::ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network, NetworkSize};

/// The usable host addresses of one network, in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRange {
    V4(RangeInclusive<u32>),
    V6(RangeInclusive<u128>),
}

impl Iterator for HostRange {
    type Item = IpAddr;

    fn next(&mut self) -> Option<IpAddr> {
        match self {
            HostRange::V4(range) => range.next().map(|n| IpAddr::V4(Ipv4Addr::from(n))),
            HostRange::V6(range) => range.next().map(|n| IpAddr::V6(Ipv6Addr::from(n))),
        }
    }
}

/// Total number of addresses covered by `net`, network and broadcast included.
///
/// `::/0` has one address more than a `u128` holds and is capped at
/// `u128::MAX`.
pub fn address_count(net: &IpNetwork) -> u128 {
    // `size()` overflows for a zero prefix.
    match net {
        IpNetwork::V4(v4) if v4.prefix() == 0 => 1 << 32,
        IpNetwork::V6(v6) if v6.prefix() == 0 => u128::MAX,
        _ => match net.size() {
            NetworkSize::V4(size) => u128::from(size),
            NetworkSize::V6(size) => size,
        },
    }
}

/// Host addresses of `net`.
///
/// IPv4 leaves out the network and broadcast address, except for /31 (both
/// addresses) and /32 (the single address). IPv6 leaves out only the
/// subnet-router anycast address, except for /127 and /128.
pub fn hosts(net: &IpNetwork) -> HostRange {
    match net {
        IpNetwork::V4(v4) => HostRange::V4(v4_hosts(v4)),
        IpNetwork::V6(v6) => HostRange::V6(v6_hosts(v6)),
    }
}

/// The masked network address.
pub fn network_addr(net: &IpNetwork) -> IpAddr {
    match net {
        IpNetwork::V4(v4) => IpAddr::V4(v4.network()),
        IpNetwork::V6(v6) => IpAddr::V6(v6.network()),
    }
}

/// Masked CIDR text, e.g. `10.0.0.0/8` for `10.1.2.3/8`.
pub fn network_label(net: &IpNetwork) -> String {
    format!("{}/{}", network_addr(net), net.prefix())
}

fn v4_hosts(net: &Ipv4Network) -> RangeInclusive<u32> {
    let (start, end) = v4_bounds(net);
    match net.prefix() {
        32 | 31 => start..=end,
        _ => (start + 1)..=(end - 1),
    }
}

fn v6_hosts(net: &Ipv6Network) -> RangeInclusive<u128> {
    let (start, end) = v6_bounds(net);
    match net.prefix() {
        128 | 127 => start..=end,
        _ => (start + 1)..=end,
    }
}

fn v4_bounds(net: &Ipv4Network) -> (u32, u32) {
    (u32::from(net.network()), u32::from(net.broadcast()))
}

fn v6_bounds(net: &Ipv6Network) -> (u128, u128) {
    (u128::from(net.network()), u128::from(net.broadcast()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
