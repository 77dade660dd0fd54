use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::net::IpAddr;

/// Outcome of an ICMP echo check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ping {
    /// No round-trip time could be read before the probe finished.
    Timeout,
    /// Round-trip time in milliseconds.
    Reply(f64),
}

impl fmt::Display for Ping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ping::Timeout => f.write_str("timeout"),
            Ping::Reply(ms) => write!(f, "{ms:.3}"),
        }
    }
}

/// Everything learned about one address during a run.
///
/// `ping` is `None` until a ping check ran, `hostname` is `None` until a
/// reverse lookup was attempted.
#[derive(Debug, Clone, PartialEq)]
pub struct HostRecord {
    pub addr: IpAddr,
    pub ping: Option<Ping>,
    pub open_ports: BTreeSet<u16>,
    pub hostname: Option<String>,
}

impl HostRecord {
    pub fn new(addr: IpAddr) -> Self {
        Self {
            addr,
            ping: None,
            open_ports: BTreeSet::new(),
            hostname: None,
        }
    }

    pub fn add_open_port(&mut self, port: u16) {
        self.open_ports.insert(port);
    }

    pub fn set_ping(&mut self, ping: Ping) {
        self.ping = Some(ping);
    }

    pub fn set_hostname(&mut self, name: String) {
        self.hostname = Some(name);
    }
}

/// Deduplicated hosts, iterated in address order (all IPv4 before IPv6).
#[derive(Debug, Default, Clone)]
pub struct HostSet {
    hosts: BTreeMap<IpAddr, HostRecord>,
}

impl HostSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fresh record for `addr`. Returns `false` if it was already present.
    pub fn insert(&mut self, addr: IpAddr) -> bool {
        if self.hosts.contains_key(&addr) {
            return false;
        }
        self.hosts.insert(addr, HostRecord::new(addr));
        true
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn contains(&self, addr: &IpAddr) -> bool {
        self.hosts.contains_key(addr)
    }

    pub fn get(&self, addr: &IpAddr) -> Option<&HostRecord> {
        self.hosts.get(addr)
    }

    pub fn get_mut(&mut self, addr: &IpAddr) -> Option<&mut HostRecord> {
        self.hosts.get_mut(addr)
    }

    pub fn addrs(&self) -> impl Iterator<Item = IpAddr> + '_ {
        self.hosts.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostRecord> {
        self.hosts.values()
    }
}

impl<'a> IntoIterator for &'a HostSet {
    type Item = &'a HostRecord;
    type IntoIter = std::collections::btree_map::Values<'a, IpAddr, HostRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.values()
    }
}

impl FromIterator<IpAddr> for HostSet {
    fn from_iter<T: IntoIterator<Item = IpAddr>>(iter: T) -> Self {
        let mut set = HostSet::new();
        for addr in iter {
            set.insert(addr);
        }
        set
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
