//! # Check Targets
//!
//! Turns the address tokens given on the command line or in an input file
//! into a [`HostSet`].
//!
//! A token is one of:
//! * A single IPv4 or IPv6 address (e.g. `192.168.1.5`, `fe80::1`).
//! * A CIDR network (e.g. `192.168.1.0/24`). Host bits are allowed and
//!   masked off.
//!
//! Anything else is reported to the observer and ignored.

use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

use pnet::ipnetwork::IpNetwork;

use crate::network::host::HostSet;
use crate::network::range;
use crate::observer::{Notice, Observer};

/// One parsed input token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// A single host address.
    Host { addr: IpAddr },
    /// A network to be expanded into its host addresses.
    Network { network: IpNetwork },
}

impl FromStr for Target {
    type Err = String;

    /// Tries a plain address first, then a CIDR network.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(target) = parse_host(s) {
            return Ok(target);
        }

        if let Some(target) = parse_network(s)? {
            return Ok(target);
        }

        Err(format!("not an IP address or network: {s}"))
    }
}

fn parse_host(s: &str) -> Option<Target> {
    s.parse::<IpAddr>().ok().map(|addr| Target::Host { addr })
}

fn parse_network(s: &str) -> Result<Option<Target>, String> {
    if !s.contains('/') {
        return Ok(None);
    }

    let network = s
        .parse::<IpNetwork>()
        .map_err(|e| format!("invalid network '{s}': {e}"))?;

    Ok(Some(Target::Network { network }))
}

/// Expands address tokens into host records.
///
/// Networks with `subnet_max` addresses or more are skipped as a whole and
/// reported as [`Notice::OversizedSubnet`].
pub struct TargetExpander {
    subnet_max: usize,
    observer: Arc<dyn Observer>,
}

impl TargetExpander {
    pub fn new(subnet_max: usize, observer: Arc<dyn Observer>) -> Self {
        Self {
            subnet_max,
            observer,
        }
    }

    /// Expands every whitespace separated token of every line into one set.
    pub fn expand<I, S>(&self, lines: I) -> HostSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hosts = HostSet::new();
        for line in lines {
            self.expand_line(line.as_ref(), &mut hosts);
        }
        hosts
    }

    /// Adds the hosts of every token in `line` to `hosts`.
    pub fn expand_line(&self, line: &str, hosts: &mut HostSet) {
        for token in line.split_whitespace() {
            match Target::from_str(token) {
                Ok(target) => self.add_target(target, hosts),
                Err(reason) => self.observer.notify(Notice::UnparsedToken {
                    token: token.to_string(),
                    reason,
                }),
            }
        }
    }

    fn add_target(&self, target: Target, hosts: &mut HostSet) {
        match target {
            Target::Host { addr } => {
                hosts.insert(addr);
            }
            Target::Network { network } => {
                let addresses: u128 = range::address_count(&network);
                if addresses >= self.subnet_max as u128 {
                    self.observer.notify(Notice::OversizedSubnet {
                        network: range::network_label(&network),
                        addresses,
                        limit: self.subnet_max,
                    });
                    return;
                }
                for addr in range::hosts(&network) {
                    hosts.insert(addr);
                }
            }
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::RecordingObserver;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn setup(subnet_max: usize) -> (TargetExpander, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::new());
        (TargetExpander::new(subnet_max, observer.clone()), observer)
    }

    #[test]
    fn test_from_str_full_parsing() {
        assert!(matches!(
            Target::from_str("1.1.1.1"),
            Ok(Target::Host { .. })
        ));
        assert!(matches!(Target::from_str("::1"), Ok(Target::Host { .. })));
        assert!(matches!(
            Target::from_str("10.0.0.0/24"),
            Ok(Target::Network { .. })
        ));
        assert!(matches!(
            Target::from_str("10.0.0.7/24"),
            Ok(Target::Network { .. })
        ));
        assert!(matches!(
            Target::from_str("fd00::/64"),
            Ok(Target::Network { .. })
        ));

        assert!(Target::from_str("not-an-ip").is_err());
        assert!(Target::from_str("10.0.0.1/33").is_err());
        assert!(Target::from_str("10.0.0.256").is_err());
        assert!(Target::from_str("10.0.0.1-50").is_err());
    }

    #[test]
    fn repeated_address_is_added_once() {
        let (expander, observer) = setup(260);
        let hosts = expander.expand(["10.0.0.1 10.0.0.1", "10.0.0.1", "10.0.0.0/30"]);

        let addrs: Vec<IpAddr> = hosts.addrs().collect();
        assert_eq!(
            addrs,
            vec![
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
            ]
        );
        assert!(observer.notices().is_empty());
    }

    #[test]
    fn small_subnet_is_expanded_without_warning() {
        let (expander, observer) = setup(260);
        let hosts = expander.expand(["192.168.1.0/30"]);

        assert_eq!(hosts.len(), 2);
        assert!(hosts.contains(&IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))));
        assert!(hosts.contains(&IpAddr::V4(Ipv4Addr::new(192, 168, 1, 2))));
        assert!(observer.warnings().is_empty());
    }

    #[test]
    fn oversized_subnet_is_skipped_entirely() {
        let (expander, observer) = setup(260);
        let hosts = expander.expand(["10.0.0.0/8"]);

        assert!(hosts.is_empty());
        let warnings = observer.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("10.0.0.0/8"));
    }

    #[test]
    fn subnet_at_limit_is_rejected() {
        // A /24 has 256 addresses: accepted below 257, rejected at 256.
        let (expander, _) = setup(257);
        assert_eq!(expander.expand(["10.1.1.0/24"]).len(), 254);

        let (expander, observer) = setup(256);
        assert!(expander.expand(["10.1.1.0/24"]).is_empty());
        assert_eq!(observer.warnings().len(), 1);
    }

    #[test]
    fn malformed_tokens_are_ignored() {
        let (expander, observer) = setup(260);
        let hosts = expander.expand(["switch01 10.0.0.5 300.1.1.1 10.0.0.0/99"]);

        assert_eq!(hosts.len(), 1);
        assert!(observer.warnings().is_empty());
        let skipped: Vec<Notice> = observer.notices();
        assert_eq!(skipped.len(), 3);
        assert!(
            skipped
                .iter()
                .all(|notice| matches!(notice, Notice::UnparsedToken { .. }))
        );
    }

    #[test]
    fn mixed_families_share_one_set() {
        let (expander, _) = setup(260);
        let hosts = expander.expand(["::1 127.0.0.1", "", "   "]);

        let addrs: Vec<IpAddr> = hosts.addrs().collect();
        assert_eq!(
            addrs,
            vec![
                IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(Ipv6Addr::LOCALHOST),
            ]
        );
    }
}
