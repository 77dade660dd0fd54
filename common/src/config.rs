use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_PORTS: &str = "22,139,445,80,443";
pub const DEFAULT_SCAN_MAX: usize = 260;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_PING_PROGRAM: &str = "ping";

/// Picks the round-trip time out of a `ping` reply line, e.g. `time=0.041 ms`.
///
/// The output of `ping` differs per platform and locale, so this is only a
/// default. Override it through [`Config::ping_pattern`] when replies show up
/// as timeouts.
pub const DEFAULT_PING_PATTERN: &str = r"=([ 0-9.]+)ms";

#[derive(Debug, Clone)]
pub struct Config {
    /// Ports tried by the port check, in the order given.
    pub ports: Vec<u16>,
    pub scan: bool,
    pub ping: bool,
    pub resolve: bool,
    /// Probing is refused when more hosts than this were expanded.
    pub scan_max: usize,
    /// A subnet with this many addresses or more is not expanded at all.
    pub subnet_max: usize,
    pub connect_timeout: Duration,
    pub ping_timeout: Duration,
    pub resolve_timeout: Duration,
    pub ping_program: String,
    pub ping_pattern: String,
    /// Resolver used for PTR lookups. `None` reads the system configuration.
    pub nameserver: Option<SocketAddr>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ports: vec![22, 139, 445, 80, 443],
            scan: false,
            ping: false,
            resolve: false,
            scan_max: DEFAULT_SCAN_MAX,
            subnet_max: DEFAULT_SCAN_MAX,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            ping_timeout: DEFAULT_PING_TIMEOUT,
            resolve_timeout: DEFAULT_RESOLVE_TIMEOUT,
            ping_program: DEFAULT_PING_PROGRAM.to_string(),
            ping_pattern: DEFAULT_PING_PATTERN.to_string(),
            nameserver: None,
        }
    }
}

impl Config {
    pub fn any_check_enabled(&self) -> bool {
        self.scan || self.ping || self.resolve
    }

    /// Fails when a port scan is requested without anything to scan.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan && self.ports.is_empty() {
            return Err(ConfigError::NoPorts);
        }
        Ok(())
    }
}

/// Parses a port list such as `22,80,443`.
///
/// Every run of digits is one port and anything else separates them, so
/// `"22 80;443"` works too. Duplicates are dropped, first occurrence wins.
pub fn parse_ports(s: &str) -> Result<Vec<u16>, ConfigError> {
    let mut ports: Vec<u16> = Vec::new();

    for digits in s.split(|c: char| !c.is_ascii_digit()).filter(|d| !d.is_empty()) {
        let port: u16 = digits.parse().map_err(|_| ConfigError::InvalidPort {
            value: digits.to_string(),
        })?;
        if !ports.contains(&port) {
            ports.push(port);
        }
    }

    Ok(ports)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
