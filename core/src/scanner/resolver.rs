use std::{
    collections::HashMap,
    fs,
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};

use hostcheck_common::config::Config;
use hostcheck_protocols::dns;
use tokio::{net::UdpSocket, time::timeout};
use tracing::debug;

const RESOLV_CONF: &str = "/etc/resolv.conf";
const HOSTS_FILE: &str = "/etc/hosts";
const FALLBACK_NAMESERVER: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)), dns::DNS_PORT);
const MAX_UDP_PAYLOAD: usize = 1_500;

/// Reverse lookups: static host table first, then a PTR query.
///
/// A lookup never fails. Whatever goes wrong, the caller gets the address
/// text back as the name.
pub struct ReverseResolver {
    nameserver: SocketAddr,
    timeout: Duration,
    static_names: HashMap<IpAddr, String>,
}

impl ReverseResolver {
    pub fn new(
        nameserver: SocketAddr,
        timeout: Duration,
        static_names: HashMap<IpAddr, String>,
    ) -> Self {
        Self {
            nameserver,
            timeout,
            static_names,
        }
    }

    /// Uses the configured nameserver, or the system one, plus `/etc/hosts`.
    pub fn from_config(cfg: &Config) -> Self {
        let nameserver: SocketAddr = cfg.nameserver.unwrap_or_else(system_nameserver);
        let static_names = fs::read_to_string(HOSTS_FILE)
            .map(|text| parse_hosts_file(&text))
            .unwrap_or_default();
        Self::new(nameserver, cfg.resolve_timeout, static_names)
    }

    pub async fn resolve(&self, addr: IpAddr) -> String {
        if let Some(name) = self.static_names.get(&addr) {
            return name.clone();
        }

        match timeout(self.timeout, self.query_ptr(addr)).await {
            Ok(Ok(name)) => name,
            Ok(Err(e)) => {
                debug!("ip2dns {addr}: {e}");
                addr.to_string()
            }
            Err(_elapsed) => {
                debug!("ip2dns {addr}: no answer from {} within {:?}", self.nameserver, self.timeout);
                addr.to_string()
            }
        }
    }

    async fn query_ptr(&self, addr: IpAddr) -> anyhow::Result<String> {
        let local: SocketAddr = match self.nameserver {
            SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(self.nameserver).await?;

        let (id, query) = dns::create_ptr_packet(&addr)?;
        socket.send(&query).await?;

        let mut buffer = vec![0u8; MAX_UDP_PAYLOAD];
        loop {
            let len: usize = socket.recv(&mut buffer).await?;
            if let Some(name) = dns::get_hostname(&buffer[..len], id)? {
                return Ok(name);
            }
        }
    }
}

fn system_nameserver() -> SocketAddr {
    fs::read_to_string(RESOLV_CONF)
        .ok()
        .and_then(|text| parse_resolv_conf(&text))
        .unwrap_or(FALLBACK_NAMESERVER)
}

/// First usable `nameserver` entry of a resolv.conf.
pub fn parse_resolv_conf(text: &str) -> Option<SocketAddr> {
    text.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        if fields.next()? != "nameserver" {
            return None;
        }
        let ip: IpAddr = fields.next()?.parse().ok()?;
        Some(SocketAddr::new(ip, dns::DNS_PORT))
    })
}

/// Address to canonical name from an `/etc/hosts` style table. The first
/// line naming an address wins.
pub fn parse_hosts_file(text: &str) -> HashMap<IpAddr, String> {
    let mut names: HashMap<IpAddr, String> = HashMap::new();
    for line in text.lines() {
        let line: &str = line.split('#').next().unwrap_or_default();
        let mut fields = line.split_whitespace();
        let (Some(addr), Some(name)) = (fields.next(), fields.next()) else {
            continue;
        };
        if let Ok(addr) = addr.parse::<IpAddr>() {
            names.entry(addr).or_insert_with(|| name.to_string());
        }
    }
    names
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
