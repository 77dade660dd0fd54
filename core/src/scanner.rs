//! Concurrent host checks.
//!
//! [`ProbeScheduler`] launches one task per host and check (one per port for
//! the port check) in a single burst, waits for all of them, and folds the
//! results into the [`HostSet`] as they come in. The tasks never touch the
//! records themselves, so there is exactly one writer.
//!
//! The individual probes sit behind the [`Prober`] trait; [`NetworkProber`]
//! is the real implementation.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hostcheck_common::{
    config::Config,
    error::ConfigError,
    network::host::{HostRecord, HostSet, Ping},
    observer::{Notice, Observer},
};
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::network::{icmp::Pinger, tcp};

pub mod resolver;

use resolver::ReverseResolver;

/// Defines how a single check is carried out against one address.
#[async_trait]
pub trait Prober: Send + Sync {
    /// `true` when a TCP connection to `addr:port` could be established.
    async fn port_open(&self, addr: Ipv4Addr, port: u16) -> bool;

    async fn ping(&self, addr: Ipv4Addr) -> Ping;

    /// Name for `addr`, or the address text when there is none.
    async fn resolve(&self, addr: IpAddr) -> String;
}

pub struct NetworkProber {
    connect_timeout: Duration,
    pinger: Pinger,
    resolver: ReverseResolver,
}

impl NetworkProber {
    pub fn new(cfg: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            connect_timeout: cfg.connect_timeout,
            pinger: Pinger::new(cfg)?,
            resolver: ReverseResolver::from_config(cfg),
        })
    }
}

#[async_trait]
impl Prober for NetworkProber {
    async fn port_open(&self, addr: Ipv4Addr, port: u16) -> bool {
        let socket_addr = SocketAddr::new(IpAddr::V4(addr), port);
        tcp::handshake_probe(socket_addr, self.connect_timeout).await
    }

    async fn ping(&self, addr: Ipv4Addr) -> Ping {
        self.pinger.ping(IpAddr::V4(addr)).await
    }

    async fn resolve(&self, addr: IpAddr) -> String {
        self.resolver.resolve(addr).await
    }
}

/// What a finished task learned. Closed ports produce nothing.
#[derive(Debug)]
enum Finding {
    OpenPort(u16),
    Ping(Ping),
    Hostname(String),
}

impl Finding {
    fn apply(self, host: &mut HostRecord) {
        match self {
            Finding::OpenPort(port) => host.add_open_port(port),
            Finding::Ping(ping) => host.set_ping(ping),
            Finding::Hostname(name) => host.set_hostname(name),
        }
    }
}

type ProbeTasks = JoinSet<(IpAddr, Option<Finding>)>;

/// Called after every finished probe with `(finished, total)`.
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeRun {
    /// The host count exceeded `scan_max`; nothing was probed.
    Refused { hosts: usize },
    /// All probes ran to completion.
    Completed { probes: usize },
}

pub struct ProbeScheduler {
    cfg: Config,
    prober: Arc<dyn Prober>,
    observer: Arc<dyn Observer>,
    on_progress: Option<ProgressCallback>,
}

impl ProbeScheduler {
    pub fn new(cfg: Config, observer: Arc<dyn Observer>) -> Result<Self, ConfigError> {
        let prober = NetworkProber::new(&cfg)?;
        Ok(Self::with_prober(cfg, Arc::new(prober), observer))
    }

    pub fn with_prober(cfg: Config, prober: Arc<dyn Prober>, observer: Arc<dyn Observer>) -> Self {
        Self {
            cfg,
            prober,
            observer,
            on_progress: None,
        }
    }

    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    /// Number of probes a run over `hosts` launches.
    pub fn planned_probes(&self, hosts: &HostSet) -> usize {
        let per_ipv4: usize = self.port_checks().len() + usize::from(self.cfg.ping);
        let ipv4_hosts: usize = hosts.addrs().filter(IpAddr::is_ipv4).count();
        ipv4_hosts * per_ipv4 + hosts.len() * usize::from(self.cfg.resolve)
    }

    /// Runs every enabled check against every host and records the results.
    pub async fn perform_checks(&self, hosts: &mut HostSet) -> ProbeRun {
        if hosts.len() > self.cfg.scan_max {
            self.observer.notify(Notice::TooManyHosts {
                hosts: hosts.len(),
                limit: self.cfg.scan_max,
            });
            return ProbeRun::Refused { hosts: hosts.len() };
        }

        let mut tasks: ProbeTasks = JoinSet::new();
        let mut skipped_ipv6: usize = 0;

        for addr in hosts.addrs() {
            match addr {
                IpAddr::V4(v4) => self.spawn_ipv4_checks(&mut tasks, v4),
                IpAddr::V6(_) if self.cfg.scan || self.cfg.ping => skipped_ipv6 += 1,
                IpAddr::V6(_) => {}
            }
            if self.cfg.resolve {
                self.spawn_resolve(&mut tasks, addr);
            }
        }

        if skipped_ipv6 > 0 {
            self.observer.notify(Notice::Ipv6Unsupported {
                hosts: skipped_ipv6,
            });
        }

        let total: usize = tasks.len();
        debug!("launched {total} probes");
        self.collect(tasks, hosts, total).await;

        ProbeRun::Completed { probes: total }
    }

    fn port_checks(&self) -> &[u16] {
        if self.cfg.scan { &self.cfg.ports } else { &[] }
    }

    fn spawn_ipv4_checks(&self, tasks: &mut ProbeTasks, addr: Ipv4Addr) {
        for &port in self.port_checks() {
            let prober = Arc::clone(&self.prober);
            tasks.spawn(async move {
                let open: bool = prober.port_open(addr, port).await;
                (IpAddr::V4(addr), open.then_some(Finding::OpenPort(port)))
            });
        }

        if self.cfg.ping {
            let prober = Arc::clone(&self.prober);
            tasks.spawn(async move {
                let ping: Ping = prober.ping(addr).await;
                (IpAddr::V4(addr), Some(Finding::Ping(ping)))
            });
        }
    }

    fn spawn_resolve(&self, tasks: &mut ProbeTasks, addr: IpAddr) {
        let prober = Arc::clone(&self.prober);
        tasks.spawn(async move {
            let name: String = prober.resolve(addr).await;
            (addr, Some(Finding::Hostname(name)))
        });
    }

    async fn collect(&self, mut tasks: ProbeTasks, hosts: &mut HostSet, total: usize) {
        let mut finished: usize = 0;

        while let Some(joined) = tasks.join_next().await {
            finished += 1;
            match joined {
                Ok((addr, Some(finding))) => {
                    if let Some(host) = hosts.get_mut(&addr) {
                        finding.apply(host);
                    }
                }
                Ok((_, None)) => {}
                Err(e) => error!("Probe task failed: {e}"),
            }

            if let Some(callback) = &self.on_progress {
                callback(finished, total);
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
