pub mod check;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use hostcheck_common::config::{self, Config, DEFAULT_PORTS, DEFAULT_SCAN_MAX};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "hostcheck", version)]
#[command(about = "Ping and/or port scan host addresses or whole subnets.")]
pub struct CommandLine {
    /// Addresses or subnets, separated by spaces
    #[arg(short, long, default_value = "")]
    pub ip: String,

    /// Read addresses or subnets from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Ports to try when scanning
    #[arg(long, default_value = DEFAULT_PORTS)]
    pub port: String,

    /// Scan the ports of every address
    #[arg(long)]
    pub scan: bool,

    /// Ping every address
    #[arg(long)]
    pub ping: bool,

    /// Resolve every address to a host name
    #[arg(short, long)]
    pub resolve: bool,

    /// Refuse to examine more hosts than this
    #[arg(long = "scanmax", default_value_t = DEFAULT_SCAN_MAX)]
    pub scan_max: usize,

    /// Skip subnets with at least this many addresses [default: --scanmax]
    #[arg(long = "subnetmax")]
    pub subnet_max: Option<usize>,

    /// TCP connect timeout in seconds
    #[arg(long, default_value_t = 2.0)]
    pub timeout: f64,

    /// Set log level to debug
    #[arg(short, long)]
    pub debug: bool,

    /// Addresses or subnets, used when --ip is not given
    pub rest: Vec<String>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The inline address string; trailing arguments stand in for `--ip`.
    pub fn targets(&self) -> String {
        if self.ip.is_empty() {
            self.rest.join(" ")
        } else {
            self.ip.clone()
        }
    }

    pub fn log_level(&self) -> Level {
        if self.debug { Level::DEBUG } else { Level::INFO }
    }

    pub fn to_config(&self) -> anyhow::Result<Config> {
        let connect_timeout = Duration::try_from_secs_f64(self.timeout)
            .with_context(|| format!("invalid timeout: {}", self.timeout))?;

        let cfg = Config {
            ports: config::parse_ports(&self.port)?,
            scan: self.scan,
            ping: self.ping,
            resolve: self.resolve,
            scan_max: self.scan_max,
            subnet_max: self.subnet_max.unwrap_or(self.scan_max),
            connect_timeout,
            ..Config::default()
        };
        cfg.validate()?;

        Ok(cfg)
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
