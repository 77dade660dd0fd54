//! ICMP echo through the platform `ping` program.
//!
//! Raw ICMP sockets need elevated privileges, the `ping` binary does not.
//! The price is scraping its text output, which changes with platform and
//! locale; the pattern used for that is configurable.

use std::net::IpAddr;
use std::process::Stdio;
use std::time::Duration;

use hostcheck_common::config::Config;
use hostcheck_common::error::ConfigError;
use hostcheck_common::network::host::Ping;
use regex::Regex;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

#[cfg(windows)]
const COUNT_FLAG: &str = "-n";
#[cfg(not(windows))]
const COUNT_FLAG: &str = "-c";

pub struct Pinger {
    program: String,
    pattern: Regex,
    timeout: Duration,
}

impl Pinger {
    pub fn new(cfg: &Config) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidPingPattern {
            pattern: cfg.ping_pattern.clone(),
            reason,
        };

        let pattern: Regex = Regex::new(&cfg.ping_pattern).map_err(|e| invalid(e.to_string()))?;
        if pattern.captures_len() < 2 {
            return Err(invalid("a capture group for the round-trip time is required".into()));
        }

        Ok(Self {
            program: cfg.ping_program.clone(),
            pattern,
            timeout: cfg.ping_timeout,
        })
    }

    /// Sends a single echo request. Anything short of a parsable reply
    /// within the timeout is [`Ping::Timeout`].
    pub async fn ping(&self, addr: IpAddr) -> Ping {
        let mut command = Command::new(&self.program);
        command
            .args([COUNT_FLAG, "1"])
            .arg(addr.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                debug!("check_ping {addr}: cannot run {}: {e}", self.program);
                return Ping::Timeout;
            }
            Err(_elapsed) => {
                debug!("check_ping {addr}: no answer within {:?}", self.timeout);
                return Ping::Timeout;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        self.parse_reply(&stdout).map_or(Ping::Timeout, Ping::Reply)
    }

    /// First round-trip time in `output`, in milliseconds.
    pub fn parse_reply(&self, output: &str) -> Option<f64> {
        output.lines().find_map(|line| {
            debug!("check_ping {line}");
            let captures = self.pattern.captures(line)?;
            captures.get(1)?.as_str().trim().parse::<f64>().ok()
        })
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
