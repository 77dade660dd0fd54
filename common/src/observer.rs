//! Reporting channel for expansion and scheduling anomalies.
//!
//! The expander and the scheduler are handed an [`Observer`] when they are
//! built and describe what they skipped as [`Notice`] values. The binary
//! forwards those to `tracing`; tests record them.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::{Level, debug, error, info, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A subnet had `addresses >= limit` and was skipped entirely.
    OversizedSubnet {
        network: String,
        addresses: u128,
        limit: usize,
    },
    /// A token was neither an address nor a network.
    UnparsedToken { token: String, reason: String },
    /// More hosts than allowed were expanded; nothing was probed.
    TooManyHosts { hosts: usize, limit: usize },
    /// Ping and port checks were requested for IPv6 hosts.
    Ipv6Unsupported { hosts: usize },
}

impl Notice {
    pub fn level(&self) -> Level {
        match self {
            Notice::OversizedSubnet { .. } | Notice::TooManyHosts { .. } => Level::WARN,
            Notice::UnparsedToken { .. } => Level::DEBUG,
            Notice::Ipv6Unsupported { .. } => Level::INFO,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::OversizedSubnet {
                network,
                addresses,
                limit,
            } => write!(
                f,
                "too many hosts to scan in subnet {network} ({addresses} addresses, limit {limit})"
            ),
            Notice::UnparsedToken { token, reason } => write!(f, "ignoring '{token}': {reason}"),
            Notice::TooManyHosts { hosts, limit } => {
                write!(f, "too many hosts to examine ({hosts} hosts, limit {limit})")
            }
            Notice::Ipv6Unsupported { hosts } => write!(
                f,
                "ping and port checks are not implemented for IPv6, skipped {hosts} host(s)"
            ),
        }
    }
}

pub trait Observer: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Forwards notices to `tracing`, dropping those more verbose than `verbosity`.
pub struct TracingObserver {
    verbosity: Level,
}

impl TracingObserver {
    pub fn new(verbosity: Level) -> Self {
        Self { verbosity }
    }
}

impl Observer for TracingObserver {
    fn notify(&self, notice: Notice) {
        let level: Level = notice.level();
        if level > self.verbosity {
            return;
        }

        match level {
            Level::ERROR => error!("{notice}"),
            Level::WARN => warn!("{notice}"),
            Level::INFO => info!("{notice}"),
            Level::DEBUG => debug!("{notice}"),
            Level::TRACE => trace!("{notice}"),
        }
    }
}

/// Keeps every notice in arrival order.
#[derive(Default)]
pub struct RecordingObserver {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn warnings(&self) -> Vec<Notice> {
        self.notices()
            .into_iter()
            .filter(|notice| notice.level() == Level::WARN)
            .collect()
    }
}

impl Observer for RecordingObserver {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
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
