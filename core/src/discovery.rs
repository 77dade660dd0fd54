//! # Host Check Service
//!
//! Drives one complete run: collect the targets, expand them, probe them.

use std::fs;
use std::path::Path;

use hostcheck_common::error::ConfigError;
use hostcheck_common::network::host::HostSet;
use hostcheck_common::network::target::TargetExpander;

use crate::scanner::{ProbeRun, ProbeScheduler};

/// Where the address tokens come from. Both sources end up in one host set.
#[derive(Debug, Clone, Default)]
pub struct TargetSource<'a> {
    /// Whitespace separated addresses and networks.
    pub inline: &'a str,
    /// File with one or more tokens per line.
    pub file: Option<&'a Path>,
}

/// Expands all tokens from `source` into a host set.
///
/// The input file is read before anything is expanded; if it cannot be read
/// the run is over.
pub fn collect_hosts(
    source: &TargetSource<'_>,
    expander: &TargetExpander,
) -> Result<HostSet, ConfigError> {
    let file_contents: Option<String> = source
        .file
        .map(|path| {
            fs::read_to_string(path).map_err(|source| ConfigError::MissingInput {
                path: path.to_path_buf(),
                source,
            })
        })
        .transpose()?;

    let mut hosts = HostSet::new();
    expander.expand_line(source.inline, &mut hosts);
    for line in file_contents.iter().flat_map(|contents| contents.lines()) {
        expander.expand_line(line.trim(), &mut hosts);
    }

    Ok(hosts)
}

pub struct CheckService {
    expander: TargetExpander,
    scheduler: ProbeScheduler,
}

impl CheckService {
    pub fn new(expander: TargetExpander, scheduler: ProbeScheduler) -> Self {
        Self {
            expander,
            scheduler,
        }
    }

    pub fn collect(&self, source: &TargetSource<'_>) -> Result<HostSet, ConfigError> {
        collect_hosts(source, &self.expander)
    }

    pub fn scheduler(&self) -> &ProbeScheduler {
        &self.scheduler
    }

    /// Collects the hosts and runs every enabled check against them.
    pub async fn perform_check(
        &self,
        source: &TargetSource<'_>,
    ) -> Result<(HostSet, ProbeRun), ConfigError> {
        let mut hosts: HostSet = self.collect(source)?;
        let run: ProbeRun = self.scheduler.perform_checks(&mut hosts).await;
        Ok((hosts, run))
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
    use hostcheck_common::observer::RecordingObserver;
    use std::net::IpAddr;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("hostcheck-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn inline_and_file_tokens_are_merged() {
        let path = scratch_file("merge.txt", "10.0.0.2\n\n  10.0.0.3 10.0.0.1  \n192.168.7.0/30\n");
        let expander = TargetExpander::new(260, Arc::new(RecordingObserver::new()));
        let source = TargetSource {
            inline: "10.0.0.1 10.0.0.2",
            file: Some(&path),
        };

        let hosts = collect_hosts(&source, &expander).unwrap();
        fs::remove_file(&path).unwrap();

        let addrs: Vec<String> = hosts.addrs().map(|a| a.to_string()).collect();
        assert_eq!(
            addrs,
            vec!["10.0.0.1", "10.0.0.2", "10.0.0.3", "192.168.7.1", "192.168.7.2"]
        );
    }

    #[test]
    fn missing_file_is_fatal() {
        let path = std::env::temp_dir().join("hostcheck-does-not-exist.txt");
        let expander = TargetExpander::new(260, Arc::new(RecordingObserver::new()));
        let source = TargetSource {
            inline: "10.0.0.1",
            file: Some(&path),
        };

        let err = collect_hosts(&source, &expander).unwrap_err();
        assert!(matches!(err, ConfigError::MissingInput { path: ref p, .. } if *p == path));
    }

    #[test]
    fn inline_only() {
        let expander = TargetExpander::new(260, Arc::new(RecordingObserver::new()));
        let source = TargetSource {
            inline: "::1",
            file: None,
        };

        let hosts = collect_hosts(&source, &expander).unwrap();
        assert!(hosts.contains(&"::1".parse::<IpAddr>().unwrap()));
    }
}
