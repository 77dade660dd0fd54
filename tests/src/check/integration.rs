use std::net::{IpAddr, Ipv4Addr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use hostcheck_common::config::Config;
use hostcheck_common::network::host::{HostSet, Ping};
use hostcheck_common::network::target::TargetExpander;
use hostcheck_common::observer::{Notice, RecordingObserver};
use hostcheck_core::discovery::{CheckService, TargetSource};
use hostcheck_core::report;
use hostcheck_core::scanner::{ProbeRun, ProbeScheduler};

const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Grabs a port that nobody listens on anymore.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn service(cfg: Config, observer: Arc<RecordingObserver>) -> CheckService {
    let expander = TargetExpander::new(cfg.subnet_max, observer.clone());
    let scheduler = ProbeScheduler::new(cfg, observer).unwrap();
    CheckService::new(expander, scheduler)
}

#[tokio::test]
async fn listing_a_small_subnet() {
    let observer = Arc::new(RecordingObserver::new());
    let svc = service(Config::default(), observer.clone());

    let (hosts, run) = svc
        .perform_check(&TargetSource {
            inline: "10.0.0.0/30",
            file: None,
        })
        .await
        .unwrap();

    assert_eq!(run, ProbeRun::Completed { probes: 0 });
    assert_eq!(report::render(&hosts), "10.0.0.1\n10.0.0.2");
    assert!(observer.warnings().is_empty());
}

#[tokio::test]
async fn oversized_subnet_leaves_only_single_hosts() {
    let observer = Arc::new(RecordingObserver::new());
    let svc = service(Config::default(), observer.clone());

    let (hosts, _) = svc
        .perform_check(&TargetSource {
            inline: "10.0.0.0/8 192.168.1.5",
            file: None,
        })
        .await
        .unwrap();

    assert_eq!(report::render(&hosts), "192.168.1.5");
    assert_eq!(
        observer.warnings(),
        vec![Notice::OversizedSubnet {
            network: "10.0.0.0/8".to_string(),
            addresses: 1 << 24,
            limit: 260,
        }]
    );
}

#[tokio::test]
async fn open_and_closed_loopback_ports() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let open: u16 = listener.local_addr().unwrap().port();
    let closed: u16 = closed_port();

    let cfg = Config {
        scan: true,
        ports: vec![open, closed],
        connect_timeout: Duration::from_millis(500),
        ..Config::default()
    };
    let svc = service(cfg, Arc::new(RecordingObserver::new()));

    let (hosts, run) = svc
        .perform_check(&TargetSource {
            inline: "127.0.0.1",
            file: None,
        })
        .await
        .unwrap();

    assert_eq!(run, ProbeRun::Completed { probes: 2 });
    let record = hosts.get(&LOCALHOST).unwrap();
    assert_eq!(record.open_ports.iter().copied().collect::<Vec<_>>(), vec![open]);
    assert!(record.ping.is_none());
    assert!(record.hostname.is_none());
}

#[tokio::test]
async fn ping_without_reply_is_a_timeout() {
    let cfg = Config {
        ping: true,
        ping_program: "hostcheck-no-such-ping".to_string(),
        ..Config::default()
    };
    let svc = service(cfg, Arc::new(RecordingObserver::new()));

    let (hosts, _) = svc
        .perform_check(&TargetSource {
            inline: "127.0.0.1",
            file: None,
        })
        .await
        .unwrap();

    assert_eq!(hosts.get(&LOCALHOST).unwrap().ping, Some(Ping::Timeout));
    let fields: Vec<String> = report::render(&hosts)
        .split_whitespace()
        .map(str::to_string)
        .collect();
    assert_eq!(fields, vec!["127.0.0.1", "timeout"]);
}

#[tokio::test]
async fn too_many_hosts_are_listed_unprobed() {
    let observer = Arc::new(RecordingObserver::new());
    let cfg = Config {
        scan: true,
        scan_max: 2,
        ..Config::default()
    };
    let svc = service(cfg, observer.clone());

    let (hosts, run): (HostSet, ProbeRun) = svc
        .perform_check(&TargetSource {
            inline: "127.0.0.1 127.0.0.2 127.0.0.3",
            file: None,
        })
        .await
        .unwrap();

    assert_eq!(run, ProbeRun::Refused { hosts: 3 });
    assert!(hosts.iter().all(|h| h.open_ports.is_empty()));
    assert_eq!(
        observer.warnings(),
        vec![Notice::TooManyHosts { hosts: 3, limit: 2 }]
    );
}
