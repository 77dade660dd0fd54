use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use dns_parser::Packet;
use hostcheck_common::config::Config;
use hostcheck_common::network::target::TargetExpander;
use hostcheck_common::observer::RecordingObserver;
use hostcheck_core::discovery::{CheckService, TargetSource};
use hostcheck_core::report;
use hostcheck_core::scanner::ProbeScheduler;
use hostcheck_core::scanner::resolver::ReverseResolver;
use tokio::net::UdpSocket;

/// Answers every PTR query with `name`, or with NXDOMAIN when `name` is empty.
async fn spawn_nameserver(name: &'static str) -> SocketAddr {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();

    tokio::spawn(async move {
        let mut buffer = [0u8; 512];
        loop {
            let Ok((len, peer)) = socket.recv_from(&mut buffer).await else {
                return;
            };
            let response = answer(&buffer[..len], name);
            let _ = socket.send_to(&response, peer).await;
        }
    });

    addr
}

fn answer(query: &[u8], name: &str) -> Vec<u8> {
    assert!(Packet::parse(query).unwrap().header.query);

    let mut bytes: Vec<u8> = query.to_vec();
    bytes[2] |= 0x80;
    if name.is_empty() {
        bytes[3] = 0x80 | 3;
        return bytes;
    }
    bytes[3] = 0x80;
    bytes[6..8].copy_from_slice(&1u16.to_be_bytes());

    let mut rdata: Vec<u8> = Vec::new();
    for label in name.split('.') {
        rdata.push(label.len() as u8);
        rdata.extend_from_slice(label.as_bytes());
    }
    rdata.push(0);

    bytes.extend_from_slice(&[0xc0, 0x0c]);
    bytes.extend_from_slice(&12u16.to_be_bytes());
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&60u32.to_be_bytes());
    bytes.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    bytes.extend_from_slice(&rdata);
    bytes
}

fn resolver(nameserver: SocketAddr) -> ReverseResolver {
    ReverseResolver::new(nameserver, Duration::from_secs(2), HashMap::new())
}

#[tokio::test]
async fn ptr_answer_becomes_hostname() {
    let nameserver = spawn_nameserver("gw.lab.example").await;
    let ip = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));

    assert_eq!(resolver(nameserver).resolve(ip).await, "gw.lab.example");
}

#[tokio::test]
async fn ipv6_addresses_resolve_too() {
    let nameserver = spawn_nameserver("v6.lab.example").await;
    let ip: IpAddr = "2001:db8::1".parse().unwrap();

    assert_eq!(resolver(nameserver).resolve(ip).await, "v6.lab.example");
}

#[tokio::test]
async fn nxdomain_falls_back_to_address() {
    let nameserver = spawn_nameserver("").await;
    let ip = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 77));

    assert_eq!(resolver(nameserver).resolve(ip).await, "192.0.2.77");
}

#[tokio::test]
async fn resolved_names_land_in_the_report() {
    let nameserver = spawn_nameserver("box.lab.example").await;
    let observer = Arc::new(RecordingObserver::new());
    let cfg = Config {
        resolve: true,
        nameserver: Some(nameserver),
        ..Config::default()
    };

    let expander = TargetExpander::new(cfg.subnet_max, observer.clone());
    let scheduler = ProbeScheduler::new(cfg, observer).unwrap();
    let svc = CheckService::new(expander, scheduler);

    let (hosts, _) = svc
        .perform_check(&TargetSource {
            inline: "198.51.100.7",
            file: None,
        })
        .await
        .unwrap();

    let line = report::render(&hosts);
    assert!(line.starts_with("198.51.100.7"));
    assert!(line.ends_with("box.lab.example"));
}
