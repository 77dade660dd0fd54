//! PTR queries for reverse name lookups.

use std::net::IpAddr;

use anyhow::Context;
use dns_parser::{Builder, Packet, QueryClass, QueryType, RData, ResponseCode};

pub const DNS_PORT: u16 = 53;

/// Builds a recursive PTR query for `ip_addr`, returning the transaction id
/// together with the encoded message.
pub fn create_ptr_packet(ip_addr: &IpAddr) -> anyhow::Result<(u16, Vec<u8>)> {
    let id: u16 = rand::random();
    let qname: String = reverse_address_to_ptr(ip_addr);

    let mut builder = Builder::new_query(id, true);
    builder.add_question(&qname, false, QueryType::PTR, QueryClass::IN);
    let bytes: Vec<u8> = builder
        .build()
        .map_err(|_| anyhow::anyhow!("PTR query for {qname} was truncated"))?;

    Ok((id, bytes))
}

/// Extracts the first PTR name from a response to the query with `id`.
///
/// Returns `Ok(None)` for an answer to a different query and an error for
/// anything that carries no usable name.
pub fn get_hostname(payload: &[u8], id: u16) -> anyhow::Result<Option<String>> {
    let packet = Packet::parse(payload).context("Failed to parse DNS packet")?;
    if packet.header.id != id || packet.header.query {
        return Ok(None);
    }

    if packet.header.response_code != ResponseCode::NoError {
        anyhow::bail!("DNS server answered {:?}", packet.header.response_code);
    }

    // A PTR to the root name carries no name either.
    let hostname: String = packet
        .answers
        .iter()
        .find_map(|answer| match &answer.data {
            RData::PTR(ptr) => Some(ptr.0.to_string().trim_end_matches('.').to_string()),
            _ => None,
        })
        .filter(|name| !name.is_empty())
        .ok_or_else(|| anyhow::anyhow!("No PTR record found"))?;

    Ok(Some(hostname))
}

/// `1.2.3.4` becomes `4.3.2.1.in-addr.arpa`, IPv6 addresses are expanded to
/// reversed nibbles under `ip6.arpa`.
pub fn reverse_address_to_ptr(ip_addr: &IpAddr) -> String {
    match ip_addr {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("{d}.{c}.{b}.{a}.in-addr.arpa")
        }
        IpAddr::V6(v6) => {
            let mut labels: Vec<String> = Vec::with_capacity(33);
            for byte in v6.octets().iter().rev() {
                labels.push(format!("{:x}", byte & 0x0f));
                labels.push(format!("{:x}", byte >> 4));
            }
            labels.push("ip6.arpa".to_string());
            labels.join(".")
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
