//! Fixed-width result table, one line per host in address order.

use hostcheck_common::network::host::{HostRecord, HostSet};

pub const ADDR_WIDTH: usize = 28;
pub const PING_WIDTH: usize = 8;
pub const PORTS_WIDTH: usize = 16;
pub const NAME_WIDTH: usize = 40;

pub fn render(hosts: &HostSet) -> String {
    hosts
        .iter()
        .map(format_line)
        .collect::<Vec<String>>()
        .join("\n")
}

/// `address  ping  ports  name`, padded to the column widths. A ping that
/// never ran and a name that was never looked up are left blank.
pub fn format_line(host: &HostRecord) -> String {
    let ping: String = host.ping.map(|ping| ping.to_string()).unwrap_or_default();
    let ports: String = host
        .open_ports
        .iter()
        .map(u16::to_string)
        .collect::<Vec<String>>()
        .join(" ");
    let name: &str = host.hostname.as_deref().unwrap_or_default();

    let line = format!(
        "{:<aw$} {:>pw$} {:<tw$} {:<nw$}",
        host.addr.to_string(),
        ping,
        ports,
        name,
        aw = ADDR_WIDTH,
        pw = PING_WIDTH,
        tw = PORTS_WIDTH,
        nw = NAME_WIDTH,
    );
    line.trim_end().to_string()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
