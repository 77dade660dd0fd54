use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static PROGRESS: OnceLock<ProgressBar> = OnceLock::new();

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn init_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template("{spinner:.blue} {msg} {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS);

    pb.set_style(style);
    pb.set_message("Probing hosts");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn start_probe_progress(total: usize) {
    let total = total as u64;
    let pb = PROGRESS.get_or_init(|| init_progress_bar(total));
    pb.set_length(total);
}

pub fn report_probe_progress(finished: usize, _total: usize) {
    if let Some(pb) = PROGRESS.get() {
        pb.set_position(finished as u64);
    }
}

pub fn finish() {
    if let Some(pb) = PROGRESS.get() {
        pb.finish_and_clear();
    }
}

/// Log sink that prints above the progress bar while it is shown and to
/// stderr otherwise.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match PROGRESS.get() {
            Some(pb) if !pb.is_finished() => {
                let msg = String::from_utf8_lossy(buf);
                pb.println(msg.trim_end());
                Ok(buf.len())
            }
            _ => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
