use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::*;
use hostcheck_common::{
    config::Config,
    network::{host::HostSet, target::TargetExpander},
    observer::{Observer, TracingObserver},
};
use hostcheck_core::{
    discovery::{CheckService, TargetSource},
    report,
    scanner::{ProbeRun, ProbeScheduler},
};
use tracing::{Level, debug, info};

use super::CommandLine;
use crate::terminal::{print, spinner};

/// `verbosity` is the most verbose level the log filter passes, so notices
/// follow `RUST_LOG` as well as `-d`.
pub async fn check(commands: &CommandLine, verbosity: Level) -> anyhow::Result<()> {
    let cfg: Config = commands.to_config()?;
    let observer: Arc<dyn Observer> = Arc::new(TracingObserver::new(verbosity));

    let expander = TargetExpander::new(cfg.subnet_max, Arc::clone(&observer));
    let scheduler = ProbeScheduler::new(cfg.clone(), observer)?
        .on_progress(Box::new(spinner::report_probe_progress));
    let service = CheckService::new(expander, scheduler);

    let inline: String = commands.targets();
    let source = TargetSource {
        inline: &inline,
        file: commands.file.as_deref(),
    };

    let start_time: Instant = Instant::now();
    let mut hosts: HostSet = service.collect(&source)?;
    debug!("{} host(s) to examine", hosts.len());

    if cfg.any_check_enabled() {
        spinner::start_probe_progress(service.scheduler().planned_probes(&hosts));
    }
    let run: ProbeRun = service.scheduler().perform_checks(&mut hosts).await;
    spinner::finish();

    print::report(&report::render(&hosts))?;
    check_ends(&hosts, run, start_time.elapsed());
    Ok(())
}

fn check_ends(hosts: &HostSet, run: ProbeRun, total_time: Duration) {
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();

    match run {
        ProbeRun::Completed { probes } => {
            let checked: ColoredString = format!("{} hosts", hosts.len()).bold().green();
            debug!("{probes} probes finished");
            info!("{checked} checked in {total_time}");
        }
        ProbeRun::Refused { hosts } => {
            info!("{hosts} hosts listed without checks in {total_time}");
        }
    }
}
