//! Probing and reporting for `hostcheck`.
//!
//! * [`discovery`] collects the targets and drives a complete run.
//! * [`scanner`] fans the checks out over all hosts and merges the results.
//! * [`network`] holds the individual TCP and ICMP probes.
//! * [`report`] renders the fixed-width result table.

pub mod discovery;
pub mod network;
pub mod report;
pub mod scanner;
