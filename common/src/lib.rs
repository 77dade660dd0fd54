//! Shared types for `hostcheck`.
//!
//! Everything in here is free of network I/O: host records, target parsing,
//! subnet expansion, configuration and the observer interface that the
//! expander and the scheduler report through.

pub mod config;
pub mod error;
pub mod network;
pub mod observer;
