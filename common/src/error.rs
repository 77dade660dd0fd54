use std::path::PathBuf;

use thiserror::Error;

/// Problems with what the user asked for. These abort a run before any probe
/// is sent; probe failures are never reported through this type.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read input file {}: {source}", path.display())]
    MissingInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid port number: {value}")]
    InvalidPort { value: String },

    #[error("port scan requested but no ports were given")]
    NoPorts,

    #[error("invalid ping pattern '{pattern}': {reason}")]
    InvalidPingPattern { pattern: String, reason: String },
}
