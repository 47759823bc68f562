//! Fatal setup errors and their process exit codes.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit status used when configuration cannot be loaded or the log file
/// cannot be opened.
pub const EXIT_CONFIG: i32 = 5;

/// Failures while bringing the server up. Each stage exits with its own code.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("failed to resolve {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("no address found for {host}:{port}")]
    NoAddress { host: String, port: u16 },

    #[error("failed to bind socket: {0}")]
    Bind(#[source] io::Error),

    #[error("failed to listen on socket: {0}")]
    Listen(#[source] io::Error),

    #[error("failed to set up readiness polling: {0}")]
    Reactor(#[source] io::Error),

    #[error("failed to open log file {}: {source}", .path.display())]
    LogSink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SetupError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SetupError::Resolve { .. } | SetupError::NoAddress { .. } => 1,
            SetupError::Bind(_) => 2,
            SetupError::Listen(_) => 3,
            SetupError::Reactor(_) => 4,
            SetupError::LogSink { .. } => EXIT_CONFIG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_stage() {
        let err = || io::Error::other("boom");
        let codes = [
            SetupError::Resolve { host: "h".into(), port: 1, source: err() }.exit_code(),
            SetupError::Bind(err()).exit_code(),
            SetupError::Listen(err()).exit_code(),
            SetupError::Reactor(err()).exit_code(),
        ];
        assert_eq!(codes, [1, 2, 3, 4]);
        assert!(!codes.contains(&EXIT_CONFIG));
    }
}
