use std::io;

use thiserror::Error;

/// Failures that abort an SMTP session before a terminal classification
/// was reached. The retry orchestrator treats all of these as "try the
/// next host", never as a hard stop.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error during SMTP session: {source}")]
    Io {
        #[source]
        source: io::Error,
    },
    #[error("SMTP session timed out")]
    Timeout,
}

impl ProbeError {
    pub(crate) fn io(source: io::Error) -> Self {
        Self::Io { source }
    }
}
