use std::path::PathBuf;

use thiserror::Error;

/** errors raised by the clique engine, its readers and its distributed layer */
#[derive(Debug, Error)]
pub enum CliqueError {
    /// file could not be read or written
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// file involved
        path: PathBuf,
        /// underlying error
        #[source]
        source: std::io::Error,
    },

    /// instance file does not follow its format
    #[error("invalid instance (line {line}): {message}")]
    Parse {
        /// line of the error (1-based)
        line: usize,
        /// what went wrong
        message: String,
    },

    /// the instance declares fewer vertices than it uses
    #[error("graph capacity exceeded: at most {capacity} vertices declared")]
    CapacityExceeded {
        /// declared number of vertices
        capacity: usize,
    },

    /// configuration file is not valid
    #[error("invalid configuration: {0}")]
    Config(String),

    /// configuration or statistics could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// packet smaller than the packed representation it should contain
    #[error("packet too short: expected at least {expected} words, found {found}")]
    PacketTooShort {
        /// expected number of words
        expected: usize,
        /// number of words received
        found: usize,
    },

    /// packet with a tag that does not belong to the protocol
    #[error("unknown message tag {0}")]
    UnknownTag(u32),

    /// every worker of a distributed search went away
    #[error("all workers disconnected before the search completed")]
    WorkersDisconnected,

    /// the coordinator went away while a worker waited for instructions
    #[error("coordinator disconnected")]
    CoordinatorDisconnected,

    /// a worker thread could not be started or panicked
    #[error("worker {0} failed")]
    WorkerFailed(usize),
}

impl CliqueError {
    /// wraps an I/O error with the path it happened on
    pub fn io(path:impl Into<PathBuf>, source:std::io::Error) -> Self {
        CliqueError::Io { path: path.into(), source }
    }
}

/// result type of the crate
pub type Result<T> = std::result::Result<T, CliqueError>;
