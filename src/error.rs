//! Error type and the catch-log-continue helper shared by every stage
//!
//! Library code returns [`Error`]. Call sites that must keep going after a
//! failure wrap the result with [`attempt`], which logs it once, classified
//! by [`FailureKind`], and hands back an [`Outcome`].

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("ledger error: {0}")]
    Ledger(#[from] csv::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("column {0} is missing from the games table")]
    MissingColumn(&'static str),

    /// A notation tag is absent or carries an unusable value.
    #[error("{0}")]
    Data(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Io { .. } => FailureKind::Io,
            Error::Decode { .. } => FailureKind::Decode,
            Error::Network { .. } | Error::Status { .. } => FailureKind::Network,
            Error::Ledger(e) if e.is_io_error() => FailureKind::Io,
            Error::Ledger(_) => FailureKind::Decode,
            Error::Database(_) | Error::MissingColumn(_) => FailureKind::Database,
            Error::Data(_) => FailureKind::Data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Io,
    Decode,
    Network,
    Data,
    Database,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Io => "io",
            FailureKind::Decode => "decode",
            FailureKind::Network => "network",
            FailureKind::Data => "data",
            FailureKind::Database => "database",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged result of a recoverable operation.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Failure { kind: FailureKind, reason: String },
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn unwrap_or(self, fallback: T) -> T {
        self.ok().unwrap_or(fallback)
    }
}

impl<T: Default> Outcome<T> {
    pub fn unwrap_or_default(self) -> T {
        self.ok().unwrap_or_default()
    }
}

/// Log a failed result with its context and classification.
///
/// Data failures are expected in real PGN exports and log at warn; every
/// other kind logs at error.
pub fn attempt<T>(context: &str, result: Result<T>) -> Outcome<T> {
    match result {
        Ok(value) => Outcome::Success(value),
        Err(err) => {
            let kind = err.kind();
            let reason = err.to_string();
            match kind {
                FailureKind::Data => tracing::warn!(%kind, "{context}: {reason}"),
                _ => tracing::error!(%kind, "{context}: {reason}"),
            }
            Outcome::Failure { kind, reason }
        }
    }
}
