use std::io;
use std::path::PathBuf;

use thiserror::Error;

use courier_transport::TransportError;

/// Configuration loading and validation errors. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors encountered while building one message.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A template file could not be read. Fatal: every subsequent send
    /// would fail the same way.
    #[error("failed to load {what} from {path}: {source}")]
    Template {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A static attachment source could not be read. Recorded as a failed
    /// send for this recipient only.
    #[error("attachment source unreadable ({path}): {source}")]
    AttachmentSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Fatal errors that abort a dispatch run.
///
/// Per-recipient failures (transport errors, unreadable static attachment
/// sources) never surface here — they are converted into failed
/// [`SendOutcome`](courier_core::SendOutcome)s at the builder/transport
/// boundary.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The recipient list or a template file is missing or unreadable.
    #[error("failed to load {what} from {path}: {source}")]
    Load {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The transport could not be constructed or failed its health check.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
