use thiserror::Error;

/// Errors produced by a transport while delivering a message.
///
/// The dispatcher treats any transport error as a terminal per-recipient
/// failure and never inspects the variant; the distinction exists for log
/// readability and for health checks.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The message could not be assembled for the wire (bad address, bad
    /// header, oversized part).
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// A network or protocol-level failure.
    #[error("connection error: {0}")]
    Connection(String),

    /// The server accepted the connection but rejected the message.
    #[error("delivery rejected: {0}")]
    Rejected(String),

    /// The transport was configured incorrectly.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
