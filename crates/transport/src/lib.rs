//! Delivery transports for the Courier bulk mailer.
//!
//! The dispatch pipeline builds [`OutboundEmail`](courier_core::OutboundEmail)
//! values and hands them to a [`Transport`]. Two implementations are
//! provided: [`SmtpTransport`] for real delivery via `lettre`, and
//! [`LogTransport`] for dry runs that only log what would have been sent.

pub mod config;
pub mod error;
pub mod log;
pub mod smtp;
mod transport;

pub use config::SmtpConfig;
pub use error::TransportError;
pub use log::LogTransport;
pub use smtp::SmtpTransport;
pub use transport::Transport;
