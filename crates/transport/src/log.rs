use async_trait::async_trait;
use courier_core::OutboundEmail;
use tracing::info;

use crate::Transport;
use crate::error::TransportError;

/// A transport that logs each message and reports success without
/// performing any network I/O.
///
/// Useful for dry runs: the full dispatch pipeline executes (rendering,
/// attachment assembly, rate limiting, sampling) with nothing delivered.
#[derive(Debug, Default)]
pub struct LogTransport;

impl LogTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for LogTransport {
    async fn send(&self, message: &OutboundEmail) -> Result<(), TransportError> {
        info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            attachments = message.attachments.len(),
            "dry run: message built but not delivered"
        );
        Ok(())
    }

    async fn health_check(&self) -> Result<(), TransportError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
