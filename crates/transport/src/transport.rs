use async_trait::async_trait;
use courier_core::OutboundEmail;

use crate::error::TransportError;

/// A delivery transport for built messages.
///
/// Implementations own all protocol and connection concerns. Whether a
/// connection is opened per send or reused across sends is an
/// implementation choice invisible to callers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one message. Any error is a terminal failure for that
    /// message only.
    async fn send(&self, message: &OutboundEmail) -> Result<(), TransportError>;

    /// Verify the transport can reach its backend.
    async fn health_check(&self) -> Result<(), TransportError>;

    /// Short transport name for logs (e.g. `"smtp"`).
    fn name(&self) -> &'static str;
}
