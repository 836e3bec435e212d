//! The top-level dispatch loop.

use courier_core::{PlaceholderCache, Recipient, SendOutcome, SendStatus};
use courier_transport::Transport;
use tracing::{debug, info, warn};

use crate::builder::MessageBuilder;
use crate::config::DispatchConfig;
use crate::error::{BuildError, DispatchError};
use crate::session::DispatchSession;

/// Final report for one dispatch run.
#[derive(Debug)]
pub struct DispatchReport {
    pub attempted: u64,
    pub succeeded: u64,
    /// One outcome per non-empty recipient, in list order. Sampled test
    /// sends are not recorded here.
    pub outcomes: Vec<SendOutcome>,
}

/// Orchestrates one dispatch run: loads the recipient list, partitions it
/// into batches, drives rate limiting, triggers sampled test sends, and
/// aggregates outcomes.
///
/// Recipients are grouped into batches of `concurrency` but sends within a
/// batch stay sequential, so outcomes are produced in exact list order and
/// at most one send is in flight at a time. See DESIGN.md for the
/// concurrency-bound decision.
pub struct Dispatcher<T: Transport> {
    config: DispatchConfig,
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(config: DispatchConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Run the dispatch to completion.
    ///
    /// Per-recipient failures are recorded and the run continues; only
    /// failure to load the recipient list or a template file returns an
    /// error.
    pub async fn run(&self) -> Result<DispatchReport, DispatchError> {
        let lines = self.load_recipients().await?;
        info!(
            entries = lines.len(),
            concurrency = self.config.concurrency,
            rate_limit = self.config.rate_limit,
            transport = self.transport.name(),
            "dispatch run starting"
        );

        let builder = MessageBuilder::new(&self.config);
        let mut session = DispatchSession::new(self.config.sample_interval);
        let mut outcomes = Vec::new();
        let delay = self.config.rate_delay();
        let monitor = self.monitor_recipient();

        for batch in lines.chunks(self.config.concurrency.max(1)) {
            for line in batch {
                let Some(recipient) = Recipient::parse(line) else {
                    debug!("skipping empty recipient entry");
                    continue;
                };

                let sequence = session.next_sequence();
                let mut cache = PlaceholderCache::new();
                let outcome = self
                    .send_one(&builder, &recipient, sequence, &mut cache, false)
                    .await?;

                match &outcome.status {
                    SendStatus::Sent => {
                        info!(sequence, to = %recipient, "email sent");
                    }
                    SendStatus::Failed { reason } => {
                        warn!(sequence, to = %recipient, %reason, "send failed");
                    }
                }

                let crossed = session.record(outcome.is_success());
                outcomes.push(outcome);
                tokio::time::sleep(delay).await;

                if crossed && let Some(monitor) = &monitor {
                    // The sampled copy reuses the triggering send's cache so
                    // it mirrors exactly what that recipient received.
                    let sampled = self
                        .send_one(&builder, monitor, sequence, &mut cache, true)
                        .await?;
                    match &sampled.status {
                        SendStatus::Sent => {
                            info!(sequence, to = %monitor, "test email sent");
                        }
                        SendStatus::Failed { reason } => {
                            warn!(sequence, to = %monitor, %reason, "test email failed");
                        }
                    }
                    tokio::time::sleep(delay).await;
                }
            }
        }

        info!(
            attempted = session.attempted(),
            succeeded = session.succeeded(),
            "dispatch run complete"
        );
        Ok(DispatchReport {
            attempted: session.attempted(),
            succeeded: session.succeeded(),
            outcomes,
        })
    }

    async fn load_recipients(&self) -> Result<Vec<String>, DispatchError> {
        let raw = tokio::fs::read_to_string(&self.config.recipients_path)
            .await
            .map_err(|source| DispatchError::Load {
                what: "recipient list",
                path: self.config.recipients_path.clone(),
                source,
            })?;
        Ok(raw.trim().lines().map(str::to_owned).collect())
    }

    fn monitor_recipient(&self) -> Option<Recipient> {
        self.config
            .monitor_address
            .as_deref()
            .and_then(Recipient::parse)
    }

    /// Build and transmit one message, converting per-recipient errors into
    /// failed outcomes. Template load failures propagate and abort the run.
    async fn send_one(
        &self,
        builder: &MessageBuilder<'_>,
        recipient: &Recipient,
        sequence: u64,
        cache: &mut PlaceholderCache,
        for_test: bool,
    ) -> Result<SendOutcome, DispatchError> {
        let message = match builder.build(recipient, sequence, cache, for_test).await {
            Ok(message) => message,
            Err(BuildError::Template { what, path, source }) => {
                return Err(DispatchError::Load { what, path, source });
            }
            Err(err @ BuildError::AttachmentSource { .. }) => {
                return Ok(SendOutcome::failed(recipient.clone(), sequence, err.to_string()));
            }
        };

        match self.transport.send(&message).await {
            Ok(()) => Ok(SendOutcome::sent(recipient.clone(), sequence)),
            Err(err) => Ok(SendOutcome::failed(
                recipient.clone(),
                sequence,
                err.to_string(),
            )),
        }
    }
}
