//! Per-recipient message construction.

use courier_core::{MessageTemplate, OutboundEmail, PlaceholderCache, Recipient, render};

use crate::attachments::build_attachments;
use crate::config::DispatchConfig;
use crate::error::BuildError;

/// Builds transport-ready messages from the configured templates.
///
/// All fields of one message are rendered through a single
/// [`PlaceholderCache`], so sender name, subject, body and attachment
/// content agree on every placeholder value.
pub struct MessageBuilder<'a> {
    config: &'a DispatchConfig,
    template: MessageTemplate,
}

impl<'a> MessageBuilder<'a> {
    pub fn new(config: &'a DispatchConfig) -> Self {
        Self {
            config,
            template: config.template(),
        }
    }

    /// Build the message for one recipient.
    ///
    /// Sampled test sends (`for_test`) carry a visible `Test Email (N)`
    /// subject marker, where `N` is the sequence number of the triggering
    /// send. The body template is re-read on every call.
    pub async fn build(
        &self,
        recipient: &Recipient,
        sequence: u64,
        cache: &mut PlaceholderCache,
        for_test: bool,
    ) -> Result<OutboundEmail, BuildError> {
        let from = render(&self.template.from_pattern(), recipient, cache);

        let subject_pattern = if for_test {
            format!("Test Email ({sequence}) to {}", self.template.subject)
        } else {
            self.template.subject.clone()
        };
        let subject = render(&subject_pattern, recipient, cache);

        let body_template = tokio::fs::read_to_string(&self.template.body_path)
            .await
            .map_err(|source| BuildError::Template {
                what: "message body template",
                path: self.template.body_path.clone(),
                source,
            })?;
        let html_body = render(&body_template, recipient, cache);

        let attachments = if self.config.enable_attachment {
            build_attachments(recipient, cache, self.config).await?
        } else {
            Vec::new()
        };

        let headers = if self.config.enable_custom_headers {
            self.config
                .custom_headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect()
        } else {
            Vec::new()
        };

        Ok(OutboundEmail {
            from,
            to: recipient.clone(),
            subject,
            html_body,
            headers,
            attachments,
        })
    }
}
