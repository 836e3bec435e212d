use async_trait::async_trait;
use courier_core::{AttachmentSpec, OutboundEmail};
use lettre::message::header::{ContentType, HeaderName, HeaderValue};
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info};

use crate::Transport;
use crate::config::SmtpConfig;
use crate::error::TransportError;

/// SMTP delivery via `lettre`.
///
/// The underlying transport holds a connection pool, so one `SmtpTransport`
/// is built per run and reused for every send.
pub struct SmtpTransport {
    config: SmtpConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for SmtpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpTransport")
            .field("config", &self.config)
            .field("transport", &"<AsyncSmtpTransport>")
            .finish()
    }
}

impl SmtpTransport {
    /// Create a new `SmtpTransport` from the given configuration.
    pub fn new(config: SmtpConfig) -> Result<Self, TransportError> {
        let transport = build_transport(&config)?;
        Ok(Self { config, transport })
    }

    /// Create an `SmtpTransport` with a pre-built lettre transport (for
    /// testing).
    pub fn with_transport(
        config: SmtpConfig,
        transport: AsyncSmtpTransport<Tokio1Executor>,
    ) -> Self {
        Self { config, transport }
    }
}

#[async_trait]
impl Transport for SmtpTransport {
    async fn send(&self, message: &OutboundEmail) -> Result<(), TransportError> {
        debug!(to = %message.to, subject = %message.subject, "building SMTP message");
        let lettre_message = build_message(message)?;

        self.transport.send(lettre_message).await.map_err(|e| {
            error!(to = %message.to, error = %e, "SMTP send failed");
            map_smtp_error(&e)
        })?;

        info!(to = %message.to, "message accepted by SMTP server");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), TransportError> {
        debug!(host = %self.config.smtp_host, "performing SMTP health check");
        self.transport.test_connection().await.map_err(|e| {
            TransportError::Connection(format!("SMTP health check failed: {e}"))
        })?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

/// Build a `lettre::Message` from an [`OutboundEmail`].
fn build_message(msg: &OutboundEmail) -> Result<Message, TransportError> {
    let from_mailbox: Mailbox = msg
        .from
        .parse()
        .map_err(|e| TransportError::InvalidMessage(format!("invalid from address: {e}")))?;

    let to_mailbox: Mailbox = msg
        .to
        .as_str()
        .parse()
        .map_err(|e| TransportError::InvalidMessage(format!("invalid recipient address: {e}")))?;

    let builder = Message::builder()
        .from(from_mailbox)
        .to(to_mailbox)
        .subject(&msg.subject);

    let mut message = if msg.attachments.is_empty() {
        builder
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(msg.html_body.clone()),
            )
            .map_err(|e| TransportError::InvalidMessage(format!("failed to build email: {e}")))?
    } else {
        let mut multipart = MultiPart::mixed().singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(msg.html_body.clone()),
        );
        for attachment in &msg.attachments {
            multipart = multipart.singlepart(build_attachment(attachment)?);
        }
        builder
            .multipart(multipart)
            .map_err(|e| TransportError::InvalidMessage(format!("failed to build email: {e}")))?
    };

    for (name, value) in &msg.headers {
        let header_name = HeaderName::new_from_ascii(name.clone()).map_err(|e| {
            TransportError::InvalidMessage(format!("invalid header name '{name}': {e}"))
        })?;
        message
            .headers_mut()
            .insert_raw(HeaderValue::new(header_name, value.clone()));
    }

    Ok(message)
}

fn build_attachment(spec: &AttachmentSpec) -> Result<SinglePart, TransportError> {
    match spec {
        AttachmentSpec::Rendered {
            filename,
            content,
            content_type,
        } => Ok(Attachment::new(filename.clone())
            .body(content.clone(), parse_content_type(content_type)?)),
        AttachmentSpec::Static {
            content_id,
            content,
            content_type,
            ..
        } => Ok(Attachment::new_inline(content_id.clone())
            .body(content.clone(), parse_content_type(content_type)?)),
    }
}

fn parse_content_type(raw: &str) -> Result<ContentType, TransportError> {
    ContentType::parse(raw)
        .map_err(|e| TransportError::InvalidMessage(format!("invalid content type '{raw}': {e}")))
}

/// Build an async SMTP transport from the given configuration.
fn build_transport(
    config: &SmtpConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, TransportError> {
    let builder = if config.tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| TransportError::Configuration(format!("SMTP TLS relay error: {e}")))?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
    };

    let builder = builder.port(config.smtp_port);

    let builder = if let (Some(user), Some(pass)) = (&config.username, &config.password) {
        builder.credentials(Credentials::new(user.clone(), pass.clone()))
    } else {
        builder
    };

    Ok(builder.build())
}

/// Map a lettre SMTP error to the appropriate `TransportError` variant.
fn map_smtp_error(error: &lettre::transport::smtp::Error) -> TransportError {
    let message = error.to_string();

    if error.is_permanent() {
        TransportError::Rejected(format!("permanent SMTP error: {message}"))
    } else if error.is_transient() {
        TransportError::Connection(format!("transient SMTP error: {message}"))
    } else {
        TransportError::Connection(format!("SMTP error: {message}"))
    }
}
