use crate::recipient::Recipient;

/// An attachment included with an outbound email.
///
/// Within one message the dynamically rendered attachment always comes
/// first, followed by statically mapped attachments in their declared
/// mapping order. Each static attachment is keyed by a content id that is
/// unique within the message.
#[derive(Debug, Clone)]
pub enum AttachmentSpec {
    /// Content rendered from the attachment-body template for this
    /// recipient.
    Rendered {
        filename: String,
        content: String,
        content_type: String,
    },
    /// A static file referenced by content id, for inline or companion use.
    Static {
        content_id: String,
        /// Derived from the final segment of the source path.
        filename: String,
        content: Vec<u8>,
        content_type: String,
    },
}

impl AttachmentSpec {
    /// The filename shown to the receiving client.
    pub fn filename(&self) -> &str {
        match self {
            Self::Rendered { filename, .. } | Self::Static { filename, .. } => filename,
        }
    }
}

/// A fully built, transport-ready email. Pure data — building one performs
/// no network I/O.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    /// RFC 5322 `From` in display-name form, e.g. `"Support" <s@example.com>`.
    pub from: String,
    pub to: Recipient,
    pub subject: String,
    pub html_body: String,
    /// Extra headers, empty unless custom headers are enabled.
    pub headers: Vec<(String, String)>,
    pub attachments: Vec<AttachmentSpec>,
}
