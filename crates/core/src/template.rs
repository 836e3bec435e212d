use std::path::PathBuf;

/// Immutable message template patterns, loaded once from configuration and
/// shared read-only by every send.
///
/// The body and attachment-body templates are held as paths rather than
/// contents: they are re-read for every message, so editing the files
/// mid-run affects subsequent sends only.
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    /// Sender display-name pattern (may contain placeholders).
    pub from_name: String,
    /// Sender address (no placeholders).
    pub from_email: String,
    /// Subject pattern (may contain placeholders).
    pub subject: String,
    /// Path to the HTML body template.
    pub body_path: PathBuf,
    /// Path to the attachment-body template.
    pub attachment_body_path: PathBuf,
}

impl MessageTemplate {
    /// The RFC 5322 `From` pattern: `"from_name" <from_email>`.
    pub fn from_pattern(&self) -> String {
        format!("\"{}\" <{}>", self.from_name, self.from_email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pattern_quotes_display_name() {
        let template = MessageTemplate {
            from_name: "Support {{domain}}".into(),
            from_email: "support@example.com".into(),
            subject: "Hello".into(),
            body_path: PathBuf::from("letter.html"),
            attachment_body_path: PathBuf::from("attach.html"),
        };
        assert_eq!(
            template.from_pattern(),
            "\"Support {{domain}}\" <support@example.com>"
        );
    }
}
