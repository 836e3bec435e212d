use serde::{Deserialize, Serialize};

/// SMTP connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub smtp_host: String,

    /// SMTP server port. Defaults to 587 (STARTTLS submission port).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Optional SMTP username for authentication.
    pub username: Option<String>,

    /// Optional SMTP password for authentication.
    pub password: Option<String>,

    /// Whether to use STARTTLS for the connection. Defaults to `true`.
    #[serde(default = "default_tls")]
    pub tls: bool,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_tls() -> bool {
    true
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("tls", &self.tls)
            .finish()
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_owned(),
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            tls: default_tls(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SmtpConfig::default();
        assert_eq!(config.smtp_port, 587);
        assert!(config.tls);
        assert!(config.username.is_none());
    }

    #[test]
    fn debug_redacts_password() {
        let config = SmtpConfig {
            password: Some("hunter2".into()),
            ..SmtpConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
