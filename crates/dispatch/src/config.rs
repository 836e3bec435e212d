//! Dispatch run configuration.
//!
//! Every recognized option is an explicit field, validated once at load
//! time. The recipient list and template inputs are referenced by path and
//! read by the pipeline itself.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use courier_core::MessageTemplate;
use courier_transport::SmtpConfig;

use crate::error::ConfigError;

/// One static attachment: a content id mapped to a source file. Declaration
/// order in the config file is the order attachments are appended.
#[derive(Debug, Clone, Deserialize)]
pub struct CidMapping {
    /// Content id referenced from the message body (`cid:` URI).
    pub cid: String,
    /// Path to the source file.
    pub path: PathBuf,
}

/// Full configuration for one dispatch run, loaded from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Sender display-name template.
    pub from_name: String,
    /// Sender address.
    pub from_email: String,
    /// Subject template.
    pub subject: String,

    /// Newline-separated recipient list file.
    #[serde(default = "default_recipients_path")]
    pub recipients_path: PathBuf,
    /// HTML body template, re-read for every message.
    #[serde(default = "default_body_template_path")]
    pub body_template_path: PathBuf,

    /// Batch size for recipient grouping.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Sends per second; the per-send delay is `1000 / rate_limit` ms.
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,
    /// A sampled copy goes to the monitor address after every
    /// `sample_interval`-th successful send.
    #[serde(default = "default_sample_interval")]
    pub sample_interval: u64,
    /// Fixed monitoring address for sampled copies. Sampling is disabled
    /// when absent.
    #[serde(default)]
    pub monitor_address: Option<String>,

    /// Whether messages carry attachments at all.
    #[serde(default)]
    pub enable_attachment: bool,
    /// Attachment-body template, re-read for every message.
    #[serde(default = "default_attachment_template_path")]
    pub attachment_template_path: PathBuf,
    /// Filename shown for the rendered attachment.
    #[serde(default = "default_attachment_filename")]
    pub attachment_filename: String,
    /// MIME type of the rendered attachment.
    #[serde(default = "default_attachment_content_type")]
    pub attachment_content_type: String,
    /// Static content-id attachments, appended in declaration order.
    #[serde(default)]
    pub cid_mappings: Vec<CidMapping>,

    /// Whether to attach the static custom headers.
    #[serde(default)]
    pub enable_custom_headers: bool,
    /// Extra headers added to every message when enabled.
    #[serde(default)]
    pub custom_headers: BTreeMap<String, String>,

    /// SMTP connection settings.
    #[serde(default)]
    pub smtp: SmtpConfig,
}

fn default_recipients_path() -> PathBuf {
    PathBuf::from("list.txt")
}

fn default_body_template_path() -> PathBuf {
    PathBuf::from("letter.html")
}

fn default_attachment_template_path() -> PathBuf {
    PathBuf::from("attach.html")
}

fn default_attachment_filename() -> String {
    "message.html".to_owned()
}

fn default_attachment_content_type() -> String {
    "text/html".to_owned()
}

fn default_concurrency() -> usize {
    2
}

fn default_rate_limit() -> u32 {
    1
}

fn default_sample_interval() -> u64 {
    100
}

impl DispatchConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency. Called by [`DispatchConfig::load`];
    /// exposed for configs built in code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.from_email.trim().is_empty() || !self.from_email.contains('@') {
            return Err(ConfigError::Invalid(format!(
                "from_email is not an address: '{}'",
                self.from_email
            )));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid("concurrency must be at least 1".into()));
        }
        if self.rate_limit == 0 {
            return Err(ConfigError::Invalid("rate_limit must be at least 1".into()));
        }
        if self.sample_interval == 0 {
            return Err(ConfigError::Invalid(
                "sample_interval must be at least 1".into(),
            ));
        }
        if let Some(addr) = &self.monitor_address
            && addr.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "monitor_address must not be blank".into(),
            ));
        }
        let mut seen = HashSet::new();
        for mapping in &self.cid_mappings {
            if !seen.insert(mapping.cid.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate content id '{}' in cid_mappings",
                    mapping.cid
                )));
            }
        }
        Ok(())
    }

    /// The fixed delay applied after every individual send.
    pub fn rate_delay(&self) -> Duration {
        Duration::from_millis(u64::from(1000 / self.rate_limit.max(1)))
    }

    /// The immutable template patterns for this run.
    pub fn template(&self) -> MessageTemplate {
        MessageTemplate {
            from_name: self.from_name.clone(),
            from_email: self.from_email.clone(),
            subject: self.subject.clone(),
            body_path: self.body_template_path.clone(),
            attachment_body_path: self.attachment_template_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
            from_name = "Support"
            from_email = "support@example.com"
            subject = "Hello {{user}}"
        "#
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config: DispatchConfig = toml::from_str(minimal_toml()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.rate_limit, 1);
        assert_eq!(config.sample_interval, 100);
        assert_eq!(config.recipients_path, PathBuf::from("list.txt"));
        assert!(!config.enable_attachment);
        assert!(config.monitor_address.is_none());
        assert!(config.cid_mappings.is_empty());
    }

    #[test]
    fn full_config_parses() {
        let toml = r#"
            from_name = "Support"
            from_email = "support@example.com"
            subject = "Hello"
            recipients_path = "recipients.txt"
            body_template_path = "body.html"
            concurrency = 4
            rate_limit = 10
            sample_interval = 50
            monitor_address = "qa@example.com"
            enable_attachment = true
            attachment_template_path = "attach.html"
            attachment_filename = "details.html"
            attachment_content_type = "text/html"
            enable_custom_headers = true

            [custom_headers]
            "X-Campaign" = "spring"

            [[cid_mappings]]
            cid = "logo"
            path = "assets/logo.png"

            [[cid_mappings]]
            cid = "banner"
            path = "assets/banner.jpg"

            [smtp]
            smtp_host = "smtp.example.com"
            smtp_port = 465
            tls = true
        "#;
        let config: DispatchConfig = toml::from_str(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.rate_limit, 10);
        assert_eq!(config.smtp.smtp_port, 465);
        assert_eq!(config.custom_headers["X-Campaign"], "spring");
    }

    #[test]
    fn cid_mapping_order_is_declaration_order() {
        let toml = r#"
            from_name = "S"
            from_email = "s@example.com"
            subject = "x"

            [[cid_mappings]]
            cid = "second-declared-last-wins-nothing"
            path = "b.png"

            [[cid_mappings]]
            cid = "a"
            path = "a.png"
        "#;
        let config: DispatchConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.cid_mappings[0].path, PathBuf::from("b.png"));
        assert_eq!(config.cid_mappings[1].path, PathBuf::from("a.png"));
    }

    #[test]
    fn rejects_duplicate_cids() {
        let toml = r#"
            from_name = "S"
            from_email = "s@example.com"
            subject = "x"

            [[cid_mappings]]
            cid = "logo"
            path = "a.png"

            [[cid_mappings]]
            cid = "logo"
            path = "b.png"
        "#;
        let config: DispatchConfig = toml::from_str(toml).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_zero_rate_limit() {
        let mut config: DispatchConfig = toml::from_str(minimal_toml()).unwrap();
        config.rate_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_from_email() {
        let mut config: DispatchConfig = toml::from_str(minimal_toml()).unwrap();
        config.from_email = "not-an-address".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_blank_monitor_address() {
        let mut config: DispatchConfig = toml::from_str(minimal_toml()).unwrap();
        config.monitor_address = Some("   ".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn rate_delay_from_rate_limit() {
        let mut config: DispatchConfig = toml::from_str(minimal_toml()).unwrap();
        assert_eq!(config.rate_delay(), Duration::from_millis(1000));
        config.rate_limit = 4;
        assert_eq!(config.rate_delay(), Duration::from_millis(250));
    }

    #[test]
    fn template_carries_patterns_and_paths() {
        let config: DispatchConfig = toml::from_str(minimal_toml()).unwrap();
        let template = config.template();
        assert_eq!(template.subject, "Hello {{user}}");
        assert_eq!(template.body_path, PathBuf::from("letter.html"));
        assert_eq!(
            template.from_pattern(),
            "\"Support\" <support@example.com>"
        );
    }
}
