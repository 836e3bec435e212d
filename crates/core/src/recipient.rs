use std::fmt;

use serde::{Deserialize, Serialize};

/// A single recipient address, trimmed and guaranteed non-empty.
///
/// Recipients are opaque to the dispatch pipeline — no syntactic validation
/// is performed beyond trimming. Address validity is the transport's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipient(String);

impl Recipient {
    /// Parse a raw list entry into a recipient, trimming surrounding
    /// whitespace. Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// The full address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The local part of the address (everything before the first `@`), or
    /// the whole address when it contains no `@`.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }

    /// The domain part of the address, if present.
    pub fn domain(&self) -> Option<&str> {
        let (_, domain) = self.0.split_once('@')?;
        if domain.is_empty() { None } else { Some(domain) }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
