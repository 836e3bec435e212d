//! Per-message placeholder rendering.
//!
//! Templates contain `{{token}}` placeholders that are substituted with
//! per-recipient values at render time. Resolved values are cached in a
//! [`PlaceholderCache`] scoped to one outgoing message, so that every field
//! rendered for that message (sender display name, subject, body, attachment
//! content) sees the same values — including tokens that are freshly
//! generated, like `message_id`.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::Local;
use regex::{Captures, Regex};
use uuid::Uuid;

use crate::recipient::Recipient;

/// Matches `{{token}}` placeholders; the capture group is the token name.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([a-z][a-z0-9_]*)\s*\}\}").expect("token regex is valid"));

/// Placeholder values resolved for one outgoing message.
///
/// Created fresh per message and never shared across recipients. The sampled
/// test send triggered by a success reuses the cache of the triggering send,
/// so the sampled copy reflects exactly what that recipient received.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderCache {
    values: HashMap<String, String>,
}

impl PlaceholderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an already-resolved token.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    /// Number of tokens resolved so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Render `template` for `recipient`, substituting every recognized
/// `{{token}}` with its value from `cache`. Tokens not yet in the cache are
/// resolved once and written back; unrecognized tokens pass through
/// unchanged. Idempotent for a given cache: rendering the same template
/// twice yields identical output and resolves nothing new on the second
/// pass.
pub fn render(template: &str, recipient: &Recipient, cache: &mut PlaceholderCache) -> String {
    TOKEN_RE
        .replace_all(template, |caps: &Captures<'_>| {
            match resolve(&caps[1], recipient, cache) {
                Some(value) => value,
                None => caps[0].to_owned(),
            }
        })
        .into_owned()
}

fn resolve(token: &str, recipient: &Recipient, cache: &mut PlaceholderCache) -> Option<String> {
    if let Some(value) = cache.values.get(token) {
        return Some(value.clone());
    }
    let value = match token {
        "email" => recipient.as_str().to_owned(),
        "user" => recipient.local_part().to_owned(),
        "domain" => recipient.domain().unwrap_or_default().to_owned(),
        "date" => Local::now().format("%B %e, %Y").to_string(),
        "time" => Local::now().format("%H:%M").to_string(),
        "message_id" => Uuid::new_v4().to_string(),
        "token" => Uuid::new_v4().simple().to_string(),
        _ => return None,
    };
    cache.values.insert(token.to_owned(), value.clone());
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient() -> Recipient {
        Recipient::parse("alice@example.com").unwrap()
    }

    #[test]
    fn substitutes_recipient_tokens() {
        let mut cache = PlaceholderCache::new();
        let out = render("Hi {{user}} ({{email}}) at {{domain}}", &recipient(), &mut cache);
        assert_eq!(out, "Hi alice (alice@example.com) at example.com");
    }

    #[test]
    fn unrecognized_tokens_pass_through() {
        let mut cache = PlaceholderCache::new();
        let out = render("Hello {{nonsense}}!", &recipient(), &mut cache);
        assert_eq!(out, "Hello {{nonsense}}!");
        assert!(cache.is_empty());
    }

    #[test]
    fn render_is_idempotent_per_cache() {
        let mut cache = PlaceholderCache::new();
        let template = "id={{message_id}} nonce={{token}} to={{email}}";
        let first = render(template, &recipient(), &mut cache);
        let resolved = cache.len();
        let second = render(template, &recipient(), &mut cache);
        assert_eq!(first, second);
        assert_eq!(cache.len(), resolved, "second render must resolve nothing new");
    }

    #[test]
    fn generated_tokens_differ_across_caches() {
        let mut a = PlaceholderCache::new();
        let mut b = PlaceholderCache::new();
        let first = render("{{message_id}}", &recipient(), &mut a);
        let second = render("{{message_id}}", &recipient(), &mut b);
        assert_ne!(first, second);
    }

    #[test]
    fn cached_value_shared_across_templates() {
        // Subject and body rendered with one cache must agree on values.
        let mut cache = PlaceholderCache::new();
        let subject = render("Ref {{token}}", &recipient(), &mut cache);
        let body = render("Your reference is {{token}}.", &recipient(), &mut cache);
        let nonce = cache.get("token").unwrap().to_owned();
        assert_eq!(subject, format!("Ref {nonce}"));
        assert_eq!(body, format!("Your reference is {nonce}."));
    }

    #[test]
    fn whitespace_inside_braces_is_tolerated() {
        let mut cache = PlaceholderCache::new();
        let out = render("{{ user }}", &recipient(), &mut cache);
        assert_eq!(out, "alice");
    }

    #[test]
    fn template_without_tokens_is_unchanged() {
        let mut cache = PlaceholderCache::new();
        let out = render("plain text { not a token }", &recipient(), &mut cache);
        assert_eq!(out, "plain text { not a token }");
    }
}
