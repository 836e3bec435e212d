//! Core types and shared abstractions for the Courier bulk mailer.
//!
//! This crate holds everything the dispatch pipeline and the transport layer
//! agree on: recipient identifiers, per-message placeholder rendering, the
//! outbound message model, and send outcomes. It performs no I/O.

pub mod message;
pub mod outcome;
pub mod placeholder;
pub mod recipient;
pub mod template;

pub use message::{AttachmentSpec, OutboundEmail};
pub use outcome::{SendOutcome, SendStatus};
pub use placeholder::{PlaceholderCache, render};
pub use recipient::Recipient;
pub use template::MessageTemplate;
