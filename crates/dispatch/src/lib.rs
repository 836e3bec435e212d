//! The Courier dispatch pipeline.
//!
//! Given a recipient list and a set of message templates, the
//! [`Dispatcher`] renders and transmits one personalized message per
//! recipient through a [`Transport`](courier_transport::Transport), under a
//! concurrency bound and a rate limit, and periodically routes a sampled
//! copy of the traffic to a fixed monitoring address.
//!
//! A single recipient's failure never aborts the run; only failure to load
//! the recipient list or a template file does.

pub mod attachments;
pub mod builder;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod session;

pub use builder::MessageBuilder;
pub use config::{CidMapping, DispatchConfig};
pub use dispatcher::{DispatchReport, Dispatcher};
pub use error::{BuildError, ConfigError, DispatchError};
pub use session::DispatchSession;
