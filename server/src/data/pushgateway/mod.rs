//! Metrics gateway push support
//!
//! - `client` - `Publisher` trait and the reqwest-backed Pushgateway client
//! - `encoding` - text exposition rendering through a registry scoped to one push
//! - `error` - push error type

mod client;
mod encoding;
mod error;

pub use client::{Publisher, PushgatewayClient};
pub use error::PublishError;
