//! Command implementations for the CLI
//!
//! - serve: run the HTTP service
//! - webhook: register or remove the Bot API webhook
//! - notify: send a test submission through the fan-out
//! - subscribers: subscriber statistics
//! - quote: calculator estimate
//! - config: configuration display and validation

pub mod config;
pub mod notify;
pub mod quote;
pub mod serve;
pub mod subscribers;
pub mod webhook;
