pub mod bot;
pub mod calculator;
pub mod config;
pub mod error;
pub mod form;
pub mod format;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod notifier;
pub mod server;
pub mod signals;
pub mod store;
pub mod telegram;

pub use logging::init_tracing;
