use anyhow::Result;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize Prometheus metrics exporter
///
/// Fails if a global recorder is already installed.
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "relay_notifications_total",
        "Form submissions relayed, by form type and outcome"
    );
    describe_counter!(
        "relay_deliveries_total",
        "Individual sendMessage calls, by outcome"
    );
    describe_counter!(
        "relay_bot_commands_total",
        "Bot commands received through the webhook"
    );
    describe_gauge!("relay_subscribers", "Subscribers in the store after the last mutation");
    describe_gauge!("relay_info", "Relay version information");

    gauge!("relay_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record one relayed submission
pub fn record_notification(form_type: &'static str, delivered: bool) {
    counter!(
        "relay_notifications_total",
        "form_type" => form_type,
        "outcome" => if delivered { "delivered" } else { "failed" },
    )
    .increment(1);
}

/// Record one outbound message
pub fn record_delivery(success: bool) {
    counter!(
        "relay_deliveries_total",
        "outcome" => if success { "success" } else { "failure" },
    )
    .increment(1);
}

pub fn record_bot_command(command: &'static str) {
    counter!("relay_bot_commands_total", "command" => command).increment(1);
}

pub fn set_subscriber_count(count: usize) {
    gauge!("relay_subscribers").set(count as f64);
}
