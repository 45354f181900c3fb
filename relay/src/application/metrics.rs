use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROMETHEUS: OnceCell<PrometheusHandle> = OnceCell::new();

/// Installs the process-wide Prometheus recorder on first call and hands out
/// its render handle.
///
/// # Errors
///
/// Returns an error if another recorder was already installed globally.
pub fn install() -> Result<PrometheusHandle, BuildError> {
    PROMETHEUS
        .get_or_try_init(|| {
            let handle = PrometheusBuilder::new().install_recorder()?;
            describe();
            Ok(handle)
        })
        .cloned()
}

fn describe() {
    use metrics::describe_counter;

    describe_counter!(
        "relay_connections_opened_total",
        "Websocket connections accepted"
    );
    describe_counter!(
        "relay_connections_closed_total",
        "Websocket connections cleaned up"
    );
    describe_counter!("relay_registrations_total", "Peer ids registered");
    describe_counter!(
        "relay_duplicate_ids_rejected_total",
        "Registrations refused because the id was taken"
    );
    describe_counter!("relay_signals_routed_total", "Signals handed to their target");
    describe_counter!(
        "relay_route_targets_missing_total",
        "Signals dropped because the target was absent or gone"
    );
    describe_counter!(
        "relay_malformed_messages_total",
        "Inbound frames dropped as unusable"
    );
    describe_counter!("relay_rosters_published_total", "Roster broadcasts");
    describe_counter!(
        "relay_roster_send_failures_total",
        "Roster frames that could not be queued to a peer"
    );
}

/// Event counters.
pub mod counters {
    pub fn connections_opened() {
        metrics::counter!("relay_connections_opened_total").increment(1);
    }

    pub fn connections_closed() {
        metrics::counter!("relay_connections_closed_total").increment(1);
    }

    pub fn registrations() {
        metrics::counter!("relay_registrations_total").increment(1);
    }

    pub fn duplicate_ids_rejected() {
        metrics::counter!("relay_duplicate_ids_rejected_total").increment(1);
    }

    pub fn signals_routed() {
        metrics::counter!("relay_signals_routed_total").increment(1);
    }

    /// Record a dropped signal; `reason` is `not_found` or `gone`.
    pub fn route_targets_missing(reason: &'static str) {
        metrics::counter!("relay_route_targets_missing_total", "reason" => reason).increment(1);
    }

    /// Record a dropped inbound frame with the websocket frame kind as label.
    pub fn malformed_messages(frame: &'static str) {
        metrics::counter!("relay_malformed_messages_total", "frame" => frame).increment(1);
    }

    pub fn rosters_published() {
        metrics::counter!("relay_rosters_published_total").increment(1);
    }

    pub fn roster_send_failures() {
        metrics::counter!("relay_roster_send_failures_total").increment(1);
    }
}
