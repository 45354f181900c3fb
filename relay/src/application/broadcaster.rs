use relay_client::message::{Device, ServerMessage};
use tracing::{debug, warn};

use super::{metrics::counters, state::PeerHandle};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Pushes one `deviceList` frame carrying `devices` to every handle.
///
/// A handle whose connection is already gone is counted and skipped.
pub fn publish<'a>(
    devices: Vec<Device>,
    handles: impl IntoIterator<Item = &'a PeerHandle>,
) -> PublishReport {
    let roster = ServerMessage::DeviceList { devices };
    let mut report = PublishReport::default();
    for handle in handles {
        match handle.deliver(roster.clone()) {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                counters::roster_send_failures();
                warn!("Roster not delivered: {e}");
                report.failed += 1;
            }
        }
    }
    counters::rosters_published();
    debug!(
        delivered = report.delivered,
        failed = report.failed,
        "Roster published"
    );
    report
}
