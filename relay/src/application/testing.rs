use actix::prelude::*;
use metrics::LocalRecorderGuard;
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use relay_client::message::{Device, ServerMessage};

use super::state::{ConnectionId, Outbound, PeerHandle};

/// Stand-in connection that records everything pushed to it.
#[derive(Default)]
pub struct Collector {
    received: Vec<ServerMessage>,
}

impl Actor for Collector {
    type Context = Context<Self>;
}

impl Handler<Outbound> for Collector {
    type Result = ();

    fn handle(&mut self, msg: Outbound, _ctx: &mut Self::Context) {
        self.received.push(msg.0);
    }
}

/// Takes everything received so far.
#[derive(Message)]
#[rtype(result = "Vec<ServerMessage>")]
pub struct Drain;

impl Handler<Drain> for Collector {
    type Result = MessageResult<Drain>;

    fn handle(&mut self, _msg: Drain, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(std::mem::take(&mut self.received))
    }
}

impl Collector {
    pub fn spawn() -> (Addr<Self>, PeerHandle) {
        let addr = Collector::default().start();
        let handle = Self::handle_for(&addr, ConnectionId::new_v4());
        (addr, handle)
    }

    pub fn handle_for(addr: &Addr<Self>, connection: ConnectionId) -> PeerHandle {
        PeerHandle::new(connection, addr.clone().recipient())
    }
}

/// Handle whose connection actor no longer exists.
pub fn dead_handle() -> PeerHandle {
    let ctx = Context::<Collector>::new();
    let addr = ctx.address();
    drop(ctx);
    Collector::handle_for(&addr, ConnectionId::new_v4())
}

pub fn device_ids(devices: &[Device]) -> Vec<String> {
    devices.iter().map(|d| d.id.clone()).collect()
}

/// Captures counters emitted on the current thread while alive.
///
/// Actors started inside an `actix_web::test` share the test thread, so their
/// counters land here too.
pub struct Counters {
    snapshotter: Snapshotter,
    _guard: LocalRecorderGuard<'static>,
}

impl Counters {
    pub fn record() -> Self {
        let recorder: &'static DebuggingRecorder = Box::leak(Box::new(DebuggingRecorder::new()));
        let snapshotter = recorder.snapshotter();
        let _guard = metrics::set_default_local_recorder(recorder);
        Self {
            snapshotter,
            _guard,
        }
    }

    /// Sum of the counter `name` over all of its label sets.
    pub fn get(&self, name: &str) -> u64 {
        self.snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter(|(key, _, _, _)| key.key().name() == name)
            .map(|(_, _, _, value)| match value {
                DebugValue::Counter(n) => n,
                _ => 0,
            })
            .sum()
    }
}
