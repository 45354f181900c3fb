use actix::prelude::*;
use relay_client::message::{ServerMessage, SignalKind};
use serde_json::Value;
use tracing::{debug, warn};

use super::{metrics::counters, registry::Registry, state::PeerId};

/// Point-to-point signal from a registered peer to another.
#[derive(Debug, Message)]
#[rtype(result = "RouteOutcome")]
pub struct Route {
    pub from: PeerId,
    pub kind: SignalKind,
    pub to: PeerId,
    pub payload: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, MessageResponse)]
pub enum RouteOutcome {
    Delivered,
    /// No peer holds the target id; the signal was dropped.
    TargetNotFound,
    /// The target's connection closed before it was removed; dropped.
    TargetGone,
}

impl Registry {
    /// Forwards `payload` untouched, adding only the sender's id.
    pub fn route(&self, route: Route) -> RouteOutcome {
        let Route {
            from,
            kind,
            to,
            payload,
        } = route;
        let handle = match self.lookup(&to) {
            Ok(handle) => handle,
            Err(e) => {
                counters::route_targets_missing("not_found");
                debug!(%from, %kind, "Signal dropped: {e}");
                return RouteOutcome::TargetNotFound;
            }
        };
        match handle.deliver(ServerMessage::signal(kind, from.clone(), payload)) {
            Ok(()) => {
                counters::signals_routed();
                debug!(%from, %to, %kind, "Signal routed");
                RouteOutcome::Delivered
            }
            Err(e) => {
                counters::route_targets_missing("gone");
                warn!(%from, %to, %kind, "Signal dropped: {e}");
                RouteOutcome::TargetGone
            }
        }
    }
}

impl Handler<Route> for Registry {
    type Result = RouteOutcome;

    fn handle(&mut self, msg: Route, _ctx: &mut Self::Context) -> Self::Result {
        self.route(msg)
    }
}
