use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web_actors::ws;
use relay_client::message::{ClientMessage, ErrorCode, Outgoing, ServerMessage, SignalKind};
use tracing::{debug, error, info, warn};

pub use ws::start;

use super::{
    metrics::counters,
    registry::{self, Deregister, DeregisterConnection, Register, Registry},
    router::Route,
    state::{ConnectionId, Outbound, PeerHandle, PeerId},
};

/// How often heartbeat pings are sent
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// How long before lack of client response causes a timeout
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Supervises one peer connection from upgrade to close.
#[derive(Debug)]
pub struct WsClient {
    connection: ConnectionId,
    state: ConnectionState,
    peer_id: Option<PeerId>,
    heartbeat: Instant,
    registry: Addr<Registry>,
}

impl WsClient {
    pub fn new(registry: Addr<Registry>) -> Self {
        Self {
            connection: ConnectionId::new_v4(),
            state: ConnectionState::Connecting,
            peer_id: None,
            heartbeat: Instant::now(),
            registry,
        }
    }

    /// helper method that sends ping to client every 5 seconds (HEARTBEAT_INTERVAL).
    ///
    /// also this method checks heartbeats from client
    fn heartbeat(&self, ctx: &mut <Self as Actor>::Context) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.heartbeat) > CLIENT_TIMEOUT {
                warn!(connection = %act.connection, "Heartbeat failed, disconnecting");
                ctx.stop();
                return;
            }

            ctx.ping(b"");
        });
    }

    fn send(&self, msg: &ServerMessage, ctx: &mut <Self as Actor>::Context) {
        match serde_json::to_string(msg) {
            Ok(text) => ctx.text(text),
            Err(e) => error!(connection = %self.connection, "Could not encode frame: {e}"),
        }
    }

    fn reject(&self, code: ErrorCode, message: String, ctx: &mut <Self as Actor>::Context) {
        debug!(connection = %self.connection, ?code, "{message}");
        self.send(&ServerMessage::error(code, message), ctx);
    }

    fn dispatch(&mut self, msg: ClientMessage, ctx: &mut <Self as Actor>::Context) {
        match msg {
            ClientMessage::Register { id, display_name } => self.register(id, display_name, ctx),
            ClientMessage::Disconnect { id } => self.disconnect(id, ctx),
            signal => {
                if let Some((kind, outgoing)) = signal.into_signal() {
                    self.signal(kind, outgoing, ctx);
                }
            }
        }
    }

    fn register(
        &mut self,
        id: PeerId,
        display_name: Option<String>,
        ctx: &mut <Self as Actor>::Context,
    ) {
        if let Some(current) = &self.peer_id {
            let message = format!("connection is already registered as {current:?}");
            self.reject(ErrorCode::AlreadyRegistered, message, ctx);
            return;
        }

        let handle = PeerHandle::new(self.connection, ctx.address().recipient());
        // Block this connection's stream until the registry answers so that
        // frames sent right after `register` see the new identity.
        self.registry
            .send(Register {
                id: id.clone(),
                display_name,
                handle,
            })
            .into_actor(self)
            .then(move |res, act, ctx| {
                match res {
                    Ok(Ok(())) => act.peer_id = Some(id),
                    Ok(Err(registry::Error::DuplicateId(id))) => {
                        let message = format!("peer id {id:?} is already in use");
                        act.reject(ErrorCode::DuplicateId, message, ctx);
                    }
                    Ok(Err(e)) => act.reject(ErrorCode::AlreadyRegistered, e.to_string(), ctx),
                    Err(e) => {
                        error!(connection = %act.connection, "Registry unavailable: {e}");
                        ctx.stop();
                    }
                }
                fut::ready(())
            })
            .wait(ctx);
    }

    fn disconnect(&mut self, id: PeerId, ctx: &mut <Self as Actor>::Context) {
        match self.peer_id.take() {
            Some(own) if own == id => {
                info!(connection = %self.connection, peer = %id, "Peer disconnected");
                self.registry.do_send(Deregister { id });
                ctx.close(Some(ws::CloseCode::Normal.into()));
                ctx.stop();
            }
            Some(own) => {
                let message = format!("cannot disconnect {id:?}, connection is {own:?}");
                self.peer_id = Some(own);
                self.reject(ErrorCode::IdMismatch, message, ctx);
            }
            None => {
                let message = "disconnect before register".to_string();
                self.reject(ErrorCode::NotRegistered, message, ctx);
            }
        }
    }

    fn signal(&mut self, kind: SignalKind, outgoing: Outgoing, ctx: &mut <Self as Actor>::Context) {
        let Some(from) = self.peer_id.clone() else {
            let message = format!("{kind} before register");
            self.reject(ErrorCode::NotRegistered, message, ctx);
            return;
        };
        self.registry.do_send(Route {
            from,
            kind,
            to: outgoing.to,
            payload: outgoing.payload,
        });
    }

    fn malformed(&self, frame: &'static str, reason: &str) {
        counters::malformed_messages(frame);
        warn!(connection = %self.connection, "Dropping malformed message: {reason}");
    }

    /// Releases this connection's registry entry; runs once per connection.
    fn cleanup(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }
        self.state = ConnectionState::Closed;
        counters::connections_closed();
        self.registry.do_send(DeregisterConnection {
            connection: self.connection,
        });
        info!(connection = %self.connection, peer = ?self.peer_id, "Connection closed");
    }
}

impl Handler<Outbound> for WsClient {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) -> Self::Result {
        self.send(&msg.0, ctx);
    }
}

impl Actor for WsClient {
    type Context = ws::WebsocketContext<Self>;

    /// Method is called on actor start. We start the heartbeat process here.
    fn started(&mut self, ctx: &mut Self::Context) {
        self.state = ConnectionState::Open;
        counters::connections_opened();
        info!(connection = %self.connection, "Connection opened");
        self.heartbeat(ctx);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.cleanup();
        Running::Stop
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        self.cleanup();
    }
}

/// Handler for ws::Message message
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsClient {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                warn!(connection = %self.connection, "Transport error: {e}");
                ctx.stop();
                return;
            }
        };
        self.heartbeat = Instant::now();
        match msg {
            ws::Message::Ping(msg) => ctx.pong(&msg),
            ws::Message::Pong(_) => {}
            ws::Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => self.dispatch(msg, ctx),
                Err(e) => self.malformed("text", &e.to_string()),
            },
            ws::Message::Binary(_) => self.malformed("binary", "binary frame"),
            ws::Message::Close(reason) => {
                debug!(connection = %self.connection, ?reason, "Peer closed the connection");
                ctx.close(reason);
                ctx.stop();
            }
            ws::Message::Continuation(_) => self.malformed("continuation", "fragmented frame"),
            ws::Message::Nop => {}
        }
    }

    fn finished(&mut self, ctx: &mut Self::Context) {
        debug!(connection = %self.connection, "Transport stream ended");
        ctx.stop();
    }
}
