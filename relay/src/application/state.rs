use std::fmt;

use actix::prelude::*;
use relay_client::message::ServerMessage;

pub use relay_client::message::PeerId;

/// Relay-assigned key of one websocket connection.
pub type ConnectionId = uuid::Uuid;

/// A frame queued onto a connection's own outbound stream.
#[derive(Debug, Clone, Message)]
#[rtype(result = "()")]
pub struct Outbound(pub ServerMessage);

#[derive(Debug, thiserror::Error)]
#[error("Connection {0} is gone")]
pub struct ConnectionGone(pub ConnectionId);

/// The only way to push frames to one connection.
///
/// Delivery is an enqueue into the connection actor's mailbox, so it never
/// waits on the peer's socket.
pub struct PeerHandle {
    connection: ConnectionId,
    recipient: Recipient<Outbound>,
}

impl fmt::Debug for PeerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerHandle")
            .field("connection", &self.connection)
            .finish()
    }
}

impl PeerHandle {
    pub fn new(connection: ConnectionId, recipient: Recipient<Outbound>) -> Self {
        Self {
            connection,
            recipient,
        }
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// Queues `msg` without waiting for mailbox capacity.
    ///
    /// The connection's mailbox and its socket write buffer are unbounded.
    /// The heartbeat is what bounds them: a peer that stops reading never
    /// answers the pings, and its connection is closed once it has been
    /// silent for the client timeout.
    pub fn deliver(&self, msg: ServerMessage) -> Result<(), ConnectionGone> {
        if !self.recipient.connected() {
            return Err(ConnectionGone(self.connection));
        }
        self.recipient.do_send(Outbound(msg));
        Ok(())
    }
}
