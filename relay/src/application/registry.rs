use std::collections::{BTreeMap, HashMap};

use actix::prelude::*;
use relay_client::message::Device;
use tracing::{debug, info, warn};

use super::{
    broadcaster,
    metrics::counters,
    state::{ConnectionId, PeerHandle, PeerId},
};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Peer id {0:?} is already registered")]
    DuplicateId(PeerId),

    #[error("Connection {0} already registered a peer id")]
    ConnectionAlreadyRegistered(ConnectionId),

    #[error("No peer registered as {0:?}")]
    NotFound(PeerId),
}

/// Adds a peer. Fails with [`Error::DuplicateId`] if the id is taken.
#[derive(Message)]
#[rtype(result = "Result<(), Error>")]
pub struct Register {
    pub id: PeerId,
    pub display_name: Option<String>,
    pub handle: PeerHandle,
}

/// Removes a peer by id; absent ids are ignored.
#[derive(Message)]
#[rtype(result = "bool")]
pub struct Deregister {
    pub id: PeerId,
}

/// Removes whichever peer the closing connection registered, if any.
#[derive(Message)]
#[rtype(result = "Option<PeerId>")]
pub struct DeregisterConnection {
    pub connection: ConnectionId,
}

#[derive(Message)]
#[rtype(result = "Vec<Device>")]
pub struct Snapshot;

/// Resolves a peer id to the connection currently holding it.
#[derive(Message)]
#[rtype(result = "Result<ConnectionId, Error>")]
pub struct Lookup {
    pub id: PeerId,
}

#[derive(Debug)]
struct Peer {
    seq: u64,
    display_name: Option<String>,
    handle: PeerHandle,
}

/// Single owner of all peer state. Every read and write goes through the
/// actor mailbox, one message at a time.
#[derive(Debug, Default)]
pub struct Registry {
    peers: HashMap<PeerId, Peer>,
    order: BTreeMap<u64, PeerId>,
    by_connection: HashMap<ConnectionId, PeerId>,
    next_seq: u64,
}

impl Actor for Registry {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        debug!("Registry started");
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        id: PeerId,
        display_name: Option<String>,
        handle: PeerHandle,
    ) -> Result<(), Error> {
        if self.peers.contains_key(&id) {
            counters::duplicate_ids_rejected();
            warn!(peer = %id, connection = %handle.connection(), "Duplicate peer id rejected");
            return Err(Error::DuplicateId(id));
        }
        let connection = handle.connection();
        if self.by_connection.contains_key(&connection) {
            return Err(Error::ConnectionAlreadyRegistered(connection));
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, id.clone());
        self.by_connection.insert(connection, id.clone());
        self.peers.insert(
            id.clone(),
            Peer {
                seq,
                display_name,
                handle,
            },
        );
        counters::registrations();
        info!(peer = %id, %connection, "Peer registered");
        Ok(())
    }

    /// Returns the connection that held `id`, if it was registered.
    pub fn remove(&mut self, id: &str) -> Option<ConnectionId> {
        let peer = self.peers.remove(id)?;
        self.order.remove(&peer.seq);
        let connection = peer.handle.connection();
        self.by_connection.remove(&connection);
        info!(peer = %id, %connection, "Peer removed");
        Some(connection)
    }

    pub fn remove_by_connection(&mut self, connection: ConnectionId) -> Option<PeerId> {
        let id = self.by_connection.get(&connection)?.clone();
        self.remove(&id);
        Some(id)
    }

    /// Registered peers in registration order.
    pub fn snapshot(&self) -> Vec<Device> {
        self.order
            .values()
            .filter_map(|id| {
                self.peers.get(id).map(|peer| Device {
                    id: id.clone(),
                    display_name: peer.display_name.clone(),
                })
            })
            .collect()
    }

    pub fn lookup(&self, id: &str) -> Result<&PeerHandle, Error> {
        self.peers
            .get(id)
            .map(|peer| &peer.handle)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn publish_roster(&self) {
        let devices = self.snapshot();
        let handles = self
            .order
            .values()
            .filter_map(|id| self.peers.get(id))
            .map(|peer| &peer.handle);
        broadcaster::publish(devices, handles);
    }
}

impl Handler<Register> for Registry {
    type Result = Result<(), Error>;

    fn handle(&mut self, msg: Register, _ctx: &mut Self::Context) -> Self::Result {
        self.add(msg.id, msg.display_name, msg.handle)?;
        self.publish_roster();
        Ok(())
    }
}

impl Handler<Deregister> for Registry {
    type Result = bool;

    fn handle(&mut self, msg: Deregister, _ctx: &mut Self::Context) -> Self::Result {
        if self.remove(&msg.id).is_none() {
            debug!(peer = %msg.id, "Deregister of unknown peer ignored");
            return false;
        }
        self.publish_roster();
        true
    }
}

impl Handler<DeregisterConnection> for Registry {
    type Result = MessageResult<DeregisterConnection>;

    fn handle(&mut self, msg: DeregisterConnection, _ctx: &mut Self::Context) -> Self::Result {
        let removed = self.remove_by_connection(msg.connection);
        if removed.is_some() {
            self.publish_roster();
        }
        MessageResult(removed)
    }
}

impl Handler<Snapshot> for Registry {
    type Result = MessageResult<Snapshot>;

    fn handle(&mut self, _msg: Snapshot, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.snapshot())
    }
}

impl Handler<Lookup> for Registry {
    type Result = Result<ConnectionId, Error>;

    fn handle(&mut self, msg: Lookup, _ctx: &mut Self::Context) -> Self::Result {
        self.lookup(&msg.id).map(PeerHandle::connection)
    }
}
