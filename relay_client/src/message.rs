use std::fmt;

use serde_json::Value;

/// Identifier a peer claims for itself when it registers.
pub type PeerId = String;

/// The three point-to-point signaling kinds the relay forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Offer,
    Answer,
    Candidate,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::Candidate => "candidate",
        };
        f.write_str(kind)
    }
}

/// Signal as sent by a peer, addressed to another peer.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Outgoing {
    pub to: PeerId,
    #[serde(alias = "offer", alias = "answer", alias = "candidate")]
    pub payload: Value,
}

/// Signal as delivered to its target, stamped with the sender's id.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Incoming {
    pub from: PeerId,
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Device {
    pub id: PeerId,
    #[serde(
        rename = "displayName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
}

/// Frames a peer sends to the relay.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    Register {
        id: PeerId,
        #[serde(
            rename = "displayName",
            alias = "name",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        display_name: Option<String>,
    },
    Disconnect {
        id: PeerId,
    },
    Offer(Outgoing),
    Answer(Outgoing),
    Candidate(Outgoing),
}

impl ClientMessage {
    pub fn signal(kind: SignalKind, to: impl Into<PeerId>, payload: Value) -> Self {
        let outgoing = Outgoing {
            to: to.into(),
            payload,
        };
        match kind {
            SignalKind::Offer => ClientMessage::Offer(outgoing),
            SignalKind::Answer => ClientMessage::Answer(outgoing),
            SignalKind::Candidate => ClientMessage::Candidate(outgoing),
        }
    }

    /// Splits a signaling frame into its kind and body; `None` for registration frames.
    pub fn into_signal(self) -> Option<(SignalKind, Outgoing)> {
        match self {
            ClientMessage::Offer(o) => Some((SignalKind::Offer, o)),
            ClientMessage::Answer(o) => Some((SignalKind::Answer, o)),
            ClientMessage::Candidate(o) => Some((SignalKind::Candidate, o)),
            ClientMessage::Register { .. } | ClientMessage::Disconnect { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    DuplicateId,
    AlreadyRegistered,
    NotRegistered,
    IdMismatch,
}

/// Frames the relay pushes to a peer.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    DeviceList { devices: Vec<Device> },
    Offer(Incoming),
    Answer(Incoming),
    Candidate(Incoming),
    Error { code: ErrorCode, message: String },
}

impl ServerMessage {
    pub fn signal(kind: SignalKind, from: impl Into<PeerId>, payload: Value) -> Self {
        let incoming = Incoming {
            from: from.into(),
            payload,
        };
        match kind {
            SignalKind::Offer => ServerMessage::Offer(incoming),
            SignalKind::Answer => ServerMessage::Answer(incoming),
            SignalKind::Candidate => ServerMessage::Candidate(incoming),
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            code,
            message: message.into(),
        }
    }

    pub fn as_signal(&self) -> Option<(SignalKind, &Incoming)> {
        match self {
            ServerMessage::Offer(i) => Some((SignalKind::Offer, i)),
            ServerMessage::Answer(i) => Some((SignalKind::Answer, i)),
            ServerMessage::Candidate(i) => Some((SignalKind::Candidate, i)),
            _ => None,
        }
    }
}
