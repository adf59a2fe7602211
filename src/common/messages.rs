//! Canonical event types for bridge communication.
//!
//! Both gateways translate their wire events into [`BridgeEvent`] and push
//! them into the single channel consumed by the bridge dispatch loop.

use crate::common::types::{MessageKind, PresenceKind, RoomId, RosterSource};

/// Content of a room message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomContent {
    /// Plain text body.
    Text(String),
    /// Any other message type (notice, emote, image...), by its type name.
    Other(String),
}

/// Message posted in a room on the room network.
#[derive(Debug, Clone)]
pub struct RoomMessage {
    pub room_id: RoomId,
    /// Sender's user id on the room network.
    pub sender: String,
    pub content: RoomContent,
}

/// One-to-one message from the contact network.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    /// Bare sender address (no resource).
    pub from: String,
    pub kind: MessageKind,
    pub body: String,
}

/// Message posted in a group chat on the contact network.
#[derive(Debug, Clone)]
pub struct GroupMessage {
    /// Bare group-chat address.
    pub room: String,
    /// Nickname of the occupant who spoke.
    pub nickname: String,
    pub body: String,
}

/// Presence notification from the contact network.
#[derive(Debug, Clone)]
pub struct PresenceUpdate {
    /// Bare sender address.
    pub from: String,
    pub kind: PresenceKind,
}

/// Event delivered to the bridge dispatch loop.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    RoomMessage(RoomMessage),
    ContactMessage(ContactMessage),
    GroupMessage(GroupMessage),
    Presence(PresenceUpdate),
    /// The roster was (re)loaded; carries every roster the account exposes.
    RosterUpdate(Vec<RosterSource>),
    /// The room gateway's event stream broke and cannot resume.
    ConnectivityLost(String),
}
