//! Capability interfaces over the two chat networks.
//!
//! The bridge core never speaks either wire protocol. It calls into a
//! [`RoomGateway`] and a [`ContactGateway`], and receives their inbound
//! traffic as [`BridgeEvent`](crate::common::BridgeEvent)s on the event
//! channel handed to the [`Connector`](crate::supervisor::Connector).
//! Implementations validate wire payloads before turning them into events.

#[cfg(test)]
pub(crate) mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::common::error::{ContactResult, RoomResult};
use crate::common::types::{MessageKind, PresenceType, RoomId, RoomInfo, RoomMember};

/// Room-oriented network (Matrix-like): persistent rooms with a topic and a name.
#[async_trait]
pub trait RoomGateway: Send + Sync {
    /// Every room the bridge account is currently joined to.
    async fn list_rooms(&self) -> RoomResult<Vec<RoomInfo>>;

    /// Create an empty room owned by the bridge account.
    async fn create_room(&self) -> RoomResult<RoomId>;

    async fn set_topic(&self, room: &RoomId, topic: &str) -> RoomResult<()>;

    async fn set_name(&self, room: &RoomId, name: &str) -> RoomResult<()>;

    /// Current name of the room, fetched from the server.
    async fn room_name(&self, room: &RoomId) -> RoomResult<Option<String>>;

    /// Joined and invited members of the room.
    async fn members(&self, room: &RoomId) -> RoomResult<Vec<RoomMember>>;

    async fn send_text(&self, room: &RoomId, body: &str) -> RoomResult<()>;

    async fn send_notice(&self, room: &RoomId, body: &str) -> RoomResult<()>;

    async fn invite(&self, room: &RoomId, user_id: &str) -> RoomResult<()>;

    async fn leave(&self, room: &RoomId) -> RoomResult<()>;
}

/// Roster-based network (XMPP-like): contacts, presence and group chats.
#[async_trait]
pub trait ContactGateway: Send + Sync {
    /// Open the stream and start delivering events.
    async fn connect(&self) -> ContactResult<()>;

    /// Broadcast own presence (`to == None`) or send a directed presence.
    async fn send_presence(&self, to: Option<&str>, kind: Option<PresenceType>)
        -> ContactResult<()>;

    /// Ask the server for the roster; the answer arrives as a roster update event.
    async fn request_roster(&self) -> ContactResult<()>;

    async fn send_message(&self, to: &str, body: &str, kind: MessageKind) -> ContactResult<()>;

    async fn join_group_chat(&self, address: &str, nickname: &str) -> ContactResult<()>;

    async fn leave_group_chat(&self, address: &str, nickname: Option<&str>) -> ContactResult<()>;
}

/// The pair of gateways one bridge instance runs on.
#[derive(Clone)]
pub struct Gateways {
    pub rooms: Arc<dyn RoomGateway>,
    pub contacts: Arc<dyn ContactGateway>,
}

impl Gateways {
    pub fn new(rooms: Arc<dyn RoomGateway>, contacts: Arc<dyn ContactGateway>) -> Self {
        Self { rooms, contacts }
    }
}
