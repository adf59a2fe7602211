//! In-memory gateways that record every outbound call.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::bridge::Bridge;
use crate::common::error::{ContactError, ContactResult, RoomError, RoomResult};
use crate::common::types::{
    Membership, MessageKind, PresenceType, RoomId, RoomInfo, RoomMember,
};
use crate::config::Config;
use crate::gateway::{ContactGateway, Gateways, RoomGateway};

/// Something the bridge posted into a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Sent {
    Text(String),
    Notice(String),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryRoom {
    pub topic: Option<String>,
    pub name: Option<String>,
    pub members: BTreeMap<String, Membership>,
    pub sent: Vec<Sent>,
}

impl MemoryRoom {
    pub fn joined_count(&self) -> usize {
        self.members
            .values()
            .filter(|m| **m == Membership::Joined)
            .count()
    }
}

#[derive(Default)]
struct RoomWorld {
    next_id: u32,
    rooms: BTreeMap<RoomId, MemoryRoom>,
    created: usize,
    invites: Vec<(RoomId, String)>,
    left: Vec<RoomId>,
    failure: Option<RoomError>,
    unreadable: BTreeSet<RoomId>,
}

/// Room network stand-in. Left rooms disappear from `list_rooms`.
pub(crate) struct MemoryRoomGateway {
    bot_id: String,
    world: Mutex<RoomWorld>,
}

impl MemoryRoomGateway {
    pub fn new(bot_id: &str) -> Self {
        Self {
            bot_id: bot_id.to_string(),
            world: Mutex::new(RoomWorld::default()),
        }
    }

    /// Seed a room the bridge already sits in, joined by `others` as well.
    pub fn add_room(&self, topic: Option<&str>, name: Option<&str>, others: &[&str]) -> RoomId {
        let mut world = self.world.lock().unwrap();
        let id = next_room_id(&mut world);
        let mut room = MemoryRoom {
            topic: topic.map(str::to_string),
            name: name.map(str::to_string),
            ..MemoryRoom::default()
        };
        room.members.insert(self.bot_id.clone(), Membership::Joined);
        for user in others {
            room.members.insert(user.to_string(), Membership::Joined);
        }
        world.rooms.insert(id.clone(), room);
        id
    }

    pub fn room(&self, id: &RoomId) -> Option<MemoryRoom> {
        self.world.lock().unwrap().rooms.get(id).cloned()
    }

    pub fn rooms_with_topic(&self, topic: &str) -> Vec<RoomId> {
        self.world
            .lock()
            .unwrap()
            .rooms
            .iter()
            .filter(|(_, room)| room.topic.as_deref() == Some(topic))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn room_count(&self) -> usize {
        self.world.lock().unwrap().rooms.len()
    }

    pub fn created_count(&self) -> usize {
        self.world.lock().unwrap().created
    }

    pub fn invites(&self) -> Vec<(RoomId, String)> {
        self.world.lock().unwrap().invites.clone()
    }

    pub fn left(&self) -> Vec<RoomId> {
        self.world.lock().unwrap().left.clone()
    }

    pub fn sent(&self, id: &RoomId) -> Vec<Sent> {
        self.room(id).map(|room| room.sent).unwrap_or_default()
    }

    /// Rename a room behind the bridge's back.
    pub fn rename(&self, id: &RoomId, name: &str) {
        if let Some(room) = self.world.lock().unwrap().rooms.get_mut(id) {
            room.name = Some(name.to_string());
        }
    }

    /// Make every following call fail with `failure` (or succeed again with `None`).
    pub fn set_failure(&self, failure: Option<RoomError>) {
        self.world.lock().unwrap().failure = failure;
    }

    /// Make member listing of one room fail with a request error.
    pub fn hide_members(&self, id: &RoomId) {
        self.world.lock().unwrap().unreadable.insert(id.clone());
    }

    fn with_room<T>(
        &self,
        id: &RoomId,
        f: impl FnOnce(&mut MemoryRoom) -> T,
    ) -> RoomResult<T> {
        let mut world = self.world.lock().unwrap();
        if let Some(failure) = world.failure.clone() {
            return Err(failure);
        }
        world
            .rooms
            .get_mut(id)
            .map(f)
            .ok_or_else(|| RoomError::Request {
                message: format!("M_NOT_FOUND: {}", id),
            })
    }

    fn check(&self) -> RoomResult<()> {
        match self.world.lock().unwrap().failure.clone() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

fn next_room_id(world: &mut RoomWorld) -> RoomId {
    world.next_id += 1;
    RoomId::new(format!("!room{:03}:example.org", world.next_id))
}

#[async_trait]
impl RoomGateway for MemoryRoomGateway {
    async fn list_rooms(&self) -> RoomResult<Vec<RoomInfo>> {
        self.check()?;
        Ok(self
            .world
            .lock()
            .unwrap()
            .rooms
            .iter()
            .map(|(id, room)| RoomInfo {
                id: id.clone(),
                topic: room.topic.clone(),
                name: room.name.clone(),
            })
            .collect())
    }

    async fn create_room(&self) -> RoomResult<RoomId> {
        self.check()?;
        let mut world = self.world.lock().unwrap();
        let id = next_room_id(&mut world);
        let mut room = MemoryRoom::default();
        room.members.insert(self.bot_id.clone(), Membership::Joined);
        world.rooms.insert(id.clone(), room);
        world.created += 1;
        Ok(id)
    }

    async fn set_topic(&self, room: &RoomId, topic: &str) -> RoomResult<()> {
        self.with_room(room, |r| r.topic = Some(topic.to_string()))
    }

    async fn set_name(&self, room: &RoomId, name: &str) -> RoomResult<()> {
        self.with_room(room, |r| r.name = Some(name.to_string()))
    }

    async fn room_name(&self, room: &RoomId) -> RoomResult<Option<String>> {
        self.with_room(room, |r| r.name.clone())
    }

    async fn members(&self, room: &RoomId) -> RoomResult<Vec<RoomMember>> {
        if self.world.lock().unwrap().unreadable.contains(room) {
            return Err(RoomError::Request {
                message: format!("M_FORBIDDEN: {}", room),
            });
        }
        self.with_room(room, |r| {
            r.members
                .iter()
                .map(|(user_id, membership)| RoomMember {
                    user_id: user_id.clone(),
                    membership: *membership,
                })
                .collect()
        })
    }

    async fn send_text(&self, room: &RoomId, body: &str) -> RoomResult<()> {
        self.with_room(room, |r| r.sent.push(Sent::Text(body.to_string())))
    }

    async fn send_notice(&self, room: &RoomId, body: &str) -> RoomResult<()> {
        self.with_room(room, |r| r.sent.push(Sent::Notice(body.to_string())))
    }

    async fn invite(&self, room: &RoomId, user_id: &str) -> RoomResult<()> {
        self.with_room(room, |r| {
            r.members
                .entry(user_id.to_string())
                .or_insert(Membership::Invited);
        })?;
        self.world
            .lock()
            .unwrap()
            .invites
            .push((room.clone(), user_id.to_string()));
        Ok(())
    }

    async fn leave(&self, room: &RoomId) -> RoomResult<()> {
        self.check()?;
        let mut world = self.world.lock().unwrap();
        if world.rooms.remove(room).is_none() {
            return Err(RoomError::Request {
                message: format!("M_NOT_FOUND: {}", room),
            });
        }
        world.left.push(room.clone());
        Ok(())
    }
}

/// One outbound call made on the contact network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ContactCall {
    Connect,
    Presence {
        to: Option<String>,
        kind: Option<PresenceType>,
    },
    RosterRequest,
    Message {
        to: String,
        body: String,
        kind: MessageKind,
    },
    Join {
        address: String,
        nickname: String,
    },
    Leave {
        address: String,
        nickname: Option<String>,
    },
}

/// Contact network stand-in.
#[derive(Default)]
pub(crate) struct MemoryContactGateway {
    calls: Mutex<Vec<ContactCall>>,
    failure: Mutex<Option<ContactError>>,
}

impl MemoryContactGateway {
    pub fn calls(&self) -> Vec<ContactCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn set_failure(&self, failure: Option<ContactError>) {
        *self.failure.lock().unwrap() = failure;
    }

    fn record(&self, call: ContactCall) -> ContactResult<()> {
        if let Some(failure) = self.failure.lock().unwrap().clone() {
            return Err(failure);
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl ContactGateway for MemoryContactGateway {
    async fn connect(&self) -> ContactResult<()> {
        self.record(ContactCall::Connect)
    }

    async fn send_presence(
        &self,
        to: Option<&str>,
        kind: Option<PresenceType>,
    ) -> ContactResult<()> {
        self.record(ContactCall::Presence {
            to: to.map(str::to_string),
            kind,
        })
    }

    async fn request_roster(&self) -> ContactResult<()> {
        self.record(ContactCall::RosterRequest)
    }

    async fn send_message(&self, to: &str, body: &str, kind: MessageKind) -> ContactResult<()> {
        self.record(ContactCall::Message {
            to: to.to_string(),
            body: body.to_string(),
            kind,
        })
    }

    async fn join_group_chat(&self, address: &str, nickname: &str) -> ContactResult<()> {
        self.record(ContactCall::Join {
            address: address.to_string(),
            nickname: nickname.to_string(),
        })
    }

    async fn leave_group_chat(&self, address: &str, nickname: Option<&str>) -> ContactResult<()> {
        self.record(ContactCall::Leave {
            address: address.to_string(),
            nickname: nickname.map(str::to_string),
        })
    }
}

/// A bridge wired to fresh in-memory gateways.
pub(crate) struct Harness {
    pub bridge: Bridge,
    pub rooms: Arc<MemoryRoomGateway>,
    pub contacts: Arc<MemoryContactGateway>,
}

impl Harness {
    pub fn new(config: &Config) -> Self {
        Self::with_rooms(config, Arc::new(MemoryRoomGateway::new(config.bot_id())))
    }

    /// Use a pre-seeded room gateway.
    pub fn with_rooms(config: &Config, rooms: Arc<MemoryRoomGateway>) -> Self {
        let contacts = Arc::new(MemoryContactGateway::default());
        let gateways = Gateways::new(rooms.clone(), contacts.clone());
        Self {
            bridge: Bridge::new(config, gateways),
            rooms,
            contacts,
        }
    }

    /// Build, initialize and forget the setup calls made on the contact side.
    pub async fn initialized(config: &Config, rooms: Arc<MemoryRoomGateway>) -> Self {
        let mut harness = Self::with_rooms(config, rooms);
        harness
            .bridge
            .initialize()
            .await
            .expect("initialization should succeed");
        harness.contacts.clear();
        harness
    }
}
