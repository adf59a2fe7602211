//! Control and all-chat rooms.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::common::error::BridgeResult;
use crate::common::types::RoomId;

use super::orchestrator::Bridge;
use super::topic_index::SpecialRoom;

/// Which room plays which special role.
#[derive(Debug, Clone)]
pub struct SpecialRoomRegistry {
    rooms: BTreeMap<SpecialRoom, RoomId>,
    all_chat_enabled: bool,
}

impl SpecialRoomRegistry {
    pub fn new(all_chat_enabled: bool) -> Self {
        Self {
            rooms: BTreeMap::new(),
            all_chat_enabled,
        }
    }

    /// Special rooms this process runs with.
    pub fn enabled_kinds(&self) -> Vec<SpecialRoom> {
        if self.all_chat_enabled {
            vec![SpecialRoom::Control, SpecialRoom::AllChat]
        } else {
            vec![SpecialRoom::Control]
        }
    }

    /// Remember a room found at startup. The first room recovered for a role wins.
    pub fn recover(&mut self, kind: SpecialRoom, room: RoomId) -> bool {
        if !self.enabled_kinds().contains(&kind) || self.rooms.contains_key(&kind) {
            return false;
        }
        self.rooms.insert(kind, room);
        true
    }

    /// Bind a role to a room, replacing any previous binding.
    pub fn install(&mut self, kind: SpecialRoom, room: RoomId) {
        self.rooms.insert(kind, room);
    }

    pub fn get(&self, kind: SpecialRoom) -> Option<&RoomId> {
        self.rooms.get(&kind)
    }

    pub fn role_of(&self, room: &RoomId) -> Option<SpecialRoom> {
        self.rooms
            .iter()
            .find(|(_, id)| *id == room)
            .map(|(kind, _)| *kind)
    }

    pub fn contains(&self, room: &RoomId) -> bool {
        self.role_of(room).is_some()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &RoomId> {
        self.rooms.values()
    }
}

impl Bridge {
    /// Reuse the recovered room for `kind` or create one, then (re)apply its
    /// topic and name.
    ///
    /// Messages from the room are dispatched by role from then on.
    pub(super) async fn ensure_special_room(&mut self, kind: SpecialRoom) -> BridgeResult<RoomId> {
        let settings = match kind {
            SpecialRoom::Control => &self.config.matrix.special_rooms.control,
            SpecialRoom::AllChat => &self.config.matrix.special_rooms.all_chat,
        };
        let (topic, name) = (settings.topic.clone(), settings.name.clone());

        let room = match self.state.special.get(kind) {
            Some(room) => {
                debug!(room = %room, "Recovering special room: {}", topic);
                room.clone()
            }
            None => self.rooms.create_room().await?,
        };

        self.rooms.set_topic(&room, &topic).await?;
        self.rooms.set_name(&room, &name).await?;
        self.state.special.install(kind, room.clone());

        info!(room = %room, "Set up special room with topic {}", topic);
        Ok(room)
    }

    /// Set up every enabled special room and invite the configured users once.
    pub(super) async fn setup_special_rooms(&mut self) -> BridgeResult<()> {
        for kind in self.state.special.enabled_kinds() {
            self.ensure_special_room(kind).await?;
        }

        let rooms: Vec<RoomId> = self.state.special.rooms().cloned().collect();
        for room in rooms {
            self.invite_missing(&room).await?;
        }
        Ok(())
    }
}
