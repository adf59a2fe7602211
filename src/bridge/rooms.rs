//! Mapped room lifecycle: creation, re-classification and invitations.

use tracing::{debug, info};

use crate::common::error::BridgeResult;
use crate::common::types::{RoomId, RoomInfo};

use super::orchestrator::Bridge;
use super::topic_index::{MappedAddress, RoomClass};

impl Bridge {
    /// Get or create the room mapped to `address`.
    ///
    /// Returns `None` when a group chat is referenced as a direct contact:
    /// group chats must always be mapped with their flag.
    pub async fn create_mapped_room(
        &mut self,
        address: &MappedAddress,
        name: Option<&str>,
    ) -> BridgeResult<Option<RoomId>> {
        let topic = address.topic(self.classifier.flag());

        if let MappedAddress::Direct(bare) = address {
            if self.state.is_group_chat(bare) {
                debug!("Topic {} is a groupchat without its flag, ignoring", topic);
                return Ok(None);
            }
        }

        // A room without a name shows up under the bridge's name in most clients.
        let expected_name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => topic.clone(),
        };

        if let Some(room) = self.state.index.lookup(address).cloned() {
            debug!(room = %room, "Room with topic {} already exists", topic);
            if self.config.matrix.restore_room_topic {
                let current = self.rooms.room_name(&room).await?;
                if current.as_deref() != Some(expected_name.as_str()) {
                    info!(room = %room, "Restoring name of {} to {}", topic, expected_name);
                    self.rooms.set_name(&room, &expected_name).await?;
                }
            }
            return Ok(Some(room));
        }

        let room = self.rooms.create_room().await?;
        self.rooms.set_topic(&room, &topic).await?;
        self.state.index.register(address.clone(), room.clone());
        info!(room = %room, "Created mapped room with topic {}", topic);
        self.rooms.set_name(&room, &expected_name).await?;

        Ok(Some(room))
    }

    /// Rooms that are neither special nor in the index.
    pub(super) async fn unmapped_rooms(&self) -> BridgeResult<Vec<RoomInfo>> {
        let rooms = self.rooms.list_rooms().await?;
        Ok(rooms
            .into_iter()
            .filter(|room| {
                !self.state.special.contains(&room.id) && !self.state.index.contains_room(&room.id)
            })
            .collect())
    }

    /// Classify every unmapped room again and index the ones whose topic now
    /// names an address. Returns how many rooms were indexed.
    pub(super) async fn map_rooms_by_topic(&mut self) -> BridgeResult<usize> {
        let mut mapped = 0;

        for room in self.unmapped_rooms().await? {
            debug!(
                room = %room.id,
                "Unmapped room ({}) [{}]",
                room.name.as_deref().unwrap_or(""),
                room.topic.as_deref().unwrap_or("")
            );

            match self.classifier.classify(room.topic.as_deref()) {
                RoomClass::Mapped(address) => {
                    let bound = self.state.index.register(address.clone(), room.id.clone());
                    if bound == room.id {
                        mapped += 1;
                    } else {
                        debug!(
                            room = %room.id,
                            "Address {} is already mapped to {}, leaving it as-is",
                            address.address(),
                            bound
                        );
                    }
                }
                _ => debug!(room = %room.id, "Leaving it as-is (topic names no address)"),
            }
        }

        Ok(mapped)
    }

    /// Invite every configured user who is neither joined nor already invited.
    ///
    /// Returns the number of invitations sent.
    pub(super) async fn invite_missing(&self, room: &RoomId) -> BridgeResult<usize> {
        let members = self.rooms.members(room).await?;
        let mut sent = 0;

        for user_id in &self.config.matrix.users_to_invite {
            if members.iter().any(|m| &m.user_id == user_id) {
                continue;
            }
            self.rooms.invite(room, user_id).await?;
            sent += 1;
        }

        Ok(sent)
    }

    /// Drop all bridge knowledge of a room the bridge has left.
    pub(super) fn forget_room(&mut self, room: &RoomId) {
        if let Some(MappedAddress::GroupChat(address)) = self.state.index.remove_room(room) {
            self.state.group_chats.remove(&address);
        }
    }
}
