//! Reclaiming rooms the bridge no longer needs.

use tracing::{debug, info, warn};

use crate::common::error::{BridgeError, BridgeResult, ErrorCategory};
use crate::common::types::{RoomId, RoomInfo};

use super::orchestrator::Bridge;
use super::topic_index::{MappedAddress, SpecialRoom};

/// Text posted in the control room before purging.
pub const PURGE_ANNOUNCEMENT: &str = "Purging unused rooms";

impl Bridge {
    /// Leave every room outside the index and every room nobody but the bridge has joined.
    ///
    /// Special rooms are never purged. A room that fails to leave is logged and
    /// skipped; losing connectivity aborts the whole run. Returns the rooms left.
    pub async fn purge(&mut self) -> BridgeResult<Vec<RoomId>> {
        if let Some(control) = self.state.special.get(SpecialRoom::Control) {
            self.rooms.send_text(control, PURGE_ANNOUNCEMENT).await?;
        }

        let targets = self.purge_targets().await?;
        debug!("Purge targets: {}", targets.len());

        let mut left = Vec::with_capacity(targets.len());
        for room in targets {
            match self.purge_room(&room).await {
                Ok(()) => left.push(room.id),
                Err(e) if e.category() == ErrorCategory::Recoverable => {
                    warn!(room = %room.id, "Failed to purge room: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        info!("Purged {} room(s)", left.len());
        Ok(left)
    }

    /// Rooms outside the index, plus indexed rooms with fewer than two joined
    /// members. Special rooms are never targets.
    async fn purge_targets(&self) -> BridgeResult<Vec<RoomInfo>> {
        let mut targets = Vec::new();

        for room in self.rooms.list_rooms().await? {
            if self.state.special.contains(&room.id) {
                continue;
            }
            if !self.state.index.contains_room(&room.id) {
                targets.push(room);
                continue;
            }

            let members = match self.rooms.members(&room.id).await {
                Ok(members) => members,
                Err(e) => {
                    let e = BridgeError::from(e);
                    if e.category() != ErrorCategory::Recoverable {
                        return Err(e);
                    }
                    warn!(room = %room.id, "Skipping room, members unavailable: {}", e);
                    continue;
                }
            };
            if members.iter().filter(|m| m.is_joined()).count() < 2 {
                targets.push(room);
            }
        }

        Ok(targets)
    }

    /// Group chat to leave before leaving `room`, read from the flag on its topic.
    ///
    /// A duplicate room never takes the group chat away from the room that
    /// is still mapped to it.
    fn group_chat_of(&self, room: &RoomInfo) -> Option<String> {
        let flag = self.classifier.flag();
        if flag.is_empty() {
            return None;
        }
        let address = room.topic.as_deref()?.strip_prefix(flag)?;

        let mapped = MappedAddress::GroupChat(address.to_string());
        match self.state.index.lookup(&mapped) {
            Some(bound) if *bound != room.id => None,
            _ => Some(address.to_string()),
        }
    }

    async fn purge_room(&mut self, room: &RoomInfo) -> BridgeResult<()> {
        if let Some(address) = self.group_chat_of(room) {
            self.contacts.leave_group_chat(&address, None).await?;
            self.state.group_chats.remove(&address);
        }

        self.rooms.leave(&room.id).await?;
        self.forget_room(&room.id);

        info!(
            room = %room.id,
            "Left room ({}) [{}]",
            room.name.as_deref().unwrap_or(""),
            room.topic.as_deref().unwrap_or("")
        );
        Ok(())
    }
}
