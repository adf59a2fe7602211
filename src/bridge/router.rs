//! Message routing between the two networks.
//!
//! Room messages are dispatched by the role of the room they were posted in;
//! contact messages are routed to the room mapped to their sender.

use tracing::{debug, info, warn};

use crate::common::error::BridgeResult;
use crate::common::messages::{ContactMessage, GroupMessage, RoomContent, RoomMessage};
use crate::common::types::{MessageKind, RoomId};

use super::orchestrator::Bridge;
use super::topic_index::{MappedAddress, SpecialRoom};

/// Reply posted when someone talks in the all-chat room.
pub const ALL_CHAT_WARNING: &str = "Don't talk in here! Nobody gets your messages.";

impl Bridge {
    /// Handle a message posted in any room on the room network.
    pub async fn handle_room_message(&mut self, msg: RoomMessage) -> BridgeResult<()> {
        // Always ignore our own messages
        if msg.sender == self.config.bot_id() {
            return Ok(());
        }

        debug!(room = %msg.room_id, sender = %msg.sender, "Room message: {:?}", msg.content);

        let RoomContent::Text(body) = msg.content else {
            return Ok(());
        };

        match self.state.special.role_of(&msg.room_id) {
            Some(SpecialRoom::Control) => self.handle_control_message(&body).await,
            Some(SpecialRoom::AllChat) => {
                self.rooms.send_notice(&msg.room_id, ALL_CHAT_WARNING).await?;
                Ok(())
            }
            None => self.forward_room_message(&msg.room_id, &body).await,
        }
    }

    /// Send a message typed into a mapped room to its contact or group chat.
    async fn forward_room_message(&mut self, room: &RoomId, body: &str) -> BridgeResult<()> {
        let Some(address) = self.state.index.address_of(room).cloned() else {
            debug!(room = %room, "Message in unmapped room, ignoring");
            return Ok(());
        };

        let (target, kind) = match &address {
            MappedAddress::GroupChat(target) => (target.as_str(), MessageKind::GroupChat),
            MappedAddress::Direct(target) => (target.as_str(), MessageKind::Chat),
        };
        let name = self.state.roster.display_name(target).to_string();

        info!("Matrix received message to {} : {}", target, body);
        self.contacts.send_message(target, body, kind).await?;

        self.mirror(|| format!("To {} : {}", name, body), true).await
    }

    /// Handle a one-to-one message from the contact network.
    pub async fn handle_contact_message(&mut self, msg: ContactMessage) -> BridgeResult<()> {
        info!("XMPP received {} : {}", msg.from, msg.body);

        if msg.from == self.config.xmpp.login.jid {
            return Ok(());
        }
        if !matches!(msg.kind, MessageKind::Normal | MessageKind::Chat) {
            debug!("Ignoring {:?} message from {}", msg.kind, msg.from);
            return Ok(());
        }

        if self.state.is_group_chat(&msg.from) {
            warn!("Normal chat message from a groupchat, ignoring...");
            return Ok(());
        }

        let address = MappedAddress::Direct(msg.from.clone());
        let Some(room) = self.state.index.lookup(&address).cloned() else {
            warn!("No room mapped to {}, dropping message", msg.from);
            return Ok(());
        };

        self.rooms.send_text(&room, &msg.body).await?;

        let name = self.state.roster.display_name(&msg.from).to_string();
        self.mirror(|| format!("From {}: {}", name, msg.body), false).await
    }

    /// Handle a message posted in a group chat on the contact network.
    pub async fn handle_group_message(&mut self, msg: GroupMessage) -> BridgeResult<()> {
        info!("XMPP MUC received {}/{} : {}", msg.room, msg.nickname, msg.body);

        if self.config.groupchat_mute_own_nick && msg.nickname == self.config.xmpp.groupchat_nick {
            return Ok(());
        }

        let address = MappedAddress::GroupChat(msg.room.clone());
        let Some(room) = self.state.index.lookup(&address).cloned() else {
            warn!("No room mapped to group chat {}, dropping message", msg.room);
            return Ok(());
        };

        self.rooms
            .send_text(&room, &format!("{}: {}", msg.nickname, msg.body))
            .await?;

        self.mirror(
            || format!("Room {}, from {}: {}", msg.room, msg.nickname, msg.body),
            false,
        )
        .await
    }

    /// Copy a relayed message into the all-chat room, if mirroring is on.
    async fn mirror(&self, text: impl FnOnce() -> String, as_notice: bool) -> BridgeResult<()> {
        if !self.config.mirror_to_all_chat() {
            return Ok(());
        }
        let Some(all_chat) = self.state.special.get(SpecialRoom::AllChat) else {
            return Ok(());
        };

        let text = text();
        if as_notice {
            self.rooms.send_notice(all_chat, &text).await?;
        } else {
            self.rooms.send_text(all_chat, &text).await?;
        }
        Ok(())
    }
}
