//! Control room commands.
//!
//! ```text
//! refresh               probe every contact's presence and reload the roster
//! purge                 leave unindexed rooms and rooms only the bridge sits in
//! joinmuc <address>     join a group chat and give it a room
//! leavemuc <address>    leave a group chat and its room
//! ```
//!
//! Anything else typed into the control room is ignored.

use tracing::{debug, info, warn};

use crate::common::error::BridgeResult;
use crate::common::types::PresenceType;

use super::orchestrator::Bridge;
use super::topic_index::{MappedAddress, ADDRESS_DELIMITER};

/// A parsed control room command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    Refresh,
    Purge,
    JoinGroupChat(String),
    LeaveGroupChat(String),
}

impl ControlCommand {
    /// Parse a control room message. The command word is case-insensitive.
    pub fn parse(body: &str) -> Option<Self> {
        let mut parts = body.split_whitespace();
        let command = parts.next()?.to_lowercase();
        let argument = parts.next();

        match (command.as_str(), argument) {
            ("refresh", _) => Some(ControlCommand::Refresh),
            ("purge", _) => Some(ControlCommand::Purge),
            ("joinmuc", Some(address)) => Some(ControlCommand::JoinGroupChat(address.to_string())),
            ("leavemuc", Some(address)) => {
                Some(ControlCommand::LeaveGroupChat(address.to_string()))
            }
            _ => None,
        }
    }
}

impl Bridge {
    /// Interpret a text message typed into the control room.
    pub(super) async fn handle_control_message(&mut self, body: &str) -> BridgeResult<()> {
        info!("Matrix received control message: {}", body);

        let Some(command) = ControlCommand::parse(body) else {
            debug!("Ignoring unrecognized control message");
            return Ok(());
        };

        match command {
            ControlCommand::Refresh => self.refresh().await,
            ControlCommand::Purge => self.purge().await.map(|_| ()),
            ControlCommand::JoinGroupChat(address) => self.join_group_chat(&address).await,
            ControlCommand::LeaveGroupChat(address) => self.leave_group_chat(&address).await,
        }
    }

    /// Probe every mapped contact, announce ourselves and reload the roster.
    async fn refresh(&mut self) -> BridgeResult<()> {
        for address in self.state.index.direct_addresses() {
            self.contacts
                .send_presence(Some(address), Some(PresenceType::Probe))
                .await?;
        }
        self.contacts.send_presence(None, None).await?;
        self.contacts.request_roster().await?;
        Ok(())
    }

    async fn join_group_chat(&mut self, address: &str) -> BridgeResult<()> {
        if !address.contains(ADDRESS_DELIMITER) {
            warn!("Skipping fake group chat jid: {}", address);
            return Ok(());
        }
        info!("XMPP MUC join: {}", address);

        let mapped = MappedAddress::GroupChat(address.to_string());
        if let Some(room) = self.create_mapped_room(&mapped, None).await? {
            self.invite_missing(&room).await?;
        }
        self.state.group_chats.insert(address.to_string());

        self.contacts
            .join_group_chat(address, &self.config.xmpp.groupchat_nick)
            .await?;
        Ok(())
    }

    async fn leave_group_chat(&mut self, address: &str) -> BridgeResult<()> {
        info!("XMPP MUC leave: {}", address);

        self.contacts
            .leave_group_chat(address, Some(&self.config.xmpp.groupchat_nick))
            .await?;
        self.state.group_chats.remove(address);

        let mapped = MappedAddress::GroupChat(address.to_string());
        match self.state.index.lookup(&mapped).cloned() {
            Some(room) => {
                self.rooms.leave(&room).await?;
                self.forget_room(&room);
                info!(room = %room, "Left group chat room for {}", address);
            }
            None => warn!("No room mapped to group chat {}", address),
        }
        Ok(())
    }
}
