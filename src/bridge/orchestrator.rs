//! Bridge core that ties the room network and the contact network together.
//!
//! A [`Bridge`] owns all bridge state. It is rebuilt from the room network's
//! room list on every (re)connect and is driven by exactly one dispatch loop,
//! so handlers never race each other.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::common::error::{BridgeError, BridgeResult, ErrorCategory};
use crate::common::messages::BridgeEvent;
use crate::config::types::Config;
use crate::gateway::{ContactGateway, Gateways, RoomGateway};

use super::state::BridgeState;
use super::topic_index::{MappedAddress, RoomClass, SpecialRoom, TopicClassifier};

/// Why the dispatch loop returned without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// The shutdown signal fired.
    Shutdown,
    /// Every event sender was dropped.
    EventsClosed,
}

/// The bridge state engine.
pub struct Bridge {
    pub(super) config: Config,
    pub(super) classifier: TopicClassifier,
    pub(super) rooms: Arc<dyn RoomGateway>,
    pub(super) contacts: Arc<dyn ContactGateway>,
    pub(super) state: BridgeState,
}

impl Bridge {
    /// Create an uninitialized bridge on top of the given gateways.
    pub fn new(config: &Config, gateways: Gateways) -> Self {
        let special = &config.matrix.special_rooms;
        let mut reserved = vec![(special.control.topic.clone(), SpecialRoom::Control)];
        if config.all_chat_enabled() {
            reserved.push((special.all_chat.topic.clone(), SpecialRoom::AllChat));
        }

        Self {
            config: config.clone(),
            classifier: TopicClassifier::new(config.matrix.groupchat_flag.clone(), reserved),
            rooms: gateways.rooms,
            contacts: gateways.contacts,
            state: BridgeState::new(config),
        }
    }

    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    /// Rebuild state from the rooms the bridge sits in, provision the special
    /// rooms, then bring the contact network up and rejoin known group chats.
    pub async fn initialize(&mut self) -> BridgeResult<()> {
        let rooms = self.rooms.list_rooms().await?;
        info!("Classifying {} room(s)", rooms.len());

        for room in rooms {
            match self.classifier.classify(room.topic.as_deref()) {
                RoomClass::Special(kind) => {
                    if self.state.special.recover(kind, room.id.clone()) {
                        debug!(room = %room.id, "Recovered {} room", kind);
                    } else {
                        debug!(room = %room.id, "Extra {} room, leaving it as-is", kind);
                    }
                }
                RoomClass::Mapped(address) => {
                    if let MappedAddress::GroupChat(bare) = &address {
                        self.state.group_chats.insert(bare.clone());
                    }
                    let bound = self.state.index.register(address.clone(), room.id.clone());
                    if bound != room.id {
                        debug!(
                            room = %room.id,
                            "Address {} is already mapped to {}",
                            address.address(),
                            bound
                        );
                    }
                }
                RoomClass::Unmapped => {
                    debug!(
                        room = %room.id,
                        "Unmapped room ({}) [{}]",
                        room.name.as_deref().unwrap_or(""),
                        room.topic.as_deref().unwrap_or("")
                    );
                }
            }
        }

        self.setup_special_rooms().await?;

        info!("Connecting to the contact network...");
        self.contacts.connect().await?;

        for address in &self.state.group_chats {
            info!("Rejoining group chat {}", address);
            self.contacts
                .join_group_chat(address, &self.config.xmpp.groupchat_nick)
                .await?;
        }

        info!(
            mapped_rooms = self.state.index.len(),
            group_chats = self.state.group_chats.len(),
            "Bridge initialized"
        );
        Ok(())
    }

    /// Dispatch one inbound event to its handler.
    pub async fn handle_event(&mut self, event: BridgeEvent) -> BridgeResult<()> {
        match event {
            BridgeEvent::RoomMessage(msg) => self.handle_room_message(msg).await,
            BridgeEvent::ContactMessage(msg) => self.handle_contact_message(msg).await,
            BridgeEvent::GroupMessage(msg) => self.handle_group_message(msg).await,
            BridgeEvent::Presence(update) => self.handle_presence(update).await,
            BridgeEvent::RosterUpdate(rosters) => self.sync_roster(&rosters).await,
            BridgeEvent::ConnectivityLost(reason) => Err(BridgeError::ConnectivityLost { reason }),
        }
    }

    /// Handle events one at a time until shutdown, until the event channel
    /// closes, or until an error that is not recoverable.
    pub async fn run(
        &mut self,
        events_rx: &mut mpsc::UnboundedReceiver<BridgeEvent>,
        shutdown_rx: &mut watch::Receiver<bool>,
    ) -> BridgeResult<RunExit> {
        if *shutdown_rx.borrow() {
            return Ok(RunExit::Shutdown);
        }

        loop {
            tokio::select! {
                biased;
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping bridge");
                        return Ok(RunExit::Shutdown);
                    }
                }
                event = events_rx.recv() => {
                    let Some(event) = event else {
                        warn!("Event channel closed");
                        return Ok(RunExit::EventsClosed);
                    };
                    if let Err(e) = self.handle_event(event).await {
                        if e.category() != ErrorCategory::Recoverable {
                            return Err(e);
                        }
                        warn!("Event dropped: {}", e);
                    }
                }
            }
        }
    }
}
