//! Bridge state management.
//!
//! All mutable bridge state lives in one [`BridgeState`] owned by the
//! [`Bridge`](super::Bridge). It is rebuilt from the gateways and the config on
//! every (re)initialization; nothing here is persisted.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::common::types::RosterSource;
use crate::config::Config;

use super::special::SpecialRoomRegistry;
use super::topic_index::RoomTopicIndex;

/// Latest roster, address → display name.
#[derive(Debug, Default, Clone)]
pub struct RosterSnapshot {
    names: HashMap<String, String>,
}

impl RosterSnapshot {
    /// Replace the whole snapshot with the contents of `source`.
    pub fn replace(&mut self, source: &RosterSource) {
        self.names = source
            .entries
            .iter()
            .map(|(address, entry)| (address.clone(), entry.name.clone().unwrap_or_default()))
            .collect();
    }

    pub fn contains(&self, address: &str) -> bool {
        self.names.contains_key(address)
    }

    /// Display name for an address, falling back to the address itself.
    pub fn display_name<'a>(&'a self, address: &'a str) -> &'a str {
        match self.names.get(address) {
            Some(name) if !name.is_empty() => name,
            _ => address,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Shared mutable state of one bridge instance.
#[derive(Debug)]
pub struct BridgeState {
    /// Mapped address → room.
    pub index: RoomTopicIndex,
    /// Control and all-chat rooms.
    pub special: SpecialRoomRegistry,
    /// Addresses excluded from room creation and presence relay.
    pub disabled: HashSet<String>,
    /// Group chats the bridge has joined.
    pub group_chats: BTreeSet<String>,
    pub roster: RosterSnapshot,
}

impl BridgeState {
    pub fn new(config: &Config) -> Self {
        Self {
            index: RoomTopicIndex::new(),
            special: SpecialRoomRegistry::new(config.all_chat_enabled()),
            disabled: config.disabled_addresses(),
            group_chats: BTreeSet::new(),
            roster: RosterSnapshot::default(),
        }
    }

    pub fn is_group_chat(&self, address: &str) -> bool {
        self.group_chats.contains(address)
    }

    pub fn is_disabled(&self, address: &str) -> bool {
        self.disabled.contains(address)
    }
}
