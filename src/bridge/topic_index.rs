//! Room classification by topic and the address → room index.
//!
//! A mapped room carries its contact address in its topic. Group-chat rooms
//! carry the configured flag in front of the address, so the index key can
//! always be recovered from the topic and vice versa.

use std::collections::HashMap;
use std::fmt;

use crate::common::types::RoomId;

/// Character every contact address contains.
pub const ADDRESS_DELIMITER: char = '@';

/// One of the two singleton rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpecialRoom {
    /// Accepts bridge commands and receives presence notices.
    Control,
    /// Optional broadcast mirror of every relayed message.
    AllChat,
}

impl fmt::Display for SpecialRoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialRoom::Control => f.write_str("control"),
            SpecialRoom::AllChat => f.write_str("all_chat"),
        }
    }
}

/// Address a mapped room is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MappedAddress {
    /// One-to-one conversation with a contact.
    Direct(String),
    /// Multi-party group chat.
    GroupChat(String),
}

impl MappedAddress {
    /// Bare address on the contact network.
    pub fn address(&self) -> &str {
        match self {
            MappedAddress::Direct(address) | MappedAddress::GroupChat(address) => address,
        }
    }

    /// Room topic that represents this address.
    pub fn topic(&self, flag: &str) -> String {
        match self {
            MappedAddress::Direct(address) => address.clone(),
            MappedAddress::GroupChat(address) => format!("{}{}", flag, address),
        }
    }

    pub fn is_group_chat(&self) -> bool {
        matches!(self, MappedAddress::GroupChat(_))
    }
}

/// Result of classifying a room by its topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomClass {
    Special(SpecialRoom),
    Mapped(MappedAddress),
    Unmapped,
}

/// Pure classification rules shared by startup recovery, roster sync and purge.
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    flag: String,
    reserved: Vec<(String, SpecialRoom)>,
}

impl TopicClassifier {
    /// `reserved` lists the special topics in use; a disabled all-chat room
    /// is simply left out.
    pub fn new(flag: impl Into<String>, reserved: Vec<(String, SpecialRoom)>) -> Self {
        Self {
            flag: flag.into(),
            reserved,
        }
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }

    pub fn reserved_topic(&self, kind: SpecialRoom) -> Option<&str> {
        self.reserved
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|(topic, _)| topic.as_str())
    }

    pub fn classify(&self, topic: Option<&str>) -> RoomClass {
        let Some(topic) = topic else {
            return RoomClass::Unmapped;
        };

        if let Some((_, kind)) = self.reserved.iter().find(|(reserved, _)| reserved == topic) {
            return RoomClass::Special(*kind);
        }

        if !topic.contains(ADDRESS_DELIMITER) {
            return RoomClass::Unmapped;
        }

        match topic.strip_prefix(self.flag.as_str()) {
            Some(address) if !self.flag.is_empty() => {
                RoomClass::Mapped(MappedAddress::GroupChat(address.to_string()))
            }
            _ => RoomClass::Mapped(MappedAddress::Direct(topic.to_string())),
        }
    }
}

/// Bidirectional map between mapped addresses and rooms.
///
/// Never holds a special room.
#[derive(Debug, Default, Clone)]
pub struct RoomTopicIndex {
    by_address: HashMap<MappedAddress, RoomId>,
    by_room: HashMap<RoomId, MappedAddress>,
}

impl RoomTopicIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `address` to `room` unless it is already bound.
    ///
    /// Returns the room the address is bound to afterwards.
    pub fn register(&mut self, address: MappedAddress, room: RoomId) -> RoomId {
        if let Some(existing) = self.by_address.get(&address) {
            return existing.clone();
        }
        self.by_room.insert(room.clone(), address.clone());
        self.by_address.insert(address, room.clone());
        room
    }

    pub fn lookup(&self, address: &MappedAddress) -> Option<&RoomId> {
        self.by_address.get(address)
    }

    pub fn address_of(&self, room: &RoomId) -> Option<&MappedAddress> {
        self.by_room.get(room)
    }

    pub fn contains_room(&self, room: &RoomId) -> bool {
        self.by_room.contains_key(room)
    }

    /// Drop the binding of a room that was left.
    pub fn remove_room(&mut self, room: &RoomId) -> Option<MappedAddress> {
        let address = self.by_room.remove(room)?;
        self.by_address.remove(&address);
        Some(address)
    }

    /// Direct contact addresses, sorted.
    pub fn direct_addresses(&self) -> Vec<&str> {
        let mut addresses: Vec<&str> = self
            .by_address
            .keys()
            .filter(|a| !a.is_group_chat())
            .map(MappedAddress::address)
            .collect();
        addresses.sort_unstable();
        addresses
    }

    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}
