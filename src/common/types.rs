//! Shared types used across the application.

use std::collections::BTreeMap;
use std::fmt;

/// Identity of a room on the room network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A room as listed by the room gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub id: RoomId,
    pub topic: Option<String>,
    pub name: Option<String>,
}

/// Membership state of a user in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Joined,
    Invited,
}

/// A user present in (or invited to) a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMember {
    pub user_id: String,
    pub membership: Membership,
}

impl RoomMember {
    pub fn is_joined(&self) -> bool {
        self.membership == Membership::Joined
    }
}

/// Message kind on the contact network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Legacy one-to-one message without a conversation thread.
    Normal,
    /// One-to-one chat message.
    Chat,
    /// Message addressed to a group chat.
    GroupChat,
    /// Anything else the gateway delivers (headline, error...).
    Other,
}

/// Presence type sent to the contact network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceType {
    /// Ask the contact to report its current presence.
    Probe,
}

/// Presence change received from the contact network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceKind {
    Available,
    Unavailable,
}

impl PresenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceKind::Available => "available",
            PresenceKind::Unavailable => "unavailable",
        }
    }
}

/// One contact in a roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterEntry {
    /// Display name chosen for the contact, if any.
    pub name: Option<String>,
}

/// A complete roster owned by one account on the contact network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterSource {
    pub owner: String,
    pub entries: BTreeMap<String, RosterEntry>,
}

impl RosterSource {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Add a contact, builder style.
    pub fn with_contact(mut self, address: impl Into<String>, name: Option<&str>) -> Self {
        self.entries.insert(
            address.into(),
            RosterEntry {
                name: name.map(str::to_string),
            },
        );
        self
    }
}
