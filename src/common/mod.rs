//! Common utilities and types shared across the application.

pub mod error;
pub mod messages;
pub mod types;

pub use error::{
    AppError, BridgeError, BridgeResult, ConfigError, ContactError, ContactResult, ErrorCategory,
    RoomError, RoomResult,
};
pub use messages::{
    BridgeEvent, ContactMessage, GroupMessage, PresenceUpdate, RoomContent, RoomMessage,
};
pub use types::{
    MessageKind, Membership, PresenceKind, PresenceType, RoomId, RoomInfo, RoomMember,
    RosterEntry, RosterSource,
};
