//! Bridge state engine.
//!
//! ## Module Structure
//!
//! - `topic_index`: room classification by topic and the address → room index
//! - `special`: control and all-chat rooms
//! - `state`: shared bridge state (`BridgeState`, `RosterSnapshot`)
//! - `rooms`: mapped room lifecycle
//! - `roster`: roster synchronisation
//! - `commands`: control room command interpreter
//! - `router`: message routing between the two networks
//! - `presence`: presence relay
//! - `purge`: reclaiming unused rooms
//! - `orchestrator`: the `Bridge` core and its dispatch loop
//! - `channels`: event and shutdown channels

pub mod channels;
pub mod commands;
pub mod orchestrator;
pub mod presence;
pub mod purge;
pub mod rooms;
pub mod roster;
pub mod router;
pub mod special;
pub mod state;
pub mod topic_index;

pub use channels::{ControlChannels, EventChannels};
pub use commands::ControlCommand;
pub use orchestrator::{Bridge, RunExit};
pub use special::SpecialRoomRegistry;
pub use state::{BridgeState, RosterSnapshot};
pub use topic_index::{MappedAddress, RoomClass, RoomTopicIndex, SpecialRoom, TopicClassifier};
