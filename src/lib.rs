//! mxpp-bridge - bridge engine between Matrix-style rooms and XMPP contacts
//!
//! Keeps one room per roster contact and per joined group chat, relays
//! messages and presence between the two networks, and takes commands from a
//! control room. Wire protocols live behind the gateway traits; the
//! [`Supervisor`] rebuilds the whole engine whenever connectivity is lost.

pub mod bridge;
pub mod common;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod supervisor;

pub use bridge::{Bridge, ControlChannels, EventChannels, RunExit};
pub use common::{AppError, BridgeError, BridgeEvent, BridgeResult, ErrorCategory};
pub use config::{load_and_validate, Config};
pub use gateway::{ContactGateway, Gateways, RoomGateway};
pub use logging::init_logging;
pub use supervisor::{run_from_config_file, Connector, Supervisor, SupervisorState};
