//! Configuration type definitions.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

/// Placeholder in `disabled_jids` that stands for the bridge's own login address.
pub const LOGIN_ADDRESS_SENTINEL: &str = "xmpp_login_jid";

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub matrix: MatrixConfig,
    pub xmpp: XmppConfig,
    #[serde(default = "default_true")]
    pub send_presences_to_control: bool,
    #[serde(default = "default_true")]
    pub send_messages_to_all_chat: bool,
    #[serde(default)]
    pub disable_all_chat_room: bool,
    #[serde(default = "default_true")]
    pub groupchat_mute_own_nick: bool,
    #[serde(default)]
    pub disabled_jids: Vec<String>,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

/// Room network (Matrix) settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixConfig {
    pub server: MatrixServerConfig,
    pub login: MatrixLoginConfig,
    #[serde(default)]
    pub users_to_invite: Vec<String>,
    pub groupchat_flag: String,
    #[serde(default = "default_true")]
    pub restore_room_topic: bool,
    #[serde(default)]
    pub special_rooms: SpecialRoomsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatrixServerConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatrixLoginConfig {
    /// Full user id of the bridge account; also the bridge's own identity.
    pub username: String,
    pub password: String,
}

/// Reserved topics and display names of the control and all-chat rooms.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecialRoomsConfig {
    #[serde(default = "default_control_room")]
    pub control: SpecialRoomConfig,
    #[serde(default = "default_all_chat_room")]
    pub all_chat: SpecialRoomConfig,
}

impl Default for SpecialRoomsConfig {
    fn default() -> Self {
        Self {
            control: default_control_room(),
            all_chat: default_all_chat_room(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpecialRoomConfig {
    pub topic: String,
    pub name: String,
}

/// Contact network (XMPP) settings.
#[derive(Debug, Clone, Deserialize)]
pub struct XmppConfig {
    pub server: XmppServerConfig,
    pub login: XmppLoginConfig,
    pub groupchat_nick: String,
    /// Passed through to the contact gateway untouched.
    #[serde(default)]
    pub roster_options: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XmppServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XmppLoginConfig {
    pub jid: String,
    pub password: String,
}

/// Backoff between bridge rebuilds.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl Config {
    /// The bridge's own user id on the room network.
    pub fn bot_id(&self) -> &str {
        &self.matrix.login.username
    }

    /// Whether the all-chat room exists at all.
    ///
    /// `disable_all_chat_room` only takes effect when mirroring is off.
    pub fn all_chat_enabled(&self) -> bool {
        !(self.disable_all_chat_room && !self.send_messages_to_all_chat)
    }

    /// Whether relayed messages are mirrored into the all-chat room.
    pub fn mirror_to_all_chat(&self) -> bool {
        self.send_messages_to_all_chat && self.all_chat_enabled()
    }

    /// Contact addresses excluded from room creation and presence relay,
    /// with the login sentinel expanded.
    pub fn disabled_addresses(&self) -> HashSet<String> {
        self.disabled_jids
            .iter()
            .map(|jid| {
                if jid == LOGIN_ADDRESS_SENTINEL {
                    self.xmpp.login.jid.clone()
                } else {
                    jid.clone()
                }
            })
            .collect()
    }
}

fn default_true() -> bool {
    true
}

fn default_control_room() -> SpecialRoomConfig {
    SpecialRoomConfig {
        topic: "control".to_string(),
        name: "XMPP Control Room".to_string(),
    }
}

fn default_all_chat_room() -> SpecialRoomConfig {
    SpecialRoomConfig {
        topic: "all_chat".to_string(),
        name: "XMPP All Chat".to_string(),
    }
}

fn default_min_delay_ms() -> u64 {
    5_000
}

fn default_max_delay_ms() -> u64 {
    300_000
}

#[cfg(test)]
pub(crate) fn make_test_config() -> Config {
    Config {
        matrix: MatrixConfig {
            server: MatrixServerConfig {
                base_url: "https://matrix.example.org".to_string(),
            },
            login: MatrixLoginConfig {
                username: "@bridge:example.org".to_string(),
                password: "secret".to_string(),
            },
            users_to_invite: vec!["@me:example.org".to_string()],
            groupchat_flag: "#".to_string(),
            restore_room_topic: true,
            special_rooms: SpecialRoomsConfig::default(),
        },
        xmpp: XmppConfig {
            server: XmppServerConfig {
                host: "xmpp.example.org".to_string(),
                port: 5222,
            },
            login: XmppLoginConfig {
                jid: "bridge@example.org".to_string(),
                password: "secret".to_string(),
            },
            groupchat_nick: "bridgebot".to_string(),
            roster_options: BTreeMap::new(),
        },
        send_presences_to_control: true,
        send_messages_to_all_chat: true,
        disable_all_chat_room: false,
        groupchat_mute_own_nick: true,
        disabled_jids: Vec::new(),
        reconnect: ReconnectConfig::default(),
    }
}
