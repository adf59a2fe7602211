//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use crate::common::error::ConfigError;
use crate::config::types::{Config, SpecialRoomConfig};

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    // Matrix side
    if config.matrix.server.base_url.is_empty() {
        errors.push("matrix.server.base_url is required".to_string());
    }
    if config.matrix.login.username.is_empty() {
        errors.push("matrix.login.username is required".to_string());
    }
    if config.matrix.login.password.is_empty() {
        errors.push("matrix.login.password is required".to_string());
    }
    for (i, user) in config.matrix.users_to_invite.iter().enumerate() {
        if user.trim().is_empty() {
            errors.push(format!("matrix.users_to_invite[{}] is empty", i));
        }
    }

    let flag = &config.matrix.groupchat_flag;
    if flag.is_empty() {
        errors.push("matrix.groupchat_flag is required".to_string());
    }

    let special = &config.matrix.special_rooms;
    check_special_room("control", &special.control, flag, &mut errors);
    if config.all_chat_enabled() {
        check_special_room("all_chat", &special.all_chat, flag, &mut errors);
        if special.control.topic == special.all_chat.topic {
            errors.push(format!(
                "matrix.special_rooms: control and all_chat share the topic '{}'",
                special.control.topic
            ));
        }
    }

    // XMPP side
    if config.xmpp.server.host.is_empty() {
        errors.push("xmpp.server.host is required".to_string());
    }
    if config.xmpp.server.port == 0 {
        errors.push("xmpp.server.port must be non-zero".to_string());
    }
    if !config.xmpp.login.jid.contains('@') {
        errors.push(format!(
            "xmpp.login.jid '{}' is not a valid address",
            config.xmpp.login.jid
        ));
    }
    if config.xmpp.login.password.is_empty() {
        errors.push("xmpp.login.password is required".to_string());
    }
    if config.xmpp.groupchat_nick.is_empty() {
        errors.push("xmpp.groupchat_nick is required".to_string());
    }

    if config.reconnect.min_delay_ms > config.reconnect.max_delay_ms {
        errors.push(format!(
            "reconnect.min_delay_ms ({}) exceeds reconnect.max_delay_ms ({})",
            config.reconnect.min_delay_ms, config.reconnect.max_delay_ms
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}

/// Special topics must never be mistaken for a contact or group-chat address.
fn check_special_room(key: &str, room: &SpecialRoomConfig, flag: &str, errors: &mut Vec<String>) {
    if room.topic.is_empty() {
        errors.push(format!("matrix.special_rooms.{}.topic is required", key));
        return;
    }
    if room.topic.contains('@') {
        errors.push(format!(
            "matrix.special_rooms.{}.topic '{}' must not contain '@'",
            key, room.topic
        ));
    }
    if !flag.is_empty() && room.topic.starts_with(flag) {
        errors.push(format!(
            "matrix.special_rooms.{}.topic '{}' must not start with the groupchat flag",
            key, room.topic
        ));
    }
}
