//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `MXPP_MATRIX_USERNAME` - Matrix user id of the bridge
//! - `MXPP_MATRIX_PASSWORD` - Matrix password
//! - `MXPP_XMPP_JID` - XMPP login address
//! - `MXPP_XMPP_PASSWORD` - XMPP password

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "MXPP";

/// Apply environment variable overrides to a config.
///
/// This allows credentials to be provided via environment variables
/// instead of the config file.
pub fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(username) = env::var(format!("{}_MATRIX_USERNAME", ENV_PREFIX)) {
        config.matrix.login.username = username;
    }
    if let Ok(password) = env::var(format!("{}_MATRIX_PASSWORD", ENV_PREFIX)) {
        config.matrix.login.password = password;
    }

    if let Ok(jid) = env::var(format!("{}_XMPP_JID", ENV_PREFIX)) {
        config.xmpp.login.jid = jid;
    }
    if let Ok(password) = env::var(format!("{}_XMPP_PASSWORD", ENV_PREFIX)) {
        config.xmpp.login.password = password;
    }

    config
}

/// Get the config file path from environment or use default.
///
/// Checks `MXPP_CONFIG` environment variable, otherwise returns "mxpp.conf".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "mxpp.conf".to_string())
}
