//! HOCON configuration loading.

use std::fs;
use std::path::Path;

use hocon::HoconLoader;
use tracing::debug;

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Read and parse the bridge configuration at `path`.
///
/// A file that cannot be read is an `IoError` carrying the OS error; anything
/// wrong with its contents is a `ParseError`.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.display().to_string(),
        source,
    })?;

    debug!(path = %path.display(), bytes = content.len(), "Read config file");
    load_config_str(&content)
}

/// Parse the bridge configuration from HOCON text.
pub fn load_config_str(content: &str) -> Result<Config, ConfigError> {
    let parse_error = |e: hocon::Error| ConfigError::ParseError {
        message: e.to_string(),
    };

    HoconLoader::new()
        .load_str(content)
        .map_err(parse_error)?
        .resolve()
        .map_err(parse_error)
}
