//! Config file location

use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "THERMOWIRE_CONFIG";

/// Directory holding thermowire's config: `~/.config/thermowire`, or
/// `/etc/thermowire` when the platform has no user config directory.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/etc"))
        .join("thermowire")
}

/// Path of the static config file.
///
/// `$THERMOWIRE_CONFIG` when set and non-empty, else `config.toml` in
/// [`config_dir`].
pub fn default_config_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => config_dir().join("config.toml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_is_thermowire() {
        assert!(config_dir().ends_with("thermowire"));
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        if std::env::var_os(CONFIG_ENV_VAR).is_none() {
            assert!(path.ends_with("thermowire/config.toml"));
        }
    }
}
