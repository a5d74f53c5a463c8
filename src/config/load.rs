use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `CLIPDECK__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CLIPDECK")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.waveform.peak_count == 0 {
            return Err("waveform.peak_count must be >= 1".to_string());
        }
        if !self.audio.volume.is_finite() || self.audio.volume < 0.0 {
            return Err("audio.volume must be a non-negative number".to_string());
        }
        if self.ui.tile_width == 0 {
            return Err("ui.tile_width must be >= 1".to_string());
        }
        Ok(())
    }

    /// Directory holding the persisted catalog, grant table and log file.
    pub fn data_dir(&self) -> PathBuf {
        self.catalog
            .data_dir
            .clone()
            .or_else(default_data_dir)
            .unwrap_or_else(|| PathBuf::from(".clipdeck"))
    }

    /// Directory scanned for bundled sounds on first run.
    pub fn bundled_dir(&self) -> PathBuf {
        self.catalog
            .bundled_dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("sounds"))
    }
}

/// Resolve the config path from `CLIPDECK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CLIPDECK_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/clipdeck/config.toml`
/// or `~/.config/clipdeck/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_home("XDG_CONFIG_HOME", ".config").map(|d| d.join("clipdeck").join("config.toml"))
}

/// Compute the default data directory `$XDG_DATA_HOME/clipdeck`
/// or `~/.local/share/clipdeck` when `XDG_DATA_HOME` is not set.
pub fn default_data_dir() -> Option<PathBuf> {
    xdg_home("XDG_DATA_HOME", ".local/share").map(|d| d.join("clipdeck"))
}

fn xdg_home(var: &str, home_relative: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_relative))
    }
}
