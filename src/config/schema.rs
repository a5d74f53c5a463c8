use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/clipdeck/config.toml` or `~/.config/clipdeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CLIPDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub waveform: WaveformSettings,
    pub catalog: CatalogSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Output volume applied to every clip (1.0 = unity gain).
    pub volume: f32,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            quit_fade_out_ms: 150,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaveformSettings {
    /// Number of peaks in every extracted waveform.
    pub peak_count: usize,
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self { peak_count: 500 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Where `catalog.json`, `grants.json` and the log file live.
    /// Defaults to `$XDG_DATA_HOME/clipdeck` or `~/.local/share/clipdeck`.
    pub data_dir: Option<PathBuf>,
    /// Read-only directory scanned for bundled sounds on first run.
    /// Defaults to `<data_dir>/sounds`.
    pub bundled_dir: Option<PathBuf>,
    /// File extensions recognized as bundled audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to include hidden files (dotfiles) when seeding.
    pub include_hidden: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            bundled_dir: None,
            extensions: vec!["wav".into(), "aiff".into()],
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Minimum width of a sound tile (columns).
    pub tile_width: u16,
    /// Horizontal gap between tiles (columns).
    pub tile_spacing: u16,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ Pick a sound, any sound ~ ".to_string(),
            tile_width: 24,
            tile_spacing: 2,
        }
    }
}
