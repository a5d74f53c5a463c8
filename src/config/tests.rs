use super::load::{default_config_path, default_data_dir, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_clipdeck_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CLIPDECK_CONFIG_PATH", "/tmp/clipdeck-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/clipdeck-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config-home")
            .join("clipdeck")
            .join("config.toml")
    );
}

#[test]
fn default_data_dir_falls_back_to_home_local_share() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_data_dir().unwrap(),
        PathBuf::from("/tmp/home-dir")
            .join(".local/share")
            .join("clipdeck")
    );
}

#[test]
fn bundled_dir_defaults_under_data_dir() {
    let s = Settings {
        catalog: CatalogSettings {
            data_dir: Some(PathBuf::from("/tmp/deck-data")),
            ..CatalogSettings::default()
        },
        ..Settings::default()
    };
    assert_eq!(s.data_dir(), PathBuf::from("/tmp/deck-data"));
    assert_eq!(s.bundled_dir(), PathBuf::from("/tmp/deck-data/sounds"));
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
volume = 0.5
quit_fade_out_ms = 0

[waveform]
peak_count = 64

[catalog]
data_dir = "/tmp/deck-data"
bundled_dir = "/tmp/deck-bundled"
extensions = ["wav", ".MP3"]
include_hidden = true

[ui]
header_text = "hello"
tile_width = 30
tile_spacing = 1
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CLIPDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CLIPDECK__WAVEFORM__PEAK_COUNT");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.volume, 0.5);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.waveform.peak_count, 64);
    assert_eq!(s.data_dir(), PathBuf::from("/tmp/deck-data"));
    assert_eq!(s.bundled_dir(), PathBuf::from("/tmp/deck-bundled"));
    assert_eq!(s.catalog.extensions, vec!["wav".to_string(), ".MP3".to_string()]);
    assert!(s.catalog.include_hidden);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.tile_width, 30);
    assert_eq!(s.ui.tile_spacing, 1);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[waveform]
peak_count = 500
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CLIPDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CLIPDECK__WAVEFORM__PEAK_COUNT", "32");

    let s = Settings::load().unwrap();
    assert_eq!(s.waveform.peak_count, 32);
}

#[test]
fn validate_rejects_zero_peak_count_and_bad_volume() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.waveform.peak_count = 0;
    assert!(s.validate().is_err());

    s.waveform.peak_count = 500;
    s.audio.volume = -1.0;
    assert!(s.validate().is_err());

    s.audio.volume = f32::NAN;
    assert!(s.validate().is_err());
}
