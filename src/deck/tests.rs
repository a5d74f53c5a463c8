use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::{TempDir, tempdir};

use super::*;
use crate::audio::fake::FakeOutput;
use crate::playback::PlaybackState;

struct Fixture {
    dir: TempDir,
    output: FakeOutput,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data/sounds")).unwrap();
        fs::write(dir.path().join("data/sounds/horn.wav"), b"horn").unwrap();
        Self {
            dir,
            output: FakeOutput::new(),
        }
    }

    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.catalog.data_dir = Some(self.dir.path().join("data"));
        settings.waveform.peak_count = 8;
        settings
    }

    fn open(&self) -> Deck {
        Deck::open(&self.settings(), Box::new(self.output.clone()))
    }

    fn user_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let p = self.dir.path().join(name);
        fs::write(&p, contents).unwrap();
        p
    }
}

#[test]
fn opens_with_bundled_sounds_under_data_dir() {
    let fx = Fixture::new();
    let deck = fx.open();

    assert_eq!(deck.entries().len(), 1);
    assert_eq!(deck.entries()[0].display_name(), "horn.wav");
    assert!(fx.dir.path().join("data").join(CATALOG_FILE).is_file());
}

#[test]
fn removed_entry_is_not_replayed() {
    let fx = Fixture::new();
    let mut deck = fx.open();
    let entry = deck.add(&fx.user_file("clap.wav", b"clap")).unwrap();

    deck.play(entry.id()).unwrap();
    deck.stop();
    deck.remove(entry.id()).unwrap();

    assert_eq!(deck.session().last_played_id(), None);
    assert!(deck.replay().unwrap().is_none());
    assert_eq!(fx.output.state.lock().unwrap().starts, 1);
}

#[test]
fn removing_the_playing_entry_lets_it_finish() {
    let fx = Fixture::new();
    let mut deck = fx.open();
    let entry = deck.add(&fx.user_file("clap.wav", b"clap")).unwrap();
    deck.play(entry.id()).unwrap();

    deck.remove(entry.id()).unwrap();

    assert!(deck.session().is_playing_entry(entry.id()));
    fx.output.finish_clip();
    assert!(deck.tick());
    assert_eq!(deck.session().state(), PlaybackState::Idle);
}

#[test]
fn stale_grant_plays_and_is_refreshed() {
    let fx = Fixture::new();
    let mut deck = fx.open();
    let path = fx.user_file("clap.wav", b"clap");
    let entry = deck.add(&path).unwrap();

    fs::write(&path, b"a longer clap").unwrap();
    let outcome = deck.play(entry.id()).unwrap();

    assert!(outcome.stale);
    assert_eq!(fx.output.playing().as_deref(), Some(&b"a longer clap"[..]));
    let resolution = deck.catalog().resolve(entry.id()).unwrap();
    assert!(!resolution.stale);
}

#[test]
fn imported_entries_survive_reopen() {
    let fx = Fixture::new();
    let id = {
        let mut deck = fx.open();
        deck.add(&fx.user_file("clap.wav", b"clap")).unwrap().id()
    };

    let mut deck = fx.open();
    assert_eq!(deck.entries().len(), 2);
    deck.play(id).unwrap();
    assert_eq!(fx.output.playing().as_deref(), Some(&b"clap"[..]));
}

#[test]
fn shutdown_stops_output() {
    let fx = Fixture::new();
    let mut deck = fx.open();
    let id = deck.entries()[0].id();
    deck.play(id).unwrap();

    deck.shutdown();

    let state = fx.output.state.lock().unwrap();
    assert!(state.shut_down);
    assert!(state.playing.is_none());
    drop(state);
    assert_eq!(deck.quit_fade_out, Duration::from_millis(150));
}
