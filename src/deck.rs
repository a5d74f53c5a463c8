//! The soundboard as the UI sees it: catalog and playback behind one type.
//!
//! Every user action goes through [`Deck`], which keeps the two halves
//! consistent (a removed entry is never replayed, a stale grant is
//! refreshed once it has been shown to still play).

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::AudioOutput;
use crate::capability::CapabilityStore;
use crate::catalog::{CatalogEntry, EntryId, SoundCatalog};
use crate::config::Settings;
use crate::error::{CatalogError, PlaybackError};
use crate::playback::{PlayOutcome, PlaybackController, PlaybackSession};
use crate::waveform::{WaveformExtractor, WaveformResult};

pub const CATALOG_FILE: &str = "catalog.json";
pub const GRANTS_FILE: &str = "grants.json";

pub struct Deck {
    catalog: SoundCatalog,
    playback: PlaybackController,
    quit_fade_out: Duration,
}

impl Deck {
    /// Open the persisted catalog and grants under the configured data dir.
    pub fn open(settings: &Settings, output: Box<dyn AudioOutput>) -> Self {
        let data_dir = settings.data_dir();
        let store = CapabilityStore::open(data_dir.join(GRANTS_FILE), settings.bundled_dir());
        let catalog = SoundCatalog::open(
            data_dir.join(CATALOG_FILE),
            store,
            settings.catalog.clone(),
        );
        info!(entries = catalog.len(), data_dir = %data_dir.display(), "deck opened");
        if catalog.is_empty() {
            warn!(bundled = %settings.bundled_dir().display(), "no sounds available");
        }

        let extractor = WaveformExtractor::new(settings.waveform.peak_count);
        Self {
            catalog,
            playback: PlaybackController::new(output, extractor),
            quit_fade_out: Duration::from_millis(settings.audio.quit_fade_out_ms),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        self.catalog.entries()
    }

    pub fn catalog(&self) -> &SoundCatalog {
        &self.catalog
    }

    pub fn session(&self) -> &PlaybackSession {
        self.playback.session()
    }

    pub fn waveform(&self) -> Option<&WaveformResult> {
        self.playback.waveform()
    }

    /// Import a file the user picked.
    pub fn add(&mut self, path: &Path) -> Result<CatalogEntry, CatalogError> {
        self.catalog.add(path)
    }

    /// Remove an entry. If it is playing it finishes naturally, but it can
    /// no longer be replayed.
    pub fn remove(&mut self, id: EntryId) -> Result<Option<CatalogEntry>, CatalogError> {
        let removed = self.catalog.remove(id)?;
        if removed.is_some() {
            self.playback.forget(id);
        }
        Ok(removed)
    }

    pub fn play(&mut self, id: EntryId) -> Result<PlayOutcome, PlaybackError> {
        let outcome = self.playback.play(&self.catalog, id)?;
        self.after_play(id, outcome);
        Ok(outcome)
    }

    pub fn stop(&mut self) {
        self.playback.stop();
    }

    pub fn replay(&mut self) -> Result<Option<PlayOutcome>, PlaybackError> {
        let Some(id) = self.playback.session().last_played_id() else {
            return Ok(None);
        };
        let outcome = self.playback.replay(&self.catalog)?;
        if let Some(outcome) = outcome {
            self.after_play(id, outcome);
        }
        Ok(outcome)
    }

    /// Advance background work. Returns whether the screen needs a redraw.
    pub fn tick(&mut self) -> bool {
        self.playback.tick()
    }

    pub fn shutdown(&mut self) {
        self.playback.shutdown(self.quit_fade_out);
        debug!(open_scopes = self.catalog.store().active_scopes(), "deck closed");
    }

    fn after_play(&mut self, id: EntryId, outcome: PlayOutcome) {
        if !outcome.stale {
            return;
        }
        match self.catalog.refresh_grant(id) {
            Ok(()) => info!(%id, "refreshed stale grant"),
            Err(e) => warn!(%id, "could not refresh stale grant: {e}"),
        }
    }
}

#[cfg(test)]
mod tests;
