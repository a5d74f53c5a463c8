use std::time::Duration;

use tracing::{debug, info};

use crate::audio::AudioOutput;
use crate::catalog::{EntryId, SoundCatalog};
use crate::error::PlaybackError;
use crate::waveform::{CancelFlag, WaveformExtractor, WaveformMessage, WaveformResult};

use super::session::PlaybackSession;

/// What a successful `play` learned about the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayOutcome {
    /// The imported file drifted since it was granted.
    pub stale: bool,
}

/// Owns the single playback slot and the waveform shown for it.
///
/// All methods run on the control thread. Waveform extraction happens on
/// worker threads and its results are only applied from [`tick`].
///
/// [`tick`]: PlaybackController::tick
pub struct PlaybackController {
    output: Box<dyn AudioOutput>,
    extractor: WaveformExtractor,
    session: PlaybackSession,
    waveform: Option<WaveformResult>,
    pending: Option<CancelFlag>,
}

impl PlaybackController {
    pub fn new(output: Box<dyn AudioOutput>, extractor: WaveformExtractor) -> Self {
        Self {
            output,
            extractor,
            session: PlaybackSession::default(),
            waveform: None,
            pending: None,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn waveform(&self) -> Option<&WaveformResult> {
        self.waveform.as_ref()
    }

    /// Stop anything playing, then start `id`.
    ///
    /// On failure the controller is left idle. Waveform extraction is
    /// requested after audio starts and can never fail the call.
    pub fn play(&mut self, catalog: &SoundCatalog, id: EntryId) -> Result<PlayOutcome, PlaybackError> {
        self.stop();

        let name = catalog
            .get(id)
            .map(|e| e.display_name().to_string())
            .unwrap_or_else(|| id.to_string());
        let unresolvable = |reason: String| PlaybackError::EntryUnresolvable {
            name: name.clone(),
            reason,
        };

        let resolution = catalog.resolve(id).map_err(|e| unresolvable(e.to_string()))?;
        let stale = resolution.stale;
        let clip = resolution
            .handle
            .read_all()
            .map_err(|e| unresolvable(e.to_string()))?;
        self.output
            .start(clip)
            .map_err(|e| unresolvable(e.to_string()))?;

        let session = self.session.begin(id);
        info!(%id, name = %name, ?session, "playing");

        match catalog.resolve(id) {
            Ok(r) => self.pending = Some(self.extractor.request(session, id, r.handle)),
            Err(e) => debug!(%id, "no waveform source: {e}"),
        }

        Ok(PlayOutcome { stale })
    }

    /// Halt playback and clear the waveform. Idle stays idle.
    pub fn stop(&mut self) {
        if let Some(flag) = self.pending.take() {
            flag.cancel();
        }
        self.waveform = None;

        if self.session.is_playing() {
            self.output.stop();
            self.session.end();
            info!("stopped");
        }
    }

    /// Play the last started sound again, if it still exists.
    pub fn replay(&mut self, catalog: &SoundCatalog) -> Result<Option<PlayOutcome>, PlaybackError> {
        match self.session.last_played_id() {
            Some(id) if catalog.contains(id) => self.play(catalog, id).map(Some),
            _ => Ok(None),
        }
    }

    /// Drop `id` as the replay target, e.g. after it left the catalog.
    pub fn forget(&mut self, id: EntryId) {
        if self.session.forget(id) {
            debug!(%id, "replay target forgotten");
        }
    }

    /// Apply natural end of clip and any finished waveform extractions.
    /// Returns whether anything visible changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;

        if self.session.is_playing() && !self.output.is_active() {
            if let Some(flag) = self.pending.take() {
                flag.cancel();
            }
            self.session.end();
            self.waveform = None;
            debug!("clip ended");
            changed = true;
        }

        while let Some(msg) = self.extractor.try_recv() {
            changed |= self.accept(msg);
        }
        changed
    }

    /// Release the output device.
    pub fn shutdown(&mut self, fade_out: Duration) {
        if let Some(flag) = self.pending.take() {
            flag.cancel();
        }
        self.output.shutdown(fade_out);
        self.session.end();
        self.waveform = None;
    }

    fn accept(&mut self, msg: WaveformMessage) -> bool {
        if !self.session.is_playing() || msg.session != self.session.id() {
            debug!(entry_id = %msg.entry_id, session = ?msg.session, "discarding superseded waveform");
            return false;
        }

        self.pending = None;
        match msg.outcome {
            Ok(result) => {
                debug!(entry_id = %msg.entry_id, peaks = result.peaks.len(), "waveform ready");
                self.waveform = Some(result);
                true
            }
            Err(e) => {
                debug!(entry_id = %msg.entry_id, "waveform unavailable: {e}");
                false
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn extractor(&self) -> &WaveformExtractor {
        &self.extractor
    }
}
