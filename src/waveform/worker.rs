use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use crate::capability::SourceHandle;
use crate::catalog::EntryId;
use crate::error::WaveformError;
use crate::playback::SessionId;

use super::extract::extract_peaks;

/// Peaks for one playback, tagged so late results can be told apart.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformResult {
    pub peaks: Vec<f32>,
    pub source_entry_id: EntryId,
    pub session: SessionId,
}

/// What a worker sends back: either peaks or the reason there are none.
#[derive(Debug)]
pub struct WaveformMessage {
    pub session: SessionId,
    pub entry_id: EntryId,
    pub outcome: Result<WaveformResult, WaveformError>,
}

/// Cancels one in-flight extraction. Cancelling a finished one is harmless.
#[derive(Debug, Clone)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Runs extractions off the control thread and collects their results.
///
/// Each request gets its own worker thread. Results arrive in completion
/// order on a single channel drained by [`WaveformExtractor::try_recv`].
pub struct WaveformExtractor {
    peak_count: usize,
    tx: Sender<WaveformMessage>,
    rx: Receiver<WaveformMessage>,
}

impl WaveformExtractor {
    pub fn new(peak_count: usize) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { peak_count, tx, rx }
    }

    /// Start extracting `handle` in the background. Never blocks.
    pub fn request(&self, session: SessionId, entry_id: EntryId, handle: SourceHandle) -> CancelFlag {
        let flag = Arc::new(AtomicBool::new(false));
        let worker_flag = Arc::clone(&flag);
        let tx = self.tx.clone();
        let target = self.peak_count;

        debug!(%entry_id, ?session, "waveform extraction requested");
        let spawned = thread::Builder::new()
            .name("waveform-extract".to_string())
            .spawn(move || {
                let outcome = if worker_flag.load(Ordering::Relaxed) {
                    handle.release();
                    Err(WaveformError::Cancelled)
                } else {
                    extract_peaks(handle, target, &worker_flag).map(|peaks| WaveformResult {
                        peaks,
                        source_entry_id: entry_id,
                        session,
                    })
                };
                let _ = tx.send(WaveformMessage {
                    session,
                    entry_id,
                    outcome,
                });
            });

        if let Err(e) = spawned {
            warn!("could not start waveform worker: {e}");
            let _ = self.tx.send(WaveformMessage {
                session,
                entry_id,
                outcome: Err(WaveformError::Io(e)),
            });
        }

        CancelFlag(flag)
    }

    /// Next finished extraction, if any.
    pub fn try_recv(&self) -> Option<WaveformMessage> {
        self.rx.try_recv().ok()
    }

    #[cfg(test)]
    pub(crate) fn sender(&self) -> Sender<WaveformMessage> {
        self.tx.clone()
    }
}
