//! Peak waveform extraction for the live preview.
//!
//! Decoding happens on worker threads; results are tagged with the
//! playback session that asked for them so the controller can drop any
//! that arrive after a newer sound has started.

mod extract;
mod peaks;
mod worker;

pub use extract::extract_peaks;
pub use peaks::fit_peaks;
pub use worker::{CancelFlag, WaveformExtractor, WaveformMessage, WaveformResult};

#[cfg(test)]
mod tests;
