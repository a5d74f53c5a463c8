//! Playback control: the single playback slot, replay and the waveform
//! that goes with whatever is playing.

mod controller;
mod session;

pub use controller::{PlayOutcome, PlaybackController};
pub use session::{PlaybackSession, PlaybackState, SessionId};
