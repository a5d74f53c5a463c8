use std::time::Duration;

use crate::error::OutputError;

/// Somewhere clips can be played, one at a time.
pub trait AudioOutput {
    /// Start playing `clip`, replacing anything already playing.
    fn start(&mut self, clip: Vec<u8>) -> Result<(), OutputError>;

    /// Stop the current clip. Safe to call when nothing plays.
    fn stop(&mut self);

    /// Whether the last started clip is still sounding.
    fn is_active(&self) -> bool;

    /// Release the device, fading out whatever is still playing.
    fn shutdown(&mut self, fade_out: Duration);
}

/// Stand-in used when no audio device could be opened.
pub struct NullOutput {
    reason: String,
}

impl NullOutput {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl AudioOutput for NullOutput {
    fn start(&mut self, _clip: Vec<u8>) -> Result<(), OutputError> {
        Err(OutputError(self.reason.clone()))
    }

    fn stop(&mut self) {}

    fn is_active(&self) -> bool {
        false
    }

    fn shutdown(&mut self, _fade_out: Duration) {}
}
