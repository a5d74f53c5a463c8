//! In-memory output used by controller and deck tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::OutputError;

use super::output::AudioOutput;

#[derive(Debug, Default)]
pub struct FakeState {
    /// Bytes of the clip currently sounding.
    pub playing: Option<Vec<u8>>,
    pub starts: usize,
    pub stops: usize,
    pub fail_next_start: bool,
    pub shut_down: bool,
}

/// Records what the controller asked for; tests inspect the shared state.
#[derive(Clone, Default)]
pub struct FakeOutput {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the current clip reached its end.
    pub fn finish_clip(&self) {
        self.state.lock().unwrap().playing = None;
    }

    pub fn playing(&self) -> Option<Vec<u8>> {
        self.state.lock().unwrap().playing.clone()
    }
}

impl AudioOutput for FakeOutput {
    fn start(&mut self, clip: Vec<u8>) -> Result<(), OutputError> {
        let mut s = self.state.lock().unwrap();
        if s.fail_next_start {
            s.fail_next_start = false;
            return Err(OutputError("fake device refused".to_string()));
        }
        s.starts += 1;
        s.playing = Some(clip);
        Ok(())
    }

    fn stop(&mut self) {
        let mut s = self.state.lock().unwrap();
        s.stops += 1;
        s.playing = None;
    }

    fn is_active(&self) -> bool {
        self.state.lock().unwrap().playing.is_some()
    }

    fn shutdown(&mut self, _fade_out: Duration) {
        let mut s = self.state.lock().unwrap();
        s.playing = None;
        s.shut_down = true;
    }
}
