//! Audio-related small types and handles.
//!
//! This module defines the commands sent to the output thread and the
//! shared state it publishes back.

use std::sync::{Arc, Mutex};

use rodio::Decoder;
use std::io::Cursor;

/// A clip decoded from in-memory bytes, ready to hand to a sink.
pub type ClipSource = Decoder<Cursor<Vec<u8>>>;

pub enum OutputCmd {
    /// Replace whatever is playing with `source`.
    Play { source: ClipSource, generation: u64 },
    /// Stop playback immediately.
    Stop,
    /// Quit the output thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Output state shared between the control thread and the output thread.
///
/// `generation` increases with every start so the output thread can only
/// mark the clip it is actually playing as finished.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputInfo {
    pub generation: u64,
    pub active: bool,
}

impl OutputInfo {
    /// Begin a new clip and return its generation.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.active = true;
        self.generation
    }

    /// Mark `generation` as finished if it is still the current clip.
    pub fn finish(&mut self, generation: u64) -> bool {
        if self.active && self.generation == generation {
            self.active = false;
            true
        } else {
            false
        }
    }

    pub fn halt(&mut self) {
        self.active = false;
    }
}

pub type OutputHandle = Arc<Mutex<OutputInfo>>;
