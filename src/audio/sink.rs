//! Utilities for turning clip bytes into `rodio` sources and sinks.

use std::io::Cursor;

use rodio::{Decoder, OutputStream, Sink};

use crate::error::OutputError;

use super::types::ClipSource;

/// Decode `bytes` enough to know they are playable.
pub(super) fn decode_clip(bytes: Vec<u8>) -> Result<ClipSource, OutputError> {
    Decoder::new(Cursor::new(bytes)).map_err(|e| OutputError(format!("cannot decode clip: {e}")))
}

/// Create a playing `Sink` for `source` at `volume`.
pub(super) fn create_sink(handle: &OutputStream, source: ClipSource, volume: f32) -> Sink {
    let sink = Sink::connect_new(handle.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.play();
    sink
}
