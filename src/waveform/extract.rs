use std::sync::atomic::{AtomicBool, Ordering};

use rodio::Decoder;
use rodio::decoder::DecoderError;
use tracing::debug;

use crate::capability::SourceHandle;
use crate::error::WaveformError;

use super::peaks::peak_envelope;

/// How many samples to decode between cancellation checks.
const CANCEL_CHECK_INTERVAL: usize = 16 * 1024;

/// Decode `handle` to PCM and reduce it to `target` normalized peaks.
///
/// Multi-channel audio is read interleaved, without downmixing. The file,
/// its access scope and the decoder all live only for this call.
pub fn extract_peaks(
    handle: SourceHandle,
    target: usize,
    cancel: &AtomicBool,
) -> Result<Vec<f32>, WaveformError> {
    debug!(path = %handle.path().display(), format = ?handle.extension(), target, "extracting peaks");
    let reader = handle.open()?;
    if reader.byte_len()? == 0 {
        return Err(WaveformError::EmptySource);
    }

    let decoder = Decoder::new(reader).map_err(decoder_error)?;

    let mut samples: Vec<f32> = Vec::new();
    for sample in decoder {
        if samples.len() % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            return Err(WaveformError::Cancelled);
        }
        samples.push(sample);
    }

    if samples.is_empty() {
        return Err(WaveformError::EmptySource);
    }
    Ok(peak_envelope(&samples, target))
}

fn decoder_error(e: DecoderError) -> WaveformError {
    match e {
        DecoderError::NoStreams => WaveformError::NoAudioTrack,
        other => WaveformError::DecodeFailed(other.to_string()),
    }
}
