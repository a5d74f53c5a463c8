use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use tempfile::{TempDir, tempdir};

use super::*;
use crate::capability::{CapabilityStore, SourceHandle};
use crate::catalog::EntryId;
use crate::error::WaveformError;
use crate::playback::SessionId;

fn write_wav(dir: &Path, name: &str, channels: u16, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut w = hound::WavWriter::create(dir.join(name), spec).unwrap();
    for &s in samples {
        w.write_sample(s).unwrap();
    }
    w.finalize().unwrap();
}

fn sine(len: usize, amplitude: f32) -> Vec<i16> {
    (0..len)
        .map(|i| ((i as f32 * 0.05).sin() * amplitude * i16::MAX as f32) as i16)
        .collect()
}

fn store(dir: &TempDir) -> CapabilityStore {
    CapabilityStore::open(dir.path().join("grants.json"), dir.path().to_path_buf())
}

fn handle(store: &CapabilityStore, name: &str) -> SourceHandle {
    store.resolve_bundled(name).unwrap()
}

#[test]
fn wav_is_reduced_to_target_normalized_peaks() {
    let dir = tempdir().unwrap();
    write_wav(dir.path(), "tone.wav", 1, &sine(8000, 0.5));
    let store = store(&dir);

    let peaks = extract_peaks(handle(&store, "tone.wav"), 100, &AtomicBool::new(false)).unwrap();

    assert_eq!(peaks.len(), 100);
    assert!(peaks.iter().all(|&p| (0.0..=1.0).contains(&p)));
    assert!(peaks.iter().any(|&p| p == 1.0));
    assert_eq!(store.active_scopes(), 0);
}

#[test]
fn silent_wav_gives_all_zero_peaks() {
    let dir = tempdir().unwrap();
    write_wav(dir.path(), "silence.wav", 1, &[0; 4000]);
    let store = store(&dir);

    let peaks = extract_peaks(handle(&store, "silence.wav"), 500, &AtomicBool::new(false)).unwrap();

    assert_eq!(peaks.len(), 500);
    assert!(peaks.iter().all(|&p| p == 0.0));
}

#[test]
fn stereo_is_read_interleaved() {
    let dir = tempdir().unwrap();
    // Left channel silent, right channel loud: peaks still reach 1.0.
    let frames: Vec<i16> = (0..2000).flat_map(|_| [0i16, 20000]).collect();
    write_wav(dir.path(), "stereo.wav", 2, &frames);
    let store = store(&dir);

    let peaks = extract_peaks(handle(&store, "stereo.wav"), 64, &AtomicBool::new(false)).unwrap();
    assert_eq!(peaks.len(), 64);
    assert!(peaks.iter().all(|&p| p == 1.0));
}

#[test]
fn empty_file_is_empty_source() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty.wav"), b"").unwrap();
    let store = store(&dir);

    let err = extract_peaks(handle(&store, "empty.wav"), 10, &AtomicBool::new(false)).unwrap_err();
    assert!(matches!(err, WaveformError::EmptySource));
    assert_eq!(store.active_scopes(), 0);
}

#[test]
fn garbage_is_decode_failed_and_releases_access() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("junk.wav"), vec![0x5a; 4096]).unwrap();
    let store = store(&dir);

    let err = extract_peaks(handle(&store, "junk.wav"), 10, &AtomicBool::new(false)).unwrap_err();
    assert!(matches!(
        err,
        WaveformError::DecodeFailed(_) | WaveformError::NoAudioTrack
    ));
    assert_eq!(store.active_scopes(), 0);
}

#[test]
fn cancelled_extraction_stops_early() {
    let dir = tempdir().unwrap();
    write_wav(dir.path(), "tone.wav", 1, &sine(8000, 0.5));
    let store = store(&dir);

    let err = extract_peaks(handle(&store, "tone.wav"), 10, &AtomicBool::new(true)).unwrap_err();
    assert!(matches!(err, WaveformError::Cancelled));
    assert_eq!(store.active_scopes(), 0);
}

#[test]
fn worker_delivers_tagged_result() {
    let dir = tempdir().unwrap();
    write_wav(dir.path(), "tone.wav", 1, &sine(4000, 0.9));
    let store = store(&dir);
    let extractor = WaveformExtractor::new(32);
    let entry = EntryId::generate();
    let session = SessionId::default().next();

    extractor.request(session, entry, handle(&store, "tone.wav"));

    let deadline = Instant::now() + Duration::from_secs(10);
    let msg = loop {
        if let Some(msg) = extractor.try_recv() {
            break msg;
        }
        assert!(Instant::now() < deadline, "no waveform result");
        std::thread::sleep(Duration::from_millis(10));
    };

    assert_eq!(msg.session, session);
    assert_eq!(msg.entry_id, entry);
    let result = msg.outcome.unwrap();
    assert_eq!(result.peaks.len(), 32);
    assert_eq!(result.source_entry_id, entry);
    assert_eq!(store.active_scopes(), 0);
}
