//! Error types for the soundboard.
//!
//! Each component gets its own enum so callers can tell which stage
//! failed. None of these are fatal: every failure leaves the catalog
//! unchanged and playback idle.

use std::path::PathBuf;

use thiserror::Error;

/// JSON file persistence failures.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Capability lifecycle failures.
#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("Access to {path:?} was denied: {reason}")]
    GrantDenied { path: PathBuf, reason: String },

    #[error("Access token could not be resolved: {0}")]
    ResolutionFailed(String),

    #[error("Bundled sound not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Persist(#[from] StorageError),
}

/// Catalog mutation failures.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to add sound: {0}")]
    ImportFailed(#[source] CapabilityError),

    #[error("Failed to save catalog: {0}")]
    Persist(#[from] StorageError),
}

/// Playback start failures.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Could not play {name}: {reason}")]
    EntryUnresolvable { name: String, reason: String },
}

/// Waveform extraction failures. These never interrupt playback.
#[derive(Error, Debug)]
pub enum WaveformError {
    #[error("Decode error: {0}")]
    DecodeFailed(String),

    #[error("No audio track found")]
    NoAudioTrack,

    #[error("Source contains no audio samples")]
    EmptySource,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction superseded by a newer playback")]
    Cancelled,
}

/// Audio device or clip decoding failure at playback start.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct OutputError(pub String);
