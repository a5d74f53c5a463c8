use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::trace;

/// One acquired access to a resolved file. Released exactly once, on drop.
#[derive(Debug)]
pub struct AccessScope {
    active: Arc<AtomicUsize>,
    label: String,
}

impl AccessScope {
    pub(super) fn acquire(active: &Arc<AtomicUsize>, label: &str) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        trace!(source = label, "access acquired");
        Self {
            active: Arc::clone(active),
            label: label.to_string(),
        }
    }
}

impl Drop for AccessScope {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        trace!(source = %self.label, "access released");
    }
}

/// A readable source valid for one read session.
///
/// Consuming methods move the access scope into whatever reads the file,
/// so access is released when that reader goes away, error paths included.
#[derive(Debug)]
pub struct SourceHandle {
    path: PathBuf,
    scope: AccessScope,
}

impl SourceHandle {
    pub(super) fn new(path: PathBuf, scope: AccessScope) -> Self {
        Self { path, scope }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lowercased file extension, used as a decoder hint and for display.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// Open the file for streaming reads. Access lasts as long as the reader.
    pub fn open(self) -> io::Result<ScopedReader> {
        let file = File::open(&self.path)?;
        Ok(ScopedReader {
            inner: BufReader::new(file),
            _scope: self.scope,
        })
    }

    /// Give up access without reading.
    pub fn release(self) {
        trace!(path = %self.path.display(), "handle released unread");
    }

    /// Read the whole file and release access before returning.
    pub fn read_all(self) -> io::Result<Vec<u8>> {
        let mut reader = self.open()?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Buffered file reader that holds its access scope until dropped.
pub struct ScopedReader {
    inner: BufReader<File>,
    _scope: AccessScope,
}

impl ScopedReader {
    pub fn byte_len(&self) -> io::Result<u64> {
        Ok(self.inner.get_ref().metadata()?.len())
    }
}

impl Read for ScopedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for ScopedReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
