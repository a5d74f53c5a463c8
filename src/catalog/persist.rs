//! On-disk shape of the catalog.
//!
//! The blob is a JSON array of `{id, displayName, kind, token?}` records.
//! Anything that does not fit that shape invalidates the whole blob.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::capability::AccessToken;
use crate::error::StorageError;
use crate::storage;

use super::model::{CatalogEntry, EntryId, SoundSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum EntryKind {
    Bundled,
    Imported,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PersistedEntry {
    id: EntryId,
    display_name: String,
    kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<AccessToken>,
}

impl From<&CatalogEntry> for PersistedEntry {
    fn from(entry: &CatalogEntry) -> Self {
        let (kind, token) = match entry.source() {
            SoundSource::Bundled(_) => (EntryKind::Bundled, None),
            SoundSource::Imported(token) => (EntryKind::Imported, Some(token.clone())),
        };
        Self {
            id: entry.id(),
            display_name: entry.display_name().to_string(),
            kind,
            token,
        }
    }
}

impl TryFrom<PersistedEntry> for CatalogEntry {
    type Error = String;

    fn try_from(p: PersistedEntry) -> Result<Self, Self::Error> {
        let source = match (p.kind, p.token) {
            (EntryKind::Bundled, None) => SoundSource::Bundled(p.display_name.clone()),
            (EntryKind::Imported, Some(token)) => SoundSource::Imported(token),
            (EntryKind::Bundled, Some(_)) => {
                return Err(format!("bundled entry {} carries a token", p.id));
            }
            (EntryKind::Imported, None) => {
                return Err(format!("imported entry {} has no token", p.id));
            }
        };
        Ok(CatalogEntry::from_parts(p.id, p.display_name, source))
    }
}

/// Load the persisted list. Missing, empty or invalid blobs yield `None`.
pub(super) fn load(path: &Path) -> Option<Vec<CatalogEntry>> {
    let raw = match storage::load_from::<Vec<PersistedEntry>>(path) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(path = %path.display(), "no saved catalog");
            return None;
        }
        Err(e) => {
            warn!("ignoring unreadable catalog: {e}");
            return None;
        }
    };

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(raw.len());
    for p in raw {
        if !seen.insert(p.id) {
            warn!(id = %p.id, "ignoring catalog with duplicate entry ids");
            return None;
        }
        match CatalogEntry::try_from(p) {
            Ok(entry) => entries.push(entry),
            Err(msg) => {
                warn!("ignoring invalid catalog: {msg}");
                return None;
            }
        }
    }
    Some(entries)
}

pub(super) fn save(path: &Path, entries: &[CatalogEntry]) -> Result<(), StorageError> {
    let raw: Vec<PersistedEntry> = entries.iter().map(PersistedEntry::from).collect();
    storage::save_to(path, &raw)?;
    debug!(count = raw.len(), "saved catalog");
    Ok(())
}
