use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capability::AccessToken;

/// Stable identifier of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where a sound's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// A file name under the bundled-assets root.
    Bundled(String),
    /// A user-imported file reached through an access grant.
    Imported(AccessToken),
}

/// One sound clip record. Entries are never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    id: EntryId,
    display_name: String,
    source: SoundSource,
}

impl CatalogEntry {
    pub fn bundled(relative_name: impl Into<String>) -> Self {
        let name = relative_name.into();
        Self {
            id: EntryId::generate(),
            display_name: name.clone(),
            source: SoundSource::Bundled(name),
        }
    }

    pub fn imported(display_name: impl Into<String>, token: AccessToken) -> Self {
        Self {
            id: EntryId::generate(),
            display_name: display_name.into(),
            source: SoundSource::Imported(token),
        }
    }

    pub(super) fn from_parts(id: EntryId, display_name: String, source: SoundSource) -> Self {
        Self {
            id,
            display_name,
            source,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn source(&self) -> &SoundSource {
        &self.source
    }

    pub fn is_bundled(&self) -> bool {
        matches!(self.source, SoundSource::Bundled(_))
    }
}
