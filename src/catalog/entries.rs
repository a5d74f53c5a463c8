use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::capability::{CapabilityStore, Resolution};
use crate::config::CatalogSettings;
use crate::error::{CapabilityError, CatalogError};

use super::model::{CatalogEntry, EntryId, SoundSource};
use super::persist;
use super::seed::scan_bundled;

/// The persisted list of sounds, and the owner of their access grants.
///
/// Every mutation is saved before it returns; a failed save is rolled back
/// so the in-memory list always matches what a reload would produce.
pub struct SoundCatalog {
    entries: Vec<CatalogEntry>,
    path: PathBuf,
    store: CapabilityStore,
    settings: CatalogSettings,
}

impl SoundCatalog {
    /// Load the catalog at `path`, seeding bundled defaults when there is
    /// nothing usable on disk.
    pub fn open(path: PathBuf, store: CapabilityStore, settings: CatalogSettings) -> Self {
        let entries = persist::load(&path).unwrap_or_default();
        let mut catalog = Self {
            entries,
            path,
            store,
            settings,
        };
        info!(count = catalog.entries.len(), "catalog loaded");

        if catalog.entries.is_empty() {
            catalog.seed_defaults();
        }
        catalog
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.get(id).is_some()
    }

    pub fn store(&self) -> &CapabilityStore {
        &self.store
    }

    /// Import a user-chosen file: grant access, append, persist.
    pub fn add(&mut self, path: &Path) -> Result<CatalogEntry, CatalogError> {
        let token = self
            .store
            .grant_token(path)
            .map_err(CatalogError::ImportFailed)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let entry = CatalogEntry::imported(name, token.clone());
        self.entries.push(entry.clone());

        if let Err(e) = persist::save(&self.path, &self.entries) {
            self.entries.pop();
            if let Err(revoke_err) = self.store.revoke(&token) {
                warn!("could not withdraw grant after failed save: {revoke_err}");
            }
            return Err(e.into());
        }

        info!(id = %entry.id(), name = entry.display_name(), "sound added");
        Ok(entry)
    }

    /// Remove an entry. Absent ids are a no-op and return `None`.
    pub fn remove(&mut self, id: EntryId) -> Result<Option<CatalogEntry>, CatalogError> {
        let Some(index) = self.entries.iter().position(|e| e.id() == id) else {
            return Ok(None);
        };
        let entry = self.entries.remove(index);

        if let Err(e) = persist::save(&self.path, &self.entries) {
            self.entries.insert(index, entry);
            return Err(e.into());
        }

        if let SoundSource::Imported(token) = entry.source() {
            if let Err(e) = self.store.revoke(token) {
                warn!(id = %id, "could not revoke grant of removed sound: {e}");
            }
        }

        info!(id = %id, name = entry.display_name(), "sound removed");
        Ok(Some(entry))
    }

    /// Register every recognized file in the bundled root as a `Bundled`
    /// entry. Only runs on an empty catalog; returns how many were added.
    pub fn seed_defaults(&mut self) -> usize {
        if !self.entries.is_empty() {
            return 0;
        }

        let root = self.store.bundled_root().to_path_buf();
        let names = match scan_bundled(&root, &self.settings) {
            Ok(names) => names,
            Err(e) => {
                warn!(dir = %root.display(), "no bundled sounds: {e}");
                return 0;
            }
        };

        self.entries
            .extend(names.into_iter().map(CatalogEntry::bundled));
        if let Err(e) = persist::save(&self.path, &self.entries) {
            warn!("could not save seeded catalog: {e}");
        }

        info!(count = self.entries.len(), "seeded bundled sounds");
        self.entries.len()
    }

    /// Resolve an entry to a handle for one read session.
    pub fn resolve(&self, id: EntryId) -> Result<Resolution, CapabilityError> {
        let entry = self
            .get(id)
            .ok_or_else(|| CapabilityError::ResolutionFailed(format!("no entry {id}")))?;

        match entry.source() {
            SoundSource::Bundled(name) => Ok(Resolution {
                handle: self.store.resolve_bundled(name)?,
                stale: false,
            }),
            SoundSource::Imported(token) => self.store.resolve(token),
        }
    }

    /// Re-derive the grant of an imported entry whose file has drifted.
    pub fn refresh_grant(&mut self, id: EntryId) -> Result<(), CapabilityError> {
        let Some(SoundSource::Imported(token)) = self.get(id).map(|e| e.source().clone()) else {
            return Ok(());
        };
        self.store.refresh(&token)
    }
}
