use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::CapabilityError;
use crate::storage;

use super::scope::{AccessScope, SourceHandle};
use super::token::AccessToken;

/// Length and modification time of a granted file, used to spot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Fingerprint {
    len: u64,
    modified_ms: Option<u64>,
}

impl Fingerprint {
    fn of(meta: &fs::Metadata) -> Self {
        let modified_ms = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64);
        Self {
            len: meta.len(),
            modified_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Grant {
    path: PathBuf,
    fingerprint: Fingerprint,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct GrantTable {
    grants: BTreeMap<String, Grant>,
}

/// A successful resolution: a handle for one read session, plus whether
/// the granted file has drifted since the grant was issued.
#[derive(Debug)]
pub struct Resolution {
    pub handle: SourceHandle,
    pub stale: bool,
}

/// Issues, resolves and revokes access tokens; resolves bundled names.
///
/// Resolution takes `&self` and never mutates the grant table, so it is
/// safe to repeat. Every returned handle carries its own access scope.
pub struct CapabilityStore {
    bundled_root: PathBuf,
    grants_path: PathBuf,
    table: GrantTable,
    active: Arc<AtomicUsize>,
}

impl CapabilityStore {
    /// Load the grant table from `grants_path`. A missing or unreadable
    /// table starts empty; tokens issued against it then fail to resolve.
    pub fn open(grants_path: PathBuf, bundled_root: PathBuf) -> Self {
        let table = match storage::load_from::<GrantTable>(&grants_path) {
            Ok(Some(table)) => {
                debug!(count = table.grants.len(), "loaded access grants");
                table
            }
            Ok(None) => GrantTable::default(),
            Err(e) => {
                warn!("discarding unreadable grant table: {e}");
                GrantTable::default()
            }
        };

        Self {
            bundled_root,
            grants_path,
            table,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn bundled_root(&self) -> &Path {
        &self.bundled_root
    }

    /// Number of handles whose access has not been released yet.
    pub fn active_scopes(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Issue a token for a user-chosen file. The grant is persisted so the
    /// token stays valid across restarts.
    pub fn grant_token(&mut self, path: &Path) -> Result<AccessToken, CapabilityError> {
        let denied = |reason: String| CapabilityError::GrantDenied {
            path: path.to_path_buf(),
            reason,
        };

        let canonical = path.canonicalize().map_err(|e| denied(e.to_string()))?;
        let meta = fs::metadata(&canonical).map_err(|e| denied(e.to_string()))?;
        if !meta.is_file() {
            return Err(denied("not a regular file".to_string()));
        }
        File::open(&canonical).map_err(|e| denied(e.to_string()))?;

        let id = Uuid::new_v4();
        let key = id.to_string();
        self.table.grants.insert(
            key.clone(),
            Grant {
                path: canonical.clone(),
                fingerprint: Fingerprint::of(&meta),
            },
        );

        if let Err(e) = self.save() {
            self.table.grants.remove(&key);
            return Err(e);
        }

        info!(path = %canonical.display(), "granted access");
        Ok(AccessToken::for_grant(id))
    }

    /// Resolve a token to a readable handle. Drift is flagged, not refused.
    pub fn resolve(&self, token: &AccessToken) -> Result<Resolution, CapabilityError> {
        let grant = self.lookup(token)?;

        let meta = fs::metadata(&grant.path).map_err(|e| {
            CapabilityError::ResolutionFailed(format!("{}: {e}", grant.path.display()))
        })?;
        if !meta.is_file() {
            return Err(CapabilityError::ResolutionFailed(format!(
                "{} is no longer a regular file",
                grant.path.display()
            )));
        }

        let stale = Fingerprint::of(&meta) != grant.fingerprint;
        if stale {
            warn!(path = %grant.path.display(), "granted file changed since import");
        }

        Ok(Resolution {
            handle: self.handle_for(grant.path.clone()),
            stale,
        })
    }

    /// Resolve a file under the bundled root by its bare file name.
    pub fn resolve_bundled(&self, relative_name: &str) -> Result<SourceHandle, CapabilityError> {
        let rel = Path::new(relative_name);
        let mut components = rel.components();
        let plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain {
            return Err(CapabilityError::NotFound(relative_name.to_string()));
        }

        let path = self.bundled_root.join(rel);
        if !path.is_file() {
            return Err(CapabilityError::NotFound(relative_name.to_string()));
        }
        Ok(self.handle_for(path))
    }

    /// Re-record the fingerprint of a stale grant so it resolves cleanly again.
    pub fn refresh(&mut self, token: &AccessToken) -> Result<(), CapabilityError> {
        let key = Self::key_of(token)?;
        let Some(grant) = self.table.grants.get_mut(&key) else {
            return Err(CapabilityError::ResolutionFailed("unknown grant".to_string()));
        };
        let meta = fs::metadata(&grant.path).map_err(|e| {
            CapabilityError::ResolutionFailed(format!("{}: {e}", grant.path.display()))
        })?;
        grant.fingerprint = Fingerprint::of(&meta);
        debug!(path = %grant.path.display(), "refreshed grant");
        self.save()
    }

    /// Withdraw a grant. Returns whether the token was known.
    pub fn revoke(&mut self, token: &AccessToken) -> Result<bool, CapabilityError> {
        let Ok(key) = Self::key_of(token) else {
            return Ok(false);
        };
        let Some(grant) = self.table.grants.remove(&key) else {
            return Ok(false);
        };
        info!(path = %grant.path.display(), "revoked access");
        if let Err(e) = self.save() {
            self.table.grants.insert(key, grant);
            return Err(e);
        }
        Ok(true)
    }

    fn lookup(&self, token: &AccessToken) -> Result<&Grant, CapabilityError> {
        let key = Self::key_of(token)?;
        self.table
            .grants
            .get(&key)
            .ok_or_else(|| CapabilityError::ResolutionFailed("grant revoked or unknown".to_string()))
    }

    fn key_of(token: &AccessToken) -> Result<String, CapabilityError> {
        token
            .grant_id()
            .map(|id| id.to_string())
            .ok_or_else(|| CapabilityError::ResolutionFailed("malformed token".to_string()))
    }

    fn handle_for(&self, path: PathBuf) -> SourceHandle {
        let label = path.display().to_string();
        let scope = AccessScope::acquire(&self.active, &label);
        SourceHandle::new(path, scope)
    }

    fn save(&self) -> Result<(), CapabilityError> {
        storage::save_to(&self.grants_path, &self.table)?;
        Ok(())
    }
}
