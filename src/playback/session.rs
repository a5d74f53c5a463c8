use crate::catalog::EntryId;

/// Identifies one playback start. Strictly increasing, so any async result
/// can check whether it still belongs to the active session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// The playback state of the application.
///
/// Stopping (by request or because the clip ended) lands straight back
/// in `Idle`; there is no lingering stopped state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
}

/// The single playback slot.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    id: SessionId,
    entry_id: Option<EntryId>,
    state: PlaybackState,
    last_played_id: Option<EntryId>,
}

impl PlaybackSession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The entry currently playing, if any.
    pub fn entry_id(&self) -> Option<EntryId> {
        self.entry_id
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn last_played_id(&self) -> Option<EntryId> {
        self.last_played_id
    }

    /// Whether `id` is playing right now.
    pub fn is_playing_entry(&self, id: EntryId) -> bool {
        self.is_playing() && self.entry_id == Some(id)
    }

    pub(super) fn begin(&mut self, entry_id: EntryId) -> SessionId {
        self.id = self.id.next();
        self.entry_id = Some(entry_id);
        self.state = PlaybackState::Playing;
        self.last_played_id = Some(entry_id);
        self.id
    }

    pub(super) fn end(&mut self) {
        self.entry_id = None;
        self.state = PlaybackState::Idle;
    }

    pub(super) fn forget(&mut self, entry_id: EntryId) -> bool {
        if self.last_played_id == Some(entry_id) {
            self.last_played_id = None;
            true
        } else {
            false
        }
    }
}
