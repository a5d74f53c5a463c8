//! Application model types: `App` and `InputMode`.
//!
//! `App` holds only view state (cursor, prompt, alert). The sounds and
//! playback live in [`crate::deck::Deck`].

/// What keystrokes currently mean.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing the path of a file to import.
    AddPath(String),
}

/// The main application model.
#[derive(Debug)]
pub struct App {
    pub selected: usize,
    /// Tiles per grid row, updated from the terminal width on every draw.
    pub columns: usize,
    pub mode: InputMode,
    /// Error shown in a popup until the next key press.
    pub alert: Option<String>,
    /// Short feedback line, e.g. "added clap.wav".
    pub status: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            selected: 0,
            columns: 1,
            mode: InputMode::Normal,
            alert: None,
            status: None,
        }
    }

    /// How many tiles of `tile_width` fit in `width`, at least one.
    pub fn grid_columns(width: u16, tile_width: u16, spacing: u16) -> usize {
        let slot = usize::from(tile_width) + usize::from(spacing);
        if slot == 0 {
            return 1;
        }
        ((usize::from(width) + usize::from(spacing)) / slot).max(1)
    }

    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    /// Keep the cursor on an existing tile after the list shrank.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn move_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_right(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
    }

    pub fn move_down(&mut self, len: usize) {
        if self.selected + self.columns < len {
            self.selected += self.columns;
        }
    }

    pub fn select(&mut self, idx: usize, len: usize) {
        if idx < len {
            self.selected = idx;
        }
    }

    pub fn is_prompting(&self) -> bool {
        matches!(self.mode, InputMode::AddPath(_))
    }

    pub fn open_add_prompt(&mut self) {
        self.mode = InputMode::AddPath(String::new());
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let InputMode::AddPath(ref mut buf) = self.mode {
            buf.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let InputMode::AddPath(ref mut buf) = self.mode {
            buf.pop();
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.mode = InputMode::Normal;
    }

    /// Close the prompt and hand back what was typed, trimmed. Blank input
    /// yields `None`.
    pub fn take_prompt(&mut self) -> Option<String> {
        match std::mem::take(&mut self.mode) {
            InputMode::AddPath(buf) => {
                let trimmed = buf.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            InputMode::Normal => None,
        }
    }

    pub fn show_alert(&mut self, msg: impl Into<String>) {
        self.alert = Some(msg.into());
    }

    pub fn dismiss_alert(&mut self) -> bool {
        self.alert.take().is_some()
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }
}
