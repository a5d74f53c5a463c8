use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::config;
use crate::deck::Deck;
use crate::ui;

/// Main terminal event loop: handles input, UI drawing and background
/// playback work. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    deck: &mut Deck,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        deck.tick();

        terminal.draw(|f| ui::draw(f, app, deck, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, deck) {
                    return Ok(());
                }
            }
        }
    }
}

/// Apply one key press. Returns `true` when the user asked to quit.
fn handle_key_event(key: KeyEvent, app: &mut App, deck: &mut Deck) -> bool {
    // Any key closes an alert and does nothing else.
    if app.dismiss_alert() {
        return false;
    }

    if app.is_prompting() {
        match key.code {
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Backspace => app.pop_prompt_char(),
            KeyCode::Enter => {
                if let Some(path) = app.take_prompt() {
                    add_sound(app, deck, &path);
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
            _ => {}
        }
        return false;
    }

    let len = deck.entries().len();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('h') | KeyCode::Left => app.move_left(),
        KeyCode::Char('l') | KeyCode::Right => app.move_right(len),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(len),
        KeyCode::Char('p') => play_selected(app, deck),
        KeyCode::Char(c @ '1'..='9') => {
            let idx = c as usize - '1' as usize;
            if idx < len {
                app.select(idx, len);
                play_selected(app, deck);
            }
        }
        KeyCode::Char(' ') => deck.stop(),
        KeyCode::Enter => match deck.replay() {
            Ok(Some(outcome)) if outcome.stale => {
                app.set_status("file changed since it was added")
            }
            Ok(_) => {}
            Err(e) => app.show_alert(e.to_string()),
        },
        KeyCode::Char('a') => app.open_add_prompt(),
        KeyCode::Char('x') => remove_selected(app, deck),
        _ => {}
    }
    false
}

fn play_selected(app: &mut App, deck: &mut Deck) {
    let Some(id) = deck.entries().get(app.selected).map(|e| e.id()) else {
        return;
    };
    match deck.play(id) {
        Ok(outcome) if outcome.stale => app.set_status("file changed since it was added"),
        Ok(_) => {}
        Err(e) => app.show_alert(e.to_string()),
    }
}

fn add_sound(app: &mut App, deck: &mut Deck, path: &str) {
    match deck.add(Path::new(path)) {
        Ok(entry) => {
            app.set_status(format!("added {}", entry.display_name()));
            app.select(deck.entries().len() - 1, deck.entries().len());
        }
        Err(e) => {
            debug!(path, "import rejected: {e}");
            app.show_alert(e.to_string());
        }
    }
}

fn remove_selected(app: &mut App, deck: &mut Deck) {
    let Some(id) = deck.entries().get(app.selected).map(|e| e.id()) else {
        return;
    };
    match deck.remove(id) {
        Ok(Some(entry)) => app.set_status(format!("removed {}", entry.display_name())),
        Ok(None) => {}
        Err(e) => app.show_alert(e.to_string()),
    }
    app.clamp(deck.entries().len());
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crossterm::event::KeyModifiers;
    use tempfile::{TempDir, tempdir};

    use super::*;
    use crate::audio::fake::FakeOutput;
    use crate::config::Settings;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn deck_with(names: &[&str]) -> (TempDir, FakeOutput, Deck) {
        let dir = tempdir().unwrap();
        let sounds = dir.path().join("sounds");
        fs::create_dir_all(&sounds).unwrap();
        for name in names {
            fs::write(sounds.join(name), name.as_bytes()).unwrap();
        }
        let mut settings = Settings::default();
        settings.catalog.data_dir = Some(dir.path().to_path_buf());
        let output = FakeOutput::new();
        let deck = Deck::open(&settings, Box::new(output.clone()));
        (dir, output, deck)
    }

    #[test]
    fn q_quits() {
        let (_dir, _out, mut deck) = deck_with(&[]);
        let mut app = App::new();
        assert!(handle_key_event(press(KeyCode::Char('q')), &mut app, &mut deck));
    }

    #[test]
    fn number_keys_play_that_tile() {
        let (_dir, out, mut deck) = deck_with(&["a.wav", "b.wav", "c.wav"]);
        let mut app = App::new();

        handle_key_event(press(KeyCode::Char('2')), &mut app, &mut deck);

        assert_eq!(app.selected, 1);
        assert_eq!(out.playing().as_deref(), Some(&b"b.wav"[..]));

        // Out of range does nothing.
        handle_key_event(press(KeyCode::Char('9')), &mut app, &mut deck);
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn space_stops_and_enter_replays() {
        let (_dir, out, mut deck) = deck_with(&["a.wav"]);
        let mut app = App::new();

        handle_key_event(press(KeyCode::Char('p')), &mut app, &mut deck);
        handle_key_event(press(KeyCode::Char(' ')), &mut app, &mut deck);
        assert!(out.playing().is_none());

        handle_key_event(press(KeyCode::Enter), &mut app, &mut deck);
        assert_eq!(out.playing().as_deref(), Some(&b"a.wav"[..]));
    }

    #[test]
    fn add_prompt_imports_typed_path() {
        let (dir, _out, mut deck) = deck_with(&["a.wav"]);
        let clip = dir.path().join("clap.wav");
        fs::write(&clip, b"clap").unwrap();
        let mut app = App::new();

        handle_key_event(press(KeyCode::Char('a')), &mut app, &mut deck);
        for c in clip.to_string_lossy().chars() {
            handle_key_event(press(KeyCode::Char(c)), &mut app, &mut deck);
        }
        handle_key_event(press(KeyCode::Enter), &mut app, &mut deck);

        assert!(!app.is_prompting());
        assert_eq!(deck.entries().len(), 2);
        assert_eq!(app.selected, 1);
        assert_eq!(app.status.as_deref(), Some("added clap.wav"));
    }

    #[test]
    fn failed_import_raises_alert_that_any_key_dismisses() {
        let (dir, _out, mut deck) = deck_with(&["a.wav"]);
        let mut app = App::new();

        handle_key_event(press(KeyCode::Char('a')), &mut app, &mut deck);
        for c in dir.path().join("missing.wav").to_string_lossy().chars() {
            handle_key_event(press(KeyCode::Char(c)), &mut app, &mut deck);
        }
        handle_key_event(press(KeyCode::Enter), &mut app, &mut deck);

        assert!(app.alert.is_some());
        assert_eq!(deck.entries().len(), 1);

        // The dismissing key is swallowed.
        assert!(!handle_key_event(press(KeyCode::Char('q')), &mut app, &mut deck));
        assert!(app.alert.is_none());
    }

    #[test]
    fn x_removes_selected_and_keeps_cursor_in_range() {
        let (_dir, _out, mut deck) = deck_with(&["a.wav", "b.wav"]);
        let mut app = App::new();
        app.set_columns(2);

        handle_key_event(press(KeyCode::Right), &mut app, &mut deck);
        handle_key_event(press(KeyCode::Char('x')), &mut app, &mut deck);

        assert_eq!(deck.entries().len(), 1);
        assert_eq!(deck.entries()[0].display_name(), "a.wav");
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn playing_missing_file_shows_alert() {
        let (dir, _out, mut deck) = deck_with(&["a.wav"]);
        fs::remove_file(dir.path().join("sounds/a.wav")).unwrap();
        let mut app = App::new();

        handle_key_event(press(KeyCode::Char('p')), &mut app, &mut deck);

        assert!(app.alert.is_some());
    }
}
