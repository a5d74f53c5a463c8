//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Sparkline, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, InputMode};
use crate::config::UiSettings;
use crate::deck::Deck;
use crate::playback::PlaybackState;
use crate::waveform::fit_peaks;

const TILE_HEIGHT: u16 = 3;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("hjkl/arrows", "move");
    map.insert("p/1-9", "play");
    map.insert("space", "stop");
    map.insert("enter", "replay last");
    map.insert("a", "add file");
    map.insert("x", "remove");
    map.insert("q", "quit");
    map
});

/// Render the controls help text.
fn controls_text() -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["hjkl/arrows", "p/1-9", "space", "enter", "a", "x", "q"];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Fit already-normalized `peaks` into `width` bars scaled to 0..=100.
fn waveform_bars(peaks: &[f32], width: usize) -> Vec<u64> {
    let fitted;
    let peaks = if peaks.len() > width {
        fitted = fit_peaks(peaks, width);
        &fitted[..]
    } else {
        peaks
    };
    peaks
        .iter()
        .map(|p| (p.clamp(0.0, 1.0) * 100.0).round() as u64)
        .collect()
}

fn status_text(app: &App, deck: &Deck) -> String {
    let session = deck.session();
    let name_of = |id| {
        deck.catalog()
            .get(id)
            .map(|e| e.display_name().to_string())
            .unwrap_or_else(|| "(removed)".to_string())
    };

    let mut parts: Vec<String> = Vec::new();
    match (session.state(), session.entry_id()) {
        (PlaybackState::Playing, Some(id)) => parts.push(format!(" Playing: {}", name_of(id))),
        _ => parts.push(" Idle".to_string()),
    }
    if let Some(id) = session.last_played_id() {
        parts.push(format!("Last: {}", name_of(id)));
    }
    parts.push(format!("Sounds: {}", deck.entries().len()));
    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }
    parts.join(" • ")
}

fn tile_label(idx: usize, name: &str, playing: bool, last: bool) -> String {
    let marker = if playing {
        "▶ "
    } else if last {
        "↺ "
    } else {
        ""
    };
    if idx < 9 {
        format!("{}{} {}", marker, idx + 1, name)
    } else {
        format!("{}{}", marker, name)
    }
}

/// Imported sounds get a tinted border so they stand out from the bundled set.
fn tile_block(bundled: bool) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL);
    if bundled {
        block
    } else {
        block.border_style(Style::default().cyan())
    }
}

fn draw_tiles(frame: &mut Frame, app: &mut App, deck: &Deck, ui: &UiSettings, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" sounds ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = deck.entries();
    if entries.is_empty() {
        let empty = Paragraph::new("No sounds yet. Press [a] to add one.")
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let columns = App::grid_columns(inner.width, ui.tile_width, ui.tile_spacing);
    app.set_columns(columns);
    app.clamp(entries.len());

    let tile_width = (inner
        .width
        .saturating_sub(ui.tile_spacing.saturating_mul(columns as u16 - 1))
        / columns as u16)
        .max(1);
    let visible_rows = (inner.height / TILE_HEIGHT).max(1) as usize;
    let selected_row = app.selected / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let session = deck.session();
    for (idx, entry) in entries.iter().enumerate() {
        let row = idx / columns;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = (idx % columns) as u16;
        let rect = Rect {
            x: inner.x + col * (tile_width + ui.tile_spacing),
            y: inner.y + (row - first_row) as u16 * TILE_HEIGHT,
            width: tile_width,
            height: TILE_HEIGHT,
        };

        let playing = session.is_playing_entry(entry.id());
        let last = session.last_played_id() == Some(entry.id());
        let mut style = Style::default();
        if playing {
            style = style.add_modifier(Modifier::BOLD);
        }
        if idx == app.selected {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let tile = Paragraph::new(tile_label(idx, entry.display_name(), playing, last))
            .style(style)
            .block(tile_block(entry.is_bundled()));
        frame.render_widget(tile, rect);
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &mut App, deck: &Deck, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(TILE_HEIGHT + 2),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" clipdeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Waveform strip; an empty box while nothing has been extracted.
    let wave_block = Block::default().borders(Borders::ALL).title(" waveform ");
    match deck.waveform() {
        Some(w) => {
            let width = wave_block.inner(chunks[1]).width as usize;
            let bars = waveform_bars(&w.peaks, width);
            let sparkline = Sparkline::default()
                .block(wave_block)
                .data(bars)
                .max(100)
                .cyan();
            frame.render_widget(sparkline, chunks[1]);
        }
        None => frame.render_widget(wave_block, chunks[1]),
    }

    draw_tiles(frame, app, deck, ui_settings, chunks[2]);

    let status = Paragraph::new(status_text(app, deck)).block(
        Block::bordered()
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            })
            .title(" status "),
    );
    frame.render_widget(status, chunks[3]);

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    if let InputMode::AddPath(ref buf) = app.mode {
        let popup_area = centered_rect_sized(72, 5, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let prompt = Paragraph::new(format!("{}█", buf)).block(
            Block::default()
                .borders(Borders::ALL)
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" add sound: path (enter adds, esc cancels) "),
        );
        frame.render_widget(prompt, popup_area);
    }

    // Alerts sit above everything else.
    if let Some(ref msg) = app.alert {
        let popup_area = centered_rect_sized(60, 7, frame.area());
        frame.render_widget(Clear, popup_area);
        let alert = Paragraph::new(msg.as_str())
            .red()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .title(" error (any key closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(alert, popup_area);
    }
}
