use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::{AudioOutput, NullOutput, RodioOutput};
use crate::deck::Deck;

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, note) = settings::load_settings();
    logging::init(&settings.data_dir());
    if let Some(note) = note {
        warn!("{note}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "clipdeck starting");

    let output: Box<dyn AudioOutput> = match RodioOutput::open(&settings.audio) {
        Ok(out) => Box::new(out),
        Err(e) => {
            warn!("no audio output, sounds will not play: {e}");
            Box::new(NullOutput::new(format!("No audio output: {e}")))
        }
    };
    let mut deck = Deck::open(&settings, output);
    let mut app = App::new();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut deck);

    deck.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("clipdeck exiting");
    run_result
}
