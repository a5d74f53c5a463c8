mod app;
mod audio;
mod capability;
mod catalog;
mod config;
mod deck;
mod error;
mod playback;
mod runtime;
mod storage;
mod ui;
mod waveform;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
