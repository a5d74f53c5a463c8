use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::AudioSettings;
use crate::error::OutputError;

use super::output::AudioOutput;
use super::sink::decode_clip;
use super::thread::spawn_output_thread;
use super::types::{OutputCmd, OutputHandle, OutputInfo};

/// Plays clips on the default device through a dedicated output thread.
pub struct RodioOutput {
    tx: Sender<OutputCmd>,
    info: OutputHandle,
    join: Option<JoinHandle<()>>,
}

impl RodioOutput {
    /// Open the default output device. Fails if there is none.
    pub fn open(settings: &AudioSettings) -> Result<Self, OutputError> {
        let (tx, rx) = mpsc::channel::<OutputCmd>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let info: OutputHandle = Arc::new(Mutex::new(OutputInfo::default()));

        let join = spawn_output_thread(rx, info.clone(), settings.volume, ready_tx)
            .map_err(|e| OutputError(format!("could not start audio thread: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = join.join();
                return Err(e);
            }
            Err(_) => return Err(OutputError("audio thread exited during startup".to_string())),
        }

        info!("audio output ready");
        Ok(Self {
            tx,
            info,
            join: Some(join),
        })
    }
}

impl AudioOutput for RodioOutput {
    fn start(&mut self, clip: Vec<u8>) -> Result<(), OutputError> {
        let source = decode_clip(clip)?;
        let generation = match self.info.lock() {
            Ok(mut i) => i.begin(),
            Err(_) => return Err(OutputError("output state lock poisoned".to_string())),
        };
        self.tx
            .send(OutputCmd::Play { source, generation })
            .map_err(|_| OutputError("audio thread is gone".to_string()))
    }

    fn stop(&mut self) {
        if let Ok(mut i) = self.info.lock() {
            i.halt();
        }
        let _ = self.tx.send(OutputCmd::Stop);
    }

    fn is_active(&self) -> bool {
        self.info.lock().map(|i| i.active).unwrap_or(false)
    }

    fn shutdown(&mut self, fade_out: Duration) {
        let _ = self.tx.send(OutputCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Some(h) = self.join.take() {
            if h.join().is_err() {
                warn!("audio thread panicked");
            }
        }
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        if self.join.is_some() {
            self.shutdown(Duration::ZERO);
        }
    }
}
