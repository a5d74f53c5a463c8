use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::error::OutputError;

use super::sink::create_sink;
use super::types::{OutputCmd, OutputHandle};

/// How often the thread checks whether the current clip ran out.
const END_POLL: Duration = Duration::from_millis(50);

pub(super) fn spawn_output_thread(
    rx: Receiver<OutputCmd>,
    info: OutputHandle,
    volume: f32,
    ready: SyncSender<Result<(), OutputError>>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("audio-output".to_string())
        .spawn(move || {
            let mut stream = match OutputStreamBuilder::open_default_stream() {
                Ok(s) => s,
                Err(e) => {
                    let _ = ready.send(Err(OutputError(format!("no audio output device: {e}"))));
                    return;
                }
            };
            // rodio logs to stderr when OutputStream is dropped, which would
            // scribble over the TUI.
            stream.log_on_drop(false);
            let _ = ready.send(Ok(()));

            let mut current: Option<(Sink, u64)> = None;

            fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
                if fade_out_ms == 0 {
                    sink.set_volume(0.0);
                    return;
                }
                let steps: u64 = 20;
                let step_ms = (fade_out_ms / steps).max(1);
                let start = sink.volume();
                for step in 1..=steps {
                    let t = step as f32 / steps as f32;
                    sink.set_volume(start * (1.0 - t));
                    thread::sleep(Duration::from_millis(step_ms));
                }
                sink.set_volume(0.0);
            }

            loop {
                match rx.recv_timeout(END_POLL) {
                    Ok(OutputCmd::Play { source, generation }) => {
                        // Full teardown of the previous clip, never a mix.
                        if let Some((old, _)) = current.take() {
                            old.stop();
                        }
                        current = Some((create_sink(&stream, source, volume), generation));
                        debug!(generation, "clip started");
                    }
                    Ok(OutputCmd::Stop) => {
                        if let Some((old, generation)) = current.take() {
                            old.stop();
                            debug!(generation, "clip stopped");
                        }
                    }
                    Ok(OutputCmd::Quit { fade_out_ms }) => {
                        if let Some((s, _)) = current.take() {
                            fade_out_sink(&s, fade_out_ms);
                            s.stop();
                        }
                        if let Ok(mut i) = info.lock() {
                            i.halt();
                        }
                        break;
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        let finished = current.as_ref().filter(|(s, _)| s.empty()).map(|(_, g)| *g);
                        if let Some(generation) = finished {
                            current = None;
                            match info.lock() {
                                Ok(mut i) => {
                                    if i.finish(generation) {
                                        debug!(generation, "clip finished");
                                    }
                                }
                                Err(_) => warn!("output state lock poisoned"),
                            }
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        })
}
