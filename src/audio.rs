//! Audio output: a single-clip player on its own thread.
//!
//! The controller talks to an [`AudioOutput`]; in the application that is a
//! [`RodioOutput`], or a [`NullOutput`] when no device is available.

mod output;
mod player;
mod sink;
mod thread;
mod types;

pub use output::{AudioOutput, NullOutput};
pub use player::RodioOutput;

#[cfg(test)]
pub(crate) mod fake;
