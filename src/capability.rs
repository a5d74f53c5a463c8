//! Revocable, path-independent read access to sound files.
//!
//! Imported sounds are reached through an [`AccessToken`] issued by the
//! [`CapabilityStore`]; bundled sounds resolve against a fixed root.
//! Either way the caller gets a [`SourceHandle`] whose access scope is
//! released when the handle (or the reader it opened) is dropped.

mod scope;
mod store;
mod token;

pub use scope::{ScopedReader, SourceHandle};
pub use store::{CapabilityStore, Resolution};
pub use token::AccessToken;
