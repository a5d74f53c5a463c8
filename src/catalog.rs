//! The sound catalog: entries, their persistence, and first-run seeding.

mod entries;
mod model;
mod persist;
mod seed;

pub use entries::SoundCatalog;
pub use model::{CatalogEntry, EntryId, SoundSource};
