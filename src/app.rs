//! Application module: exposes the view model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the cursor, the import
//! prompt and any pending alert.

mod model;

pub use model::*;
