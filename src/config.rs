//! Settings for the soundboard.
//!
//! `schema` holds the TOML-facing structs; `load` layers the config file
//! and `CLIPDECK__*` environment variables and resolves the data paths.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
