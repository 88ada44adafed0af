//! Saved games.
//!
//! - `document`: the current on-disk schema
//! - `migrate`: per-entity upgrade chains for older schemas
//! - `store`: file load/save and the save-on-drop `Session`

pub mod document;
pub mod migrate;
pub mod store;

pub use document::{Document, Versions};
pub use store::{from_json, load, save, to_json, Session};
