//! Configuration loader, schema types and persisted user preferences.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior and helpers to load configuration from disk.

mod load;
mod prefs;
mod schema;

pub use prefs::Prefs;
pub use schema::*;
