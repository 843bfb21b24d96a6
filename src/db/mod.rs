//! Database module for windstats.
//!
//! Provides append-only SQLite storage for derived stat rows.

mod models;
mod store;

pub use models::*;
pub use store::*;
