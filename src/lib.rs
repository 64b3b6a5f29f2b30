//! Placedoc - search document assembly for a geocoder
//!
//! Turns address register rows and stop-place records into ranked search
//! documents with administrative parents, and encodes them as importer CSV.

pub mod address;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod pip;
pub mod pipeline;
pub mod projection;
pub mod source;
pub mod stop_place;

pub use error::{Error, Result};
pub use models::{Layer, SearchDocument};
