//! Stop-place documents.
//!
//! Flat records are assembled into a forest, filtered by the validity gate,
//! and expanded into one document per distinct name, ranked by popularity.

mod builder;
pub mod hierarchy;
mod loader;
pub mod names;
pub mod popularity;
mod validity;

pub use builder::{StopPlaceDocumentBuilder, NOT_AN_ADDRESS_PREFIX};
pub use hierarchy::{NodeId, StopPlaceForest, StopPlaceNode};
pub use loader::load_stop_places;
pub use names::NameResolver;
pub use popularity::{BoostConfig, PopularityScorer};
pub use validity::is_exportable;
