//! Core data models for the document-assembly pipeline.

pub mod address;
pub mod admin;
pub mod document;
pub mod stop_place;

pub use address::SourceAddress;
pub use admin::{AdminLevel, ParentChain, ParentField};
pub use document::{AddressParts, DocumentId, GeoPoint, Layer, SearchDocument};
pub use stop_place::{
    AlternativeName, InterchangeWeighting, LocalizedString, NameType, StopPlaceRecord, StopType,
    TransportMode, ValidBetween,
};
