//! Address register documents: one per address row plus one per street.

mod builder;
pub mod reader;
mod street;

pub use builder::{capitalize, AddressDocumentBuilder};
pub use reader::AddressReader;
pub use street::{StreetAggregator, StreetCategoryPolicy};
