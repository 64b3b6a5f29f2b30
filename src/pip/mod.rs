//! Administrative parent lookup.
//!
//! Holds the admin unit reference data in id maps and R-tree spatial
//! indexes, and resolves parent chains by reference or point-in-polygon.

mod boundary;
pub mod geometry;
pub(crate) mod index;
mod resolver;

pub use boundary::{load_admin_units, AdminUnit, AdminUnitRecord};
pub use index::AdminUnitIndex;
pub use resolver::{FallbackCountry, ParentResolver};
