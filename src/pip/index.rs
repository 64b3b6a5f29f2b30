//! Id and spatial index over administrative units.

use geo::{Contains, Point};
use hashbrown::HashMap;
use rstar::{RTree, RTreeObject, AABB};
use std::sync::Arc;
use tracing::{info, warn};

use super::AdminUnit;
use crate::models::{AdminLevel, GeoPoint};

/// Wrapper for R-tree indexing of admin units
#[derive(Clone)]
struct IndexedUnit {
    unit: Arc<AdminUnit>,
    /// Load order, used to pick a deterministic winner among overlapping regions
    ordinal: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedUnit {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedUnit {
    fn new(unit: Arc<AdminUnit>, ordinal: usize) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = unit.bbox()?;
        Some(Self {
            unit,
            ordinal,
            envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
        })
    }
}

struct LevelIndex {
    by_id: HashMap<String, Arc<AdminUnit>>,
    tree: RTree<IndexedUnit>,
}

impl LevelIndex {
    fn build(units: Vec<Arc<AdminUnit>>) -> Self {
        let mut by_id = HashMap::with_capacity(units.len());
        let mut indexed = Vec::with_capacity(units.len());

        for (ordinal, unit) in units.into_iter().enumerate() {
            if let Some(entry) = IndexedUnit::new(Arc::clone(&unit), ordinal) {
                indexed.push(entry);
            }
            by_id.entry(unit.id.clone()).or_insert(unit);
        }

        Self {
            by_id,
            tree: RTree::bulk_load(indexed),
        }
    }

    fn containing(&self, point: GeoPoint) -> Option<&Arc<AdminUnit>> {
        let query = Point::new(point.lon, point.lat);
        let envelope = AABB::from_point([point.lon, point.lat]);

        // R-tree gives envelope candidates, exact containment decides
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|iu| {
                iu.unit
                    .geometry
                    .as_ref()
                    .is_some_and(|geometry| geometry.contains(&query))
            })
            .min_by_key(|iu| iu.ordinal)
            .map(|iu| &iu.unit)
    }
}

/// Frozen reference index of localities, counties and countries.
pub struct AdminUnitIndex {
    localities: LevelIndex,
    counties: LevelIndex,
    countries: LevelIndex,
    /// Countries keyed by upper-case country reference
    countries_by_ref: HashMap<String, Arc<AdminUnit>>,
}

impl AdminUnitIndex {
    /// Build the index from admin units of all levels
    pub fn build(units: Vec<AdminUnit>) -> Self {
        info!("Building admin unit index for {} units...", units.len());

        let mut localities = Vec::new();
        let mut counties = Vec::new();
        let mut countries = Vec::new();

        for unit in units {
            let unit = Arc::new(unit);
            match unit.level {
                AdminLevel::Locality => localities.push(unit),
                AdminLevel::County => counties.push(unit),
                AdminLevel::Country => countries.push(unit),
                other => warn!("Ignoring admin unit {} with level {:?}", unit.id, other),
            }
        }

        let mut countries_by_ref = HashMap::new();
        for country in &countries {
            if let Some(country_ref) = &country.country_ref {
                countries_by_ref
                    .entry(country_ref.to_uppercase())
                    .or_insert_with(|| Arc::clone(country));
            }
        }

        let index = Self {
            localities: LevelIndex::build(localities),
            counties: LevelIndex::build(counties),
            countries: LevelIndex::build(countries),
            countries_by_ref,
        };

        for level in [AdminLevel::Locality, AdminLevel::County, AdminLevel::Country] {
            if let Some(li) = index.level(level) {
                info!(
                    "  {:?}: {} units, {} with geometry",
                    level,
                    li.by_id.len(),
                    li.tree.size()
                );
            }
        }

        index
    }

    fn level(&self, level: AdminLevel) -> Option<&LevelIndex> {
        match level {
            AdminLevel::Locality => Some(&self.localities),
            AdminLevel::County => Some(&self.counties),
            AdminLevel::Country => Some(&self.countries),
            _ => None,
        }
    }

    /// Look up a unit by id at the given level
    pub fn by_id(&self, level: AdminLevel, id: &str) -> Option<&AdminUnit> {
        self.level(level)?.by_id.get(id).map(Arc::as_ref)
    }

    /// Find the unit at the given level whose region contains the point.
    ///
    /// Overlapping regions resolve to the unit loaded first.
    pub fn containing(&self, level: AdminLevel, point: Option<GeoPoint>) -> Option<&AdminUnit> {
        self.level(level)?.containing(point?).map(Arc::as_ref)
    }

    /// Find the country unit for a two-letter country reference
    pub fn country_for_ref(&self, country_ref: &str) -> Option<&AdminUnit> {
        self.countries_by_ref
            .get(&country_ref.to_uppercase())
            .map(Arc::as_ref)
    }

    /// Get total number of indexed units
    pub fn len(&self) -> usize {
        self.localities.by_id.len() + self.counties.by_id.len() + self.countries.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
