//! Administrative units loaded from the reference dataset.

use geo::{BoundingRect, MultiPolygon};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

use super::geometry::{to_multipolygon, PolygonRings};
use crate::models::AdminLevel;
use crate::Result;

/// A locality, county or country with its region geometry
#[derive(Debug, Clone)]
pub struct AdminUnit {
    pub id: String,
    pub name: String,
    pub level: AdminLevel,
    pub parent_id: Option<String>,
    /// Two-letter country code (e.g. "NO")
    pub country_ref: Option<String>,
    /// Abbreviation, used for countries (e.g. "NOR")
    pub abbr: Option<String>,
    pub geometry: Option<MultiPolygon<f64>>,
}

impl AdminUnit {
    /// Get the bounding box of this unit's region
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        self.geometry
            .as_ref()?
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }
}

/// Serialized form of an admin unit in the reference file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUnitRecord {
    pub id: String,
    pub name: String,
    pub level: AdminLevel,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub country_ref: Option<String>,
    #[serde(default)]
    pub abbr: Option<String>,
    #[serde(default)]
    pub polygons: Vec<PolygonRings>,
}

impl From<AdminUnitRecord> for AdminUnit {
    fn from(record: AdminUnitRecord) -> Self {
        let geometry = to_multipolygon(&record.polygons);
        if geometry.is_none() {
            debug!("No usable geometry for admin unit {}", record.id);
        }

        Self {
            id: record.id,
            name: record.name,
            level: record.level,
            parent_id: record.parent_id,
            country_ref: record.country_ref,
            abbr: record.abbr,
            geometry,
        }
    }
}

/// Load admin units from a JSON array of [`AdminUnitRecord`]s
pub fn load_admin_units(path: &Path) -> Result<Vec<AdminUnit>> {
    info!("Loading admin units from {}", path.display());

    let file = File::open(path)?;
    let records: Vec<AdminUnitRecord> = serde_json::from_reader(BufReader::new(file))?;
    let units: Vec<AdminUnit> = records.into_iter().map(AdminUnit::from).collect();

    info!("Loaded {} admin units", units.len());
    Ok(units)
}
