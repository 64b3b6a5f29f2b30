use serde::{Deserialize, Serialize};

/// One row of the national address register.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceAddress {
    pub id: String,
    pub municipality_code: Option<String>,
    pub municipality_name: Option<String>,
    pub address_type: Option<String>,
    pub street_name: Option<String>,
    pub number: Option<String>,
    pub letter: Option<String>,
    /// Government-assigned coordinate system code (e.g. "25832")
    pub coordinate_system: Option<String>,
    pub northing: Option<f64>,
    pub easting: Option<f64>,
    pub postal_code: Option<String>,
    pub postal_area: Option<String>,
    pub borough_code: Option<String>,
    pub borough_name: Option<String>,
}

impl SourceAddress {
    /// House number with letter suffix, e.g. "12B"
    pub fn house_number(&self) -> String {
        format!(
            "{}{}",
            self.number.as_deref().unwrap_or_default(),
            self.letter.as_deref().unwrap_or_default()
        )
    }
}
