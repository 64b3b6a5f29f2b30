//! Maps address register rows to search documents.

use std::sync::Arc;
use tracing::info;

use crate::models::{
    AddressParts, AdminLevel, DocumentId, GeoPoint, Layer, ParentChain, ParentField,
    SearchDocument, SourceAddress,
};
use crate::projection::{utm_zone_for_code, ProjectionError, Projector};

/// Builds one address document per register row
pub struct AddressDocumentBuilder {
    source: String,
    popularity: u64,
    projector: Arc<dyn Projector>,
}

impl AddressDocumentBuilder {
    pub fn new(source: impl Into<String>, popularity: u64, projector: Arc<dyn Projector>) -> Self {
        Self {
            source: source.into(),
            popularity,
            projector,
        }
    }

    pub fn build(&self, addr: &SourceAddress) -> SearchDocument {
        let mut doc = SearchDocument::new(DocumentId::new(&self.source, Layer::Address, &addr.id));

        let house_number = addr.house_number();
        let street = addr.street_name.as_deref().unwrap_or_default();
        doc.set_default_name(format!("{} {}", house_number, street).trim());

        doc.center_point = match self.center_point(addr) {
            Ok(point) => point,
            Err(e) => {
                info!(
                    "No center point for address {} (coordinate system {}): {}",
                    addr.id,
                    addr.coordinate_system.as_deref().unwrap_or("none"),
                    e
                );
                None
            }
        };

        doc.parent = self.parent_chain(addr);

        if let Some(address_type) = addr.address_type.as_deref().filter(|t| !t.is_empty()) {
            doc.add_category(address_type);
        }

        doc.popularity = self.popularity;
        doc.address = Some(AddressParts {
            street: addr.street_name.clone(),
            number: Some(house_number).filter(|n| !n.is_empty()),
            zip: addr.postal_code.clone(),
        });

        doc
    }

    /// `Ok(None)` when either coordinate is missing
    fn center_point(&self, addr: &SourceAddress) -> Result<Option<GeoPoint>, ProjectionError> {
        let (Some(easting), Some(northing)) = (addr.easting, addr.northing) else {
            return Ok(None);
        };

        let code = addr.coordinate_system.as_deref().unwrap_or_default();
        let zone = utm_zone_for_code(code)
            .ok_or_else(|| ProjectionError::UnknownCoordinateSystem(code.to_string()))?;

        self.projector.project(easting, northing, zone).map(Some)
    }

    fn parent_chain(&self, addr: &SourceAddress) -> ParentChain {
        let mut chain = ParentChain::default();

        let levels = [
            (
                AdminLevel::Locality,
                &addr.municipality_code,
                &addr.municipality_name,
            ),
            (AdminLevel::PostalCode, &addr.postal_code, &addr.postal_area),
            (AdminLevel::Borough, &addr.borough_code, &addr.borough_name),
        ];

        for (level, code, name) in levels {
            if let Some(code) = code {
                let name = capitalize(name.as_deref().unwrap_or_default());
                chain.set(level, ParentField::new(code, name, &self.source));
            }
        }

        chain
    }
}

/// Lower-case a name and upper-case its first letter ("OSLO" -> "Oslo")
pub fn capitalize(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::UtmProjector;

    fn builder() -> AddressDocumentBuilder {
        AddressDocumentBuilder::new("kartverket", 2, Arc::new(UtmProjector))
    }

    fn storgata() -> SourceAddress {
        SourceAddress {
            id: "A1".to_string(),
            municipality_code: Some("0301".to_string()),
            municipality_name: Some("OSLO".to_string()),
            address_type: Some("vegadresse".to_string()),
            street_name: Some("Storgata".to_string()),
            number: Some("12".to_string()),
            letter: Some("B".to_string()),
            coordinate_system: Some("25832".to_string()),
            northing: Some(6_643_000.0),
            easting: Some(597_000.0),
            postal_code: Some("0155".to_string()),
            postal_area: Some("OSLO".to_string()),
            borough_code: Some("030101".to_string()),
            borough_name: Some("GAMLE OSLO".to_string()),
        }
    }

    #[test]
    fn test_build_address_document() {
        let doc = builder().build(&storgata());

        assert_eq!(doc.id.source_id, "A1");
        assert_eq!(doc.layer(), Layer::Address);
        assert_eq!(doc.default_name(), Some("12B Storgata"));
        assert_eq!(doc.categories, vec!["vegadresse"]);
        assert_eq!(doc.popularity, 2);

        let locality = doc.parent.get(AdminLevel::Locality).unwrap();
        assert_eq!(locality.id, "0301");
        assert_eq!(locality.name, "Oslo");
        assert_eq!(locality.source, "kartverket");
        assert_eq!(doc.parent.get(AdminLevel::Borough).unwrap().name, "Gamle oslo");
        assert_eq!(doc.parent.id_for(AdminLevel::PostalCode), Some("0155"));

        let address = doc.address.as_ref().unwrap();
        assert_eq!(address.street.as_deref(), Some("Storgata"));
        assert_eq!(address.number.as_deref(), Some("12B"));
        assert_eq!(address.zip.as_deref(), Some("0155"));

        let center = doc.center_point.unwrap();
        assert!((center.lat - 59.913_063_652).abs() < 1e-6);
        assert!((center.lon - 10.734_629_823).abs() < 1e-6);
    }

    #[test]
    fn test_missing_coordinate_gives_no_center() {
        let mut addr = storgata();
        addr.northing = None;
        assert!(builder().build(&addr).center_point.is_none());

        let mut addr = storgata();
        addr.easting = None;
        assert!(builder().build(&addr).center_point.is_none());
    }

    #[test]
    fn test_unknown_coordinate_system_is_not_fatal() {
        let mut addr = storgata();
        addr.coordinate_system = Some("4326".to_string());

        let doc = builder().build(&addr);
        assert!(doc.center_point.is_none());
        assert_eq!(doc.default_name(), Some("12B Storgata"));
    }

    #[test]
    fn test_sparse_record() {
        let addr = SourceAddress {
            id: "A2".to_string(),
            street_name: Some("Kirkeveien".to_string()),
            ..Default::default()
        };

        let doc = builder().build(&addr);
        assert_eq!(doc.default_name(), Some("Kirkeveien"));
        assert!(doc.parent.is_empty());
        assert!(doc.categories.is_empty());
        assert!(doc.address.as_ref().unwrap().number.is_none());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("OSLO"), "Oslo");
        assert_eq!(capitalize("ÅLESUND"), "Ålesund");
        assert_eq!(capitalize(""), "");
    }
}
