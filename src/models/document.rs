//! Search document structure exported to the geocoder index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ParentChain;

/// Key of the default entry in the name, alias and description maps
pub const DEFAULT_KEY: &str = "default";

/// Key of the display hint in the name map
pub const DISPLAY_KEY: &str = "display";

/// Layer/type of the document, used for query filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Single street addresses
    Address,
    /// Streets aggregated from addresses
    Street,
    /// Stop places with neither parent nor children
    StopPlace,
    /// Multimodal parent stop places
    StopPlaceParent,
    /// Children of multimodal stop places
    StopPlaceChild,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Address => "address",
            Layer::Street => "street",
            Layer::StopPlace => "stop_place",
            Layer::StopPlaceParent => "stop_place_parent",
            Layer::StopPlaceChild => "stop_place_child",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic point (WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Address components
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

impl AddressParts {
    pub fn street_only(street: impl Into<String>) -> Self {
        Self {
            street: Some(street.into()),
            ..Default::default()
        }
    }

    /// Street name, if it carries any text
    pub fn street_name(&self) -> Option<&str> {
        self.street.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Composite document identifier: source tag, layer, source id and an optional
/// suffix separating several documents generated from one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId {
    pub source: String,
    pub layer: Layer,
    pub source_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<u32>,
}

impl DocumentId {
    pub fn new(source: impl Into<String>, layer: Layer, source_id: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            layer,
            source_id: source_id.into(),
            suffix: None,
        }
    }

    pub fn with_suffix(mut self, suffix: Option<u32>) -> Self {
        self.suffix = suffix;
        self
    }

    /// Source id as exported: `{source_id}` or `{source_id}-{suffix}`
    pub fn export_id(&self) -> String {
        match self.suffix {
            Some(suffix) => format!("{}-{}", self.source_id, suffix),
            None => self.source_id.clone(),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.layer, self.export_id())
    }
}

/// One searchable place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub id: DocumentId,

    /// Multilingual names: {"default": "...", "en": "...", "display": "..."}
    pub names: BTreeMap<String, String>,

    /// Multilingual aliases, same shape as `names`
    pub aliases: BTreeMap<String, String>,

    /// Free-text descriptions keyed by language
    pub descriptions: BTreeMap<String, String>,

    pub categories: Vec<String>,

    pub center_point: Option<GeoPoint>,

    pub address: Option<AddressParts>,

    pub parent: ParentChain,

    pub popularity: u64,

    pub tariff_zones: Vec<String>,

    pub tariff_zone_authorities: Vec<String>,
}

impl SearchDocument {
    pub fn new(id: DocumentId) -> Self {
        Self {
            id,
            names: BTreeMap::new(),
            aliases: BTreeMap::new(),
            descriptions: BTreeMap::new(),
            categories: Vec::new(),
            center_point: None,
            address: None,
            parent: ParentChain::default(),
            popularity: 1,
            tariff_zones: Vec::new(),
            tariff_zone_authorities: Vec::new(),
        }
    }

    pub fn layer(&self) -> Layer {
        self.id.layer
    }

    pub fn default_name(&self) -> Option<&str> {
        self.names.get(DEFAULT_KEY).map(String::as_str)
    }

    pub fn set_default_name(&mut self, name: impl Into<String>) {
        self.names.insert(DEFAULT_KEY.to_string(), name.into());
    }

    pub fn add_name(&mut self, lang: &str, name: impl Into<String>) {
        self.names.insert(lang.to_string(), name.into());
    }

    pub fn default_alias(&self) -> Option<&str> {
        self.aliases.get(DEFAULT_KEY).map(String::as_str)
    }

    pub fn add_alias(&mut self, lang: &str, alias: impl Into<String>) {
        self.aliases.insert(lang.to_string(), alias.into());
    }

    pub fn add_description(&mut self, lang: &str, description: impl Into<String>) {
        self.descriptions.insert(lang.to_string(), description.into());
    }

    /// Add a category unless it is already present
    pub fn add_category(&mut self, category: &str) {
        if !self.categories.iter().any(|c| c == category) {
            self.categories.push(category.to_string());
        }
    }

    /// Documents without a center point are never exported.
    pub fn is_valid(&self) -> bool {
        self.center_point.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_id_appends_suffix() {
        let id = DocumentId::new("nsr", Layer::StopPlace, "NSR:StopPlace:1");
        assert_eq!(id.export_id(), "NSR:StopPlace:1");
        assert_eq!(id.with_suffix(Some(2)).export_id(), "NSR:StopPlace:1-2");
    }

    #[test]
    fn test_categories_stay_distinct() {
        let mut doc = SearchDocument::new(DocumentId::new("src", Layer::Street, "x"));
        doc.add_category("street");
        doc.add_category("address");
        doc.add_category("street");
        assert_eq!(doc.categories, vec!["street", "address"]);
    }

    #[test]
    fn test_document_without_center_is_invalid() {
        let mut doc = SearchDocument::new(DocumentId::new("src", Layer::Address, "1"));
        assert!(!doc.is_valid());
        doc.center_point = Some(GeoPoint::new(59.9, 10.7));
        assert!(doc.is_valid());
    }

    #[test]
    fn test_street_name_ignores_blank() {
        assert_eq!(AddressParts::street_only("  ").street_name(), None);
        assert_eq!(AddressParts::street_only("Storgata").street_name(), Some("Storgata"));
    }
}
