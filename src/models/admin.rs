//! Administrative parent chain attached to every search document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Administrative levels a document can be parented to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
    Country,
    County,
    Locality,
    Borough,
    #[serde(rename = "postalcode")]
    PostalCode,
}

impl AdminLevel {
    /// Key used for this level in the `parent_json` column
    pub fn field_name(&self) -> &'static str {
        match self {
            AdminLevel::Country => "country",
            AdminLevel::County => "county",
            AdminLevel::Locality => "locality",
            AdminLevel::Borough => "borough",
            AdminLevel::PostalCode => "postalcode",
        }
    }
}

/// Single entry in a parent chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentField {
    pub id: String,
    pub name: String,

    /// Abbreviation (e.g. "NOR" for Norway)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbr: Option<String>,

    pub source: String,
}

impl ParentField {
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            abbr: None,
            source: source.into(),
        }
    }

    pub fn with_abbr(mut self, abbr: Option<String>) -> Self {
        self.abbr = abbr;
        self
    }

    /// A field is only emitted when both id and name carry text.
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && !self.name.trim().is_empty()
    }
}

/// Parent chain keyed by level, at most one field per level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentChain {
    fields: BTreeMap<AdminLevel, ParentField>,
}

impl ParentChain {
    /// Set (or replace) the field for a level
    pub fn set(&mut self, level: AdminLevel, field: ParentField) {
        self.fields.insert(level, field);
    }

    pub fn get(&self, level: AdminLevel) -> Option<&ParentField> {
        self.fields.get(&level)
    }

    pub fn id_for(&self, level: AdminLevel) -> Option<&str> {
        self.get(level).map(|f| f.id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over fields that may be emitted, in level order
    pub fn valid_fields(&self) -> impl Iterator<Item = (AdminLevel, &ParentField)> {
        self.fields
            .iter()
            .filter(|(_, field)| field.is_valid())
            .map(|(level, field)| (*level, field))
    }
}
