//! Resolves the administrative parent chain for a point and/or a topographic reference.

use serde::Deserialize;
use tracing::debug;

use super::{AdminUnit, AdminUnitIndex};
use crate::models::{AdminLevel, GeoPoint, ParentChain, ParentField};

/// Synthetic country attached to localities whose country reference matches
/// `country_ref` when the reference data holds no such country.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FallbackCountry {
    pub country_ref: String,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub abbr: Option<String>,
}

/// Parent chain lookup against a frozen [`AdminUnitIndex`]
pub struct ParentResolver<'a> {
    index: &'a AdminUnitIndex,
    source: String,
    fallback_country: Option<FallbackCountry>,
}

impl<'a> ParentResolver<'a> {
    pub fn new(index: &'a AdminUnitIndex, source: impl Into<String>) -> Self {
        Self {
            index,
            source: source.into(),
            fallback_country: None,
        }
    }

    pub fn with_fallback_country(mut self, fallback: Option<FallbackCountry>) -> Self {
        self.fallback_country = fallback;
        self
    }

    /// Build the parent chain, most specific level first:
    /// locality by id, locality by point, county by id, county by point,
    /// country by id, country by point. A miss at every step yields an empty chain.
    pub fn resolve_topographic(
        &self,
        explicit_ref: Option<&str>,
        point: Option<GeoPoint>,
    ) -> ParentChain {
        let explicit_ref = explicit_ref.filter(|r| !r.trim().is_empty());

        if let Some(locality) = self.find(AdminLevel::Locality, explicit_ref, point) {
            return self.chain_for_locality(locality);
        }
        if let Some(county) = self.find(AdminLevel::County, explicit_ref, point) {
            return self.chain_for_county(county);
        }
        if let Some(country) = self.find(AdminLevel::Country, explicit_ref, point) {
            let mut chain = ParentChain::default();
            chain.set(AdminLevel::Country, self.field(country));
            return chain;
        }

        debug!(
            "No admin parent found for ref {:?} at {:?}",
            explicit_ref, point
        );
        ParentChain::default()
    }

    fn find(
        &self,
        level: AdminLevel,
        explicit_ref: Option<&str>,
        point: Option<GeoPoint>,
    ) -> Option<&'a AdminUnit> {
        explicit_ref
            .and_then(|id| self.index.by_id(level, id))
            .or_else(|| self.index.containing(level, point))
    }

    fn chain_for_locality(&self, locality: &AdminUnit) -> ParentChain {
        let mut chain = ParentChain::default();
        chain.set(AdminLevel::Locality, self.field(locality));

        if let Some(county) = locality
            .parent_id
            .as_deref()
            .and_then(|id| self.index.by_id(AdminLevel::County, id))
        {
            chain.set(AdminLevel::County, self.field(county));
        }

        if let Some(country_ref) = locality.country_ref.as_deref() {
            if let Some(country) = self.index.country_for_ref(country_ref) {
                chain.set(AdminLevel::Country, self.field(country));
            } else if let Some(fallback) = self
                .fallback_country
                .as_ref()
                .filter(|f| f.country_ref.eq_ignore_ascii_case(country_ref))
            {
                chain.set(
                    AdminLevel::Country,
                    ParentField::new(&fallback.id, &fallback.name, &self.source)
                        .with_abbr(fallback.abbr.clone()),
                );
            }
        }

        chain
    }

    fn chain_for_county(&self, county: &AdminUnit) -> ParentChain {
        let mut chain = ParentChain::default();
        chain.set(AdminLevel::County, self.field(county));

        if let Some(country) = county
            .country_ref
            .as_deref()
            .and_then(|r| self.index.country_for_ref(r))
        {
            chain.set(AdminLevel::Country, self.field(country));
        }

        chain
    }

    fn field(&self, unit: &AdminUnit) -> ParentField {
        ParentField::new(&unit.id, &unit.name, &self.source).with_abbr(unit.abbr.clone())
    }
}
