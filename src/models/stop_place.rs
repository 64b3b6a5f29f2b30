//! Stop-place records as delivered by the transit network parser.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::GeoPoint;

/// Key marking a quay-less stop as an intentional parent stop
pub const KEY_IS_PARENT_STOP_PLACE: &str = "IS_PARENT_STOP_PLACE";

/// Bus submode excluded from the index
pub const RAIL_REPLACEMENT_BUS: &str = "railReplacementBus";

/// Stop place type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum StopType {
    OnstreetBus,
    OnstreetTram,
    Airport,
    RailStation,
    MetroStation,
    BusStation,
    CoachStation,
    TramStation,
    HarbourPort,
    FerryPort,
    FerryStop,
    LiftStation,
    VehicleRailInterchange,
    Other,
}

impl StopType {
    pub fn code(&self) -> &'static str {
        match self {
            StopType::OnstreetBus => "onstreetBus",
            StopType::OnstreetTram => "onstreetTram",
            StopType::Airport => "airport",
            StopType::RailStation => "railStation",
            StopType::MetroStation => "metroStation",
            StopType::BusStation => "busStation",
            StopType::CoachStation => "coachStation",
            StopType::TramStation => "tramStation",
            StopType::HarbourPort => "harbourPort",
            StopType::FerryPort => "ferryPort",
            StopType::FerryStop => "ferryStop",
            StopType::LiftStation => "liftStation",
            StopType::VehicleRailInterchange => "vehicleRailInterchange",
            StopType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransportMode {
    Bus,
    TrolleyBus,
    Tram,
    Coach,
    Rail,
    Metro,
    Air,
    Water,
    Cableway,
    Funicular,
    Lift,
    Taxi,
    #[serde(other)]
    Other,
}

/// Interchange importance tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterchangeWeighting {
    NoInterchange,
    InterchangeAllowed,
    RecommendedInterchange,
    PreferredInterchange,
}

impl InterchangeWeighting {
    pub fn code(&self) -> &'static str {
        match self {
            InterchangeWeighting::NoInterchange => "noInterchange",
            InterchangeWeighting::InterchangeAllowed => "interchangeAllowed",
            InterchangeWeighting::RecommendedInterchange => "recommendedInterchange",
            InterchangeWeighting::PreferredInterchange => "preferredInterchange",
        }
    }
}

/// Text with an optional language tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedString {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl LocalizedString {
    pub fn new(value: impl Into<String>, lang: Option<&str>) -> Self {
        Self {
            value: value.into(),
            lang: lang.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NameType {
    Alias,
    Copy,
    Label,
    Translation,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeName {
    pub name_type: NameType,
    pub name: LocalizedString,
}

impl AlternativeName {
    /// Translations with a language tag, and labels with or without one
    pub fn is_searchable(&self) -> bool {
        match self.name_type {
            NameType::Translation => self.name.lang.is_some(),
            NameType::Label => true,
            _ => false,
        }
    }
}

/// Validity interval, both ends inclusive and optional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidBetween {
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

impl ValidBetween {
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        if self.from.is_some_and(|from| from > now) {
            return false;
        }
        self.to.map_or(true, |to| to >= now)
    }
}

/// A flat stop-place record, optionally pointing at its parent stop place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopPlaceRecord {
    pub id: String,
    pub name: Option<LocalizedString>,
    pub alternative_names: Vec<AlternativeName>,
    pub description: Option<LocalizedString>,
    pub parent_ref: Option<String>,
    pub topographic_place_ref: Option<String>,
    pub centroid: Option<GeoPoint>,
    pub stop_place_type: Option<StopType>,
    pub transport_mode: Option<TransportMode>,
    /// Submode qualifier matching the stop type (e.g. "localBus", "airportLinkRail")
    pub submode: Option<String>,
    pub weighting: Option<InterchangeWeighting>,
    pub quays: Vec<String>,
    pub key_values: BTreeMap<String, String>,
    pub valid_between: Vec<ValidBetween>,
    pub tariff_zone_refs: Vec<String>,
}

impl StopPlaceRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn is_flagged_parent(&self) -> bool {
        self.key_values
            .get(KEY_IS_PARENT_STOP_PLACE)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    pub fn is_rail_replacement_bus(&self) -> bool {
        self.transport_mode == Some(TransportMode::Bus)
            && self.submode.as_deref() == Some(RAIL_REPLACEMENT_BUS)
    }
}
