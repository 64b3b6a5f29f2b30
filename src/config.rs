use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::address::StreetCategoryPolicy;
use crate::pip::FallbackCountry;
use crate::stop_place::BoostConfig;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub export: ExportConfig,
    pub address: AddressConfig,
    pub parents: ParentsConfig,
    pub stop_place: StopPlaceConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    /// Index name written to every row
    pub index: String,
    /// Source tag for address documents and parent fields
    pub source: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            index: "pelias".to_string(),
            source: "kartverket".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AddressConfig {
    pub popularity: u64,
    pub street_popularity: u64,
    pub street_categories: StreetCategoryPolicy,
}

impl Default for AddressConfig {
    fn default() -> Self {
        Self {
            popularity: 2,
            street_popularity: 2,
            street_categories: StreetCategoryPolicy::Street,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ParentsConfig {
    /// Synthetic country for localities whose country is missing from the
    /// reference data. Disabled unless set.
    pub fallback_country: Option<FallbackCountry>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StopPlaceConfig {
    /// Source tag for stop-place documents
    pub source: String,
    /// Language for untagged descriptions and the default alias
    pub default_language: String,
    pub boost: BoostConfig,
}

impl Default for StopPlaceConfig {
    fn default() -> Self {
        Self {
            source: "nsr".to_string(),
            default_language: "no".to_string(),
            boost: BoostConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.export.index, "pelias");
        assert_eq!(config.export.source, "kartverket");
        assert_eq!(config.address.popularity, 2);
        assert_eq!(config.address.street_categories, StreetCategoryPolicy::Street);
        assert!(config.parents.fallback_country.is_none());
        assert_eq!(config.stop_place.default_language, "no");
        assert_eq!(config.stop_place.boost.default_value, 1000);
    }

    #[test]
    fn test_load_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            r#"
[export]
index = "geocoder"

[address]
street_categories = "street_and_address"

[parents.fallback_country]
country_ref = "NO"
id = "FAKE-ID"
name = "Norway"
abbr = "NOR"

[stop_place.boost]
default_value = 50

[stop_place.boost.interchange_factors]
preferredInterchange = 10.0

[stop_place.boost.stop_type_factors.railStation]
"*" = 2.0
airportLinkRail = 3.0
"#,
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.export.index, "geocoder");
        assert_eq!(config.export.source, "kartverket");
        assert_eq!(
            config.address.street_categories,
            StreetCategoryPolicy::StreetAndAddress
        );
        assert_eq!(
            config.parents.fallback_country.unwrap().abbr.as_deref(),
            Some("NOR")
        );

        let boost = &config.stop_place.boost;
        assert_eq!(boost.default_value, 50);
        assert_eq!(boost.interchange_factors["preferredInterchange"], 10.0);
        assert_eq!(boost.stop_type_factors["railStation"]["*"], 2.0);
        assert_eq!(boost.stop_type_factors["railStation"]["airportLinkRail"], 3.0);
    }

    #[test]
    fn test_sample_config_parses() {
        let config =
            Config::load_from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/config/placedoc.toml"))
                .unwrap();
        assert!(config.parents.fallback_country.is_some());
        assert_eq!(config.stop_place.boost.stop_type_factors["airport"]["*"], 3.0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::load_from_file("/nonexistent/placedoc.toml").is_err());
    }
}
