//! Popularity scoring for stop places.
//!
//! popularity = default_value
//!            * sum(stop type/submode factors)   (only if the sum is positive)
//!            * interchange factor               (only if configured)
//!
//! truncated to an integer after each step.

use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{InterchangeWeighting, StopType};

/// Submode key holding the factor for all submodes of a stop type
pub const ALL_SUBMODES: &str = "*";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    pub default_value: u64,
    /// Interchange weighting code (e.g. "preferredInterchange") to factor
    pub interchange_factors: HashMap<String, f64>,
    /// Stop type code to submode (or `*`) to factor
    pub stop_type_factors: HashMap<String, HashMap<String, f64>>,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            default_value: 1000,
            interchange_factors: HashMap::new(),
            stop_type_factors: HashMap::new(),
        }
    }
}

pub struct PopularityScorer {
    config: BoostConfig,
}

impl PopularityScorer {
    pub fn new(config: BoostConfig) -> Self {
        Self { config }
    }

    /// Score a stop place from the (type, submode) pairs of itself and its
    /// descendants, and its own interchange weighting.
    pub fn score(
        &self,
        types: &[(StopType, Option<&str>)],
        interchange: Option<InterchangeWeighting>,
    ) -> u64 {
        let mut popularity = self.config.default_value;

        let factor_sum: f64 = types
            .iter()
            .map(|&(stop_type, submode)| self.type_factor(stop_type, submode))
            .sum();
        if factor_sum > 0.0 {
            popularity = scale(popularity, factor_sum);
        }

        if let Some(factor) = interchange
            .and_then(|weighting| self.config.interchange_factors.get(weighting.code()))
        {
            popularity = scale(popularity, *factor);
        }

        popularity
    }

    /// Submode factor, falling back to the type's `*` factor. A configured
    /// type without either counts as 1, an unconfigured type as 0.
    fn type_factor(&self, stop_type: StopType, submode: Option<&str>) -> f64 {
        let Some(factors) = self.config.stop_type_factors.get(stop_type.code()) else {
            return 0.0;
        };

        submode
            .and_then(|s| factors.get(s))
            .or_else(|| factors.get(ALL_SUBMODES))
            .copied()
            .unwrap_or(1.0)
    }
}

/// Multiply and truncate; negative results clamp to zero
fn scale(popularity: u64, factor: f64) -> u64 {
    (popularity as f64 * factor) as u64
}
