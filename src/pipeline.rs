//! Entry points composing the producers and the serializer.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::address::{AddressDocumentBuilder, AddressReader, StreetAggregator};
use crate::config::Config;
use crate::models::{SearchDocument, SourceAddress, StopPlaceRecord};
use crate::output::DocumentSerializer;
use crate::pip::{AdminUnitIndex, ParentResolver};
use crate::projection::UtmProjector;
use crate::stop_place::{PopularityScorer, StopPlaceDocumentBuilder};
use crate::{Error, Result};

/// Read the address register, skipping malformed rows
pub fn load_addresses(path: &Path) -> Result<Vec<SourceAddress>> {
    info!("Loading addresses from {}", path.display());

    let mut reader = AddressReader::from_path(path)?;
    let mut addresses = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        match record {
            Ok(address) => addresses.push(address),
            Err(e @ Error::MalformedRecord { .. }) => {
                warn!("Skipping address row: {}", e);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!("Loaded {} addresses ({} skipped)", addresses.len(), skipped);
    Ok(addresses)
}

/// Address documents followed by the street documents aggregated from them.
/// Documents without a center point are dropped after aggregation.
pub fn build_address_documents(addresses: &[SourceAddress], config: &Config) -> Vec<SearchDocument> {
    let builder = AddressDocumentBuilder::new(
        &config.export.source,
        config.address.popularity,
        Arc::new(UtmProjector),
    );

    let mut docs: Vec<SearchDocument> = addresses.par_iter().map(|a| builder.build(a)).collect();
    info!("Built {} address documents", docs.len());

    let streets = StreetAggregator::new(
        &config.export.source,
        config.address.street_popularity,
        config.address.street_categories,
    )
    .aggregate(&docs);

    docs.extend(streets);

    let total = docs.len();
    docs.retain(SearchDocument::is_valid);
    info!(
        "Kept {} address and street documents ({} without center point dropped)",
        docs.len(),
        total - docs.len()
    );
    docs
}

/// Stop-place documents ranked by popularity, evaluated at `now`
pub fn build_stop_place_documents(
    records: Vec<StopPlaceRecord>,
    admin_index: &AdminUnitIndex,
    config: &Config,
    now: DateTime<Utc>,
) -> Vec<SearchDocument> {
    let resolver = ParentResolver::new(admin_index, &config.export.source)
        .with_fallback_country(config.parents.fallback_country.clone());

    StopPlaceDocumentBuilder::new(
        &config.stop_place.source,
        &config.stop_place.default_language,
        PopularityScorer::new(config.stop_place.boost.clone()),
        resolver,
        now,
    )
    .build(records)
}

/// Write the combined export for the configured index
pub fn write_export(docs: &[SearchDocument], config: &Config, path: &Path) -> Result<()> {
    DocumentSerializer::new(&config.export.index).write_to_path(docs, path)?;
    info!("Exported {} documents to {}", docs.len(), path.display());
    Ok(())
}
