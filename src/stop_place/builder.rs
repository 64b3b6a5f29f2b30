//! Stop-place documents: one per distinct name per exportable node.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::hierarchy::{NodeId, StopPlaceForest};
use super::names::NameResolver;
use super::popularity::PopularityScorer;
use super::validity::is_exportable;
use crate::models::document::{DEFAULT_KEY, DISPLAY_KEY};
use crate::models::{
    AddressParts, DocumentId, Layer, NameType, SearchDocument, StopPlaceRecord, StopType,
};
use crate::pip::ParentResolver;

/// Prefix of the synthetic street stamped on stop places. The indexer merges
/// documents with equal name, layer, parent and street; a unique street keeps
/// same-named stops apart.
pub const NOT_AN_ADDRESS_PREFIX: &str = "NOT_AN_ADDRESS-";

pub struct StopPlaceDocumentBuilder<'a> {
    source: String,
    default_language: String,
    scorer: PopularityScorer,
    resolver: ParentResolver<'a>,
    now: DateTime<Utc>,
}

/// Values shared by every document of one node
struct NodeContext<'f> {
    record: &'f StopPlaceRecord,
    layer: Layer,
    categories: Vec<&'static str>,
    popularity: u64,
    aliases: BTreeMap<String, String>,
}

impl<'a> StopPlaceDocumentBuilder<'a> {
    pub fn new(
        source: impl Into<String>,
        default_language: impl Into<String>,
        scorer: PopularityScorer,
        resolver: ParentResolver<'a>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            source: source.into(),
            default_language: default_language.into(),
            scorer,
            resolver,
            now,
        }
    }

    /// Build documents for all records, most popular first. Documents without
    /// a center point are dropped after sorting.
    pub fn build(&self, records: Vec<StopPlaceRecord>) -> Vec<SearchDocument> {
        let forest = StopPlaceForest::build(records);
        let names = NameResolver::new(&forest);
        let nodes = forest.pre_order();
        info!("Built stop place forest with {} nodes", nodes.len());

        let mut docs: Vec<SearchDocument> = nodes
            .par_iter()
            .filter(|&&node| {
                let exportable = is_exportable(forest.record(node), self.now);
                if !exportable {
                    debug!("Skipping stop place {}", forest.record(node).id);
                }
                exportable
            })
            .flat_map_iter(|&node| self.node_documents(&forest, &names, node))
            .collect();

        // stable, so equal popularity keeps forest order
        docs.sort_by(|a, b| b.popularity.cmp(&a.popularity));

        let total = docs.len();
        docs.retain(SearchDocument::is_valid);
        info!(
            "Built {} stop place documents ({} without center point dropped)",
            docs.len(),
            total - docs.len()
        );

        docs
    }

    fn node_documents(
        &self,
        forest: &StopPlaceForest,
        names: &NameResolver<'_>,
        node: NodeId,
    ) -> Vec<SearchDocument> {
        let record = forest.record(node);
        let subtree = forest.subtree(node);

        let types: Vec<(StopType, Option<&str>)> = subtree
            .iter()
            .map(|&n| forest.record(n))
            .filter_map(|r| r.stop_place_type.map(|t| (t, r.submode.as_deref())))
            .collect();

        let mut categories: Vec<&'static str> = Vec::new();
        for (stop_type, _) in &types {
            if !categories.contains(&stop_type.code()) {
                categories.push(stop_type.code());
            }
        }

        let ctx = NodeContext {
            record,
            layer: layer_for(forest, node),
            categories,
            popularity: self.scorer.score(&types, record.weighting),
            aliases: names.aliases(node),
        };

        let mut template = self.template(&ctx);
        if let Some(display) = names.closest_name(node) {
            template.add_name(DISPLAY_KEY, &display.value);
            if let Some(lang) = &display.lang {
                template.add_name(lang, &display.value);
            }
        }

        names
            .searchable_names(node)
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let mut doc = template.clone();
                if idx > 0 {
                    doc.id = doc.id.with_suffix(Some(idx as u32));
                }
                doc.set_default_name(name);
                doc
            })
            .collect()
    }

    /// Everything but the default name
    fn template(&self, ctx: &NodeContext<'_>) -> SearchDocument {
        let record = ctx.record;
        let mut doc = SearchDocument::new(DocumentId::new(&self.source, ctx.layer, &record.id));

        for alt in &record.alternative_names {
            if alt.name_type == NameType::Translation {
                if let Some(lang) = &alt.name.lang {
                    doc.add_name(lang, &alt.name.value);
                }
            }
        }

        for (lang, alias) in &ctx.aliases {
            doc.add_alias(lang, alias);
        }
        if doc.default_alias().is_none() {
            let fallback = ctx
                .aliases
                .get(&self.default_language)
                .or_else(|| ctx.aliases.values().next())
                .cloned();
            if let Some(alias) = fallback {
                doc.add_alias(DEFAULT_KEY, alias);
            }
        }

        if let Some(description) = record
            .description
            .as_ref()
            .filter(|d| !d.value.trim().is_empty())
        {
            let lang = description.lang.as_deref().unwrap_or(&self.default_language);
            doc.add_description(lang, &description.value);
        }

        for category in &ctx.categories {
            doc.add_category(category);
        }

        doc.center_point = record.centroid;
        doc.address = Some(AddressParts::street_only(format!(
            "{}{}",
            NOT_AN_ADDRESS_PREFIX, record.id
        )));
        doc.parent = self
            .resolver
            .resolve_topographic(record.topographic_place_ref.as_deref(), record.centroid);
        doc.popularity = ctx.popularity;

        doc.tariff_zones = record.tariff_zone_refs.clone();
        for zone in &record.tariff_zone_refs {
            if let Some((authority, _)) = zone.split_once(':') {
                if !doc.tariff_zone_authorities.iter().any(|a| a == authority) {
                    doc.tariff_zone_authorities.push(authority.to_string());
                }
            }
        }

        doc
    }
}

fn layer_for(forest: &StopPlaceForest, node: NodeId) -> Layer {
    let node = forest.node(node);
    if node.parent().is_some() {
        Layer::StopPlaceChild
    } else if !node.children().is_empty() {
        Layer::StopPlaceParent
    } else {
        Layer::StopPlace
    }
}
