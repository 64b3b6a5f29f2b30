//! Aggregates address documents into one document per street.
//!
//! Addresses are grouped by street name and locality. Each group yields a
//! street document that borrows its location and parents from a
//! representative address, chosen as the middle element after sorting the
//! group by its raw house number string.

use hashbrown::HashMap;
use serde::Deserialize;
use tracing::info;

use crate::models::{AddressParts, AdminLevel, DocumentId, Layer, SearchDocument};

/// Categories attached to street documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreetCategoryPolicy {
    /// `["street"]`
    #[default]
    Street,
    /// `["street", "address"]`, keeps streets visible in address-only queries
    StreetAndAddress,
}

impl StreetCategoryPolicy {
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            StreetCategoryPolicy::Street => &["street"],
            StreetCategoryPolicy::StreetAndAddress => &["street", "address"],
        }
    }
}

pub struct StreetAggregator {
    source: String,
    popularity: u64,
    policy: StreetCategoryPolicy,
}

impl StreetAggregator {
    pub fn new(source: impl Into<String>, popularity: u64, policy: StreetCategoryPolicy) -> Self {
        Self {
            source: source.into(),
            popularity,
            policy,
        }
    }

    /// Build street documents, in order of first appearance of each street
    pub fn aggregate(&self, addresses: &[SearchDocument]) -> Vec<SearchDocument> {
        let mut group_index: HashMap<(&str, &str), usize> = HashMap::new();
        let mut groups: Vec<(&str, &str, Vec<&SearchDocument>)> = Vec::new();

        for doc in addresses {
            let Some(street) = doc.address.as_ref().and_then(AddressParts::street_name) else {
                continue;
            };
            let locality = doc.parent.id_for(AdminLevel::Locality).unwrap_or_default();

            let idx = *group_index.entry((street, locality)).or_insert_with(|| {
                groups.push((street, locality, Vec::new()));
                groups.len() - 1
            });
            groups[idx].2.push(doc);
        }

        let streets: Vec<SearchDocument> = groups
            .into_iter()
            .map(|(street, locality, mut members)| {
                let representative = representative(&mut members);
                self.street_document(street, locality, representative)
            })
            .collect();

        info!(
            "Aggregated {} addresses into {} streets",
            addresses.len(),
            streets.len()
        );
        streets
    }

    fn street_document(
        &self,
        street: &str,
        locality: &str,
        representative: &SearchDocument,
    ) -> SearchDocument {
        let id = DocumentId::new(&self.source, Layer::Street, format!("{}-{}", locality, street));
        let mut doc = SearchDocument::new(id);

        doc.set_default_name(street);
        doc.parent = representative.parent.clone();
        doc.center_point = representative.center_point;
        doc.address = Some(AddressParts::street_only(street));
        for category in self.policy.categories() {
            doc.add_category(category);
        }
        doc.popularity = self.popularity;

        doc
    }
}

/// Middle element after a stable sort on the raw house number string.
/// Groups are never empty.
fn representative<'a>(members: &mut [&'a SearchDocument]) -> &'a SearchDocument {
    members.sort_by(|a, b| house_number(a).cmp(house_number(b)));
    members[members.len() / 2]
}

fn house_number(doc: &SearchDocument) -> &str {
    doc.address
        .as_ref()
        .and_then(|a| a.number.as_deref())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, ParentField};

    fn address(id: &str, street: &str, number: &str, locality: &str, lat: f64) -> SearchDocument {
        let mut doc = SearchDocument::new(DocumentId::new("kartverket", Layer::Address, id));
        doc.set_default_name(format!("{} {}", number, street));
        doc.address = Some(AddressParts {
            street: Some(street.to_string()),
            number: Some(number.to_string()),
            zip: Some("0155".to_string()),
        });
        doc.parent.set(
            AdminLevel::Locality,
            ParentField::new(locality, "Oslo", "kartverket"),
        );
        doc.center_point = Some(GeoPoint::new(lat, 10.7));
        doc
    }

    fn aggregator() -> StreetAggregator {
        StreetAggregator::new("kartverket", 2, StreetCategoryPolicy::Street)
    }

    #[test]
    fn test_two_addresses_one_street() {
        let docs = vec![
            address("1", "Storgata", "1", "0301", 59.1),
            address("2", "Storgata", "3", "0301", 59.3),
        ];

        let streets = aggregator().aggregate(&docs);
        assert_eq!(streets.len(), 1);

        let street = &streets[0];
        assert_eq!(street.default_name(), Some("Storgata"));
        assert_eq!(street.layer(), Layer::Street);
        assert_eq!(street.id.source_id, "0301-Storgata");
        assert_eq!(street.parent.id_for(AdminLevel::Locality), Some("0301"));
        assert_eq!(street.categories, vec!["street"]);
        assert_eq!(street.popularity, 2);
        // index 2 / 2 = 1 -> number "3"
        assert_eq!(street.center_point, Some(GeoPoint::new(59.3, 10.7)));
        assert_eq!(street.address, Some(AddressParts::street_only("Storgata")));
    }

    #[test]
    fn test_representative_uses_lexicographic_order() {
        let docs = vec![
            address("a", "Storgata", "3", "0301", 3.0),
            address("b", "Storgata", "10", "0301", 10.0),
            address("c", "Storgata", "2", "0301", 2.0),
        ];

        // sorted as "10", "2", "3"
        let streets = aggregator().aggregate(&docs);
        assert_eq!(streets[0].center_point.unwrap().lat, 2.0);
    }

    #[test]
    fn test_same_street_in_different_localities() {
        let docs = vec![
            address("1", "Storgata", "1", "0301", 59.0),
            address("2", "Storgata", "1", "3005", 59.7),
            address("3", "Kirkeveien", "5", "0301", 59.9),
        ];

        let streets = aggregator().aggregate(&docs);
        let ids: Vec<&str> = streets.iter().map(|s| s.id.source_id.as_str()).collect();
        assert_eq!(ids, vec!["0301-Storgata", "3005-Storgata", "0301-Kirkeveien"]);
    }

    #[test]
    fn test_addresses_without_street_are_skipped() {
        let mut blank = address("1", "", "1", "0301", 59.0);
        blank.address = Some(AddressParts {
            street: Some("  ".to_string()),
            ..Default::default()
        });
        let mut none = address("2", "", "1", "0301", 59.0);
        none.address = None;

        assert!(aggregator().aggregate(&[blank, none]).is_empty());
    }

    #[test]
    fn test_street_and_address_policy() {
        let docs = vec![address("1", "Storgata", "1", "0301", 59.0)];
        let streets = StreetAggregator::new("kartverket", 5, StreetCategoryPolicy::StreetAndAddress)
            .aggregate(&docs);

        assert_eq!(streets[0].categories, vec!["street", "address"]);
        assert_eq!(streets[0].popularity, 5);
    }
}
