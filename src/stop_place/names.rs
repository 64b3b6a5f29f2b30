//! Name, display name and alias resolution over the stop-place forest.

use std::collections::BTreeMap;

use super::hierarchy::{NodeId, StopPlaceForest};
use crate::models::document::DEFAULT_KEY;
use crate::models::{LocalizedString, NameType, StopPlaceRecord};

pub struct NameResolver<'a> {
    forest: &'a StopPlaceForest,
}

impl<'a> NameResolver<'a> {
    pub fn new(forest: &'a StopPlaceForest) -> Self {
        Self { forest }
    }

    /// The node's own name, or the name of its closest named ancestor
    pub fn closest_name(&self, id: NodeId) -> Option<&'a LocalizedString> {
        std::iter::once(id)
            .chain(self.forest.ancestors(id))
            .find_map(|n| own_name(self.forest.record(n)))
    }

    /// Distinct searchable names for the node.
    ///
    /// Names found walking up (node, parent, grandparent, ...) come first,
    /// followed by names found walking down (node, then descendants in
    /// pre-order). Duplicates are dropped, keeping the first occurrence.
    pub fn searchable_names(&self, id: NodeId) -> Vec<String> {
        let upward = std::iter::once(id).chain(self.forest.ancestors(id));
        let downward = self.forest.subtree(id);

        let mut names: Vec<String> = Vec::new();
        for node in upward.chain(downward) {
            for name in record_names(self.forest.record(node)) {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// Label aliases keyed by language (untagged labels under `default`).
    ///
    /// A node without labels of its own borrows the whole alias map of its
    /// closest ancestor that has one.
    pub fn aliases(&self, id: NodeId) -> BTreeMap<String, String> {
        std::iter::once(id)
            .chain(self.forest.ancestors(id))
            .map(|n| labels(self.forest.record(n)))
            .find(|map| !map.is_empty())
            .unwrap_or_default()
    }
}

fn own_name(record: &StopPlaceRecord) -> Option<&LocalizedString> {
    record.name.as_ref().filter(|n| !n.value.trim().is_empty())
}

/// The record's name followed by its searchable alternative names
fn record_names(record: &StopPlaceRecord) -> impl Iterator<Item = &str> {
    let alternatives = record
        .alternative_names
        .iter()
        .filter(|alt| alt.is_searchable())
        .map(|alt| &alt.name);

    own_name(record)
        .into_iter()
        .chain(alternatives)
        .map(|n| n.value.trim())
        .filter(|v| !v.is_empty())
}

fn labels(record: &StopPlaceRecord) -> BTreeMap<String, String> {
    record
        .alternative_names
        .iter()
        .filter(|alt| alt.name_type == NameType::Label && !alt.name.value.trim().is_empty())
        .map(|alt| {
            let lang = alt.name.lang.as_deref().unwrap_or(DEFAULT_KEY);
            (lang.to_string(), alt.name.value.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlternativeName;

    fn record(id: &str, parent: Option<&str>, name: Option<&str>) -> StopPlaceRecord {
        let mut record = StopPlaceRecord::new(id);
        record.parent_ref = parent.map(str::to_string);
        record.name = name.map(|n| LocalizedString::new(n, Some("nor")));
        record
    }

    fn alt(name_type: NameType, value: &str, lang: Option<&str>) -> AlternativeName {
        AlternativeName {
            name_type,
            name: LocalizedString::new(value, lang),
        }
    }

    fn node(forest: &StopPlaceForest, id: &str) -> NodeId {
        forest
            .pre_order()
            .into_iter()
            .find(|&n| forest.record(n).id == id)
            .unwrap()
    }

    #[test]
    fn test_closest_name_walks_up() {
        let forest = StopPlaceForest::build(vec![
            record("parent", None, Some("Oslo S")),
            record("child", Some("parent"), None),
            record("named", Some("parent"), Some("Oslo S tog")),
        ]);
        let names = NameResolver::new(&forest);

        assert_eq!(names.closest_name(node(&forest, "child")).unwrap().value, "Oslo S");
        assert_eq!(
            names.closest_name(node(&forest, "named")).unwrap().value,
            "Oslo S tog"
        );
    }

    #[test]
    fn test_searchable_names_up_then_down() {
        let mut child = record("child", Some("parent"), Some("Jernbanetorget"));
        child.alternative_names = vec![
            alt(NameType::Translation, "Railway Square", Some("en")),
            alt(NameType::Translation, "untagged", None),
            alt(NameType::Alias, "ignored", None),
        ];
        let forest = StopPlaceForest::build(vec![
            record("parent", None, Some("Oslo S")),
            child,
            record("grandchild", Some("child"), Some("Oslo S")),
            record("other", Some("child"), Some("Jernbanetorget T")),
        ]);
        let names = NameResolver::new(&forest);

        assert_eq!(
            names.searchable_names(node(&forest, "child")),
            vec!["Jernbanetorget", "Railway Square", "Oslo S", "Jernbanetorget T"]
        );
        assert_eq!(
            names.searchable_names(node(&forest, "parent")),
            vec!["Oslo S", "Jernbanetorget", "Railway Square", "Jernbanetorget T"]
        );
    }

    #[test]
    fn test_searchable_names_are_unique() {
        let mut root = record("root", None, Some("Same"));
        root.alternative_names = vec![alt(NameType::Label, "Same", None)];
        let forest = StopPlaceForest::build(vec![root, record("leaf", Some("root"), Some("Same"))]);
        let names = NameResolver::new(&forest);

        for id in forest.pre_order() {
            assert_eq!(names.searchable_names(id), vec!["Same"]);
        }
    }

    #[test]
    fn test_aliases_inherited_wholesale() {
        let mut parent = record("parent", None, Some("Oslo lufthavn"));
        parent.alternative_names = vec![
            alt(NameType::Label, "OSL", None),
            alt(NameType::Label, "Gardermoen", Some("nor")),
        ];
        let mut own = record("own", Some("parent"), Some("Gate 1"));
        own.alternative_names = vec![alt(NameType::Label, "G1", Some("en"))];

        let forest = StopPlaceForest::build(vec![
            parent,
            record("child", Some("parent"), None),
            own,
        ]);
        let names = NameResolver::new(&forest);

        let inherited = names.aliases(node(&forest, "child"));
        assert_eq!(inherited.get("default").map(String::as_str), Some("OSL"));
        assert_eq!(inherited.get("nor").map(String::as_str), Some("Gardermoen"));

        let own = names.aliases(node(&forest, "own"));
        assert_eq!(own.len(), 1);
        assert_eq!(own.get("en").map(String::as_str), Some("G1"));
    }

    #[test]
    fn test_no_aliases_anywhere() {
        let forest = StopPlaceForest::build(vec![record("lonely", None, Some("Stop"))]);
        let names = NameResolver::new(&forest);
        assert!(names.aliases(forest.roots()[0]).is_empty());
    }
}
