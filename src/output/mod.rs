//! CSV export consumed by the geocoder index importer.
//!
//! The column set depends on the languages present across all documents,
//! so the header is computed in a first pass before any row is written.

use csv::{QuoteStyle, WriterBuilder};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::models::document::DEFAULT_KEY;
use crate::models::{ParentField, SearchDocument};
use crate::Result;

const FIXED_COLUMNS: [&str; 17] = [
    "id",
    "index",
    "type",
    "name",
    "name_json",
    "lat",
    "lon",
    "street",
    "number",
    "zipcode",
    "popularity",
    "category_json",
    "addendum_json_description",
    "source",
    "source_id",
    "layer",
    "parent_json",
];

pub struct DocumentSerializer {
    index_name: String,
}

/// Per-language column layout
struct Columns {
    name_langs: Vec<String>,
    alias_langs: Vec<String>,
}

impl Columns {
    fn collect(docs: &[SearchDocument]) -> Self {
        let mut names = BTreeSet::new();
        let mut aliases = BTreeSet::new();

        for doc in docs {
            names.extend(doc.names.keys().filter(|k| *k != DEFAULT_KEY));
            aliases.extend(doc.aliases.keys().filter(|k| *k != DEFAULT_KEY));
        }

        Self {
            name_langs: names.into_iter().cloned().collect(),
            alias_langs: aliases.into_iter().cloned().collect(),
        }
    }

    fn header(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.name_langs.iter().map(|lang| format!("name_{}", lang)))
            .chain(self.alias_langs.iter().map(|lang| format!("name_json_{}", lang)))
            .collect()
    }
}

impl DocumentSerializer {
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
        }
    }

    /// Write header and one row per document
    pub fn write<W: Write>(&self, docs: &[SearchDocument], writer: W) -> Result<()> {
        let columns = Columns::collect(docs);
        let mut csv = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_writer(writer);

        csv.write_record(columns.header())?;
        for doc in docs {
            csv.write_record(self.row(doc, &columns)?)?;
        }
        csv.flush()?;

        Ok(())
    }

    pub fn to_bytes(&self, docs: &[SearchDocument]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(docs, &mut buffer)?;
        Ok(buffer)
    }

    pub fn write_to_path(&self, docs: &[SearchDocument], path: &Path) -> Result<()> {
        info!("Writing {} documents to {}", docs.len(), path.display());
        let file = File::create(path)?;
        self.write(docs, BufWriter::new(file))
    }

    fn row(&self, doc: &SearchDocument, columns: &Columns) -> Result<Vec<String>> {
        let export_id = doc.id.export_id();
        let address = doc.address.clone().unwrap_or_default();
        let (lat, lon) = doc
            .center_point
            .map(|p| (p.lat.to_string(), p.lon.to_string()))
            .unwrap_or_default();

        let mut row = vec![
            export_id.clone(),
            self.index_name.clone(),
            doc.layer().to_string(),
            doc.default_name().unwrap_or_default().to_string(),
            alias_json(doc.default_alias())?,
            lat,
            lon,
            address.street.unwrap_or_default(),
            address.number.unwrap_or_default(),
            address.zip.unwrap_or_default(),
            doc.popularity.to_string(),
            category_json(&doc.categories)?,
            description_json(&doc.descriptions)?,
            doc.id.source.clone(),
            export_id,
            doc.layer().to_string(),
            parent_json(doc)?,
        ];

        for lang in &columns.name_langs {
            row.push(doc.names.get(lang).cloned().unwrap_or_default());
        }
        for lang in &columns.alias_langs {
            row.push(alias_json(doc.aliases.get(lang).map(String::as_str))?);
        }

        Ok(row)
    }
}

/// `["alias"]`, or empty when there is no alias
fn alias_json(alias: Option<&str>) -> Result<String> {
    match alias {
        Some(alias) => Ok(serde_json::to_string(&[alias])?),
        None => Ok(String::new()),
    }
}

fn category_json(categories: &[String]) -> Result<String> {
    Ok(serde_json::to_string(categories)?)
}

fn description_json(descriptions: &BTreeMap<String, String>) -> Result<String> {
    Ok(serde_json::to_string(descriptions)?)
}

/// Valid parent levels, each wrapped in a one-element array:
/// `{"locality":[{"id":..,"name":..,"source":..}], ...}`
fn parent_json(doc: &SearchDocument) -> Result<String> {
    let parents: BTreeMap<&str, [&ParentField; 1]> = doc
        .parent
        .valid_fields()
        .map(|(level, field)| (level.field_name(), [field]))
        .collect();

    if parents.is_empty() {
        return Ok(String::new());
    }
    Ok(serde_json::to_string(&parents)?)
}
