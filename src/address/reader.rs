//! Semicolon-delimited address register reader.

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::models::SourceAddress;
use crate::{Error, Result};

// Column positions in the register export
const COL_ID: usize = 0;
const COL_MUNICIPALITY_CODE: usize = 1;
const COL_MUNICIPALITY_NAME: usize = 2;
const COL_ADDRESS_TYPE: usize = 3;
const COL_STREET_NAME: usize = 7;
const COL_NUMBER: usize = 8;
const COL_LETTER: usize = 9;
const COL_COORDINATE_SYSTEM: usize = 16;
const COL_NORTHING: usize = 17;
const COL_EASTING: usize = 18;
const COL_POSTAL_CODE: usize = 19;
const COL_POSTAL_AREA: usize = 20;
const COL_BOROUGH_CODE: usize = 21;
const COL_BOROUGH_NAME: usize = 22;

pub struct AddressReader<R> {
    inner: csv::Reader<R>,
}

impl AddressReader<File> {
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> AddressReader<R> {
    pub fn new(reader: R) -> Self {
        let inner = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Self { inner }
    }

    /// Iterate over register rows. Rows that fail to parse come back as
    /// [`Error::MalformedRecord`] and do not stop the iteration.
    pub fn records(&mut self) -> impl Iterator<Item = Result<SourceAddress>> + '_ {
        self.inner.records().map(|row| {
            let row = row.map_err(|e| Error::MalformedRecord {
                line: e.position().map_or(0, |p| p.line()),
                reason: e.to_string(),
            })?;
            parse_row(&row)
        })
    }
}

fn parse_row(row: &StringRecord) -> Result<SourceAddress> {
    let line = row.position().map_or(0, |p| p.line());
    let text = |idx: usize| {
        row.get(idx)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let coordinate = |idx: usize| -> Result<Option<f64>> {
        text(idx)
            .map(|v| {
                v.parse::<f64>().map_err(|_| Error::MalformedRecord {
                    line,
                    reason: format!("invalid coordinate '{}' in column {}", v, idx),
                })
            })
            .transpose()
    };

    let id = text(COL_ID).ok_or_else(|| Error::MalformedRecord {
        line,
        reason: "missing address id".to_string(),
    })?;

    Ok(SourceAddress {
        id,
        municipality_code: text(COL_MUNICIPALITY_CODE),
        municipality_name: text(COL_MUNICIPALITY_NAME),
        address_type: text(COL_ADDRESS_TYPE),
        street_name: text(COL_STREET_NAME),
        number: text(COL_NUMBER),
        letter: text(COL_LETTER),
        coordinate_system: text(COL_COORDINATE_SYSTEM),
        northing: coordinate(COL_NORTHING)?,
        easting: coordinate(COL_EASTING)?,
        postal_code: text(COL_POSTAL_CODE),
        postal_area: text(COL_POSTAL_AREA),
        borough_code: text(COL_BOROUGH_CODE),
        borough_name: text(COL_BOROUGH_NAME),
    })
}
