use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

use crate::models::StopPlaceRecord;
use crate::Result;

/// Load flat stop-place records from a JSON array
pub fn load_stop_places(path: &Path) -> Result<Vec<StopPlaceRecord>> {
    info!("Loading stop places from {}", path.display());

    let file = File::open(path)?;
    let records: Vec<StopPlaceRecord> = serde_json::from_reader(BufReader::new(file))?;

    info!("Loaded {} stop places", records.len());
    Ok(records)
}
