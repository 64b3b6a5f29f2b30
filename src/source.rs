//! Lookup of the newest source file for a prefix.

use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{Error, Result};

pub trait SourceStore {
    /// Path of the most recent source whose name starts with `prefix`
    fn find_latest(&self, prefix: &str) -> Result<PathBuf>;
}

/// Source files in a local directory tree
pub struct LocalSourceStore {
    root: PathBuf,
}

impl LocalSourceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceStore for LocalSourceStore {
    fn find_latest(&self, prefix: &str) -> Result<PathBuf> {
        let mut latest: Option<(SystemTime, PathBuf)> = None;

        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            if !relative.to_string_lossy().starts_with(prefix) {
                continue;
            }

            let modified = entry.metadata()?.modified()?;
            debug!("Candidate source {}", entry.path().display());

            if latest.as_ref().map_or(true, |(time, _)| modified > *time) {
                latest = Some((modified, entry.into_path()));
            }
        }

        match latest {
            Some((_, path)) => {
                info!("Using source {} for prefix '{}'", path.display(), prefix);
                Ok(path)
            }
            None => Err(Error::SourceNotFound {
                prefix: prefix.to_string(),
            }),
        }
    }
}
