//! Load cache keyed by source file fingerprints.

use super::{ClimateData, LoaderError};
use crate::config::DataSources;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;
use tracing::{debug, info};

/// Identity of a source file as far as reloading is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFingerprint {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceFingerprint {
    pub fn of(path: &Path) -> Result<Self, LoaderError> {
        let meta =
            std::fs::metadata(path).map_err(|_| LoaderError::FileNotFound(path.to_path_buf()))?;
        Ok(Self {
            path: path.to_path_buf(),
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }

    /// Fingerprints of every source that would be read by a load.
    pub fn of_sources(sources: &DataSources) -> Result<Vec<Self>, LoaderError> {
        let mut prints = vec![
            Self::of(&sources.country_csv)?,
            Self::of(&sources.global_csv)?,
        ];
        if let Some(city) = sources.city_csv.as_deref().filter(|p| p.is_file()) {
            prints.push(Self::of(city)?);
        }
        Ok(prints)
    }
}

/// Loaded context per source set, tagged with the fingerprints it was loaded
/// from. A changed fingerprint replaces the entry; entries are read-only
/// otherwise.
#[derive(Default)]
pub struct LoadCache {
    entries: Mutex<HashMap<DataSources, (Vec<SourceFingerprint>, Arc<ClimateData>)>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached context for these sources, loading it when absent or stale.
    pub fn get_or_load(&self, sources: &DataSources) -> Result<Arc<ClimateData>, LoaderError> {
        let prints = SourceFingerprint::of_sources(sources)?;

        // Held across the load so concurrent callers never load the same input twice.
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(sources) {
            Some((cached, data)) if *cached == prints => {
                debug!("data cache hit");
                return Ok(Arc::clone(data));
            }
            Some(_) => info!(sources = prints.len(), "sources changed, reloading"),
            None => info!(sources = prints.len(), "data cache miss, loading"),
        }

        let data = Arc::new(ClimateData::load(sources)?);
        entries.insert(sources.clone(), (prints, Arc::clone(&data)));
        Ok(data)
    }

    /// Number of source sets with a loaded context.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
