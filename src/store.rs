//! Reading and writing the JSON listing store

use crate::error::{Result, ScrapeError};
use crate::types::ListingStore;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Load the store, treating a missing file as an empty store
pub fn load_store(path: &Path) -> Result<ListingStore> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No store at {}, starting empty", path.display());
            return Ok(ListingStore::default());
        }
        Err(e) => return Err(ScrapeError::io(path, e)),
    };

    serde_json::from_str(&raw).map_err(|source| ScrapeError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Overwrite the store in one step: write a sibling temp file, then rename
pub fn save_store(path: &Path, store: &ListingStore) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ScrapeError::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(store).map_err(|source| ScrapeError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| ScrapeError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| ScrapeError::io(path, e))?;

    info!("Saved {} listings to {}", store.len(), path.display());
    Ok(())
}
