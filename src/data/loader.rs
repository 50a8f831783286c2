//! Catalog file reading. Format is picked by extension; JSON and YAML share one document shape.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::data::error::{DataError, Result};

const CATALOG_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Read and deserialize a catalog document from `path`.
pub fn load_document<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let format = CatalogFormat::from_path(path).ok_or_else(|| DataError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let raw = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&raw, format, path)
}

pub fn parse_document<T: DeserializeOwned>(raw: &str, format: CatalogFormat, path: &Path) -> Result<T> {
    match format {
        CatalogFormat::Json => serde_json::from_str(raw).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        }),
        CatalogFormat::Yaml => serde_yaml::from_str(raw).map_err(|source| DataError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// First of `<stem>.json`, `<stem>.yaml`, `<stem>.yml` that exists in `dir`.
pub fn find_catalog_file(dir: &Path, stem: &'static str) -> Result<PathBuf> {
    CATALOG_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| DataError::MissingCatalog {
            dir: dir.to_path_buf(),
            stem,
        })
}

/// Normalize a string for lookup: lowercase, collapse spaces/underscores.
pub fn normalize_lookup(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '_' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
