//! Runtime configuration read from `QUICKREF_*` environment variables.

use std::env;
use std::path::{Path, PathBuf};

use crate::data::DEFAULT_DATA_DIR;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
/// Built notebook frontend locations probed when `QUICKREF_STATIC_DIR` is unset.
pub const DEFAULT_STATIC_DIRS: [&str; 2] = ["frontend/dist", "dist"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    /// `None` when no built frontend was found.
    pub static_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("QUICKREF_BIND")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let data_dir = lookup("QUICKREF_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let static_dir = match lookup("QUICKREF_STATIC_DIR").filter(|v| !v.trim().is_empty()) {
            Some(dir) => Some(PathBuf::from(dir)),
            None => probe_static_dir(Path::new("")),
        };

        Self {
            bind_addr,
            data_dir,
            static_dir,
        }
    }
}

/// First of [DEFAULT_STATIC_DIRS] under `base` that holds an `index.html`.
fn probe_static_dir(base: &Path) -> Option<PathBuf> {
    DEFAULT_STATIC_DIRS
        .iter()
        .map(|dir| base.join(dir))
        .find(|dir| dir.join("index.html").is_file())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            static_dir: None,
        }
    }
}
