//! Serve the built notebook (SPA) from a static directory.

use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

/// Files under `dir`; paths that match no file get `index.html` so client-side routes resolve.
pub fn spa_service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}
