//! Plugin library discovery.
//!
//! Hosts look for plugins in a `libs` directory next to their executable and
//! load every file carrying the platform's dynamic-library extension.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// Name of the plugin directory beside the host executable.
pub const LIBS_DIR_NAME: &str = "libs";

/// `libs/` next to the running executable, or relative to the working
/// directory when the executable path is unknown.
pub fn default_libs_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(LIBS_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from(LIBS_DIR_NAME))
}

/// Whether `path` has this platform's dynamic-library extension.
pub fn is_plugin_library(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(env::consts::DLL_EXTENSION))
}

/// Discover plugin libraries in `dir`, sorted by path.
///
/// A missing directory yields no plugins.
pub fn discover_plugins(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(LoadError::Io { path: dir.to_path_buf(), source }),
    };

    let mut found = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| LoadError::Io { path: dir.to_path_buf(), source })?;
        let path = entry.path();
        if path.is_file() && is_plugin_library(&path) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
