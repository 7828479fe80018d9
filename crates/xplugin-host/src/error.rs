use std::path::PathBuf;

use thiserror::Error;
use xplugin_abi::TableError;

/// Error type for plugin loading and lookup.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dynamic library could not be opened.
    #[error("failed to load plugin {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("{} does not export GetPluginEntries", .path.display())]
    MissingEntryPoint { path: PathBuf },

    #[error("{}: GetPluginEntries reported {count} entries", .path.display())]
    NegativeCount { path: PathBuf, count: i32 },

    #[error("{}: GetPluginEntries returned a null table for {count} entries", .path.display())]
    NullTable { path: PathBuf, count: usize },

    #[error("{}: invalid descriptor table: {source}", .path.display())]
    InvalidTable {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("no plugin function named {name:?}")]
    UnknownFunction { name: String },

    /// The caller asked for a function type that disagrees with the descriptor.
    #[error("{declared} cannot be called as {requested}")]
    SignatureMismatch { declared: String, requested: String },

    #[error("failed to read plugin directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
