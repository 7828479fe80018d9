//! Host-side loader for xplugin native plugins.
//!
//! Plugins are dynamic libraries exporting `GetPluginEntries`. A host opens
//! each library, reads and validates its descriptor table, and registers the
//! advertised functions under lower-cased names:
//!
//! ```ignore
//! use std::ffi::c_int;
//! use xplugin_host::{default_libs_dir, PluginSet};
//!
//! let plugins = PluginSet::load_dir(&default_libs_dir())?;
//! let add = plugins.function::<extern "C" fn(c_int, c_int) -> c_int>("addtwonumbers")?;
//! assert_eq!(add(2, 3), 5);
//! ```

mod discovery;
mod error;
mod loader;
mod set;

#[cfg(test)]
mod testing;

pub use discovery::{default_libs_dir, discover_plugins, is_plugin_library, LIBS_DIR_NAME};
pub use error::LoadError;
pub use loader::{Function, Plugin};
pub use set::PluginSet;
pub use xplugin_abi::{EntryInfo, NativeFn, TypeTag};
