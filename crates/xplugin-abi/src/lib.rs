//! ABI for xplugin native plugins.
//!
//! A plugin is a dynamic library (.so/.dylib/.dll) that advertises its callable
//! surface through one exported symbol, `GetPluginEntries`. The symbol returns a
//! pointer to a contiguous array of [`PluginEntry`] records and writes the
//! element count through an out parameter. Each record names a function, points
//! at its C-ABI entry point and describes its parameters and return value with
//! string type tags (`integer`, `double`, `string`, `boolean`).
//!
//! # Writing a plugin
//!
//! Describe functions with [`plugin_entry!`] in a static array and export the
//! array with [`export_plugin!`]:
//!
//! ```ignore
//! use std::ffi::c_int;
//! use xplugin_abi::{plugin_entry, PluginEntry};
//!
//! extern "C" fn add(a: c_int, b: c_int) -> c_int {
//!     a.wrapping_add(b)
//! }
//!
//! pub static PLUGIN_ENTRIES: [PluginEntry; 1] = [
//!     plugin_entry!("Add", add as extern "C" fn(c_int, c_int) -> c_int),
//! ];
//!
//! xplugin_abi::export_plugin!(PLUGIN_ENTRIES);
//! ```
//!
//! The arity and type tags of every entry are derived from the function-pointer
//! type given to [`plugin_entry!`], so a descriptor cannot disagree with the
//! native signature it describes.
//!
//! # Reading a plugin
//!
//! Hosts call [`validate_entries`] on the table returned by `GetPluginEntries`
//! before trusting any pointer in it, and use [`NativeFn::from_raw`] to recover
//! a typed function pointer once the tags have been checked.

mod entry;
mod export;
mod signature;
mod strings;
mod tag;
mod validate;

pub use entry::{param_slots, EntryInfo, ParamTypes, PluginEntry, RawEntryPoint, MAX_PARAMS};
pub use export::publish_table;
pub use signature::{AbiType, NativeFn};
pub use strings::{borrow_c_str, into_owned_c_string, release_c_string};
pub use tag::TypeTag;
pub use validate::{inspect_entry, validate_entries, TableError};

/// Symbol name of the discovery function.
pub const DISCOVERY_SYMBOL: &str = "GetPluginEntries";

/// Symbol name of the function releasing strings returned by entries.
pub const RELEASE_STRING_SYMBOL: &str = "FreePluginString";

/// Signature of `GetPluginEntries`.
pub type GetPluginEntriesFn = unsafe extern "C" fn(count: *mut std::ffi::c_int) -> *const PluginEntry;

/// Signature of `FreePluginString`.
pub type FreePluginStringFn = unsafe extern "C" fn(ptr: *mut std::ffi::c_char);
