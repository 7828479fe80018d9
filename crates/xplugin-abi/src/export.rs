//! Plugin-side export macros.

use std::ffi::c_int;

use crate::entry::PluginEntry;

/// Body of `GetPluginEntries`: report `entries` to the host.
///
/// Writes the entry count through `count` when it is non-null and returns the
/// address of the first entry. The address is never null, even for an empty
/// table.
///
/// # Safety
///
/// `count` must be null or valid for a write.
pub unsafe fn publish_table(entries: &[PluginEntry], count: *mut c_int) -> *const PluginEntry {
    if !count.is_null() {
        // SAFETY: Caller guarantees `count` is writable.
        unsafe { *count = entries.len() as c_int };
    }
    entries.as_ptr()
}

/// Describe one function for a plugin's descriptor table.
///
/// Expands to a constant [`PluginEntry`] expression. The function is named by a
/// path and cast to its full C-ABI pointer type; arity and tags are derived
/// from that type.
///
/// ```ignore
/// pub static PLUGIN_ENTRIES: [PluginEntry; 1] = [
///     plugin_entry!("Sleep", plugin_sleep as extern "C" fn(c_int) -> bool),
/// ];
/// ```
#[macro_export]
macro_rules! plugin_entry {
    ($name:literal, $func:path as $sig:ty) => {
        $crate::PluginEntry::describe::<$sig>(
            match ::std::ffi::CStr::from_bytes_with_nul(concat!($name, "\0").as_bytes()) {
                Ok(name) => name,
                Err(_) => panic!(concat!("plugin entry name contains NUL: ", $name)),
            },
            // SAFETY: `$func` coerces to `$sig`, and every function pointer
            // has the same representation as `RawEntryPoint`.
            unsafe { ::std::mem::transmute::<$sig, $crate::RawEntryPoint>($func) },
        )
    };
}

/// Export `GetPluginEntries` and `FreePluginString` for the enclosing cdylib.
///
/// `$table` names the static array of entries; hosts see them in array order.
/// Call once at the crate root.
#[macro_export]
macro_rules! export_plugin {
    ($table:path) => {
        /// Discovery entry point: returns the descriptor table and writes its
        /// length through `count`.
        ///
        /// # Safety
        ///
        /// `count` must be null or valid for a write.
        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn GetPluginEntries(
            count: *mut ::std::ffi::c_int,
        ) -> *const $crate::PluginEntry {
            unsafe { $crate::publish_table(&$table, count) }
        }

        /// Release a string returned by one of this plugin's entries.
        ///
        /// # Safety
        ///
        /// `ptr` must be null or a string returned by this plugin that has
        /// not been released yet.
        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn FreePluginString(ptr: *mut ::std::ffi::c_char) {
            unsafe { $crate::release_c_string(ptr) }
        }
    };
}
