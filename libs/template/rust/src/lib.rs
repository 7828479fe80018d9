//! Reference xplugin.
//!
//! Builds into a dynamic library that exports `GetPluginEntries`, advertising:
//!
//! | Name            | Signature                        |
//! |-----------------|----------------------------------|
//! | `AddTwoNumbers` | `(integer, integer) -> integer`  |
//! | `SayHello`      | `(string) -> string`             |
//! | `Factorial`     | `(integer) -> integer`           |
//! | `Fibonacci`     | `(integer) -> integer`           |
//! | `Beep`          | `(integer, integer) -> boolean`  |
//! | `Sleep`         | `(integer) -> boolean`           |
//! | `DoEvents`      | `() -> boolean`                  |
//!
//! Strings returned by `SayHello` belong to the caller and are released with
//! the exported `FreePluginString`.
//!
//! Every function runs on the calling thread. `Beep` and `Sleep` block for
//! their full duration and cannot be interrupted.

mod math;
mod system;
mod text;

pub use math::{add_two_numbers, factorial, fibonacci};
pub use system::{beep, do_events, plugin_sleep};
pub use text::{greet, say_hello, GREETING};

use std::ffi::{c_char, c_int};

use xplugin_abi::{plugin_entry, PluginEntry};

/// The descriptor table returned by `GetPluginEntries`, in advertised order.
pub static PLUGIN_ENTRIES: [PluginEntry; 7] = [
    plugin_entry!("AddTwoNumbers", add_two_numbers as extern "C" fn(c_int, c_int) -> c_int),
    plugin_entry!("SayHello", say_hello as unsafe extern "C" fn(*const c_char) -> *mut c_char),
    plugin_entry!("Factorial", factorial as extern "C" fn(c_int) -> c_int),
    plugin_entry!("Fibonacci", fibonacci as extern "C" fn(c_int) -> c_int),
    plugin_entry!("Beep", beep as extern "C" fn(c_int, c_int) -> bool),
    plugin_entry!("Sleep", plugin_sleep as extern "C" fn(c_int) -> bool),
    plugin_entry!("DoEvents", do_events as extern "C" fn() -> bool),
];

xplugin_abi::export_plugin!(PLUGIN_ENTRIES);
