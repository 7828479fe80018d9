//! In-process plugin table for unit tests.

use std::ffi::{c_char, c_int};
use std::mem::transmute;

use xplugin_abi::{borrow_c_str, into_owned_c_string, release_c_string, PluginEntry, RawEntryPoint};

use crate::loader::Plugin;

extern "C" fn add(a: c_int, b: c_int) -> c_int {
    a.wrapping_add(b)
}

extern "C" fn ready() -> bool {
    true
}

unsafe extern "C" fn shout(text: *const c_char) -> *mut c_char {
    match unsafe { borrow_c_str(text) } {
        Some(text) => into_owned_c_string(text.to_uppercase()),
        None => std::ptr::null_mut(),
    }
}

unsafe extern "C" fn free_string(ptr: *mut c_char) {
    unsafe { release_c_string(ptr) }
}

type AddFn = extern "C" fn(c_int, c_int) -> c_int;
type ReadyFn = extern "C" fn() -> bool;
type ShoutFn = unsafe extern "C" fn(*const c_char) -> *mut c_char;

pub(crate) static FIXTURE_TABLE: [PluginEntry; 3] = [
    PluginEntry::describe::<AddFn>(c"Add", unsafe { transmute::<AddFn, RawEntryPoint>(add) }),
    PluginEntry::describe::<ReadyFn>(c"Ready", unsafe { transmute::<ReadyFn, RawEntryPoint>(ready) }),
    PluginEntry::describe::<ShoutFn>(c"Shout", unsafe { transmute::<ShoutFn, RawEntryPoint>(shout) }),
];

pub(crate) fn fixture_plugin() -> Plugin {
    unsafe { Plugin::from_static("fixture", &FIXTURE_TABLE, Some(free_string)) }.unwrap()
}
