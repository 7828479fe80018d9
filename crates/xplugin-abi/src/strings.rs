//! Strings crossing the plugin boundary.
//!
//! Strings returned by entries are allocated here and must come back through
//! [`release_c_string`] (exported by plugins as `FreePluginString`). Neither
//! side may free the other's allocations with its own allocator.

use std::borrow::Cow;
use std::ffi::{c_char, CStr, CString};
use std::ptr;

/// Hand a string to the host.
///
/// The host owns the returned buffer and must release it with
/// [`release_c_string`]. Text after an interior NUL is dropped, since a C
/// reader would stop there anyway.
pub fn into_owned_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    let mut bytes = s.into();
    if let Some(nul) = bytes.iter().position(|&b| b == 0) {
        bytes.truncate(nul);
    }
    match CString::new(bytes) {
        Ok(owned) => owned.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Release a string produced by [`into_owned_c_string`]. Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or come from [`into_owned_c_string`] in the same plugin,
/// and must not be used afterwards.
pub unsafe fn release_c_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: Caller guarantees `ptr` came from CString::into_raw.
    drop(unsafe { CString::from_raw(ptr) });
}

/// Borrow a string argument passed in by the host.
///
/// Returns `None` for null. Invalid UTF-8 is replaced with U+FFFD.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub unsafe fn borrow_c_str<'a>(ptr: *const c_char) -> Option<Cow<'a, str>> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: Caller guarantees `ptr` is valid for 'a.
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy())
}
