use std::ffi::c_char;
use std::ptr;

use xplugin_abi::{borrow_c_str, into_owned_c_string};

/// Prefix prepended by `SayHello`.
pub const GREETING: &str = "Hello, ";

pub fn greet(name: &str) -> String {
    format!("{GREETING}{name}")
}

/// Returns a new `"Hello, <name>"` string owned by the caller, or null when
/// `name` is null. Release the result with `FreePluginString`.
///
/// # Safety
///
/// `name` must be null or a valid NUL-terminated string.
pub unsafe extern "C" fn say_hello(name: *const c_char) -> *mut c_char {
    // SAFETY: Caller guarantees `name` is null or NUL-terminated.
    match unsafe { borrow_c_str(name) } {
        Some(name) => into_owned_c_string(greet(&name)),
        None => ptr::null_mut(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use xplugin_abi::release_c_string;

    fn call(name: &CStr) -> String {
        let out = unsafe { say_hello(name.as_ptr()) };
        assert!(!out.is_null());
        let text = unsafe { CStr::from_ptr(out) }.to_str().unwrap().to_string();
        unsafe { release_c_string(out) };
        text
    }

    #[test]
    fn test_say_hello() {
        assert_eq!(call(c"World"), "Hello, World");
        assert_eq!(call(c""), GREETING);
        assert_eq!(call(c"héllo"), "Hello, héllo");
    }

    #[test]
    fn test_say_hello_null() {
        assert!(unsafe { say_hello(ptr::null()) }.is_null());
    }

    #[test]
    fn test_each_call_allocates() {
        let a = unsafe { say_hello(c"a".as_ptr()) };
        let b = unsafe { say_hello(c"a".as_ptr()) };
        assert_ne!(a, b);
        unsafe {
            release_c_string(a);
            release_c_string(b);
        }
    }
}
