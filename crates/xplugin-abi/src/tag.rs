//! Type tags shared between plugin descriptors and hosts.

use std::ffi::{c_char, CStr};
use std::fmt;

/// Data type of a parameter or return value, as seen by the host.
///
/// Hosts map each tag to a native storage type: `integer` is a C `int`,
/// `double` a C `double`, `string` a NUL-terminated `char*` and `boolean` a
/// single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Integer,
    Double,
    String,
    Boolean,
}

impl TypeTag {
    pub const ALL: [TypeTag; 4] = [
        TypeTag::Integer,
        TypeTag::Double,
        TypeTag::String,
        TypeTag::Boolean,
    ];

    /// The tag as written into descriptor tables.
    pub const fn as_c_str(self) -> &'static CStr {
        match self {
            TypeTag::Integer => c"integer",
            TypeTag::Double => c"double",
            TypeTag::String => c"string",
            TypeTag::Boolean => c"boolean",
        }
    }

    #[inline]
    pub const fn as_ptr(self) -> *const c_char {
        self.as_c_str().as_ptr()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TypeTag::Integer => "integer",
            TypeTag::Double => "double",
            TypeTag::String => "string",
            TypeTag::Boolean => "boolean",
        }
    }

    /// Parse a tag name. Hosts lower-case tags before matching, so this does too.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(name))
    }

    /// Read a tag from a descriptor slot.
    ///
    /// Returns `Ok(None)` for a null slot and `Err` with the raw text for an
    /// unrecognized tag.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to a valid NUL-terminated string.
    pub unsafe fn from_ptr(ptr: *const c_char) -> Result<Option<Self>, String> {
        if ptr.is_null() {
            return Ok(None);
        }
        // SAFETY: Caller guarantees `ptr` is NUL-terminated.
        let raw = unsafe { CStr::from_ptr(ptr) }.to_string_lossy();
        Self::from_name(&raw).map(Some).ok_or_else(|| raw.into_owned())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_str_matches_name() {
        for tag in TypeTag::ALL {
            assert_eq!(tag.as_c_str().to_str().unwrap(), tag.as_str());
        }
    }

    #[test]
    fn test_from_name_ignores_case() {
        assert_eq!(TypeTag::from_name("Integer"), Some(TypeTag::Integer));
        assert_eq!(TypeTag::from_name("BOOLEAN"), Some(TypeTag::Boolean));
        assert_eq!(TypeTag::from_name("variant"), None);
    }

    #[test]
    fn test_from_ptr() {
        assert_eq!(unsafe { TypeTag::from_ptr(std::ptr::null()) }, Ok(None));
        assert_eq!(
            unsafe { TypeTag::from_ptr(c"double".as_ptr()) },
            Ok(Some(TypeTag::Double))
        );
        assert_eq!(
            unsafe { TypeTag::from_ptr(c"color".as_ptr()) },
            Err("color".to_string())
        );
    }
}
