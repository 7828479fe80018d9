//! The descriptor record and its host-facing summary.

use std::ffi::{c_char, c_int, CStr};
use std::fmt;
use std::ptr;

use crate::signature::NativeFn;
use crate::tag::TypeTag;

/// Number of parameter slots in every descriptor. Unused slots are null.
pub const MAX_PARAMS: usize = 10;

/// Parameter type slots of a descriptor.
pub type ParamTypes = [*const c_char; MAX_PARAMS];

/// Type-erased entry point. Hosts see it as a plain `void*`.
pub type RawEntryPoint = unsafe extern "C" fn();

/// One exported function, laid out for C consumers.
///
/// ```text
/// struct PluginEntry {
///     const char* name;
///     void*       funcPtr;
///     int         arity;
///     const char* paramTypes[10];
///     const char* retType;
/// };
/// ```
#[repr(C)]
#[derive(Clone, Copy)]
pub struct PluginEntry {
    /// NUL-terminated name the host registers the function under.
    pub name: *const c_char,
    /// C-ABI function address. `None` is the null pointer.
    pub entry_point: Option<RawEntryPoint>,
    /// Number of parameters the function accepts.
    pub arity: c_int,
    /// Parameter type tags; the first `arity` slots are set, the rest are null.
    pub param_types: ParamTypes,
    /// Return type tag.
    pub ret_type: *const c_char,
}

// SAFETY: PluginEntry only points at static strings and code, which are
// never mutated.
unsafe impl Send for PluginEntry {}
unsafe impl Sync for PluginEntry {}

impl PluginEntry {
    /// Describe `entry_point` using the tags of its function-pointer type `F`.
    ///
    /// `entry_point` must be the type-erased form of an `F`; [`plugin_entry!`]
    /// guarantees this by performing the erasure itself.
    ///
    /// [`plugin_entry!`]: crate::plugin_entry
    pub const fn describe<F: NativeFn>(name: &'static CStr, entry_point: RawEntryPoint) -> Self {
        PluginEntry {
            name: name.as_ptr(),
            entry_point: Some(entry_point),
            arity: F::PARAMS.len() as c_int,
            param_types: param_slots(F::PARAMS),
            ret_type: F::RET.as_ptr(),
        }
    }

    /// Get the entry name as a Rust string.
    ///
    /// # Safety
    ///
    /// The `name` pointer must be null or valid and NUL-terminated.
    pub unsafe fn name_str(&self) -> Option<&str> {
        if self.name.is_null() {
            return None;
        }
        // SAFETY: Caller guarantees `name` is valid and NUL-terminated.
        unsafe { CStr::from_ptr(self.name).to_str().ok() }
    }

    /// Number of non-null parameter slots.
    pub fn filled_param_slots(&self) -> usize {
        self.param_types.iter().filter(|slot| !slot.is_null()).count()
    }
}

impl fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginEntry")
            .field("name", &self.name)
            .field("entry_point", &self.entry_point.map(|p| p as *const ()))
            .field("arity", &self.arity)
            .field("ret_type", &self.ret_type)
            .finish_non_exhaustive()
    }
}

/// Fill descriptor slots from a list of tags.
///
/// Fails const evaluation when more than [`MAX_PARAMS`] tags are given.
pub const fn param_slots(tags: &[TypeTag]) -> ParamTypes {
    let mut slots: ParamTypes = [ptr::null(); MAX_PARAMS];
    let mut i = 0;
    while i < tags.len() {
        slots[i] = tags[i].as_ptr();
        i += 1;
    }
    slots
}

/// Owned, validated view of one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub name: String,
    pub params: Vec<TypeTag>,
    pub ret: TypeTag,
}

impl EntryInfo {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Whether the function-pointer type `F` has exactly this signature.
    pub fn matches<F: NativeFn>(&self) -> bool {
        self.params == F::PARAMS && self.ret == F::RET
    }
}

impl fmt::Display for EntryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ") -> {}", self.ret)
    }
}
