//! Compile-time reflection of C-ABI function signatures into type tags.

use std::ffi::{c_char, c_int};
use std::mem;

use crate::entry::RawEntryPoint;
use crate::tag::TypeTag;

/// A Rust type that crosses the plugin boundary as one of the host's tags.
///
/// # Safety
///
/// `TAG` must describe the type's C representation: hosts allocate argument
/// and return storage from the tag alone.
pub unsafe trait AbiType: Copy {
    const TAG: TypeTag;
}

// SAFETY: c_int is the host's `int`.
unsafe impl AbiType for c_int {
    const TAG: TypeTag = TypeTag::Integer;
}

// SAFETY: f64 is C `double`.
unsafe impl AbiType for f64 {
    const TAG: TypeTag = TypeTag::Double;
}

// SAFETY: bool is one byte holding 0 or 1.
unsafe impl AbiType for bool {
    const TAG: TypeTag = TypeTag::Boolean;
}

// SAFETY: strings travel as NUL-terminated `char*`.
unsafe impl AbiType for *const c_char {
    const TAG: TypeTag = TypeTag::String;
}

// SAFETY: owned strings returned to the host are `char*` as well.
unsafe impl AbiType for *mut c_char {
    const TAG: TypeTag = TypeTag::String;
}

/// A C-ABI function-pointer type whose whole signature is expressible in tags.
///
/// Implemented for `extern "C" fn` and `unsafe extern "C" fn` pointers with up
/// to [`MAX_PARAMS`](crate::MAX_PARAMS) [`AbiType`] arguments and an
/// [`AbiType`] return value.
///
/// # Safety
///
/// `PARAMS` and `RET` must list the tags of the pointer's actual arguments and
/// return type, in order.
pub unsafe trait NativeFn: Copy {
    const PARAMS: &'static [TypeTag];
    const RET: TypeTag;

    /// Erase the signature for storage in a descriptor.
    fn into_raw(self) -> RawEntryPoint;

    /// Restore a typed pointer from a descriptor.
    ///
    /// # Safety
    ///
    /// `raw` must have been produced from a function with exactly this
    /// signature, which hosts establish by comparing the descriptor's tags
    /// against `PARAMS` and `RET` first.
    unsafe fn from_raw(raw: RawEntryPoint) -> Self;
}

macro_rules! impl_native_fn {
    (@one $fn_ty:ty; $($arg:ident),*) => {
        // SAFETY: the tags are taken from the argument and return types.
        unsafe impl<R: AbiType, $($arg: AbiType),*> NativeFn for $fn_ty {
            const PARAMS: &'static [TypeTag] = &[$($arg::TAG),*];
            const RET: TypeTag = R::TAG;

            fn into_raw(self) -> RawEntryPoint {
                // SAFETY: all function pointers share one representation.
                unsafe { mem::transmute_copy::<Self, RawEntryPoint>(&self) }
            }

            unsafe fn from_raw(raw: RawEntryPoint) -> Self {
                // SAFETY: Caller guarantees `raw` has this signature.
                unsafe { mem::transmute_copy::<RawEntryPoint, Self>(&raw) }
            }
        }
    };
    ($($arg:ident),*) => {
        impl_native_fn!(@one extern "C" fn($($arg),*) -> R; $($arg),*);
        impl_native_fn!(@one unsafe extern "C" fn($($arg),*) -> R; $($arg),*);
    };
}

impl_native_fn!();
impl_native_fn!(A);
impl_native_fn!(A, B);
impl_native_fn!(A, B, C);
impl_native_fn!(A, B, C, D);
impl_native_fn!(A, B, C, D, E);
impl_native_fn!(A, B, C, D, E, F);
impl_native_fn!(A, B, C, D, E, F, G);
impl_native_fn!(A, B, C, D, E, F, G, H);
impl_native_fn!(A, B, C, D, E, F, G, H, I);
impl_native_fn!(A, B, C, D, E, F, G, H, I, J);

#[cfg(test)]
mod tests {
    use super::*;

    extern "C" fn add(a: c_int, b: c_int) -> c_int {
        a.wrapping_add(b)
    }

    extern "C" fn ready() -> bool {
        true
    }

    #[test]
    fn test_tags_follow_signature() {
        type Add = extern "C" fn(c_int, c_int) -> c_int;
        assert_eq!(<Add as NativeFn>::PARAMS, &[TypeTag::Integer, TypeTag::Integer]);
        assert_eq!(<Add as NativeFn>::RET, TypeTag::Integer);

        type Echo = unsafe extern "C" fn(*const c_char) -> *mut c_char;
        assert_eq!(<Echo as NativeFn>::PARAMS, &[TypeTag::String]);
        assert_eq!(<Echo as NativeFn>::RET, TypeTag::String);

        type Ready = extern "C" fn() -> bool;
        assert!(<Ready as NativeFn>::PARAMS.is_empty());
        assert_eq!(<Ready as NativeFn>::RET, TypeTag::Boolean);

        type Mixed = extern "C" fn(f64, bool, c_int) -> f64;
        assert_eq!(
            <Mixed as NativeFn>::PARAMS,
            &[TypeTag::Double, TypeTag::Boolean, TypeTag::Integer]
        );
    }

    #[test]
    fn test_raw_round_trip_calls_original() {
        let raw = (add as extern "C" fn(c_int, c_int) -> c_int).into_raw();
        let restored = unsafe { <extern "C" fn(c_int, c_int) -> c_int>::from_raw(raw) };
        assert_eq!(restored(2, 3), 5);

        let raw = (ready as extern "C" fn() -> bool).into_raw();
        let restored = unsafe { <extern "C" fn() -> bool>::from_raw(raw) };
        assert!(restored());
    }
}
