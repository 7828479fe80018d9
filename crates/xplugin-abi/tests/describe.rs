//! Descriptors built from function-pointer types read back as the host sees them.

use std::ffi::{c_char, c_int, CStr};
use std::mem::transmute;

use pretty_assertions::assert_eq;
use xplugin_abi::{
    into_owned_c_string, publish_table, validate_entries, EntryInfo, NativeFn, PluginEntry,
    RawEntryPoint, TypeTag, MAX_PARAMS,
};

extern "C" fn scale(value: f64, factor: c_int, round: bool) -> f64 {
    let scaled = value * factor as f64;
    if round {
        scaled.round()
    } else {
        scaled
    }
}

unsafe extern "C" fn label(n: c_int) -> *mut c_char {
    into_owned_c_string(format!("#{n}"))
}

type ScaleFn = extern "C" fn(f64, c_int, bool) -> f64;
type LabelFn = unsafe extern "C" fn(c_int) -> *mut c_char;

static TABLE: [PluginEntry; 2] = [
    PluginEntry::describe::<ScaleFn>(c"Scale", unsafe { transmute::<ScaleFn, RawEntryPoint>(scale) }),
    PluginEntry::describe::<LabelFn>(c"Label", unsafe { transmute::<LabelFn, RawEntryPoint>(label) }),
];

fn tag_at(ptr: *const c_char) -> &'static str {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
}

#[test]
fn test_raw_layout_matches_signature() {
    let scale = &TABLE[0];
    assert_eq!(scale.arity, 3);
    assert_eq!(tag_at(scale.param_types[0]), "double");
    assert_eq!(tag_at(scale.param_types[1]), "integer");
    assert_eq!(tag_at(scale.param_types[2]), "boolean");
    assert!(scale.param_types[3..MAX_PARAMS].iter().all(|p| p.is_null()));
    assert_eq!(tag_at(scale.ret_type), "double");
    assert_eq!(scale.filled_param_slots(), 3);
}

#[test]
fn test_validated_infos() {
    let infos = unsafe { validate_entries(&TABLE) }.unwrap();
    assert_eq!(
        infos,
        vec![
            EntryInfo {
                name: "Scale".to_string(),
                params: vec![TypeTag::Double, TypeTag::Integer, TypeTag::Boolean],
                ret: TypeTag::Double,
            },
            EntryInfo {
                name: "Label".to_string(),
                params: vec![TypeTag::Integer],
                ret: TypeTag::String,
            },
        ]
    );
    assert!(infos[0].matches::<ScaleFn>());
    assert!(!infos[1].matches::<ScaleFn>());
}

#[test]
fn test_discovery_contract() {
    let mut count: c_int = 0;
    let head = unsafe { publish_table(&TABLE, &mut count) };
    assert_eq!(count, 2);
    let entries = unsafe { std::slice::from_raw_parts(head, count as usize) };
    assert_eq!(unsafe { entries[1].name_str() }, Some("Label"));

    let label = unsafe { LabelFn::from_raw(entries[1].entry_point.unwrap()) };
    let out = unsafe { label(7) };
    assert_eq!(unsafe { CStr::from_ptr(out) }.to_str().unwrap(), "#7");
    unsafe { xplugin_abi::release_c_string(out) };

    let scale = unsafe { ScaleFn::from_raw(entries[0].entry_point.unwrap()) };
    assert_eq!(scale(1.25, 4, false), 5.0);
    assert_eq!(scale(1.3, 2, true), 3.0);
}
