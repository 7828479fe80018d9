//! Descriptor table validation.
//!
//! A descriptor the host misreads corrupts the call stack on the first call,
//! so every pointer and tag is checked before an entry is trusted.

use std::collections::HashMap;
use std::ffi::CStr;

use thiserror::Error;

use crate::entry::{EntryInfo, PluginEntry, MAX_PARAMS};
use crate::tag::TypeTag;

/// A malformed descriptor table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("entry {index}: name is null")]
    NullName { index: usize },

    #[error("entry {index}: name is empty")]
    EmptyName { index: usize },

    #[error("entry {index}: name is not valid UTF-8")]
    NonUtf8Name { index: usize },

    #[error("entry {index} ({name}): entry point is null")]
    NullEntryPoint { index: usize, name: String },

    #[error("entry {index} ({name}): arity {arity} is outside 0..=10")]
    ArityOutOfRange { index: usize, name: String, arity: i32 },

    #[error("entry {index} ({name}): parameter {slot} has no type tag")]
    MissingParamType { index: usize, name: String, slot: usize },

    #[error("entry {index} ({name}): parameter {slot} has unknown type tag {tag:?}")]
    UnknownParamType { index: usize, name: String, slot: usize, tag: String },

    #[error("entry {index} ({name}): slot {slot} is past arity {arity} but not null")]
    ExtraParamType { index: usize, name: String, slot: usize, arity: usize },

    #[error("entry {index} ({name}): return type tag is null")]
    MissingReturnType { index: usize, name: String },

    #[error("entry {index} ({name}): unknown return type tag {tag:?}")]
    UnknownReturnType { index: usize, name: String, tag: String },

    #[error("entries {first} and {second} share the name {name:?}")]
    DuplicateName { first: usize, second: usize, name: String },
}

/// Check one descriptor and read it into an owned [`EntryInfo`].
///
/// # Safety
///
/// Every non-null string pointer in `entry` must be valid and NUL-terminated.
pub unsafe fn inspect_entry(index: usize, entry: &PluginEntry) -> Result<EntryInfo, TableError> {
    if entry.name.is_null() {
        return Err(TableError::NullName { index });
    }
    // SAFETY: Caller guarantees non-null strings are NUL-terminated.
    let name = unsafe { CStr::from_ptr(entry.name) }
        .to_str()
        .map_err(|_| TableError::NonUtf8Name { index })?;
    if name.is_empty() {
        return Err(TableError::EmptyName { index });
    }
    let name = name.to_string();

    if entry.entry_point.is_none() {
        return Err(TableError::NullEntryPoint { index, name });
    }

    let arity = match usize::try_from(entry.arity) {
        Ok(arity) if arity <= MAX_PARAMS => arity,
        _ => {
            return Err(TableError::ArityOutOfRange { index, name, arity: entry.arity });
        }
    };

    let mut params = Vec::with_capacity(arity);
    for (slot, &ptr) in entry.param_types.iter().enumerate() {
        // SAFETY: Caller guarantees non-null strings are NUL-terminated.
        let tag = unsafe { TypeTag::from_ptr(ptr) };
        match (slot < arity, tag) {
            (true, Ok(Some(tag))) => params.push(tag),
            (true, Ok(None)) => {
                return Err(TableError::MissingParamType { index, name, slot });
            }
            (true, Err(tag)) => {
                return Err(TableError::UnknownParamType { index, name, slot, tag });
            }
            (false, Ok(None)) => {}
            (false, _) => {
                return Err(TableError::ExtraParamType { index, name, slot, arity });
            }
        }
    }

    // SAFETY: Caller guarantees non-null strings are NUL-terminated.
    let ret = match unsafe { TypeTag::from_ptr(entry.ret_type) } {
        Ok(Some(tag)) => tag,
        Ok(None) => return Err(TableError::MissingReturnType { index, name }),
        Err(tag) => return Err(TableError::UnknownReturnType { index, name, tag }),
    };

    Ok(EntryInfo { name, params, ret })
}

/// Validate a whole table.
///
/// Names must be unique ignoring ASCII case, since hosts register functions
/// under lower-cased names.
///
/// # Safety
///
/// Every non-null string pointer in `entries` must be valid and NUL-terminated.
pub unsafe fn validate_entries(entries: &[PluginEntry]) -> Result<Vec<EntryInfo>, TableError> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(entries.len());
    let mut infos = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        // SAFETY: forwarded from the caller.
        let info = unsafe { inspect_entry(index, entry) }?;
        if let Some(&first) = seen.get(&info.name.to_ascii_lowercase()) {
            return Err(TableError::DuplicateName { first, second: index, name: info.name });
        }
        seen.insert(info.name.to_ascii_lowercase(), index);
        infos.push(info);
    }

    Ok(infos)
}
