//! Loading a single plugin library.

use std::collections::HashMap;
use std::ffi::{c_char, c_int, CStr};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use libloading::Library;
use xplugin_abi::{
    validate_entries, EntryInfo, FreePluginStringFn, GetPluginEntriesFn, NativeFn, PluginEntry,
    RawEntryPoint, DISCOVERY_SYMBOL, RELEASE_STRING_SYMBOL,
};

use crate::error::LoadError;

/// A registered function: its validated descriptor and address.
struct Registered {
    info: EntryInfo,
    entry_point: RawEntryPoint,
}

/// A loaded plugin and its validated descriptor table.
pub struct Plugin {
    path: PathBuf,
    functions: Vec<Registered>,
    /// Lower-cased name -> index in `functions`.
    index: HashMap<String, usize>,
    release: Option<FreePluginStringFn>,
    /// Keeps the code behind every entry point mapped. Dropped last.
    _lib: Option<Library>,
}

impl Plugin {
    /// Load a plugin from a dynamic library path.
    ///
    /// The library is opened, `GetPluginEntries` is called once and the
    /// returned table is validated before any entry is registered.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref().to_path_buf();

        // Use RTLD_GLOBAL so one plugin's symbols are visible to the next
        #[cfg(unix)]
        let lib = unsafe {
            let flags = libloading::os::unix::RTLD_NOW | libloading::os::unix::RTLD_GLOBAL;
            libloading::os::unix::Library::open(Some(&path), flags).map(Library::from)
        };
        #[cfg(not(unix))]
        let lib = unsafe { Library::new(&path) };
        let lib = lib.map_err(|source| LoadError::Open { path: path.clone(), source })?;

        let get_entries: GetPluginEntriesFn = unsafe {
            *lib.get::<GetPluginEntriesFn>(DISCOVERY_SYMBOL.as_bytes())
                .map_err(|_| LoadError::MissingEntryPoint { path: path.clone() })?
        };
        let release: Option<FreePluginStringFn> = unsafe {
            lib.get::<FreePluginStringFn>(RELEASE_STRING_SYMBOL.as_bytes())
                .ok()
                .map(|symbol| *symbol)
        };

        let mut count: c_int = 0;
        let head = unsafe { get_entries(&mut count) };
        let count = usize::try_from(count)
            .map_err(|_| LoadError::NegativeCount { path: path.clone(), count })?;
        let entries: &[PluginEntry] = if count == 0 {
            &[]
        } else if head.is_null() {
            return Err(LoadError::NullTable { path, count });
        } else {
            // SAFETY: the plugin promises `count` contiguous entries at `head`,
            // alive for as long as the library stays loaded.
            unsafe { std::slice::from_raw_parts(head, count) }
        };

        // SAFETY: entries live in the library, which `Plugin` keeps loaded.
        let plugin = unsafe { Self::register(path, entries, release, Some(lib)) }?;
        Ok(plugin)
    }

    /// Wrap a table that is linked into the current process.
    ///
    /// # Safety
    ///
    /// Every string pointer in `entries` must be null or valid and
    /// NUL-terminated, every entry point must match its descriptor, and
    /// `release` must free strings returned by those entry points.
    pub unsafe fn from_static(
        label: impl Into<PathBuf>,
        entries: &'static [PluginEntry],
        release: Option<FreePluginStringFn>,
    ) -> Result<Self, LoadError> {
        // SAFETY: forwarded from the caller.
        unsafe { Self::register(label.into(), entries, release, None) }
    }

    unsafe fn register(
        path: PathBuf,
        entries: &[PluginEntry],
        release: Option<FreePluginStringFn>,
        lib: Option<Library>,
    ) -> Result<Self, LoadError> {
        // SAFETY: forwarded from the caller.
        let infos = unsafe { validate_entries(entries) }
            .map_err(|source| LoadError::InvalidTable { path: path.clone(), source })?;

        let functions: Vec<Registered> = entries
            .iter()
            .zip(infos)
            .filter_map(|(entry, info)| {
                entry.entry_point.map(|entry_point| Registered { info, entry_point })
            })
            .collect();

        let mut index = HashMap::with_capacity(functions.len());
        for (i, function) in functions.iter().enumerate() {
            tracing::debug!(
                "Loaded plugin function: {} with arity {} from {}",
                function.info.name,
                function.info.arity(),
                path.display()
            );
            index.insert(function.info.name.to_ascii_lowercase(), i);
        }

        Ok(Self { path, functions, index, release, _lib: lib })
    }

    /// Path the plugin was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Descriptors in table order.
    pub fn functions(&self) -> impl Iterator<Item = &EntryInfo> {
        self.functions.iter().map(|f| &f.info)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Find a descriptor by name, ignoring ASCII case.
    pub fn lookup(&self, name: &str) -> Option<&EntryInfo> {
        self.find(name).map(|f| &f.info)
    }

    fn find(&self, name: &str) -> Option<&Registered> {
        let i = *self.index.get(&name.to_ascii_lowercase())?;
        self.functions.get(i)
    }

    /// Get a typed pointer to the function `name`.
    ///
    /// Fails with [`LoadError::SignatureMismatch`] unless the descriptor's tags
    /// are exactly those of `F`. The result borrows `self`; see [`Function`]
    /// for what copying the pointer out gives up.
    pub fn function<F: NativeFn>(&self, name: &str) -> Result<Function<'_, F>, LoadError> {
        let registered = self
            .find(name)
            .ok_or_else(|| LoadError::UnknownFunction { name: name.to_string() })?;
        if !registered.info.matches::<F>() {
            return Err(LoadError::SignatureMismatch {
                declared: registered.info.to_string(),
                requested: EntryInfo {
                    name: registered.info.name.clone(),
                    params: F::PARAMS.to_vec(),
                    ret: F::RET,
                }
                .to_string(),
            });
        }
        // SAFETY: the descriptor tags equal F's, and descriptors are derived
        // from (or promised to match) the entry point's real signature.
        let func = unsafe { F::from_raw(registered.entry_point) };
        Ok(Function { func, _plugin: PhantomData })
    }

    /// Whether the plugin exports `FreePluginString`.
    pub fn can_release_strings(&self) -> bool {
        self.release.is_some()
    }

    /// Copy a string returned by one of this plugin's functions and release it.
    ///
    /// Returns `None` for null. Without `FreePluginString` the buffer is copied
    /// and leaked, since freeing it with the host allocator would be undefined.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a string returned by this plugin that has not
    /// been released yet.
    pub unsafe fn take_string(&self, ptr: *mut c_char) -> Option<String> {
        if ptr.is_null() {
            return None;
        }
        // SAFETY: Caller guarantees `ptr` is a live plugin string.
        let text = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        match self.release {
            // SAFETY: `ptr` came from this plugin and is released exactly once.
            Some(release) => unsafe { release(ptr) },
            None => tracing::warn!(
                "{} does not export {}; leaking returned string",
                self.path.display(),
                RELEASE_STRING_SYMBOL
            ),
        }
        Some(text)
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("path", &self.path)
            .field("functions", &self.functions.iter().map(|r| &r.info).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// A typed plugin function, valid while its [`Plugin`] is loaded.
///
/// Calls go through `Deref`, so the borrow keeps the library mapped. Copying
/// the pointer out with `*function` drops that tie: the copy is a plain `F`
/// and calling it after the `Plugin` is dropped is undefined behavior.
pub struct Function<'a, F> {
    func: F,
    _plugin: PhantomData<&'a Plugin>,
}

impl<F: fmt::Debug> fmt::Debug for Function<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Function").field(&self.func).finish()
    }
}

impl<F> Deref for Function<'_, F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.func
    }
}
