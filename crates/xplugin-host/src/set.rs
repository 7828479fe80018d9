//! A directory's worth of plugins, registered under one namespace.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use xplugin_abi::{EntryInfo, NativeFn};

use crate::discovery::discover_plugins;
use crate::error::LoadError;
use crate::loader::{Function, Plugin};

/// Loaded plugins plus a lower-cased function namespace.
///
/// When two plugins export the same name, the one loaded later wins.
#[derive(Debug, Default)]
pub struct PluginSet {
    plugins: Vec<Plugin>,
    /// Lower-cased function name -> index in `plugins`.
    names: BTreeMap<String, usize>,
    failures: Vec<(PathBuf, LoadError)>,
}

impl PluginSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every plugin library found in `dir`.
    ///
    /// Libraries that fail to load are skipped and reported by
    /// [`failures`](Self::failures); only an unreadable directory is an error.
    pub fn load_dir(dir: &Path) -> Result<Self, LoadError> {
        let mut set = Self::new();
        for path in discover_plugins(dir)? {
            match Plugin::open(&path) {
                Ok(plugin) => set.insert(plugin),
                Err(e) => {
                    tracing::warn!("skipping plugin {}: {}", path.display(), e);
                    set.failures.push((path, e));
                }
            }
        }
        Ok(set)
    }

    /// Register `plugin`'s functions, overriding earlier ones of the same name.
    pub fn insert(&mut self, plugin: Plugin) {
        let slot = self.plugins.len();
        for info in plugin.functions() {
            let key = info.name.to_ascii_lowercase();
            if let Some(previous) = self.names.insert(key, slot) {
                tracing::warn!(
                    "{} from {} overrides the one from {}",
                    info.name,
                    plugin.path().display(),
                    self.plugins[previous].path().display()
                );
            }
        }
        self.plugins.push(plugin);
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Libraries that could not be loaded, with the reason.
    pub fn failures(&self) -> &[(PathBuf, LoadError)] {
        &self.failures
    }

    /// Registered function names, lower-cased and sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// The plugin providing `name` and its descriptor.
    pub fn resolve(&self, name: &str) -> Option<(&Plugin, &EntryInfo)> {
        let plugin = self.plugins.get(*self.names.get(&name.to_ascii_lowercase())?)?;
        plugin.lookup(name).map(|info| (plugin, info))
    }

    /// Typed pointer to `name` from whichever plugin provides it.
    pub fn function<F: NativeFn>(&self, name: &str) -> Result<Function<'_, F>, LoadError> {
        let (plugin, _) = self
            .resolve(name)
            .ok_or_else(|| LoadError::UnknownFunction { name: name.to_string() })?;
        plugin.function(name)
    }
}
