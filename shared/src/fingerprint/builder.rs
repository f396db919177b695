use std::collections::HashMap;

use log::warn;

use crate::fingerprint::{
    error::FingerprintError, normalize_path, ConfigSnapshot, Fingerprint, ModDescriptor, ModFile,
    ModFileSet,
};

/// The two logical sub-trees whose files take part in the hash comparison,
/// plus the loaded binary modules reported separately by the provider.
const HASHED_SUBTREES: [&str; 2] = ["Defs/", "Patches/"];

/// Mods whose configs are never synced: they embed machine-specific data or
/// secrets (stream keys, usernames) that must not leave the machine.
const CONFIG_DENYLIST: [&str; 10] = [
    "hodlhodl.twitchtoolkit",
    "dubwise.dubsmintmenus",
    "dubwise.dubsmintminimap",
    "arandomkiwi.rimthemes",
    "brrainz.cameraplus",
    "giantspacehamster.moody",
    "fluffy.modmanager",
    "jelly.modswitch",
    "betterscenes.rimconnect",
    "jaxe.rimhud",
];

/// Read-only view of the host's active content. The builder never touches
/// storage directly, and never writes through this.
pub trait ContentProvider {
    /// Active content packages in load order.
    fn active_mods(&self) -> Vec<ModDescriptor>;

    /// Relative paths of the hashable files under one logical sub-tree of a
    /// mod, discovery order preserved.
    fn tree_files(&self, package_id: &str, subtree: &str) -> Vec<String>;

    /// Relative paths of the mod's loaded binary modules.
    fn module_files(&self, package_id: &str) -> Vec<String>;

    /// Raw bytes of one listed file.
    fn file_bytes(&self, package_id: &str, rel_path: &str) -> Result<Vec<u8>, FingerprintError>;

    /// Names of the running extension modules a mod has loaded.
    fn extension_modules(&self, package_id: &str) -> Vec<String>;

    /// Contents of the settings file the host's naming convention assigns to
    /// `(package_id, module_name)`, if one exists.
    fn settings_text(&self, package_id: &str, module_name: &str) -> Option<String>;
}

/// Locator for a settings file kept outside the host's standard naming
/// convention (third-party settings managers).
pub type SettingsLocator = Box<dyn Fn(&dyn ContentProvider) -> Option<ConfigSnapshot> + Send + Sync>;

/// Registered-provider lookup for third-party settings integrations.
///
/// Probed after the standard config scan; a mod id with no registration is
/// simply skipped, absence is not an error.
pub struct SettingsLocatorRegistry {
    locators: HashMap<String, SettingsLocator>,
}

impl SettingsLocatorRegistry {
    pub fn new() -> Self {
        Self {
            locators: HashMap::new(),
        }
    }

    pub fn register(&mut self, package_id: &str, locator: SettingsLocator) {
        self.locators.insert(package_id.to_owned(), locator);
    }

    fn probe(&self, package_id: &str, provider: &dyn ContentProvider) -> Option<ConfigSnapshot> {
        self.locators.get(package_id).and_then(|f| f(provider))
    }
}

impl Default for SettingsLocatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the compatibility snapshot for one join attempt.
pub struct FingerprintBuilder<'a> {
    provider: &'a dyn ContentProvider,
    locators: &'a SettingsLocatorRegistry,
    /// Our own package id; its config is never synced (self-loop guard).
    own_package_id: &'a str,
}

impl<'a> FingerprintBuilder<'a> {
    pub fn new(
        provider: &'a dyn ContentProvider,
        locators: &'a SettingsLocatorRegistry,
        own_package_id: &'a str,
    ) -> Self {
        Self {
            provider,
            locators,
            own_package_id,
        }
    }

    pub fn build(&self) -> Result<Fingerprint, FingerprintError> {
        let mods = self.provider.active_mods();
        let files = self.collect_files(&mods)?;
        let configs = self.collect_configs(&mods);

        Ok(Fingerprint {
            mods,
            files,
            configs,
        })
    }

    fn collect_files(&self, mods: &[ModDescriptor]) -> Result<ModFileSet, FingerprintError> {
        let mut files = ModFileSet::new();

        for m in mods {
            for rel_path in self.provider.module_files(&m.package_id) {
                self.hash_into(&mut files, &m.package_id, &rel_path)?;
            }

            for subtree in HASHED_SUBTREES {
                for rel_path in self.provider.tree_files(&m.package_id, subtree) {
                    self.hash_into(&mut files, &m.package_id, &rel_path)?;
                }
            }
        }

        Ok(files)
    }

    fn hash_into(
        &self,
        files: &mut ModFileSet,
        package_id: &str,
        rel_path: &str,
    ) -> Result<(), FingerprintError> {
        let bytes = self.provider.file_bytes(package_id, rel_path)?;
        let hash = crc32fast::hash(&bytes) as i32;
        files.add(package_id, ModFile::new(&normalize_path(rel_path), hash));
        Ok(())
    }

    fn collect_configs(&self, mods: &[ModDescriptor]) -> Vec<ConfigSnapshot> {
        let mut configs = Vec::new();

        for m in mods {
            let id = m.package_id.as_str();
            if id == self.own_package_id {
                continue;
            }
            if CONFIG_DENYLIST.contains(&id) {
                warn!("skipping config sync for denylisted mod {}", id);
                continue;
            }

            for module_name in self.provider.extension_modules(id) {
                if let Some(contents) = self.provider.settings_text(id, &module_name) {
                    configs.push(ConfigSnapshot {
                        mod_id: id.to_owned(),
                        file_name: module_name,
                        contents,
                    });
                }
            }

            if let Some(snapshot) = self.locators.probe(id, self.provider) {
                configs.push(snapshot);
            }
        }

        configs
    }
}

// Tests
