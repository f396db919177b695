//! Content fingerprint: the mods + files + configs snapshot a joining peer
//! presents for the compatibility handshake.

pub mod builder;
pub mod error;

use std::collections::BTreeMap;

use tandem_serde::{ByteReader, ByteWriter, CodecError, MAX_STRING_LEN};

use crate::constants::MAX_CONFIG_CONTENT_LEN;

/// Where a content package was installed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModSource {
    Official,
    Local,
    Workshop,
}

impl ModSource {
    pub fn wire_value(&self) -> u8 {
        match self {
            ModSource::Official => 0,
            ModSource::Local => 1,
            ModSource::Workshop => 2,
        }
    }

    pub fn from_wire(value: u8) -> Result<Self, CodecError> {
        match value {
            0 => Ok(ModSource::Official),
            1 => Ok(ModSource::Local),
            2 => Ok(ModSource::Workshop),
            _ => Err(CodecError::FormatError("invalid mod source byte")),
        }
    }
}

/// One active content package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModDescriptor {
    pub package_id: String,
    pub display_name: String,
    /// Workshop published-file id; zero means none.
    pub origin_id: u64,
    pub source: ModSource,
}

/// One hashed content file of a mod.
///
/// `rel_path` is normalized to forward slashes before hashing or
/// serialization; it is unique within its mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModFile {
    pub rel_path: String,
    pub hash: i32,
}

impl ModFile {
    pub fn new(rel_path: &str, hash: i32) -> Self {
        Self {
            rel_path: normalize_path(rel_path),
            hash,
        }
    }
}

/// Normalizes a relative path for cross-platform comparison.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Mod id -> (rel path -> file).
///
/// Backed by ordered maps so serialization bytes are reproducible no matter
/// what order the builder discovered files in. Comparison is set equality
/// per mod and would not need the ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModFileSet {
    files: BTreeMap<String, BTreeMap<String, ModFile>>,
}

impl ModFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mod_id: &str, file: ModFile) {
        self.files
            .entry(mod_id.to_owned())
            .or_default()
            .insert(file.rel_path.clone(), file);
    }

    pub fn get(&self, mod_id: &str, rel_path: &str) -> Option<&ModFile> {
        self.files.get(mod_id)?.get(rel_path)
    }

    pub fn mods(&self) -> impl Iterator<Item = &String> {
        self.files.keys()
    }

    pub fn files_of(&self, mod_id: &str) -> impl Iterator<Item = &ModFile> {
        self.files.get(mod_id).into_iter().flat_map(|m| m.values())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, impl Iterator<Item = &ModFile>)> {
        self.files.iter().map(|(id, m)| (id, m.values()))
    }

    pub fn file_count(&self, mod_id: &str) -> usize {
        self.files.get(mod_id).map_or(0, |m| m.len())
    }

    pub fn mod_count(&self) -> usize {
        self.files.len()
    }

    /// Hashed files across every mod.
    pub fn total_files(&self) -> usize {
        self.files.values().map(BTreeMap::len).sum()
    }
}

/// One syncable text config file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConfigSnapshot {
    pub mod_id: String,
    pub file_name: String,
    pub contents: String,
}

/// The full compatibility snapshot: active mods in load order, hashed
/// content files, and syncable configs.
///
/// Built once per join attempt, read-only against storage, discarded after
/// comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// Load order is significant; this stays a sequence.
    pub mods: Vec<ModDescriptor>,
    pub files: ModFileSet,
    pub configs: Vec<ConfigSnapshot>,
}

impl Fingerprint {
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();

        writer.write_u32(self.mods.len() as u32);
        for m in &self.mods {
            writer.write_string(&m.package_id);
            writer.write_string(&m.display_name);
            writer.write_u64(m.origin_id);
            writer.write_u8(m.source.wire_value());
        }

        writer.write_u32(self.files.mod_count() as u32);
        for (mod_id, files) in self.files.iter() {
            writer.write_string(mod_id);
            writer.write_u32(self.files.file_count(mod_id) as u32);
            for file in files {
                writer.write_string(&file.rel_path);
                writer.write_i32(file.hash);
            }
        }

        writer.write_u32(self.configs.len() as u32);
        for config in &self.configs {
            writer.write_string(&config.mod_id);
            writer.write_string(&config.file_name);
            writer.write_string(&config.contents);
        }

        writer.to_bytes()
    }

    pub fn decode(reader: &mut ByteReader) -> Result<Self, CodecError> {
        let mod_count = reader.read_u32()? as usize;
        let mut mods = Vec::new();
        for _ in 0..mod_count {
            mods.push(ModDescriptor {
                package_id: reader.read_string(MAX_STRING_LEN)?,
                display_name: reader.read_string(MAX_STRING_LEN)?,
                origin_id: reader.read_u64()?,
                source: ModSource::from_wire(reader.read_u8()?)?,
            });
        }

        let root_count = reader.read_u32()? as usize;
        let mut files = ModFileSet::new();
        for _ in 0..root_count {
            let mod_id = reader.read_string(MAX_STRING_LEN)?;
            let file_count = reader.read_u32()? as usize;
            for _ in 0..file_count {
                let rel_path = reader.read_string(MAX_STRING_LEN)?;
                let hash = reader.read_i32()?;
                files.add(&mod_id, ModFile::new(&rel_path, hash));
            }
        }

        let config_count = reader.read_u32()? as usize;
        let mut configs = Vec::new();
        for _ in 0..config_count {
            configs.push(ConfigSnapshot {
                mod_id: reader.read_string(MAX_STRING_LEN)?,
                file_name: reader.read_string(MAX_STRING_LEN)?,
                contents: reader.read_string(MAX_CONFIG_CONTENT_LEN)?,
            });
        }

        Ok(Self {
            mods,
            files,
            configs,
        })
    }
}

// Tests
