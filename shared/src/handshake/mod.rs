//! Join-time compatibility handshake.
//!
//! The equality rule is asymmetric on purpose: mod load order matters, so
//! the mod list compares as an ordered sequence, while file hashes and
//! config snapshots compare as unordered sets. Do not "fix" this.

use std::collections::BTreeSet;

use tandem_serde::{ByteReader, ByteWriter, CodecError, Serde, MAX_STRING_LEN};

use crate::fingerprint::Fingerprint;

/// One way in which two fingerprints (or versions) disagree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Mismatch {
    /// Engine or session version strings differ.
    Version,
    /// Mod lists differ as ordered sequences of (package id, source).
    ModList,
    /// A content file hash differs or the file exists on one side only.
    FileHash { mod_id: String, rel_path: String },
    /// A syncable config differs or exists on one side only.
    Config { mod_id: String, file_name: String },
}

impl Serde for Mismatch {
    fn ser(&self, writer: &mut ByteWriter) {
        match self {
            Mismatch::Version => writer.write_u8(0),
            Mismatch::ModList => writer.write_u8(1),
            Mismatch::FileHash { mod_id, rel_path } => {
                writer.write_u8(2);
                writer.write_string(mod_id);
                writer.write_string(rel_path);
            }
            Mismatch::Config { mod_id, file_name } => {
                writer.write_u8(3);
                writer.write_string(mod_id);
                writer.write_string(file_name);
            }
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, CodecError> {
        match reader.read_u8()? {
            0 => Ok(Mismatch::Version),
            1 => Ok(Mismatch::ModList),
            2 => Ok(Mismatch::FileHash {
                mod_id: reader.read_string(MAX_STRING_LEN)?,
                rel_path: reader.read_string(MAX_STRING_LEN)?,
            }),
            3 => Ok(Mismatch::Config {
                mod_id: reader.read_string(MAX_STRING_LEN)?,
                file_name: reader.read_string(MAX_STRING_LEN)?,
            }),
            _ => Err(CodecError::FormatError("invalid mismatch kind byte")),
        }
    }
}

/// Outcome of comparing two fingerprints. Compatible iff no mismatches;
/// any violation fails closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeResult {
    pub mismatches: Vec<Mismatch>,
}

impl HandshakeResult {
    pub fn compatible(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl Serde for HandshakeResult {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.mismatches.len() as u32);
        for mismatch in &self.mismatches {
            mismatch.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, CodecError> {
        let count = reader.read_u32()? as usize;
        let mut mismatches = Vec::new();
        for _ in 0..count {
            mismatches.push(Mismatch::de(reader)?);
        }
        Ok(Self { mismatches })
    }
}

/// Compares the local snapshot against a remote one.
///
/// The accept/reject decision is symmetric in its arguments even though the
/// mismatch details are phrased from the local side.
pub fn compare(
    local: &Fingerprint,
    remote: &Fingerprint,
    local_version: &str,
    remote_version: &str,
) -> HandshakeResult {
    let mut mismatches = Vec::new();

    if local_version != remote_version {
        mismatches.push(Mismatch::Version);
    }

    // Ordered: load order is part of compatibility. Only id and source take
    // part; display names and workshop ids may differ freely.
    let local_mods = local.mods.iter().map(|m| (&m.package_id, m.source));
    let remote_mods = remote.mods.iter().map(|m| (&m.package_id, m.source));
    if !local_mods.eq(remote_mods) {
        mismatches.push(Mismatch::ModList);
    }

    compare_files(local, remote, &mut mismatches);
    compare_configs(local, remote, &mut mismatches);

    HandshakeResult { mismatches }
}

fn compare_files(local: &Fingerprint, remote: &Fingerprint, mismatches: &mut Vec<Mismatch>) {
    let mut seen = BTreeSet::new();

    for (mod_id, files) in local.files.iter() {
        for file in files {
            match remote.files.get(mod_id, &file.rel_path) {
                Some(theirs) if theirs.hash == file.hash => {}
                _ => {
                    mismatches.push(Mismatch::FileHash {
                        mod_id: mod_id.clone(),
                        rel_path: file.rel_path.clone(),
                    });
                }
            }
            seen.insert((mod_id.clone(), file.rel_path.clone()));
        }
    }

    // Files only the remote side has.
    for (mod_id, files) in remote.files.iter() {
        for file in files {
            if !seen.contains(&(mod_id.clone(), file.rel_path.clone())) {
                mismatches.push(Mismatch::FileHash {
                    mod_id: mod_id.clone(),
                    rel_path: file.rel_path.clone(),
                });
            }
        }
    }
}

fn compare_configs(local: &Fingerprint, remote: &Fingerprint, mismatches: &mut Vec<Mismatch>) {
    let local_set: BTreeSet<_> = local.configs.iter().collect();
    let remote_set: BTreeSet<_> = remote.configs.iter().collect();

    let mut diff = BTreeSet::new();
    for config in local_set.symmetric_difference(&remote_set) {
        diff.insert((config.mod_id.clone(), config.file_name.clone()));
    }

    for (mod_id, file_name) in diff {
        mismatches.push(Mismatch::Config { mod_id, file_name });
    }
}

// Tests
