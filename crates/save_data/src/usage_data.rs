use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Version History:
/// 0: Initial usage data file with header
pub const VERSION: u32 = 0;

#[derive(Error, Debug)]
pub enum UsageLoadError {
    #[error("usage data deserialization error")]
    Deserialize(#[from] bincode::Error),

    #[error("invalid usage data header")]
    InvalidHeader,

    #[error("usage data version {0} too new to be loaded")]
    TooNew(u32),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum UsageSaveError {
    #[error("usage data serialization error")]
    Serialize(#[from] bincode::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

static USAGE_MAGIC: &[u8; 8] = b"\x86ITMSET\x00";

/// The persistent data attached to a single player. Values are grouped by
/// category, each category mapping a key to a boolean flag.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct PlayerUsageData {
    pub categories: FxHashMap<String, FxHashMap<String, bool>>,
}

impl PlayerUsageData {
    pub fn get(&self, category: &str, key: &str) -> Option<bool> {
        self.categories.get(category)?.get(key).copied()
    }

    /// Returns the category, creating an empty one if it doesn't exist yet.
    pub fn category_mut(&mut self, category: &str) -> &mut FxHashMap<String, bool> {
        self.categories.entry(category.to_owned()).or_default()
    }

    pub fn put(&mut self, category: &str, key: &str, value: bool) {
        self.category_mut(category).insert(key.to_owned(), value);
    }

    /// Returns true if the key was present.
    pub fn remove(&mut self, category: &str, key: &str) -> bool {
        self.categories
            .get_mut(category)
            .is_some_and(|entries| entries.remove(key).is_some())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<PlayerUsageData, UsageLoadError> {
        let mut file = File::open(&path)?;

        let mut magic = [0; 8];
        file.read_exact(&mut magic)?;
        if &magic != USAGE_MAGIC {
            return Err(UsageLoadError::InvalidHeader);
        }

        let version = file.read_u32::<LittleEndian>()?;
        if version > VERSION {
            return Err(UsageLoadError::TooNew(version));
        }

        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        debug!(
            "Loaded usage data from {} ({} bytes)",
            path.as_ref().display(),
            buf.len()
        );
        Ok(bincode::deserialize(&buf)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), UsageSaveError> {
        let mut file = File::create(path)?;

        file.write_all(USAGE_MAGIC)?;
        file.write_u32::<LittleEndian>(VERSION)?;
        let data = bincode::serialize(self)?;
        file.write_all(&data)?;
        file.sync_data()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn remove_reports_presence() {
        let mut data = PlayerUsageData::default();
        assert!(!data.remove("itemCommands", "kit"));
        data.put("itemCommands", "kit", true);
        assert!(data.remove("itemCommands", "kit"));
        assert_eq!(data.get("itemCommands", "kit"), None);
        // The category itself stays around once created
        assert!(data.categories.contains_key("itemCommands"));
    }

    #[test]
    fn survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player.dat");

        let mut data = PlayerUsageData::default();
        data.put("itemCommands", "giveItemSet2", true);
        data.put("itemCommands", "giveItemSet3", false);
        data.save_to_file(&path).unwrap();

        let loaded = PlayerUsageData::load_from_file(&path).unwrap();
        assert_eq!(loaded, data);
        assert_eq!(loaded.get("itemCommands", "giveItemSet2"), Some(true));
    }

    #[test]
    fn rejects_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player.dat");
        fs::write(&path, b"definitely not usage data").unwrap();

        assert!(matches!(
            PlayerUsageData::load_from_file(&path),
            Err(UsageLoadError::InvalidHeader)
        ));
    }

    #[test]
    fn rejects_newer_versions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player.dat");

        let mut bytes = USAGE_MAGIC.to_vec();
        bytes.write_u32::<LittleEndian>(VERSION + 1).unwrap();
        fs::write(&path, bytes).unwrap();

        assert!(matches!(
            PlayerUsageData::load_from_file(&path),
            Err(UsageLoadError::TooNew(v)) if v == VERSION + 1
        ));
    }
}
