use crate::utils::HyphenatedUUID;
use itemsets_save_data::usage_data::{PlayerUsageData, UsageLoadError, UsageSaveError};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Every usage flag is stored under this category of the player's data.
pub const USAGE_CATEGORY: &str = "itemCommands";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to load usage data for {uuid}")]
    Load {
        uuid: HyphenatedUUID,
        #[source]
        source: UsageLoadError,
    },
    #[error("failed to save usage data for {uuid}")]
    Save {
        uuid: HyphenatedUUID,
        #[source]
        source: UsageSaveError,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Durable per-player flags keyed by command name.
pub trait UsageStore {
    fn get(&mut self, uuid: u128, key: &str) -> Result<Option<bool>, StoreError>;

    fn put(&mut self, uuid: u128, key: &str, value: bool) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    fn remove(&mut self, uuid: u128, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryUsageStore {
    records: FxHashMap<u128, PlayerUsageData>,
}

impl MemoryUsageStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn record(&self, uuid: u128) -> Option<&PlayerUsageData> {
        self.records.get(&uuid)
    }

    fn data(&mut self, uuid: u128) -> &mut PlayerUsageData {
        let data = self.records.entry(uuid).or_default();
        data.category_mut(USAGE_CATEGORY);
        data
    }
}

impl UsageStore for MemoryUsageStore {
    fn get(&mut self, uuid: u128, key: &str) -> Result<Option<bool>, StoreError> {
        Ok(self.data(uuid).get(USAGE_CATEGORY, key))
    }

    fn put(&mut self, uuid: u128, key: &str, value: bool) -> Result<(), StoreError> {
        self.data(uuid).put(USAGE_CATEGORY, key, value);
        Ok(())
    }

    fn remove(&mut self, uuid: u128, key: &str) -> Result<(), StoreError> {
        self.data(uuid).remove(USAGE_CATEGORY, key);
        Ok(())
    }
}

/// Keeps one usage data file per player in a directory. Records are loaded
/// on first use and every change is written through to disk.
pub struct FileUsageStore {
    dir: PathBuf,
    cache: FxHashMap<u128, PlayerUsageData>,
}

impl FileUsageStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            cache: FxHashMap::default(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, uuid: u128) -> PathBuf {
        self.dir.join(format!("{}.dat", HyphenatedUUID(uuid)))
    }

    fn data(&mut self, uuid: u128) -> Result<&mut PlayerUsageData, StoreError> {
        let path = self.path_for(uuid);
        let data = match self.cache.entry(uuid) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let data = if path.exists() {
                    PlayerUsageData::load_from_file(&path).map_err(|source| StoreError::Load {
                        uuid: HyphenatedUUID(uuid),
                        source,
                    })?
                } else {
                    debug!("Creating usage data for {}", HyphenatedUUID(uuid));
                    PlayerUsageData::default()
                };
                entry.insert(data)
            }
        };
        data.category_mut(USAGE_CATEGORY);
        Ok(data)
    }

    fn save(&self, uuid: u128) -> Result<(), StoreError> {
        let Some(data) = self.cache.get(&uuid) else {
            return Ok(());
        };
        data.save_to_file(self.path_for(uuid))
            .map_err(|source| StoreError::Save {
                uuid: HyphenatedUUID(uuid),
                source,
            })
    }

    /// Drops the cached record of a player, e.g. when they leave.
    pub fn unload(&mut self, uuid: u128) {
        self.cache.remove(&uuid);
    }
}

impl UsageStore for FileUsageStore {
    fn get(&mut self, uuid: u128, key: &str) -> Result<Option<bool>, StoreError> {
        Ok(self.data(uuid)?.get(USAGE_CATEGORY, key))
    }

    fn put(&mut self, uuid: u128, key: &str, value: bool) -> Result<(), StoreError> {
        self.data(uuid)?.put(USAGE_CATEGORY, key, value);
        self.save(uuid)
    }

    fn remove(&mut self, uuid: u128, key: &str) -> Result<(), StoreError> {
        if self.data(uuid)?.remove(USAGE_CATEGORY, key) {
            self.save(uuid)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let uuid = 0x1234;

        let mut store = FileUsageStore::open(dir.path()).unwrap();
        store.put(uuid, "giveItemSet2", true).unwrap();
        drop(store);

        let mut store = FileUsageStore::open(dir.path()).unwrap();
        assert_eq!(store.get(uuid, "giveItemSet2").unwrap(), Some(true));
        store.remove(uuid, "giveItemSet2").unwrap();
        drop(store);

        let mut store = FileUsageStore::open(dir.path()).unwrap();
        assert_eq!(store.get(uuid, "giveItemSet2").unwrap(), None);
    }

    #[test]
    fn reads_do_not_create_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileUsageStore::open(dir.path()).unwrap();
        assert_eq!(store.get(7, "giveItemSet1").unwrap(), None);
        store.remove(7, "giveItemSet1").unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn corrupt_files_surface_as_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileUsageStore::open(dir.path()).unwrap();
        fs::write(store.path_for(9), b"garbage!garbage!").unwrap();

        assert!(matches!(
            store.get(9, "giveItemSet2"),
            Err(StoreError::Load {
                source: UsageLoadError::InvalidHeader,
                ..
            })
        ));
    }

    #[test]
    fn memory_store_creates_the_record_lazily() {
        let mut store = MemoryUsageStore::new();
        assert!(store.record(1).is_none());
        assert_eq!(store.get(1, "kit").unwrap(), None);
        let record = store.record(1).unwrap();
        assert!(record.categories.contains_key(USAGE_CATEGORY));
    }
}
