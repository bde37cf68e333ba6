use std::{
    fs, io,
    path::{Path, PathBuf},
};

use merge_arena_world::Profile;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version written into every save file.
pub const SAVE_VERSION: u32 = 1;

/// Versioned on-disk snapshot of the persisted profile.
///
/// Every field is optional on load. A missing version reads as the current one
/// and a missing timestamp disables offline rewards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    /// Format version.
    #[serde(default = "current_version")]
    pub version: u32,
    /// Wall time of the save, in milliseconds since the Unix epoch.
    #[serde(default)]
    pub saved_at_ms: Option<u64>,
    /// Persisted game state.
    #[serde(default)]
    pub profile: Profile,
}

const fn current_version() -> u32 {
    SAVE_VERSION
}

impl SaveFile {
    /// Wraps the profile in a save file stamped with `saved_at_ms`.
    #[must_use]
    pub fn new(profile: Profile, saved_at_ms: u64) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at_ms: Some(saved_at_ms),
            profile,
        }
    }

    /// Serialises the save file to JSON.
    pub fn encode(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a save file, normalising the profile it carries.
    pub fn decode(contents: &str) -> Result<Self, StorageError> {
        let mut save: Self = serde_json::from_str(contents)?;
        if save.version > SAVE_VERSION {
            return Err(StorageError::UnsupportedVersion(save.version));
        }
        save.profile = save.profile.normalized();
        Ok(save)
    }
}

/// Failures of the save storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage backend could not be reached.
    #[error("save storage unavailable: {0}")]
    Unavailable(#[from] io::Error),
    /// The stored data is not a valid save file.
    #[error("save data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    /// The save was written by a newer format.
    #[error("save format version {0} is not supported")]
    UnsupportedVersion(u32),
}

/// Backend that holds a single serialised save file.
pub trait SaveStore {
    /// Reads the stored save, returning `None` when nothing was saved yet.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replaces the stored save.
    fn write(&mut self, contents: &str) -> Result<(), StorageError>;
}

/// In-memory store used by tests and headless sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    contents: Option<String>,
}

impl MemoryStore {
    /// Creates a store pre-filled with the provided contents.
    #[must_use]
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
        }
    }

    /// Currently stored contents.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        self.contents = Some(contents.to_owned());
        Ok(())
    }
}

/// Store backed by a JSON file on disk.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store that reads and writes `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the save file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStore for FileStore {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, contents)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use merge_arena_core::{HeroClassId, ItemKind, ItemStack};

    use super::*;

    #[test]
    fn save_file_round_trips_profile() {
        let mut profile = Profile::default();
        profile.gold = 4_321;
        profile.stage = 7;
        let grid = &mut profile
            .heroes
            .get_mut(&HeroClassId::Warrior)
            .expect("warrior")
            .grid;
        let _ = grid.insert(ItemStack::new(ItemKind::CritGem, 4));

        let encoded = SaveFile::new(profile.clone(), 1_000).encode().expect("encode");
        let decoded = SaveFile::decode(&encoded).expect("decode");

        assert_eq!(decoded.version, SAVE_VERSION);
        assert_eq!(decoded.saved_at_ms, Some(1_000));
        assert_eq!(decoded.profile, profile.normalized());
    }

    #[test]
    fn missing_profile_fields_take_defaults() {
        let decoded = SaveFile::decode(r#"{"version":1,"saved_at_ms":5,"profile":{"gold":42}}"#)
            .expect("decode");
        assert_eq!(decoded.profile.gold, 42);
        assert_eq!(decoded.profile.stage, 1);
        assert!(decoded.profile.is_unlocked(HeroClassId::Warrior));
        assert!(!decoded.profile.is_unlocked(HeroClassId::Axe));
    }

    #[test]
    fn bare_profile_loads_without_wrapper_fields() {
        let decoded = SaveFile::decode(r#"{"profile":{"gold":77,"stage":4}}"#).expect("decode");
        assert_eq!(decoded.version, SAVE_VERSION);
        assert_eq!(decoded.saved_at_ms, None);
        assert_eq!(decoded.profile.gold, 77);
        assert_eq!(decoded.profile.stage, 4);
    }

    #[test]
    fn corrupt_and_future_saves_are_rejected() {
        assert!(matches!(
            SaveFile::decode("not json"),
            Err(StorageError::Corrupt(_))
        ));
        assert!(matches!(
            SaveFile::decode(r#"{"version":9,"saved_at_ms":0,"profile":{}}"#),
            Err(StorageError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn memory_store_replaces_contents() {
        let mut store = MemoryStore::default();
        assert_eq!(store.read().expect("read"), None);
        store.write("a").expect("write");
        store.write("b").expect("write");
        assert_eq!(store.contents(), Some("b"));
    }

    #[test]
    fn file_store_treats_missing_file_as_empty() {
        let path = std::env::temp_dir().join(format!("merge-arena-missing-{}.json", std::process::id()));
        let store = FileStore::new(&path);
        assert_eq!(store.read().expect("read"), None);
    }
}
