use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{ClientError, ClientResult};

/// Persistent client-side key/value storage.
///
/// Multi-key writes and removals are applied as one unit so a reader never
/// observes a token without its role or the other way around.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;

    fn set_all(&self, entries: &[(&str, String)]) -> ClientResult<()>;

    fn remove_all(&self, keys: &[&str]) -> ClientResult<()>;
}

/// JSON object file, one entry per key.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub const FILE_NAME: &'static str = "session.json";

    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ClientResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| ClientError::storage(format!("{}: {}", self.path.display(), e)))?;
        let entries: BTreeMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| ClientError::storage(format!("{}: {}", self.path.display(), e)))?;
        Ok(entries)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| ClientError::storage(e.to_string()))?;
            }
        }

        let content = serde_json::to_string_pretty(entries)?;
        // Write-then-rename: readers see the old file or the new one
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| ClientError::storage(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| ClientError::storage(e.to_string()))?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set_all(&self, entries: &[(&str, String)]) -> ClientResult<()> {
        // A corrupt file is replaced rather than blocking login
        let mut current = self.load().unwrap_or_default();
        for (key, value) in entries {
            current.insert((*key).to_string(), value.clone());
        }
        self.save(&current)
    }

    fn remove_all(&self, keys: &[&str]) -> ClientResult<()> {
        let mut current = self.load().unwrap_or_default();
        for key in keys {
            current.remove(*key);
        }
        self.save(&current)
    }
}

/// Process-local storage, used by tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ClientResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| ClientError::storage("memory storage lock poisoned"))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_all(&self, entries: &[(&str, String)]) -> ClientResult<()> {
        let mut current = self.lock()?;
        for (key, value) in entries {
            current.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> ClientResult<()> {
        let mut current = self.lock()?;
        for key in keys {
            current.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "jobboard-storage-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn file_storage_round_trips_entries() {
        let dir = temp_dir("roundtrip");
        let storage = FileStorage::new(&dir);

        assert_eq!(storage.get("token").unwrap(), None);
        storage
            .set_all(&[("token", "abc".to_string()), ("role", "admin".to_string())])
            .unwrap();

        let reopened = FileStorage::new(&dir);
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get("role").unwrap().as_deref(), Some("admin"));

        reopened.remove_all(&["token", "role"]).unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
        assert_eq!(storage.get("role").unwrap(), None);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_file_is_replaced_on_write() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(FileStorage::FILE_NAME), "{not json").unwrap();

        let storage = FileStorage::new(&dir);
        assert!(storage.get("token").is_err());

        storage.set_all(&[("token", "fresh".to_string())]).unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("fresh"));

        let _ = fs::remove_dir_all(&dir);
    }
}
