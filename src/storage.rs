use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::models::{Category, Task};

/// Key holding the serialized task list.
pub const TASKS_KEY: &str = "tasks";
/// Key holding the serialized category list.
pub const CATEGORIES_KEY: &str = "categories";

/// Minimal string key-value persistence used by the task store.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` if the key was never written.
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    /// Overwrites the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
    /// Deletes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// Stores each key as `<key>.json` inside a data directory.
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path to the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let mut f = OpenOptions::new().read(true).open(&path)?;
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        Ok(Some(s))
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.path_for(key))?;
        f.write_all(value.as_bytes())?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Volatile store. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

fn load_list<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &'static str,
) -> StoreResult<Option<Vec<T>>> {
    match store.get(key)? {
        None => Ok(None),
        Some(s) => serde_json::from_str(&s)
            .map(Some)
            .map_err(|source| StoreError::Serde { key, source }),
    }
}

fn save_list<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &'static str,
    items: &[T],
) -> StoreResult<()> {
    let s = serde_json::to_string_pretty(items).map_err(|source| StoreError::Serde { key, source })?;
    store.set(key, &s)?;
    Ok(())
}

/// Loads all tasks. `Ok(None)` means nothing has been saved yet.
pub fn load_tasks(store: &dyn KeyValueStore) -> StoreResult<Option<Vec<Task>>> {
    load_list(store, TASKS_KEY)
}

/// Saves the given list of tasks, overwriting what was stored.
pub fn save_tasks(store: &mut dyn KeyValueStore, tasks: &[Task]) -> StoreResult<()> {
    save_list(store, TASKS_KEY, tasks)
}

/// Loads all categories. `Ok(None)` means nothing has been saved yet.
pub fn load_categories(store: &dyn KeyValueStore) -> StoreResult<Option<Vec<Category>>> {
    load_list(store, CATEGORIES_KEY)
}

/// Saves the given list of categories, overwriting what was stored.
pub fn save_categories(store: &mut dyn KeyValueStore, categories: &[Category]) -> StoreResult<()> {
    save_list(store, CATEGORIES_KEY, categories)
}

/// Deletes both the task and category entries.
pub fn delete_database(store: &mut dyn KeyValueStore) -> StoreResult<()> {
    store.remove(TASKS_KEY)?;
    store.remove(CATEGORIES_KEY)?;
    Ok(())
}
