use std::{
    collections::BTreeMap,
    io::{ErrorKind, Read, Seek, Write},
    path::{Path, PathBuf},
};

use anyhow::Result;
use fs4::fs_std::FileExt;
use serde_json::Value;
use tracing::{debug, warn};

use super::Preferences;

const PREFERENCES_FILE: &str = "preferences.json";

/// The main realization of [Preferences].
///
/// The whole store is one JSON object on disk and the file itself is the source of truth: every
/// read loads it under a shared lock, every write rewrites only its own key under an exclusive
/// lock. A CLI invocation and a long-running daemon therefore share the store without a
/// coordination channel, and neither can push stale values over the other's.
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(PREFERENCES_FILE);
        // Surface an unreadable store at startup rather than as defaults later.
        Self::load(&path)?;
        Ok(Self { path })
    }

    fn load(path: &Path) -> Result<BTreeMap<String, Value>> {
        let mut file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let mut contents = String::new();
        let result = file.read_to_string(&mut contents);
        FileExt::unlock(&file)?;
        result?;

        Ok(Self::parse(path, &contents))
    }

    fn parse(path: &Path, contents: &str) -> BTreeMap<String, Value> {
        if contents.trim().is_empty() {
            return BTreeMap::new();
        }
        match serde_json::from_str(contents) {
            Ok(values) => values,
            Err(e) => {
                // ignore illegal content. Might happen after shutdowns
                warn!("Preference file {path:?} is corrupted, starting over: {e}");
                BTreeMap::new()
            }
        }
    }

    fn read(&self, key: &str) -> Option<Value> {
        match Self::load(&self.path) {
            Ok(mut values) => values.remove(key),
            Err(e) => {
                warn!("Couldn't read preference file {:?}: {e}", self.path);
                None
            }
        }
    }

    fn put(&mut self, key: &str, value: Value) -> Result<()> {
        debug!("Persisting {key} = {value}");
        let mut file = std::fs::File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        file.lock_exclusive()?;
        let result = self.update(&mut file, key, value);
        FileExt::unlock(&file)?;
        result
    }

    /// Read-modify-write of a single key while the exclusive lock is held.
    fn update(&self, file: &mut std::fs::File, key: &str, value: Value) -> Result<()> {
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let mut values = Self::parse(&self.path, &contents);
        values.insert(key.to_string(), value);

        file.set_len(0)?;
        file.rewind()?;
        serde_json::to_writer_pretty(&mut *file, &values)?;
        file.flush()?;
        Ok(())
    }
}

impl Preferences for FilePreferences {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.read(key).and_then(|v| v.as_i64()).unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.put(key, value.into())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.read(key)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.put(key, value.into())
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.read(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.put(key, value.into())
    }
}
