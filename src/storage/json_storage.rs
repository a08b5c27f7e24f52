use crate::models::Record;
use crate::storage::{Snapshot, Storage, StoreError};
use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Persists records as a pretty-printed JSON array with a `.seq` sidecar
/// holding the id high-water mark.
///
/// Writes go to a `.tmp` sibling that is then renamed over the target, so a
/// crash leaves either the old or the new file, never a torn one.
pub struct JsonFileStorage {
    path: PathBuf,
    sequence_path: PathBuf
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let sequence_path = sibling(&path, ".seq");

        Self {
            path,
            sequence_path
        }
    }

    fn preserve_corrupt_file(&self) {
        let backup = sibling(&self.path, ".corrupt");

        match fs::copy(&self.path, &backup) {
            Ok(_) => warn!("Corrupt store copied to [{}]", backup.display()),
            Err(error) => warn!("Could not back up corrupt store [{}]: {error}", self.path.display())
        }
    }
}

impl Storage for JsonFileStorage {
    fn load_records(&self) -> Result<Vec<Record>, StoreError> {
        let Some(content) = read_optional(&self.path)? else {
            debug!("Store [{}] does not exist yet", self.path.display());
            return Ok(Vec::new())
        };

        serde_json::from_str(&content).map_err(|error| {
            self.preserve_corrupt_file();
            StoreError::corrupt(&self.path, error)
        })
    }

    fn load_high_water(&self) -> Result<u64, StoreError> {
        let Some(content) = read_optional(&self.sequence_path)? else {
            return Ok(0)
        };

        match content.trim().parse() {
            Ok(value) => Ok(value),
            Err(error) => {
                warn!("Ignoring unreadable id sequence [{}]: {error}", self.sequence_path.display());
                Ok(0)
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&snapshot.records)?;

        write_atomically(&self.path, json.as_bytes())?;
        write_atomically(&self.sequence_path, snapshot.high_water.to_string().as_bytes())
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
        Err(error) => Err(StoreError::io(path, error))
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let temporary = sibling(path, ".tmp");

    let mut file = File::create(&temporary).map_err(|error| StoreError::io(&temporary, error))?;
    file.write_all(bytes).map_err(|error| StoreError::io(&temporary, error))?;
    file.sync_all().map_err(|error| StoreError::io(&temporary, error))?;

    fs::rename(&temporary, path).map_err(|error| StoreError::io(path, error))
}
