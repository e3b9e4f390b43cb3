use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::{CounterStore, StoreError};
use crate::config::StoreConfig;

/// TOML-backed namespace on disk.
///
/// One document per namespace (`<dir>/<namespace>.toml`). Writes replace the
/// document through a temp file + rename, so readers in other processes see
/// either the old or the new document. Read-modify-write of the document is
/// serialized with an exclusive lock on `<dir>/<namespace>.lock`.
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>, namespace: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            path: dir.join(format!("{namespace}.toml")),
            lock_path: dir.join(format!("{namespace}.lock")),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.data_dir(), &config.namespace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_document(&self) -> Result<Option<toml::Table>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let document = toml::from_str::<toml::Table>(&content).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(document))
    }

    fn write_document(&self, document: &toml::Table) -> Result<(), StoreError> {
        let content =
            toml::to_string(document).map_err(|e| StoreError::Serialize { source: e })?;
        let tmp_path = self.path.with_extension("toml.tmp");
        let write_err = |source| StoreError::Write {
            path: tmp_path.clone(),
            source,
        };

        let mut tmp = File::create(&tmp_path).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.sync_all().map_err(write_err)?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })
    }

    fn acquire_lock(&self) -> Result<File, StoreError> {
        let lock_err = |source| StoreError::Lock {
            path: self.lock_path.clone(),
            source,
        };
        if let Some(parent) = self.lock_path.parent() {
            fs::create_dir_all(parent).map_err(lock_err)?;
        }
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)
            .map_err(lock_err)?;
        lock.lock_exclusive().map_err(lock_err)?;
        Ok(lock)
    }
}

impl CounterStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<i64>, StoreError> {
        let Some(document) = self.load_document()? else {
            return Ok(None);
        };

        match document.get(key) {
            None => Ok(None),
            Some(toml::Value::Integer(value)) => Ok(Some(*value)),
            Some(other) => Err(StoreError::InvalidEntry {
                key: key.to_string(),
                found: other.type_str().to_string(),
            }),
        }
    }

    fn write(&self, key: &str, value: i64) -> Result<(), StoreError> {
        // Dropping the handle releases the lock on every path.
        let _lock = self.acquire_lock()?;

        let mut document = self.load_document()?.unwrap_or_default();
        document.insert(key.to_string(), toml::Value::Integer(value));
        self.write_document(&document)
    }
}
