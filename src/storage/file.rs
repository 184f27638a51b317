//! File-backed position storage (std only).

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::units::Steps;
use crate::error::StorageError;

use super::PositionStorage;

/// [`PositionStorage`] in a 4-byte little-endian file.
///
/// Writes go to a sibling temp file that is flushed to disk and then renamed
/// over the target. A record that still comes back short reads as
/// [`StorageError::Corrupted`], which [`PositionStore::load`](super::PositionStore::load)
/// treats as blank.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Use `path` as the position file. The file need not exist yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the position file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

fn io_error(e: std::io::Error) -> StorageError {
    let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
    StorageError::Io(msg)
}

impl PositionStorage for FileStorage {
    fn read(&mut self) -> Result<Option<Steps>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(e)),
        };

        let raw: [u8; 4] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| StorageError::Corrupted)?;
        Ok(Some(Steps::from_le_bytes(raw)))
    }

    fn write(&mut self, steps: Steps) -> Result<(), StorageError> {
        let temp = self.temp_path();
        let mut file = File::create(&temp).map_err(io_error)?;
        file.write_all(&steps.to_le_bytes()).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        drop(file);
        fs::rename(&temp, &self.path).map_err(io_error)
    }
}
