//! Persisted joint position.
//!
//! The joint is open-loop, so its absolute position is only known while
//! powered. [`PositionStore`] keeps the last settled position in persistent
//! storage and writes only when the axis has come to rest at a new value,
//! keeping wear on EEPROM/flash low.

mod memory;
#[cfg(feature = "std")]
mod file;

pub use memory::MemoryStorage;
#[cfg(feature = "std")]
pub use file::FileStorage;

use crate::config::units::Steps;
use crate::error::StorageError;
use crate::motor::{Actuator, Axis, EnableOutput};

/// Backend holding a single signed position.
///
/// The persisted layout is one `i32`, little-endian.
pub trait PositionStorage {
    /// Read the stored position; `None` on blank storage.
    fn read(&mut self) -> Result<Option<Steps>, StorageError>;

    /// Overwrite the stored position.
    fn write(&mut self, steps: Steps) -> Result<(), StorageError>;
}

/// Write-coalescing front end over a [`PositionStorage`].
#[derive(Debug)]
pub struct PositionStore<S: PositionStorage> {
    storage: S,
    /// Last value known to be in storage.
    shadow: Steps,
    /// Writes issued since construction.
    writes: u32,
}

impl<S: PositionStorage> PositionStore<S> {
    /// Wrap a backend. Call [`load`](Self::load) once before committing.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            shadow: Steps::ZERO,
            writes: 0,
        }
    }

    /// Read the stored position and adopt it as the shadow.
    ///
    /// Blank and corrupted storage both read as 0; the next settled position
    /// overwrites a corrupted record. Any other read failure is returned.
    pub fn load(&mut self) -> Result<Steps, StorageError> {
        let steps = match self.storage.read() {
            Ok(stored) => stored.unwrap_or(Steps::ZERO),
            Err(StorageError::Corrupted) => {
                warn!("stored position is corrupted, starting from 0");
                Steps::ZERO
            }
            Err(e) => return Err(e),
        };
        self.shadow = steps;
        debug!("stored position loaded: {}", steps.value());
        Ok(steps)
    }

    /// Persist `steps` if it differs from the stored value.
    ///
    /// Returns `true` if a write was issued. The caller guarantees the axis
    /// is at rest; [`commit_settled`](Self::commit_settled) checks that.
    pub fn commit(&mut self, steps: Steps) -> Result<bool, StorageError> {
        if steps == self.shadow {
            return Ok(false);
        }

        self.storage.write(steps)?;
        self.shadow = steps;
        self.writes = self.writes.wrapping_add(1);
        info!("position persisted: {}", steps.value());
        Ok(true)
    }

    /// Persist the axis position if the axis has settled on a new value.
    pub fn commit_settled<ACT, EN>(&mut self, axis: &Axis<ACT, EN>) -> Result<bool, StorageError>
    where
        ACT: Actuator,
        EN: EnableOutput,
    {
        if axis.distance_to_go() != 0 {
            return Ok(false);
        }
        self.commit(axis.current_position())
    }

    /// Last value known to be in storage.
    #[inline]
    pub fn shadow(&self) -> Steps {
        self.shadow
    }

    /// Number of writes issued.
    #[inline]
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Access the backend.
    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
