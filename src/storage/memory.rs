//! RAM-backed position storage for simulation and tests.

use crate::config::units::Steps;
use crate::error::StorageError;

use super::PositionStorage;

/// In-memory [`PositionStorage`] that counts writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    bytes: Option<[u8; 4]>,
    writes: u32,
    read_failing: bool,
    write_failing: bool,
}

impl MemoryStorage {
    /// Storage that has never been written.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Storage already holding `steps`.
    pub fn with_position(steps: Steps) -> Self {
        Self {
            bytes: Some(steps.to_le_bytes()),
            ..Self::default()
        }
    }

    /// Currently stored position.
    pub fn position(&self) -> Option<Steps> {
        self.bytes.map(Steps::from_le_bytes)
    }

    /// Number of writes received.
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Make every subsequent access fail.
    pub fn set_failing(&mut self, failing: bool) {
        self.read_failing = failing;
        self.write_failing = failing;
    }

    /// Keep reads working but reject every write, like worn-out EEPROM.
    pub fn failing_writes(mut self) -> Self {
        self.write_failing = true;
        self
    }
}

impl PositionStorage for MemoryStorage {
    fn read(&mut self) -> Result<Option<Steps>, StorageError> {
        if self.read_failing {
            return Err(StorageError::ReadFailed);
        }
        Ok(self.position())
    }

    fn write(&mut self, steps: Steps) -> Result<(), StorageError> {
        if self.write_failing {
            return Err(StorageError::WriteFailed);
        }
        self.bytes = Some(steps.to_le_bytes());
        self.writes += 1;
        Ok(())
    }
}
