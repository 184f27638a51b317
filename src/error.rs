//! Error types for joint-control.
//!
//! Provides unified error handling across configuration, motor I/O, command
//! decoding, position persistence and the message-bus transport.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all joint-control operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor or panel I/O error
    Motor(MotorError),
    /// Position persistence error
    Storage(StorageError),
    /// Message-bus transport error
    Transport(TransportError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid max speed (must be > 0)
    InvalidMaxSpeed(f32),
    /// Invalid acceleration (must be > 0)
    InvalidAcceleration(f32),
    /// Invalid homing crawl speed (must be > 0 and not above max speed)
    InvalidCrawlSpeed {
        /// Configured crawl speed
        crawl: f32,
        /// Configured max speed
        max: f32,
    },
    /// Park offset must be positive so the axis leaves the switch
    InvalidParkOffset(i32),
    /// A cadence or delay that must be non-zero is zero
    ZeroInterval(&'static str),
    /// A bus topic is empty
    EmptyTopic(&'static str),
    /// Two bus topics share the same name
    DuplicateTopic(heapless::String<64>),
    /// A required component was not given to the builder
    MissingComponent(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor and panel I/O errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Output pin operation failed (coils, STEP/DIR, enable lines)
    PinError,
    /// Input pin read failed (action button, calibration switch)
    InputError,
}

/// Command decoding errors, carried by `Command::Reject`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Requested angle lies outside the commandable range
    OutOfRange {
        /// Requested angle in degrees
        degrees: i32,
    },
    /// Input contained no integer
    Malformed,
}

/// Position persistence errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Reading the persisted position failed
    ReadFailed,
    /// Writing the persisted position failed
    WriteFailed,
    /// Stored data does not have the expected layout
    Corrupted,
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    Io(heapless::String<128>),
}

/// Message-bus transport errors. Handled internally by retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Connecting to the broker failed
    ConnectFailed,
    /// Subscribing to a topic failed
    SubscribeFailed,
    /// Publishing a message failed
    PublishFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Storage(e) => write!(f, "Storage error: {}", e),
            Error::Transport(e) => write!(f, "Transport error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMaxSpeed(v) => write!(f, "Invalid max speed: {}. Must be > 0", v),
            ConfigError::InvalidAcceleration(v) => {
                write!(f, "Invalid acceleration: {}. Must be > 0", v)
            }
            ConfigError::InvalidCrawlSpeed { crawl, max } => {
                write!(f, "Invalid crawl speed: {}. Must be > 0 and <= max speed {}", crawl, max)
            }
            ConfigError::InvalidParkOffset(v) => {
                write!(f, "Invalid park offset: {}. Must be > 0", v)
            }
            ConfigError::ZeroInterval(name) => write!(f, "'{}' must be greater than zero", name),
            ConfigError::EmptyTopic(name) => write!(f, "Topic '{}' must not be empty", name),
            ConfigError::DuplicateTopic(topic) => write!(f, "Topic '{}' is used twice", topic),
            ConfigError::MissingComponent(name) => write!(f, "{} is required", name),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO output operation failed"),
            MotorError::InputError => write!(f, "GPIO input read failed"),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::OutOfRange { degrees } => {
                write!(f, "Requested {} degrees is outside [-85, 85]", degrees)
            }
            CommandError::Malformed => write!(f, "Input contains no integer"),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ReadFailed => write!(f, "Reading persisted position failed"),
            StorageError::WriteFailed => write!(f, "Writing persisted position failed"),
            StorageError::Corrupted => write!(f, "Persisted position is corrupted"),
            #[cfg(feature = "std")]
            StorageError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ConnectFailed => write!(f, "Connecting to the message bus failed"),
            TransportError::SubscribeFailed => write!(f, "Subscribing to a topic failed"),
            TransportError::PublishFailed => write!(f, "Publishing a message failed"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Error::Storage(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

#[cfg(feature = "std")]
impl std::error::Error for StorageError {}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}
