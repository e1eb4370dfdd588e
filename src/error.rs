use core::fmt;

use crate::config::ConfigError;

/// Minimum number of transitions that proves the sensor answered the handshake.
pub(crate) const RESPONSE_TRANSITIONS: usize = 3;

/// Possible errors from the DHT22 driver.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// The line could not be configured or driven.
    Initialization(E),
    /// The timing configuration was rejected.
    Config(ConfigError),
    /// No response from the sensor before the deadline.
    HandshakeTimeout,
    /// The sensor answered but fewer transitions than a full frame were captured.
    InsufficientTransitions(usize),
    /// Checksum did not match the received data.
    ChecksumMismatch {
        /// Checksum byte sent by the sensor.
        expected: u8,
        /// Sum of the four payload bytes.
        computed: u8,
    },
    /// Error from the GPIO pin while sampling.
    PinError(E),
}

impl<E> From<FrameError> for DhtError<E> {
    fn from(value: FrameError) -> Self {
        match value {
            FrameError::InsufficientTransitions(count) => Self::InsufficientTransitions(count),
            FrameError::ChecksumMismatch { expected, computed } => {
                Self::ChecksumMismatch { expected, computed }
            }
        }
    }
}

impl<E> From<ConfigError> for DhtError<E> {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl<E: fmt::Debug> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialization(e) => write!(f, "failed to configure data line: {e:?}"),
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::HandshakeTimeout => f.write_str("timeout waiting for sensor response"),
            Self::InsufficientTransitions(count) => {
                write!(f, "insufficient data: got {count} transitions")
            }
            Self::ChecksumMismatch { expected, computed } => {
                write!(f, "checksum mismatch: expected {expected}, got {computed}")
            }
            Self::PinError(e) => write!(f, "data line read failed: {e:?}"),
        }
    }
}

/// Errors from decoding a transition sequence into a validated frame.
///
/// These do not depend on the pin, so the decoder and extractor can be used
/// on transitions captured by any means.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer transitions than a complete frame needs.
    InsufficientTransitions(usize),
    /// Checksum did not match the received data.
    ChecksumMismatch {
        /// Checksum byte sent by the sensor.
        expected: u8,
        /// Sum of the four payload bytes.
        computed: u8,
    },
}

/// Maps the number of transitions seen when the deadline expired to an error.
pub fn deadline_error<E>(captured: usize) -> DhtError<E> {
    if captured < RESPONSE_TRANSITIONS {
        DhtError::HandshakeTimeout
    } else {
        DhtError::InsufficientTransitions(captured)
    }
}
