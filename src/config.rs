//! Timing configuration for a read.

use core::{fmt, time::Duration};

/// Shortest host start pulse the sensor reliably detects.
pub const MIN_START_PULSE: Duration = Duration::from_millis(1);

/// Window in which the host must release the line after the start pulse.
pub const RELEASE_RANGE: (Duration, Duration) =
    (Duration::from_micros(20), Duration::from_micros(40));

/// Timing parameters used by [`Dht22`](crate::Dht22).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// How long the host holds the line low to request a reading.
    pub start_pulse: Duration,
    /// How long the host drives the line high before switching to input.
    pub release: Duration,
    /// Overall budget for a read, measured from the start of the handshake.
    pub deadline: Duration,
    /// High pulses strictly longer than this decode as a `1` bit.
    pub bit_threshold: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_pulse: MIN_START_PULSE,
            release: Duration::from_micros(30),
            deadline: Duration::from_millis(200),
            // Midpoint between the nominal 26-28us zero and 70us one.
            bit_threshold: Duration::from_micros(50),
        }
    }
}

impl Config {
    /// Sets the host start pulse length.
    pub const fn with_start_pulse(mut self, start_pulse: Duration) -> Self {
        self.start_pulse = start_pulse;
        self
    }

    /// Sets the release time before switching the line to input.
    pub const fn with_release(mut self, release: Duration) -> Self {
        self.release = release;
        self
    }

    /// Sets the read deadline.
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Sets the high pulse threshold separating `0` from `1` bits.
    pub const fn with_bit_threshold(mut self, bit_threshold: Duration) -> Self {
        self.bit_threshold = bit_threshold;
        self
    }

    /// Checks the timing against the sensor's protocol limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_pulse < MIN_START_PULSE {
            return Err(ConfigError::StartPulseTooShort);
        }
        let (min, max) = RELEASE_RANGE;
        if self.release < min || self.release > max {
            return Err(ConfigError::ReleaseOutOfRange);
        }
        if self.deadline <= self.start_pulse + self.release {
            return Err(ConfigError::DeadlineTooShort);
        }
        if self.bit_threshold.is_zero() {
            return Err(ConfigError::ZeroBitThreshold);
        }
        Ok(())
    }
}

/// Reasons a [`Config`] is rejected.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Start pulse shorter than 1 ms.
    StartPulseTooShort,
    /// Release time outside 20-40 us.
    ReleaseOutOfRange,
    /// Deadline that ends before the handshake does.
    DeadlineTooShort,
    /// Bit threshold of zero.
    ZeroBitThreshold,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StartPulseTooShort => "start pulse must be at least 1 ms",
            Self::ReleaseOutOfRange => "release must be between 20 and 40 us",
            Self::DeadlineTooShort => "deadline must outlast the start pulse and release",
            Self::ZeroBitThreshold => "bit threshold must be non-zero",
        })
    }
}
