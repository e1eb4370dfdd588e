//! Uniform sensor capability for periodic sampling.
//!
//! A scheduler holds a list of [`Sensor`] trait objects and calls
//! [`Sensor::read`] on each of them every cycle. Failures are per sensor and
//! per cycle: the caller logs them and tries again next time.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use embedded_hal::delay::DelayNs;

use crate::{
    dht22::Dht22,
    error::DhtError,
    frame::Reading,
    line::Line,
    sampler::TransitionSource,
};

/// Field name for temperatures in degrees Celsius.
pub const TEMPERATURE: &str = "temperature";
/// Field name for relative humidity in percent.
pub const HUMIDITY: &str = "humidity";

/// A set of measurements taken by one sensor at one point in time.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorReading {
    /// Sensor kind used to tag the reading downstream, e.g. `"dht22"`.
    pub kind: &'static str,
    /// Measured values keyed by field name.
    pub fields: BTreeMap<&'static str, f64>,
    /// When the measurement completed.
    pub timestamp: SystemTime,
}

impl SensorReading {
    /// Creates an empty reading stamped with the current time.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            fields: BTreeMap::new(),
            timestamp: SystemTime::now(),
        }
    }

    /// Adds a field.
    pub fn with_field(mut self, name: &'static str, value: f64) -> Self {
        self.fields.insert(name, value);
        self
    }

    /// Returns a field value.
    pub fn field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }
}

/// Errors returned by [`Sensor::read`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SensorError {
    /// The data line could not be acquired or configured.
    Initialization(String),
    /// No response from the sensor before the deadline.
    HandshakeTimeout,
    /// The sensor answered but the frame was incomplete.
    InsufficientTransitions(usize),
    /// A full frame arrived but failed validation.
    ChecksumMismatch {
        /// Checksum byte sent by the sensor.
        expected: u8,
        /// Sum of the four payload bytes.
        computed: u8,
    },
    /// The data line failed while reading.
    Line(String),
    /// The sensor was closed.
    Closed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialization(e) => write!(f, "initialization failed: {e}"),
            Self::HandshakeTimeout => f.write_str("timeout waiting for sensor response"),
            Self::InsufficientTransitions(count) => {
                write!(f, "insufficient data: got {count} transitions")
            }
            Self::ChecksumMismatch { expected, computed } => {
                write!(f, "checksum mismatch: expected {expected}, got {computed}")
            }
            Self::Line(e) => write!(f, "data line error: {e}"),
            Self::Closed => f.write_str("sensor is closed"),
        }
    }
}

impl std::error::Error for SensorError {}

impl<E: fmt::Debug> From<DhtError<E>> for SensorError {
    fn from(value: DhtError<E>) -> Self {
        match value {
            DhtError::Initialization(e) => Self::Initialization(format!("{e:?}")),
            DhtError::Config(e) => Self::Initialization(e.to_string()),
            DhtError::HandshakeTimeout => Self::HandshakeTimeout,
            DhtError::InsufficientTransitions(count) => Self::InsufficientTransitions(count),
            DhtError::ChecksumMismatch { expected, computed } => {
                Self::ChecksumMismatch { expected, computed }
            }
            DhtError::PinError(e) => Self::Line(format!("{e:?}")),
        }
    }
}

/// A sensor that can be sampled by a scheduler.
///
/// Implementations serialize their own reads, so a sensor can be shared
/// between threads.
pub trait Sensor: Send + Sync {
    /// Static identifier of the sensor model, e.g. `"DHT22"`.
    fn name(&self) -> &'static str;

    /// Performs one complete measurement.
    fn read(&self) -> Result<SensorReading, SensorError>;

    /// Releases the hardware held by the sensor.
    ///
    /// Safe to call more than once; later reads fail with
    /// [`SensorError::Closed`].
    fn close(&self);
}

/// A driver producing temperature and humidity readings.
///
/// Implemented by [`Dht22`]. Implement it for a third-party driver to expose
/// it through [`DriverSensor`].
pub trait ClimateDriver {
    /// Error returned by a failed measurement.
    type Error: Into<SensorError>;

    /// Performs one complete measurement.
    fn measure(&mut self) -> Result<Reading, Self::Error>;
}

impl<L, D, S, E> ClimateDriver for Dht22<L, D, S>
where
    L: Line<Error = E>,
    D: DelayNs,
    S: TransitionSource<L>,
    E: fmt::Debug,
{
    type Error = DhtError<E>;

    fn measure(&mut self) -> Result<Reading, Self::Error> {
        self.read()
    }
}

/// [`Sensor`] backed by a [`ClimateDriver`].
///
/// The driver sits behind a mutex that is held for a whole measurement, so
/// concurrent callers never drive the data line at the same time.
///
/// Fields are reported at the sensor's 0.1 resolution.
pub struct DriverSensor<D> {
    name: &'static str,
    kind: &'static str,
    driver: Mutex<Option<D>>,
}

impl<L, D, S, E> DriverSensor<Dht22<L, D, S>>
where
    L: Line<Error = E>,
    D: DelayNs,
    S: TransitionSource<L>,
    E: fmt::Debug,
{
    /// Wraps a DHT22 driver.
    pub fn dht22(driver: Dht22<L, D, S>) -> Self {
        Self::new("DHT22", "dht22", driver)
    }
}

impl<D: ClimateDriver> DriverSensor<D> {
    /// Wraps `driver` under the given model name and reading kind.
    pub fn new(name: &'static str, kind: &'static str, driver: D) -> Self {
        Self {
            name,
            kind,
            driver: Mutex::new(Some(driver)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<D>> {
        // A panicking read leaves no partial state behind.
        self.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D> Sensor for DriverSensor<D>
where
    D: ClimateDriver + Send,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn read(&self) -> Result<SensorReading, SensorError> {
        let mut driver = self.lock();
        let driver = driver.as_mut().ok_or(SensorError::Closed)?;
        let reading = driver.measure().map_err(Into::<SensorError>::into)?;

        Ok(SensorReading::new(self.kind)
            .with_field(TEMPERATURE, tenths(reading.temperature))
            .with_field(HUMIDITY, tenths(reading.relative_humidity)))
    }

    fn close(&self) {
        if self.lock().take().is_some() {
            debug!("closed sensor {}", self.name);
        }
    }
}

/// Widens a reading to `f64` without carrying the `f32` representation error
/// (23.7, not 23.700000762939453).
fn tenths(value: f32) -> f64 {
    (f64::from(value) * 10.0).round() / 10.0
}
