//! Sensors producing random values, for running without hardware.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::sensor::{HUMIDITY, Sensor, SensorError, SensorReading, TEMPERATURE};

/// Field name for air pressure in hectopascal.
pub const PRESSURE: &str = "pressure";
/// Field name for illuminance in lux.
pub const LIGHT: &str = "light";

/// [`Sensor`] returning uniformly distributed values within fixed ranges.
pub struct SimulatedSensor {
    name: &'static str,
    kind: &'static str,
    fields: Vec<(&'static str, Range<f64>)>,
    rng: Mutex<StdRng>,
    closed: AtomicBool,
}

impl SimulatedSensor {
    /// Creates a sensor without fields.
    pub fn new(name: &'static str, kind: &'static str) -> Self {
        Self {
            name,
            kind,
            fields: Vec::new(),
            rng: Mutex::new(StdRng::from_entropy()),
            closed: AtomicBool::new(false),
        }
    }

    /// Adds a field drawn from `range`.
    pub fn with_field(mut self, name: &'static str, range: Range<f64>) -> Self {
        self.fields.push((name, range));
        self
    }

    /// Makes the generated values reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// DHT11 temperature and humidity sensor.
    pub fn dht11() -> Self {
        Self::new("DHT11", "dht11")
            .with_field(TEMPERATURE, 20.0..30.0)
            .with_field(HUMIDITY, 40.0..80.0)
    }

    /// BMP280 pressure and temperature sensor.
    pub fn bmp280() -> Self {
        Self::new("BMP280", "bmp280")
            .with_field(PRESSURE, 1000.0..1050.0)
            .with_field(TEMPERATURE, 20.0..30.0)
    }

    /// GY-32 (BH1750) light sensor.
    pub fn gy32() -> Self {
        Self::new("GY32", "gy32").with_field(LIGHT, 100.0..500.0)
    }
}

impl Sensor for SimulatedSensor {
    fn name(&self) -> &'static str {
        self.name
    }

    fn read(&self) -> Result<SensorReading, SensorError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SensorError::Closed);
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let reading = self
            .fields
            .iter()
            .fold(SensorReading::new(self.kind), |reading, &(name, ref range)| {
                reading.with_field(name, rng.gen_range(range.clone()))
            });
        Ok(reading)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
