//! Bit-banged DHT22 decoder for Embedded Rust
//!
//! This crate reads the DHT22 (AM2302) temperature and humidity sensor
//! without dedicated protocol hardware, built on top of the [`embedded-hal`]
//! traits. A read drives the single data line through the start handshake,
//! captures the sensor's answer as a sequence of timed level transitions,
//! decodes the 40 data bits from their pulse widths and validates the
//! checksum.
//!
//! ```text
//! Dht22::read
//!   send_start  -> line low 1 ms, high 30 us, input with pull-up
//!   capture     -> 83 pulse widths before the 200 ms deadline
//!   decode      -> 5 bytes, high pulse > 50 us is a 1
//!   extract     -> checksum, humidity, signed temperature
//! ```
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Pluggable capture: busy-poll ([`PollingCapture`]) or edge interrupts
//! - Optional logging support via `defmt` or `log`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access
//! - [`DelayNs`] for the handshake timing
//!
//! # Optional Features
//! - `std` (default): the [`Sensor`] capability, simulated sensors,
//!   the interrupt-fed [`EdgeCapture`] and [`StdClock`]
//! - `defmt`: Implements `defmt::Format` and logs through `defmt`
//! - `log`: Logs through the `log` facade
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

#[macro_use]
mod fmt;

pub mod config;
pub mod decoder;
pub mod dht22;
pub mod error;
pub mod frame;
pub mod handshake;
pub mod line;
pub mod sampler;

#[cfg(feature = "std")]
pub mod edge;
#[cfg(feature = "std")]
pub mod sensor;
#[cfg(feature = "std")]
pub mod simulated;

pub use config::{Config, ConfigError};
pub use decoder::decode;
pub use dht22::Dht22;
pub use error::{DhtError, FrameError};
pub use frame::{RawFrame, Reading, extract};
pub use line::{Clock, Line, OpenDrain};
pub use sampler::{FRAME_TRANSITIONS, PollingCapture, TransitionSource, Transitions};

#[cfg(feature = "std")]
pub use edge::{EdgeCapture, EdgeSender, edge_capture};
#[cfg(feature = "std")]
pub use line::StdClock;
#[cfg(feature = "std")]
pub use sensor::{ClimateDriver, DriverSensor, Sensor, SensorError, SensorReading};
#[cfg(feature = "std")]
pub use simulated::SimulatedSensor;
