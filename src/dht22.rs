use embedded_hal::delay::DelayNs;

use crate::{
    config::Config,
    decoder::decode,
    error::DhtError,
    frame::{Reading, extract},
    handshake::send_start,
    line::Line,
    sampler::TransitionSource,
};

/// Driver for the DHT22 temperature and humidity sensor.
///
/// Owns the data line for its whole lifetime. Every [`read`](Self::read)
/// runs a full handshake, capture, decode and checksum cycle and keeps no
/// state between calls.
pub struct Dht22<L, D, S> {
    line: L,
    delay: D,
    sampler: S,
    config: Config,
}

impl<L, D, S, E> Dht22<L, D, S>
where
    L: Line<Error = E>,
    D: DelayNs,
    S: TransitionSource<L>,
{
    /// Creates a new instance of the DHT22 driver with the default timing.
    ///
    /// # Arguments
    ///
    /// * `line` - The data line connected to the DHT22. Must support both input and output.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    /// * `sampler` - The backend capturing transitions, e.g. [`PollingCapture`](crate::PollingCapture).
    ///
    /// # Errors
    ///
    /// Returns `DhtError::Initialization` if the line cannot be put in its
    /// idle (output, high) state.
    pub fn new(line: L, delay: D, sampler: S) -> Result<Self, DhtError<E>> {
        Self::with_config(line, delay, sampler, Config::default())
    }

    /// Creates a new instance of the DHT22 driver with custom timing.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::Config` for timing outside the protocol limits and
    /// `DhtError::Initialization` if the line cannot be configured.
    pub fn with_config(
        mut line: L,
        delay: D,
        sampler: S,
        config: Config,
    ) -> Result<Self, DhtError<E>> {
        config.validate()?;

        line.set_output().map_err(DhtError::Initialization)?;
        line.set_high().map_err(DhtError::Initialization)?;

        Ok(Dht22 {
            line,
            delay,
            sampler,
            config,
        })
    }

    /// Reads a temperature and humidity measurement from the DHT22 sensor.
    ///
    /// This method performs the complete DHT22 communication sequence:
    /// sending a start signal, capturing the sensor's response and the
    /// 40 data bits as pulse widths, decoding them into 5 bytes, validating
    /// the checksum, and converting the result.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if the read is successful and the checksum is valid.
    /// * `Err(DhtError)` if a communication or checksum error occurs.
    pub fn read(&mut self) -> Result<Reading, DhtError<E>> {
        debug!("dht22: start read");
        self.sampler.begin(self.config.deadline);
        send_start(&mut self.line, &mut self.delay, &self.config)?;
        self.sampler.listen();

        let transitions = self.sampler.capture(&mut self.line).inspect_err(|e| {
            if let DhtError::InsufficientTransitions(count) = e {
                warn!("dht22: only {} transitions before deadline", *count);
            }
        })?;

        let frame = decode(&transitions, self.config.bit_threshold)?;
        let reading = extract(&frame).inspect_err(|_| {
            warn!("dht22: checksum mismatch");
        })?;

        Ok(reading)
    }

    /// Returns the timing configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Releases the line, delay and capture backend.
    pub fn release(self) -> (L, D, S) {
        (self.line, self.delay, self.sampler)
    }
}
