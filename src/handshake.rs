use core::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::{config::Config, error::DhtError, line::Line};

fn micros(duration: Duration) -> u32 {
    u32::try_from(duration.as_micros()).unwrap_or(u32::MAX)
}

/// Sends the host start signal and hands the line over to the sensor.
///
/// Holds the line low for the start pulse, drives it high for the release
/// time, then switches it to input with the pull-up enabled. The sensor
/// answers with an 80us low and 80us high pulse right after.
pub fn send_start<L, D, E>(line: &mut L, delay: &mut D, config: &Config) -> Result<(), DhtError<E>>
where
    L: Line<Error = E>,
    D: DelayNs,
{
    line.set_output().map_err(DhtError::Initialization)?;

    // MCU sends start request
    line.set_low().map_err(DhtError::Initialization)?;
    delay.delay_us(micros(config.start_pulse));
    line.set_high().map_err(DhtError::Initialization)?;
    delay.delay_us(micros(config.release));

    line.set_input_pull_up().map_err(DhtError::Initialization)
}
