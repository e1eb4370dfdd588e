//! Data line and time source capabilities.

use core::time::Duration;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// A bidirectional single-wire data line.
///
/// Drivers need to drive the line during the handshake and then listen to
/// the sensor on the same wire, so direction switching is part of the
/// capability. Input mode must enable the pull-up so the idle level is high.
pub trait Line: InputPin + OutputPin {
    /// Switches the line to push/pull or open-drain output.
    fn set_output(&mut self) -> Result<(), Self::Error>;

    /// Switches the line to input with the pull-up enabled.
    fn set_input_pull_up(&mut self) -> Result<(), Self::Error>;
}

/// Adapter for an open-drain pin with an external pull-up resistor.
///
/// Driving such a pin high releases the bus, so it can be read at any time
/// and direction changes are no-ops.
#[derive(Debug)]
pub struct OpenDrain<P> {
    pin: P,
}

impl<P> OpenDrain<P> {
    /// Wraps an open-drain pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: ErrorType> ErrorType for OpenDrain<P> {
    type Error = P::Error;
}

impl<P: InputPin> InputPin for OpenDrain<P> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low()
    }
}

impl<P: OutputPin> OutputPin for OpenDrain<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }
}

impl<P: InputPin + OutputPin> Line for OpenDrain<P> {
    fn set_output(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_input_pull_up(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Monotonic time source.
///
/// Resolution must be well below the 50 us bit threshold for the busy-poll
/// capture to classify bits correctly.
pub trait Clock {
    /// Time elapsed since an arbitrary, fixed origin.
    fn now(&mut self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now(&mut self) -> Duration {
        C::now(self)
    }
}

/// [`Clock`] backed by [`std::time::Instant`].
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Creates a clock whose origin is the current instant.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTx,
    };

    /// Clock that advances by a fixed step every time it is read.
    pub(crate) struct SteppingClock {
        pub(crate) now: Duration,
        pub(crate) step: Duration,
    }

    impl SteppingClock {
        pub(crate) fn micros() -> Self {
            Self {
                now: Duration::ZERO,
                step: Duration::from_micros(1),
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&mut self) -> Duration {
            let now = self.now;
            self.now += self.step;
            now
        }
    }

    #[test]
    fn test_open_drain_forwards_levels() {
        let mut pin = PinMock::new(&[
            PinTx::set(PinState::Low),
            PinTx::set(PinState::High),
            PinTx::get(PinState::High),
            PinTx::get(PinState::Low),
        ]);

        let mut line = OpenDrain::new(pin.clone());
        line.set_output().unwrap();
        line.set_low().unwrap();
        line.set_high().unwrap();
        line.set_input_pull_up().unwrap();
        assert!(line.is_high().unwrap());
        assert!(line.is_low().unwrap());

        pin.done();
    }

    #[test]
    fn test_stepping_clock() {
        let mut clock = SteppingClock::micros();
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now(), Duration::from_micros(1));
        assert_eq!((&mut clock).now(), Duration::from_micros(2));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_std_clock_is_monotonic() {
        let mut clock = StdClock::new();
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
