//! Transition capture backends.
//!
//! A capture backend turns the sensor's answer into an ordered list of
//! [`Transitions`]: for every level change, the time the line spent at the
//! previous level. The decoder only consumes that list and does not know how
//! it was produced.

use core::time::Duration;

use embedded_hal::digital::InputPin;

use crate::{
    error::{DhtError, deadline_error},
    line::Clock,
};

/// Transitions in a complete read: the sensor's low/high response pulses,
/// plus a low and a high pulse for each of the 40 data bits.
pub const FRAME_TRANSITIONS: usize = 83;

/// Ordered pulse durations captured during one read.
pub type Transitions = heapless::Vec<Duration, FRAME_TRANSITIONS>;

/// Source of timed level transitions for one read.
pub trait TransitionSource<L: InputPin> {
    /// Starts the deadline. Called right before the handshake.
    fn begin(&mut self, deadline: Duration);

    /// Marks the moment the line was switched to input. Called right after
    /// the handshake; edges before it were driven by the host.
    fn listen(&mut self) {}

    /// Collects transitions until a full frame is captured or the deadline
    /// armed by [`begin`](Self::begin) elapses.
    fn capture(&mut self, line: &mut L) -> Result<Transitions, DhtError<L::Error>>;
}

/// Busy-poll capture backend.
///
/// Reads the line level in a tight loop and timestamps every change with the
/// [`Clock`]. The calling thread is occupied for the whole read, up to the
/// deadline.
///
/// On a preemptible scheduler the polling thread can be descheduled in the
/// middle of a frame. A pause longer than a few microseconds stretches the
/// pulse being measured, which can flip a `0` bit to `1` (caught by the
/// checksum) or swallow whole edges (reported as
/// [`DhtError::InsufficientTransitions`]). Use a real-time thread or the
/// interrupt-driven backend where this matters.
#[derive(Debug)]
pub struct PollingCapture<C> {
    clock: C,
    started: Duration,
    deadline: Duration,
}

impl<C: Clock> PollingCapture<C> {
    /// Creates a backend timing transitions with `clock`.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            started: Duration::ZERO,
            deadline: Duration::ZERO,
        }
    }

    /// Returns the clock.
    pub fn into_inner(self) -> C {
        self.clock
    }
}

impl<C, L> TransitionSource<L> for PollingCapture<C>
where
    C: Clock,
    L: InputPin,
{
    fn begin(&mut self, deadline: Duration) {
        self.started = self.clock.now();
        self.deadline = deadline;
    }

    fn capture(&mut self, line: &mut L) -> Result<Transitions, DhtError<L::Error>> {
        let mut transitions = Transitions::new();
        let mut last_change = self.clock.now();
        let mut last_level = line.is_high().map_err(DhtError::PinError)?;

        loop {
            let now = self.clock.now();
            if now.saturating_sub(self.started) >= self.deadline {
                trace!("deadline after {} transitions", transitions.len());
                return Err(deadline_error(transitions.len()));
            }

            let level = line.is_high().map_err(DhtError::PinError)?;
            if level != last_level {
                // Capacity equals the frame length, so this only fails once full.
                if transitions.push(now.saturating_sub(last_change)).is_err() {
                    return Ok(transitions);
                }
                last_change = now;
                last_level = level;

                if transitions.is_full() {
                    return Ok(transitions);
                }
            }
        }
    }
}
