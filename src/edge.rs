//! Interrupt-driven capture backend.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use embedded_hal::digital::InputPin;

use crate::{
    error::{DhtError, deadline_error},
    sampler::{FRAME_TRANSITIONS, TransitionSource, Transitions},
};

/// Edges buffered between the interrupt callback and the reader. Room for a
/// frame plus the host's own start pulse and some line noise; anything beyond
/// that is dropped rather than queued.
pub const EDGE_QUEUE: usize = 2 * FRAME_TRANSITIONS;

/// Creates a connected capture backend and the handle for the edge callback.
///
/// Register [`EdgeSender::edge`] as the callback for both edges of the data
/// line (e.g. a GPIO async interrupt). The callback runs on whichever thread
/// the platform delivers interrupts on; the reading thread sleeps in
/// [`EdgeCapture`] instead of spinning.
pub fn edge_capture() -> (EdgeCapture, EdgeSender) {
    let (tx, rx) = crossbeam_channel::bounded(EDGE_QUEUE);
    let now = Instant::now();
    let capture = EdgeCapture {
        rx,
        started: now,
        listening: now,
        deadline: Duration::ZERO,
    };
    (capture, EdgeSender { tx })
}

/// Handle used by the interrupt callback to report level changes.
#[derive(Clone, Debug)]
pub struct EdgeSender {
    tx: Sender<Instant>,
}

impl EdgeSender {
    /// Reports an edge that happened now.
    pub fn edge(&self) {
        self.edge_at(Instant::now());
    }

    /// Reports an edge with a timestamp taken by the platform.
    ///
    /// Never blocks: the edge is dropped when the queue is full or the
    /// capture side is gone.
    pub fn edge_at(&self, at: Instant) {
        match self.tx.try_send(at) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => trace!("edge queue full, dropping edge"),
            Err(TrySendError::Disconnected(_)) => trace!("edge capture gone, dropping edge"),
        }
    }
}

/// Capture backend fed by an edge-interrupt callback.
///
/// Timing accuracy depends on interrupt latency rather than on the reading
/// thread being scheduled, which makes it the better choice on a
/// general-purpose OS.
///
/// Many pads also raise interrupts for edges the host drives itself. Those
/// are stamped before [`listen`](TransitionSource::listen) and skipped.
#[derive(Debug)]
pub struct EdgeCapture {
    rx: Receiver<Instant>,
    started: Instant,
    listening: Instant,
    deadline: Duration,
}

impl<L: InputPin> TransitionSource<L> for EdgeCapture {
    fn begin(&mut self, deadline: Duration) {
        // Leftovers from a previous read or noise while idle.
        while self.rx.try_recv().is_ok() {}
        self.started = Instant::now();
        self.listening = self.started;
        self.deadline = deadline;
    }

    fn listen(&mut self) {
        self.listening = Instant::now();
    }

    fn capture(&mut self, _line: &mut L) -> Result<Transitions, DhtError<L::Error>> {
        let expires = self.started + self.deadline;
        let mut transitions = Transitions::new();
        let mut last_change = self.listening;

        loop {
            let remaining = expires.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(at) if at < self.listening => {
                    trace!("skipping edge driven by the host");
                }
                Ok(at) => {
                    if transitions.push(at.saturating_duration_since(last_change)).is_err() {
                        return Ok(transitions);
                    }
                    last_change = at;

                    if transitions.is_full() {
                        return Ok(transitions);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    trace!("deadline after {} edges", transitions.len());
                    return Err(deadline_error(transitions.len()));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("edge source disconnected");
                    return Err(deadline_error(transitions.len()));
                }
            }
        }
    }
}
