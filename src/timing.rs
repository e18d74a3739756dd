//! Frame Timing Subsystem.
//!
//! A [`FrameClock`] keeps exactly one frame request outstanding with the host
//! while it runs. Every frame callback samples "now" (milliseconds), derives
//! the delta since the previous frame and a rolling frame rate, then requests
//! the next frame.

use std::collections::VecDeque;

/// Default number of timestamps the frame-rate meter averages over.
pub const DEFAULT_FRAME_RATE_WINDOW: usize = 5;

/// Handle for a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub u64);

/// The host's "call me on the next frame" primitive.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequestId;
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Time between consecutive samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeltaTracker {
    last: Option<f64>,
}

impl DeltaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `now` and return the time since the previous sample, or 0 for
    /// the first sample.
    pub fn sample(&mut self, now: f64) -> f64 {
        let delta = self.last.map_or(0.0, |last| now - last);
        self.last = Some(now);
        delta
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Rolling frame rate over the most recent timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRateMeter {
    // Newest first.
    samples: VecDeque<f64>,
    window: usize,
}

impl FrameRateMeter {
    /// A meter averaging over the last `window` timestamps. A window smaller
    /// than 2 can never produce a rate and is raised to 2.
    pub fn new(window: usize) -> Self {
        let window = window.max(2);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn push(&mut self, now: f64) {
        self.samples.push_front(now);
        self.samples.truncate(self.window);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Frames per second: 1000 over the mean delta between consecutive
    /// samples. Returns 0 with fewer than two samples or when the deltas sum
    /// to zero.
    pub fn rate(&self) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }
        let deltas = self.samples.len() - 1;
        let sum: f64 = self
            .samples
            .iter()
            .zip(self.samples.iter().skip(1))
            .map(|(newer, older)| newer - older)
            .sum();
        if sum == 0.0 || !sum.is_finite() {
            return 0.0;
        }
        1000.0 / (sum / deltas as f64)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for FrameRateMeter {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE_WINDOW)
    }
}

/// Timing values for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSample {
    /// Timestamp of this frame in milliseconds.
    pub now: f64,
    /// Milliseconds since the previous frame (0 on the first).
    pub delta: f64,
    /// Rolling frames per second.
    pub frame_rate: f64,
    /// Frames seen since the clock started, including this one.
    pub frame: u64,
}

/// Drives a repaint loop from a [`FrameScheduler`].
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    pending: Option<FrameRequestId>,
    running: bool,
    delta: DeltaTracker,
    meter: FrameRateMeter,
    last: FrameSample,
}

impl FrameClock {
    pub fn new(frame_rate_window: usize) -> Self {
        Self {
            meter: FrameRateMeter::new(frame_rate_window),
            ..Self::default()
        }
    }

    /// Begin requesting frames. Calling it while running does nothing.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.running = true;
        if self.pending.is_none() {
            self.pending = Some(scheduler.request_frame());
        }
    }

    /// Handle a frame callback: sample, then request the next frame.
    ///
    /// Frames arriving after [`stop`](Self::stop) are ignored and return
    /// `None`.
    pub fn on_frame(&mut self, now: f64, scheduler: &mut dyn FrameScheduler) -> Option<FrameSample> {
        if !self.running {
            return None;
        }
        self.pending = None;

        self.meter.push(now);
        self.last = FrameSample {
            now,
            delta: self.delta.sample(now),
            frame_rate: self.meter.rate(),
            frame: self.last.frame + 1,
        };

        self.pending = Some(scheduler.request_frame());
        Some(self.last)
    }

    /// Cancel the outstanding request and stop the loop.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(id) = self.pending.take() {
            scheduler.cancel_frame(id);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending(&self) -> Option<FrameRequestId> {
        self.pending
    }

    /// The most recent sample.
    pub fn last(&self) -> FrameSample {
        self.last
    }
}

/// A scheduler that only records requests. Tests and offline rendering fire
/// frames by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    outstanding: Vec<FrameRequestId>,
    cancelled: Vec<FrameRequestId>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outstanding(&self) -> &[FrameRequestId] {
        &self.outstanding
    }

    pub fn cancelled(&self) -> &[FrameRequestId] {
        &self.cancelled
    }

    /// Fire the oldest outstanding request, returning its id.
    pub fn fire(&mut self) -> Option<FrameRequestId> {
        if self.outstanding.is_empty() {
            None
        } else {
            Some(self.outstanding.remove(0))
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequestId {
        self.next_id += 1;
        let id = FrameRequestId(self.next_id);
        self.outstanding.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        self.outstanding.retain(|pending| *pending != id);
        self.cancelled.push(id);
    }
}
