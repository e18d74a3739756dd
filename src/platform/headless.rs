//! A windowless host driven by a calloop event loop.
//!
//! Frame requests become one-shot timers; cancelling a request removes its
//! timer from the loop. A request the loop refuses is reported by the next
//! [`HeadlessHost::dispatch`], since nothing would ever fire for it. Resize notifications are raised by calling
//! [`HeadlessHost::notify_resize`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, RegistrationToken};

use super::{ResizeObserver, ResizeSignal};
use crate::error::CanvasError;
use crate::timing::{FrameRequestId, FrameScheduler};

/// Default time between headless frames, roughly 60 per second.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Loop data shared with timer callbacks.
#[derive(Debug, Default)]
struct FrameTicks {
    fired: Vec<FrameRequestId>,
}

pub struct HeadlessHost {
    event_loop: EventLoop<'static, FrameTicks>,
    ticks: FrameTicks,
    frame_interval: Duration,
    next_id: u64,
    timers: HashMap<FrameRequestId, RegistrationToken>,
    started: Instant,
    resize: Option<ResizeSignal>,
    schedule_failure: Option<(FrameRequestId, String)>,
}

impl HeadlessHost {
    pub fn new(frame_interval: Duration) -> crate::Result<Self> {
        let event_loop = EventLoop::try_new()?;
        log::debug!("Headless host running at {:?} per frame", frame_interval);
        Ok(Self {
            event_loop,
            ticks: FrameTicks::default(),
            frame_interval,
            next_id: 0,
            timers: HashMap::new(),
            started: Instant::now(),
            resize: None,
            schedule_failure: None,
        })
    }

    /// Milliseconds since the host was created.
    pub fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    pub fn pending_frames(&self) -> usize {
        self.timers.len()
    }

    /// Wait up to `timeout` for frame requests to come due, returning the ones
    /// that fired.
    pub fn dispatch(&mut self, timeout: Option<Duration>) -> crate::Result<Vec<FrameRequestId>> {
        if let Some((id, reason)) = self.schedule_failure.take() {
            return Err(CanvasError::FrameScheduling { id: id.0, reason });
        }
        self.event_loop.dispatch(timeout, &mut self.ticks)?;
        let fired = std::mem::take(&mut self.ticks.fired);
        for id in &fired {
            self.timers.remove(id);
        }
        Ok(fired)
    }

    /// Raise the resize signal of whoever is observing.
    pub fn notify_resize(&self) {
        if let Some(signal) = &self.resize {
            signal.notify();
        }
    }
}

impl FrameScheduler for HeadlessHost {
    fn request_frame(&mut self) -> FrameRequestId {
        self.next_id += 1;
        let id = FrameRequestId(self.next_id);
        let timer = Timer::from_duration(self.frame_interval);
        let inserted = self
            .event_loop
            .handle()
            .insert_source(timer, move |_deadline, _, ticks: &mut FrameTicks| {
                ticks.fired.push(id);
                TimeoutAction::Drop
            });
        match inserted {
            Ok(token) => {
                self.timers.insert(id, token);
            }
            Err(err) => {
                log::error!("Failed to schedule frame {:?}: {}", id, err.error);
                self.schedule_failure = Some((id, err.error.to_string()));
            }
        }
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        if let Some(token) = self.timers.remove(&id) {
            self.event_loop.handle().remove(token);
        }
    }
}

impl ResizeObserver for HeadlessHost {
    fn observe(&mut self, signal: ResizeSignal) {
        self.resize = Some(signal);
    }

    fn disconnect(&mut self) {
        self.resize = None;
    }
}
