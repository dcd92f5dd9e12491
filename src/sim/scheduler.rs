/// Tick scheduler: one cancellable repeating timer, polled by the frame loop.
///
/// Each `start()` bumps a generation counter and hands out a `TimerHandle`
/// tagged with it; older handles stop being current, so at most one tick
/// stream is live. The period is read when the *next* deadline is set,
/// so an interval change never moves a deadline that is already pending.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimerHandle {
    generation: u64,
}

#[derive(Debug, Default)]
pub struct TickScheduler {
    generation: u64,
    next_due: Option<Instant>,
}

impl TickScheduler {
    pub fn new() -> Self {
        TickScheduler { generation: 0, next_due: None }
    }

    /// Replace any running timer. The first tick is due immediately.
    pub fn start(&mut self, now: Instant) -> TimerHandle {
        self.generation += 1;
        self.next_due = Some(now);
        TimerHandle { generation: self.generation }
    }

    /// Stop ticking. Outstanding handles are invalidated.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn is_current(&self, handle: TimerHandle) -> bool {
        self.is_running() && handle.generation == self.generation
    }

    #[cfg(test)]
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// True when a tick is due at `now`; the following deadline is then set
    /// `period` after `now`. Late polls fire once, they do not catch up.
    pub fn poll(&mut self, now: Instant, period: Duration) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + period);
                true
            }
            _ => false,
        }
    }
}
