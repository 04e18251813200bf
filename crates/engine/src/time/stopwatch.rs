use super::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopwatchState {
    Stopped,
    Running { since_ms: u64 },
    Paused,
}

/// Elapsed-time tracker with pause/resume.
///
/// A stopped watch keeps reporting the time it froze at until `reset`.
/// Calls made in the wrong state (pausing a stopped watch, resuming a running
/// one) are ignored.
#[derive(Debug, Clone)]
pub struct Stopwatch<C> {
    clock: C,
    state: StopwatchState,
    accumulated_ms: u64,
}

impl<C: Clock> Stopwatch<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: StopwatchState::Stopped,
            accumulated_ms: 0,
        }
    }

    pub fn start(&mut self) {
        if self.state == StopwatchState::Stopped {
            self.state = StopwatchState::Running {
                since_ms: self.clock.now_ms(),
            };
        }
    }

    pub fn stop(&mut self) {
        match self.state {
            StopwatchState::Running { since_ms } => {
                self.accumulated_ms = self.clock.now_ms().saturating_sub(since_ms);
                self.state = StopwatchState::Stopped;
            }
            StopwatchState::Paused => self.state = StopwatchState::Stopped,
            StopwatchState::Stopped => {}
        }
    }

    pub fn pause(&mut self) {
        if let StopwatchState::Running { since_ms } = self.state {
            self.accumulated_ms = self.clock.now_ms().saturating_sub(since_ms);
            self.state = StopwatchState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == StopwatchState::Paused {
            self.state = StopwatchState::Running {
                since_ms: self.clock.now_ms().saturating_sub(self.accumulated_ms),
            };
        }
    }

    pub fn reset(&mut self) {
        self.state = StopwatchState::Stopped;
        self.accumulated_ms = 0;
    }

    pub fn elapsed_ms(&self) -> u64 {
        match self.state {
            StopwatchState::Running { since_ms } => self.clock.now_ms().saturating_sub(since_ms),
            StopwatchState::Stopped | StopwatchState::Paused => self.accumulated_ms,
        }
    }

    /// Whole elapsed seconds, truncated, as decimal text.
    pub fn format_elapsed_secs(&self) -> String {
        (self.elapsed_ms() / 1000).to_string()
    }

    pub fn is_started(&self) -> bool {
        self.state != StopwatchState::Stopped
    }

    // A watch that was never started reads as paused.
    pub fn is_paused(&self) -> bool {
        !self.is_running()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, StopwatchState::Running { .. })
    }
}
