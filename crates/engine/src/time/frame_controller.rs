use tracing::debug;

use super::{Clock, Stopwatch};

pub const FPS_SAMPLE_INTERVAL_MS: u64 = 100;

/// Measures achieved frame rate and optionally paces frames toward a target.
///
/// Per frame: `start_frame`, the frame's work, `control`, then `end_frame`.
/// The measured rate is a single-frame estimate taken at most once per
/// [`FPS_SAMPLE_INTERVAL_MS`] and held between samples.
#[derive(Debug)]
pub struct FrameController<C> {
    clock: C,
    frame: Stopwatch<C>,
    sample: Stopwatch<C>,
    pacing_enabled: bool,
    target_fps: u32,
    measured_fps: u32,
}

impl<C: Clock + Clone> FrameController<C> {
    pub fn new(clock: C, target_fps: u32) -> Self {
        Self {
            frame: Stopwatch::new(clock.clone()),
            sample: Stopwatch::new(clock.clone()),
            clock,
            pacing_enabled: true,
            target_fps,
            measured_fps: 0,
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps;
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    pub fn start_frame(&mut self) {
        self.frame.start();
        self.sample.start();
    }

    pub fn end_frame(&mut self) {
        if self.sample.elapsed_ms() >= FPS_SAMPLE_INTERVAL_MS {
            let frame_ms = self.frame.elapsed_ms().max(1);
            self.measured_fps = u32::try_from(1000 / frame_ms).unwrap_or(u32::MAX);
            self.sample.reset();
            debug!(frame_ms, measured_fps = self.measured_fps, "fps_sampled");
        }
        self.frame.reset();
    }

    /// Sleeps for whatever is left of the target frame duration and returns
    /// the milliseconds slept.
    pub fn control(&mut self) -> u64 {
        if !self.pacing_enabled || self.target_fps == 0 {
            return 0;
        }
        let target_fps = u64::from(self.target_fps);
        let frame_ms = self.frame.elapsed_ms();
        if frame_ms.saturating_mul(target_fps) >= 1000 {
            return 0;
        }
        let remaining_ms = (1000 / target_fps).saturating_sub(frame_ms);
        self.clock.sleep_ms(remaining_ms);
        remaining_ms
    }

    pub fn toggle_pacing(&mut self) -> bool {
        self.pacing_enabled = !self.pacing_enabled;
        self.pacing_enabled
    }

    pub fn pacing_enabled(&self) -> bool {
        self.pacing_enabled
    }

    pub fn measured_fps(&self) -> u32 {
        self.measured_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;

    fn run_frame(frames: &mut FrameController<ManualClock>, clock: &ManualClock, work_ms: u64) {
        frames.start_frame();
        clock.advance_ms(work_ms);
        frames.control();
        frames.end_frame();
    }

    #[test]
    fn measured_fps_holds_until_sample_interval() {
        let clock = ManualClock::new(0);
        let mut frames = FrameController::new(clock.clone(), 60);
        frames.toggle_pacing();

        for _ in 0..6 {
            run_frame(&mut frames, &clock, 16);
            assert_eq!(frames.measured_fps(), 0);
        }
        // 7 * 16 = 112 ms crosses the threshold.
        run_frame(&mut frames, &clock, 16);
        assert_eq!(frames.measured_fps(), 62);

        run_frame(&mut frames, &clock, 40);
        assert_eq!(frames.measured_fps(), 62);
    }

    #[test]
    fn measured_fps_updates_exactly_at_threshold() {
        let clock = ManualClock::new(0);
        let mut frames = FrameController::new(clock.clone(), 60);
        frames.toggle_pacing();

        run_frame(&mut frames, &clock, 99);
        assert_eq!(frames.measured_fps(), 0);
        run_frame(&mut frames, &clock, 1);
        assert_eq!(frames.measured_fps(), 1000);
    }

    #[test]
    fn zero_length_frame_does_not_divide_by_zero() {
        let clock = ManualClock::new(0);
        let mut frames = FrameController::new(clock.clone(), 60);
        frames.toggle_pacing();

        frames.start_frame();
        clock.advance_ms(60);
        frames.end_frame();
        assert_eq!(frames.measured_fps(), 0);
        // The sample watch keeps running between frames.
        clock.advance_ms(60);
        frames.start_frame();
        frames.end_frame();

        assert_eq!(frames.measured_fps(), 1000);
    }

    #[test]
    fn control_tops_up_to_target_duration() {
        let clock = ManualClock::new(0);
        let mut frames = FrameController::new(clock.clone(), 50);

        frames.start_frame();
        clock.advance_ms(5);
        let slept = frames.control();

        assert_eq!(slept, 15);
        assert_eq!(clock.now_ms(), 20);
    }

    #[test]
    fn control_uses_integer_division() {
        let clock = ManualClock::new(0);
        let mut frames = FrameController::new(clock.clone(), 60);

        frames.start_frame();
        clock.advance_ms(10);
        assert_eq!(frames.control(), 6);

        frames.end_frame();
        frames.start_frame();
        clock.advance_ms(16);
        assert_eq!(frames.control(), 0);
    }

    #[test]
    fn control_never_sleeps_when_over_budget_or_disabled() {
        let clock = ManualClock::new(0);
        let mut frames = FrameController::new(clock.clone(), 30);

        frames.start_frame();
        clock.advance_ms(40);
        assert_eq!(frames.control(), 0);
        frames.end_frame();

        assert!(!frames.toggle_pacing());
        frames.start_frame();
        clock.advance_ms(1);
        assert_eq!(frames.control(), 0);
        assert_eq!(clock.now_ms(), 41);
    }

    #[test]
    fn zero_target_disables_sleep() {
        let clock = ManualClock::new(0);
        let mut frames = FrameController::new(clock.clone(), 0);
        frames.start_frame();
        assert_eq!(frames.control(), 0);

        frames.set_target_fps(100);
        assert_eq!(frames.target_fps(), 100);
        assert_eq!(frames.control(), 10);
    }

    #[test]
    fn paced_frames_measure_target_rate() {
        let clock = ManualClock::new(0);
        let mut frames = FrameController::new(clock.clone(), 25);

        for _ in 0..3 {
            run_frame(&mut frames, &clock, 3);
        }

        assert_eq!(frames.measured_fps(), 25);
    }
}
