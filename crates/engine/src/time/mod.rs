mod clock;
mod frame_controller;
mod stopwatch;

pub use clock::{Clock, ManualClock, SystemClock};
pub use frame_controller::{FrameController, FPS_SAMPLE_INTERVAL_MS};
pub use stopwatch::Stopwatch;
