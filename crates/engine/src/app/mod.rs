mod entity;
mod input;
mod loop_runner;
mod metrics;
mod playfield;
mod rendering;

pub use entity::{Axis, CollisionBox, Direction, MovableEntity, MoveOutcome};
pub use input::{InputAction, InputCommand};
pub use loop_runner::{run_app, run_app_with_metrics, AppError};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use playfield::Playfield;
pub use rendering::{Renderer, Viewport};
