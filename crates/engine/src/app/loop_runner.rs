use std::sync::Arc;
use std::time::Duration;

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::config::{resolve_slow_frame_delay, LoopConfig};
use crate::time::{Clock, FrameController, Stopwatch, SystemClock};
use crate::StartupError;

use super::input::{InputCollector, InputCommand};
use super::metrics::LoopMetricsSnapshot;
use super::{MetricsHandle, Playfield, Renderer};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] crate::ConfigError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, playfield: Playfield) -> Result<(), AppError> {
    let metrics_handle = MetricsHandle::default();
    run_app_with_metrics(config, playfield, metrics_handle)
}

pub fn run_app_with_metrics(
    config: LoopConfig,
    mut playfield: Playfield,
    metrics_handle: MetricsHandle,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let window_for_loop = Arc::clone(&window);
    let mut renderer = Renderer::new(window).map_err(AppError::CreateRenderer)?;
    let size = window_for_loop.inner_size();
    playfield.resize_camera(size.width, size.height);

    event_loop.set_control_flow(ControlFlow::Poll);

    let clock = SystemClock::default();
    let slow_frame_delay = resolve_slow_frame_delay(config.simulated_slow_frame_ms);
    let metrics_log_interval = config.metrics_log_interval();
    let mut frames = FrameController::new(clock, config.target_fps);
    if !config.pacing_enabled {
        frames.toggle_pacing();
    }
    let mut session = Stopwatch::new(clock);
    let mut log_timer = Stopwatch::new(clock);
    session.start();
    log_timer.start();
    let mut input = InputCollector::default();
    let mut last_applied_title: Option<String> = None;

    info!(
        target_fps = frames.target_fps(),
        pacing_enabled = frames.pacing_enabled(),
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        containment = ?playfield.entity().containment(),
        box_count = playfield.entity().boxes().len(),
        "loop_config"
    );

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window_for_loop.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        playfield.resize_camera(new_size.width, new_size.height);
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::Focused(focused) => {
                        if focused {
                            session.resume();
                        } else {
                            session.pause();
                            for command in input.release_all() {
                                apply_command(command, &mut playfield, &mut frames);
                            }
                        }
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if let Some(command) = input.handle_key_event(&event) {
                            if command == InputCommand::Quit {
                                info!(reason = "escape_key", "shutdown_requested");
                                window_target.exit();
                                return;
                            }
                            apply_command(command, &mut playfield, &mut frames);
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        frames.start_frame();

                        if slow_frame_delay > Duration::ZERO {
                            // Explicit debug perturbation only; this is not the pacing sleep.
                            clock.sleep_ms(slow_frame_delay.as_millis() as u64);
                        }

                        playfield.tick();
                        if let Err(error) = renderer.render_playfield(&playfield) {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }

                        frames.control();
                        frames.end_frame();

                        let snapshot = LoopMetricsSnapshot {
                            measured_fps: frames.measured_fps(),
                            target_fps: frames.target_fps(),
                            pacing_enabled: frames.pacing_enabled(),
                            uptime_ms: session.elapsed_ms(),
                            anchor: playfield.entity().anchor(),
                        };
                        metrics_handle.publish(snapshot);

                        let next_title = snapshot.window_title(&config.window_title);
                        if last_applied_title.as_deref() != Some(next_title.as_str()) {
                            window_for_loop.set_title(&next_title);
                            last_applied_title = Some(next_title);
                        }

                        if log_timer.elapsed_ms() >= metrics_log_interval.as_millis() as u64 {
                            log_timer.reset();
                            log_timer.start();
                            let anchor = playfield.entity().anchor();
                            info!(
                                fps = snapshot.measured_fps,
                                target_fps = snapshot.target_fps,
                                pacing_enabled = snapshot.pacing_enabled,
                                uptime_s = %session.format_elapsed_secs(),
                                anchor_x = anchor.x,
                                anchor_y = anchor.y,
                                "loop_metrics"
                            );
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window_for_loop.request_redraw();
            }
            Event::LoopExiting => {
                session.stop();
                info!(uptime_s = %session.format_elapsed_secs(), "shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn apply_command<C: Clock + Clone>(
    command: InputCommand,
    playfield: &mut Playfield,
    frames: &mut FrameController<C>,
) {
    match command {
        InputCommand::Steer { direction, pressed } => playfield.steer(direction, pressed),
        InputCommand::TogglePacing => {
            let pacing_enabled = frames.toggle_pacing();
            info!(pacing_enabled, "pacing_toggled");
        }
        InputCommand::Quit => {}
    }
}
