use std::process::ExitCode;

use engine::{run_app, AppError, LoopConfig, Playfield};
use tracing::error;

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    run_with(app, run_app)
}

fn run_with(
    app: AppWiring,
    runner: impl FnOnce(LoopConfig, Playfield) -> Result<(), AppError>,
) -> ExitCode {
    if let Err(err) = runner(app.config, app.playfield) {
        error!(error = %err, "run_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
