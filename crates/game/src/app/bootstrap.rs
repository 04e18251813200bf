use std::env;
use std::path::PathBuf;

use engine::{
    resolve_app_paths, AppConfig, AppError, AppPaths, LoopConfig, Playfield, StartupError,
    CONFIG_ENV_VAR,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) playfield: Playfield,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Corral Startup ===");

    let app_config = match config_source(env::var_os(CONFIG_ENV_VAR), resolve_app_paths)? {
        Some(path) => {
            info!(config_file = %path.display(), "config_loading");
            AppConfig::load(&path)?
        }
        None => {
            info!("config_defaults");
            AppConfig::default()
        }
    };
    let frame_loop = app_config.frame_loop;
    let playfield = Playfield::from_config(
        &app_config.playfield,
        frame_loop.window_width,
        frame_loop.window_height,
    )?;

    Ok(AppWiring {
        config: frame_loop,
        playfield,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Picks the config file to load. An explicit path always wins; otherwise the
/// project root's default file is used when present, and a missing root or
/// file falls back to built-in defaults.
fn config_source(
    explicit: Option<std::ffi::OsString>,
    resolve_paths: impl FnOnce() -> Result<AppPaths, StartupError>,
) -> Result<Option<PathBuf>, StartupError> {
    if let Some(path) = explicit {
        return Ok(Some(PathBuf::from(path)));
    }

    match resolve_paths() {
        Ok(paths) => {
            info!(
                root = %paths.root.display(),
                config_file = %paths.config_file.display(),
                "startup"
            );
            if paths.config_file.is_file() {
                Ok(Some(paths.config_file))
            } else {
                warn!(
                    config_file = %paths.config_file.display(),
                    "config file missing; using defaults"
                );
                Ok(None)
            }
        }
        Err(StartupError::RootNotFound { start_dir, .. }) => {
            warn!(
                start_dir = %start_dir.display(),
                "project root not found; using default config"
            );
            Ok(None)
        }
        Err(other) => Err(other),
    }
}
