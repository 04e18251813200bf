use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::geometry::{any_inside_violated, Extent, Point, Rect};

pub const SLOW_FRAME_ENV_VAR: &str = "CORRAL_SLOW_FRAME_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    pub pacing_enabled: bool,
    pub metrics_log_interval_ms: u64,
    pub simulated_slow_frame_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Corral".to_string(),
            window_width: 640,
            window_height: 480,
            target_fps: 60,
            pacing_enabled: true,
            metrics_log_interval_ms: 1000,
            simulated_slow_frame_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayfieldConfig {
    pub containment: Rect,
    pub spawn: Point,
    pub extent: Extent,
    /// Offsets relative to the spawn anchor.
    pub collision_boxes: Vec<Rect>,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            containment: Rect::new(0, 0, 1280, 960),
            spawn: Point::new(600, 440),
            extent: Extent::new(40, 80),
            collision_boxes: vec![Rect::new(10, 0, 20, 20), Rect::new(0, 20, 40, 60)],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    #[serde(rename = "loop")]
    pub frame_loop: LoopConfig,
    pub playfield: PlayfieldConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path} at `{field}`: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw).map_err(|error| match error {
            ConfigError::Parse { field, source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                field,
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config: AppConfig =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
                let field = error.path().to_string();
                ConfigError::Parse {
                    path: PathBuf::new(),
                    field,
                    source: error.into_inner(),
                }
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let frame_loop = &self.frame_loop;
        if frame_loop.window_width == 0 || frame_loop.window_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                frame_loop.window_width, frame_loop.window_height
            )));
        }
        if frame_loop.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be non-zero".to_string()));
        }

        let playfield = &self.playfield;
        if playfield.extent.width <= 0 || playfield.extent.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "playfield extent must be positive, got {}x{}",
                playfield.extent.width, playfield.extent.height
            )));
        }
        if playfield.containment.width < 0 || playfield.containment.height < 0 {
            return Err(ConfigError::Invalid(format!(
                "containment region has negative size: {:?}",
                playfield.containment
            )));
        }
        if playfield.collision_boxes.is_empty() {
            return Err(ConfigError::Invalid(
                "playfield needs at least one collision box".to_string(),
            ));
        }
        let spawned: Vec<Rect> = playfield
            .collision_boxes
            .iter()
            .map(|offset| offset.offset_by(playfield.spawn))
            .collect();
        if any_inside_violated(&spawned, &playfield.containment) {
            return Err(ConfigError::Invalid(format!(
                "collision boxes at spawn {:?} leave containment region {:?}",
                playfield.spawn, playfield.containment
            )));
        }
        Ok(())
    }
}

impl LoopConfig {
    pub fn metrics_log_interval(&self) -> Duration {
        if self.metrics_log_interval_ms == 0 {
            Duration::from_secs(1)
        } else {
            Duration::from_millis(self.metrics_log_interval_ms)
        }
    }
}

pub fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    match env::var(SLOW_FRAME_ENV_VAR) {
        Ok(value) => match value.parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!(
                    env_var = SLOW_FRAME_ENV_VAR,
                    value = value.as_str(),
                    "invalid slow-frame env var value; falling back to config"
                );
                Duration::from_millis(config_slow_frame_ms)
            }
        },
        Err(env::VarError::NotPresent) => Duration::from_millis(config_slow_frame_ms),
        Err(err) => {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                error = %err,
                "unable to read slow-frame env var; falling back to config"
            );
            Duration::from_millis(config_slow_frame_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        AppConfig::default().validate().expect("default config");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = AppConfig::from_json_str(r#"{ "loop": { "target_fps": 30 } }"#)
            .expect("config");

        assert_eq!(config.frame_loop.target_fps, 30);
        assert_eq!(config.frame_loop.window_width, 640);
        assert_eq!(config.playfield, PlayfieldConfig::default());
    }

    #[test]
    fn parse_error_reports_field_path() {
        let error = AppConfig::from_json_str(
            r#"{ "playfield": { "containment": { "x": 0, "y": 0, "width": "wide", "height": 5 } } }"#,
        )
        .expect_err("bad width");

        match error {
            ConfigError::Parse { field, .. } => assert_eq!(field, "playfield.containment.width"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = AppConfig::from_json_str(r#"{ "loop": { "vsync": true } }"#)
            .expect_err("unknown field");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn spawn_outside_region_is_invalid() {
        let error = AppConfig::from_json_str(
            r#"{ "playfield": {
                "containment": { "x": 0, "y": 0, "width": 100, "height": 100 },
                "spawn": { "x": 90, "y": 10 },
                "extent": { "width": 20, "height": 20 },
                "collision_boxes": [ { "x": 0, "y": 0, "width": 20, "height": 20 } ]
            } }"#,
        )
        .expect_err("spawn outside");
        assert!(matches!(error, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_target_fps_is_invalid() {
        let error = AppConfig::from_json_str(r#"{ "loop": { "target_fps": 0 } }"#)
            .expect_err("zero fps");
        assert!(matches!(error, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_reads_file_and_tags_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("corral.json");
        let mut file = fs::File::create(&path).expect("create");
        writeln!(file, r#"{{ "loop": {{ "window_title": "Test" }} }}"#).expect("write");

        let config = AppConfig::load(&path).expect("load");
        assert_eq!(config.frame_loop.window_title, "Test");

        fs::write(&path, "{ \"loop\": 5 }").expect("rewrite");
        match AppConfig::load(&path).expect_err("bad loop") {
            ConfigError::Parse { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = AppConfig::load(&dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(error, ConfigError::Read { .. }));
    }

    #[test]
    fn zero_log_interval_falls_back_to_one_second() {
        let config = LoopConfig {
            metrics_log_interval_ms: 0,
            ..LoopConfig::default()
        };
        assert_eq!(config.metrics_log_interval(), Duration::from_secs(1));
    }
}
