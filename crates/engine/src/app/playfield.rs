use tracing::debug;

use crate::config::{ConfigError, PlayfieldConfig};
use crate::geometry::{any_inside_violated, Rect};

use super::entity::{Direction, MovableEntity, MoveOutcome};

/// One movable entity plus a camera that follows it around its region.
#[derive(Debug, Clone)]
pub struct Playfield {
    entity: MovableEntity,
    camera: Rect,
}

impl Playfield {
    pub fn new(entity: MovableEntity, camera_width: u32, camera_height: u32) -> Self {
        let mut playfield = Self {
            entity,
            camera: Rect::default(),
        };
        playfield.resize_camera(camera_width, camera_height);
        playfield
    }

    pub fn from_config(
        config: &PlayfieldConfig,
        camera_width: u32,
        camera_height: u32,
    ) -> Result<Self, ConfigError> {
        let entity = MovableEntity::new(
            config.spawn,
            config.extent,
            config.containment,
            &config.collision_boxes,
        );
        if any_inside_violated(entity.box_bounds(), &entity.containment()) {
            return Err(ConfigError::Invalid(format!(
                "entity spawned at {:?} is outside its containment region",
                config.spawn
            )));
        }
        Ok(Self::new(entity, camera_width, camera_height))
    }

    pub fn entity(&self) -> &MovableEntity {
        &self.entity
    }

    pub fn camera(&self) -> Rect {
        self.camera
    }

    pub fn steer(&mut self, direction: Direction, pressed: bool) {
        self.entity.apply_direction(direction, pressed);
    }

    pub fn tick(&mut self) -> MoveOutcome {
        let outcome = self.entity.advance();
        if outcome.any_blocked() {
            let anchor = self.entity.anchor();
            debug!(
                x = anchor.x,
                y = anchor.y,
                x_blocked = outcome.x_blocked,
                y_blocked = outcome.y_blocked,
                "movement_blocked"
            );
        }
        self.entity.camera_follow(&mut self.camera);
        outcome
    }

    pub fn resize_camera(&mut self, width: u32, height: u32) {
        self.camera.width = i32::try_from(width).unwrap_or(i32::MAX);
        self.camera.height = i32::try_from(height).unwrap_or(i32::MAX);
        self.entity.camera_follow(&mut self.camera);
    }
}
