use crate::geometry::{any_inside_violated, Extent, Point, Rect};

const VELOCITY_STEP_DIVISOR: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Direction {
    pub const fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::X,
            Direction::Up | Direction::Down => Axis::Y,
        }
    }

    const fn sign(self) -> i32 {
        match self {
            Direction::Up | Direction::Left => -1,
            Direction::Down | Direction::Right => 1,
        }
    }
}

/// A box rigidly attached to its entity's anchor. Only the offset and size
/// live here; the entity owns the absolute bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionBox {
    offset: Point,
    extent: Extent,
}

impl CollisionBox {
    fn from_local(local: Rect) -> Self {
        Self {
            offset: Point::new(local.x, local.y),
            extent: local.extent(),
        }
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn bounds_at(&self, anchor: Point) -> Rect {
        Rect::new(
            anchor.x.saturating_add(self.offset.x),
            anchor.y.saturating_add(self.offset.y),
            self.extent.width,
            self.extent.height,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub x_blocked: bool,
    pub y_blocked: bool,
}

impl MoveOutcome {
    pub fn any_blocked(&self) -> bool {
        self.x_blocked || self.y_blocked
    }
}

/// Entity that moves by a velocity and must keep every collision box inside
/// its containment region. Each axis is resolved on its own, X first, and a
/// step that would leave the region is undone entirely.
#[derive(Debug, Clone)]
pub struct MovableEntity {
    anchor: Point,
    extent: Extent,
    containment: Rect,
    boxes: Vec<CollisionBox>,
    // Absolute bounds of `boxes`, same order.
    box_bounds: Vec<Rect>,
    velocity: Point,
}

impl MovableEntity {
    pub fn new(anchor: Point, extent: Extent, containment: Rect, box_offsets: &[Rect]) -> Self {
        let boxes: Vec<CollisionBox> = box_offsets
            .iter()
            .map(|local| CollisionBox::from_local(*local))
            .collect();
        let box_bounds = boxes.iter().map(|attached| attached.bounds_at(anchor)).collect();
        Self {
            anchor,
            extent,
            containment,
            boxes,
            box_bounds,
            velocity: Point::default(),
        }
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub fn containment(&self) -> Rect {
        self.containment
    }

    pub fn boxes(&self) -> &[CollisionBox] {
        &self.boxes
    }

    pub fn box_bounds(&self) -> &[Rect] {
        &self.box_bounds
    }

    pub fn velocity_step(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.extent.width / VELOCITY_STEP_DIVISOR,
            Axis::Y => self.extent.height / VELOCITY_STEP_DIVISOR,
        }
    }

    /// Adds one step toward `direction` on press and takes it back on
    /// release. Callers must deliver press/release pairs exactly once.
    pub fn apply_direction(&mut self, direction: Direction, pressed: bool) {
        let axis = direction.axis();
        let mut delta = direction.sign() * self.velocity_step(axis);
        if !pressed {
            delta = -delta;
        }
        match axis {
            Axis::X => self.velocity.x = self.velocity.x.saturating_add(delta),
            Axis::Y => self.velocity.y = self.velocity.y.saturating_add(delta),
        }
    }

    pub fn advance(&mut self) -> MoveOutcome {
        MoveOutcome {
            x_blocked: !self.try_axis(Axis::X),
            y_blocked: !self.try_axis(Axis::Y),
        }
    }

    fn try_axis(&mut self, axis: Axis) -> bool {
        let before = self.anchor;
        match axis {
            Axis::X => self.anchor.x = self.anchor.x.saturating_add(self.velocity.x),
            Axis::Y => self.anchor.y = self.anchor.y.saturating_add(self.velocity.y),
        }
        self.sync_boxes();
        if any_inside_violated(&self.box_bounds, &self.containment) {
            self.anchor = before;
            self.sync_boxes();
            return false;
        }
        true
    }

    fn sync_boxes(&mut self) {
        for (attached, bounds) in self.boxes.iter().zip(self.box_bounds.iter_mut()) {
            *bounds = attached.bounds_at(self.anchor);
        }
    }

    /// Centers `camera` on the entity, then clamps each axis: a negative low
    /// edge snaps to the region's low edge, otherwise a high edge past the
    /// region's high edge snaps back inside. The low-edge check runs first,
    /// so a camera larger than the region snaps low.
    pub fn camera_follow(&self, camera: &mut Rect) {
        let center_x = i64::from(self.anchor.x) + i64::from(self.extent.width / 2);
        let center_y = i64::from(self.anchor.y) + i64::from(self.extent.height / 2);
        camera.x = clamp_camera_axis(
            center_x - i64::from(camera.width / 2),
            camera.width,
            self.containment.left(),
            self.containment.right(),
        );
        camera.y = clamp_camera_axis(
            center_y - i64::from(camera.height / 2),
            camera.height,
            self.containment.top(),
            self.containment.bottom(),
        );
    }

    pub fn screen_position(&self, camera: &Rect) -> Point {
        Point::new(
            self.anchor.x.saturating_sub(camera.x),
            self.anchor.y.saturating_sub(camera.y),
        )
    }
}

fn clamp_camera_axis(low: i64, size: i32, region_low: i64, region_high: i64) -> i32 {
    let clamped = if low < 0 {
        region_low
    } else if low + i64::from(size) > region_high {
        region_high - i64::from(size)
    } else {
        low
    };
    clamped.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGION: Rect = Rect::new(0, 0, 1000, 1000);

    fn entity_at(x: i32, y: i32) -> MovableEntity {
        MovableEntity::new(
            Point::new(x, y),
            Extent::new(50, 50),
            REGION,
            &[Rect::new(0, 0, 50, 20), Rect::new(10, 20, 30, 30)],
        )
    }

    #[test]
    fn boxes_start_at_anchor_plus_offset() {
        let entity = entity_at(100, 200);
        assert_eq!(entity.box_bounds()[0], Rect::new(100, 200, 50, 20));
        assert_eq!(entity.box_bounds()[1], Rect::new(110, 220, 30, 30));
        assert_eq!(entity.boxes()[1].offset(), Point::new(10, 20));
        assert_eq!(entity.boxes()[1].extent(), Extent::new(30, 30));
    }

    #[test]
    fn press_and_release_cancel() {
        let mut entity = entity_at(100, 100);
        entity.apply_direction(Direction::Right, true);
        assert_eq!(entity.velocity(), Point::new(5, 0));
        entity.apply_direction(Direction::Up, true);
        assert_eq!(entity.velocity(), Point::new(5, -5));
        entity.apply_direction(Direction::Left, true);
        assert_eq!(entity.velocity(), Point::new(0, -5));
        entity.apply_direction(Direction::Right, false);
        entity.apply_direction(Direction::Left, false);
        entity.apply_direction(Direction::Up, false);
        assert_eq!(entity.velocity(), Point::default());
    }

    #[test]
    fn velocity_step_uses_extent() {
        let entity = MovableEntity::new(
            Point::new(0, 0),
            Extent::new(64, 25),
            REGION,
            &[Rect::new(0, 0, 1, 1)],
        );
        assert_eq!(entity.velocity_step(Axis::X), 6);
        assert_eq!(entity.velocity_step(Axis::Y), 2);
    }

    #[test]
    fn free_move_updates_anchor_and_boxes() {
        let mut entity = entity_at(100, 100);
        entity.apply_direction(Direction::Right, true);
        entity.apply_direction(Direction::Down, true);

        let outcome = entity.advance();

        assert!(!outcome.any_blocked());
        assert_eq!(entity.anchor(), Point::new(105, 105));
        assert_eq!(entity.box_bounds()[1], Rect::new(115, 125, 30, 30));
        assert_eq!(
            entity.boxes()[1].bounds_at(entity.anchor()),
            Rect::new(115, 125, 30, 30)
        );
    }

    #[test]
    fn blocked_x_rolls_back_exactly() {
        let mut entity = entity_at(948, 500);
        entity.apply_direction(Direction::Right, true);
        let before = entity.box_bounds().to_vec();

        let outcome = entity.advance();

        assert!(outcome.x_blocked);
        assert!(!outcome.y_blocked);
        assert_eq!(entity.anchor().x, 948);
        assert_eq!(entity.box_bounds(), before.as_slice());
    }

    #[test]
    fn move_that_ends_flush_with_boundary_succeeds() {
        let mut entity = entity_at(945, 500);
        entity.apply_direction(Direction::Right, true);
        entity.advance();
        assert_eq!(entity.anchor().x, 950);
        assert_eq!(entity.box_bounds()[0].right(), 1000);
    }

    #[test]
    fn diagonal_into_wall_slides_along_it() {
        let mut entity = entity_at(948, 500);
        entity.apply_direction(Direction::Right, true);
        entity.apply_direction(Direction::Down, true);

        let outcome = entity.advance();

        assert_eq!(
            outcome,
            MoveOutcome {
                x_blocked: true,
                y_blocked: false
            }
        );
        assert_eq!(entity.anchor(), Point::new(948, 505));
    }

    #[test]
    fn corner_blocks_both_axes() {
        let mut entity = entity_at(2, 2);
        entity.apply_direction(Direction::Left, true);
        entity.apply_direction(Direction::Up, true);

        let outcome = entity.advance();

        assert!(outcome.x_blocked && outcome.y_blocked);
        assert_eq!(entity.anchor(), Point::new(2, 2));
    }

    #[test]
    fn camera_clamps_to_low_edge() {
        let entity = entity_at(0, 0);
        let mut camera = Rect::new(-7, 13, 200, 200);
        entity.camera_follow(&mut camera);
        assert_eq!(camera, Rect::new(0, 0, 200, 200));
    }

    #[test]
    fn camera_clamps_to_high_edge() {
        let entity = entity_at(990, 990);
        let mut camera = Rect::new(0, 0, 200, 200);
        entity.camera_follow(&mut camera);
        assert_eq!(camera, Rect::new(800, 800, 200, 200));
    }

    #[test]
    fn camera_centers_on_entity_in_open_space() {
        let entity = entity_at(500, 400);
        let mut camera = Rect::new(0, 0, 200, 100);
        entity.camera_follow(&mut camera);
        assert_eq!(camera, Rect::new(425, 375, 200, 100));
    }

    #[test]
    fn offset_region_keeps_centered_camera_with_non_negative_low_edge() {
        let entity = MovableEntity::new(
            Point::new(120, 500),
            Extent::new(50, 50),
            Rect::new(100, 100, 1000, 1000),
            &[Rect::new(0, 0, 50, 50)],
        );
        let mut camera = Rect::new(0, 0, 200, 200);
        entity.camera_follow(&mut camera);
        assert_eq!((camera.x, camera.y), (45, 425));
    }

    #[test]
    fn negative_low_edge_snaps_to_offset_region_low_edge() {
        let entity = MovableEntity::new(
            Point::new(40, 40),
            Extent::new(10, 10),
            Rect::new(20, 30, 100, 100),
            &[Rect::new(0, 0, 10, 10)],
        );
        let mut camera = Rect::new(0, 0, 300, 300);
        entity.camera_follow(&mut camera);
        assert_eq!((camera.x, camera.y), (20, 30));
    }

    #[test]
    fn screen_position_is_relative_to_camera() {
        let entity = entity_at(500, 400);
        let camera = Rect::new(425, 375, 200, 100);
        assert_eq!(entity.screen_position(&camera), Point::new(75, 25));
    }
}
