use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in pixel space, y growing downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    pub fn left(&self) -> i64 {
        i64::from(self.x)
    }

    pub fn top(&self) -> i64 {
        i64::from(self.y)
    }

    /// Closed-bounds containment: `inner` may share edges with `self`.
    pub fn contains_rect(&self, inner: &Rect) -> bool {
        inner.left() >= self.left()
            && inner.right() <= self.right()
            && inner.top() >= self.top()
            && inner.bottom() <= self.bottom()
    }

    pub fn translated(self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    pub fn offset_by(self, origin: Point) -> Rect {
        self.translated(origin.x, origin.y)
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Cuts the rectangle into `rows` by `columns` equal cells, row-major and
    /// relative to the rectangle's own origin. Remainder pixels from the
    /// integer division are dropped.
    pub fn grid_cells(&self, rows: u32, columns: u32) -> Vec<Rect> {
        if rows == 0 || columns == 0 {
            return Vec::new();
        }
        let cell_width = i64::from(self.width) / i64::from(columns);
        let cell_height = i64::from(self.height) / i64::from(rows);
        let mut cells = Vec::with_capacity(rows as usize * columns as usize);
        for row in 0..i64::from(rows) {
            for column in 0..i64::from(columns) {
                cells.push(Rect {
                    x: saturate_i32(column * cell_width),
                    y: saturate_i32(row * cell_height),
                    width: saturate_i32(cell_width),
                    height: saturate_i32(cell_height),
                });
            }
        }
        cells
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Circle {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
}

impl Circle {
    pub const fn new(x: i32, y: i32, radius: i32) -> Self {
        Self { x, y, radius }
    }
}

/// Distance between the centers of two circles; radii are ignored.
pub fn distance(a: Circle, b: Circle) -> f64 {
    let dx = f64::from(a.x) - f64::from(b.x);
    let dy = f64::from(a.y) - f64::from(b.y);
    (dx * dx + dy * dy).sqrt()
}

/// True when the two rectangles share interior area. Rectangles that only
/// touch along an edge do not overlap.
pub fn outside_overlap(a: &Rect, b: &Rect) -> bool {
    !(a.right() <= b.left()
        || b.right() <= a.left()
        || a.bottom() <= b.top()
        || b.bottom() <= a.top())
}

pub fn any_outside_overlap(boxes: &[Rect], target: &Rect) -> bool {
    boxes.iter().any(|candidate| outside_overlap(candidate, target))
}

pub fn sets_outside_overlap(a: &[Rect], b: &[Rect]) -> bool {
    a.iter().any(|left| any_outside_overlap(b, left))
}

/// True when neither rectangle fully encloses the other. Disjoint rectangles
/// count as a violation.
pub fn inside_violated(a: &Rect, b: &Rect) -> bool {
    !(b.contains_rect(a) || a.contains_rect(b))
}

/// Moving boxes first, boundary second.
pub fn any_inside_violated(boxes: &[Rect], boundary: &Rect) -> bool {
    boxes.iter().any(|candidate| inside_violated(candidate, boundary))
}

pub fn sets_inside_violated(a: &[Rect], b: &[Rect]) -> bool {
    a.iter()
        .any(|left| b.iter().any(|right| inside_violated(left, right)))
}

fn saturate_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
