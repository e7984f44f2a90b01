//! Circle collision and viewport bounds.

/// A collision circle in logical viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Circle { x, y, radius }
    }
}

/// The logical play area. The origin is the top-left corner; y grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Bounds { width, height }
    }

    pub fn first_quarter(&self) -> f64 {
        self.width * 0.25
    }

    pub fn last_quarter(&self) -> f64 {
        self.width * 0.75
    }
}

/// True when the distance between the two centres is at most the sum of the radii.
pub fn circles_overlap(a: &Circle, b: &Circle) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt() <= a.radius + b.radius
}

/// Larger of the two extents; sprites collide with half of this as radius.
pub fn max_extent(width: f64, height: f64) -> f64 {
    if width > height {
        width
    } else {
        height
    }
}
