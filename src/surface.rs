//! The drawing abstraction the scene renders onto.
//!
//! A surface keeps a transform stack like a 2D canvas: `translate`, `rotate`
//! and `scale` compose onto the current transform, `save`/`restore` push and
//! pop it. [`Transform`] does the matrix work for implementations.

use crate::sprites::Sprite;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    /// A `width` x `height` rectangle centred on the origin.
    pub fn centred(width: f64, height: f64) -> Self {
        Rect::new(-width * 0.5, -height * 0.5, width, height)
    }

    pub fn centre(&self) -> (f64, f64) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Affine transform `[a c e; b d f]`, mapping (x, y) to
/// (a·x + c·y + e, b·x + d·y + f).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    /// `self` followed by `other` in local coordinates, i.e. `self * other`.
    pub fn then(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Transform {
        self.then(&Transform { e: dx, f: dy, ..Transform::IDENTITY })
    }

    pub fn rotated(&self, degrees: f64) -> Transform {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.then(&Transform { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 })
    }

    pub fn scaled(&self, sx: f64, sy: f64) -> Transform {
        self.then(&Transform { a: sx, d: sy, ..Transform::IDENTITY })
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// Horizontal and vertical stretch, ignoring rotation.
    pub fn scale_factors(&self) -> (f64, f64) {
        ((self.a * self.a + self.b * self.b).sqrt(), (self.c * self.c + self.d * self.d).sqrt())
    }
}

/// Something the scene can draw on. Coordinates are logical viewport units,
/// passed through the current transform.
pub trait Surface {
    fn clear(&mut self);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, degrees: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    fn draw_image(&mut self, sprite: Sprite, dest: Rect);
    /// Draw the `src` part of `sprite` (in the sprite's own pixels) into `dest`.
    fn draw_image_region(&mut self, sprite: Sprite, src: Rect, dest: Rect);

    fn fill_rect(&mut self, rect: Rect);
    fn fill_oval(&mut self, rect: Rect);
    fn stroke_rect(&mut self, rect: Rect);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign);

    fn set_fill(&mut self, colour: Rgba);
    fn set_stroke(&mut self, colour: Rgba);
    fn set_global_alpha(&mut self, alpha: f64);
}

/// One recorded surface call, with coordinates already transformed.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear,
    Image { sprite: Sprite, centre: (f64, f64) },
    ImageRegion { sprite: Sprite, src: Rect, centre: (f64, f64) },
    FillRect(Rect),
    FillOval(Rect),
    StrokeRect(Rect),
    Text { text: String, x: f64, y: f64 },
}

/// Surface that remembers what was drawn instead of drawing it.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    pub transform: Transform,
    stack: Vec<Transform>,
    pub alpha: f64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        RecordingSurface { alpha: 1.0, ..Default::default() }
    }

    pub fn images(&self) -> impl Iterator<Item = Sprite> + '_ {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Image { sprite, .. } | DrawCall::ImageRegion { sprite, .. } => Some(*sprite),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    fn centre_of(&self, rect: &Rect) -> (f64, f64) {
        let (x, y) = rect.centre();
        self.transform.apply(x, y)
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        self.transform = self.stack.pop().unwrap_or_default();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.translated(dx, dy);
    }

    fn rotate(&mut self, degrees: f64) {
        self.transform = self.transform.rotated(degrees);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform.scaled(sx, sy);
    }

    fn draw_image(&mut self, sprite: Sprite, dest: Rect) {
        let centre = self.centre_of(&dest);
        self.calls.push(DrawCall::Image { sprite, centre });
    }

    fn draw_image_region(&mut self, sprite: Sprite, src: Rect, dest: Rect) {
        let centre = self.centre_of(&dest);
        self.calls.push(DrawCall::ImageRegion { sprite, src, centre });
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.calls.push(DrawCall::FillRect(rect));
    }

    fn fill_oval(&mut self, rect: Rect) {
        self.calls.push(DrawCall::FillOval(rect));
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.calls.push(DrawCall::StrokeRect(rect));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, _align: TextAlign) {
        self.calls.push(DrawCall::Text { text: text.to_string(), x, y });
    }

    fn set_fill(&mut self, _colour: Rgba) {}

    fn set_stroke(&mut self, _colour: Rgba) {}

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }
}
