//! Sprite-sheet animations: explosions and torpedo hits.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Explosion,
    AsteroidExplosion,
    RocketExplosion,
    EnemyBossExplosion,
    CrystalExplosion,
    Hit,
    EnemyBossHit,
    /// Only used by the ship's own death animation, never queued as an effect.
    ShipExplosion,
}

impl EffectKind {
    /// Order in which queued effects are drawn, back to front.
    pub const DRAW_ORDER: [EffectKind; 7] = [
        EffectKind::Explosion,
        EffectKind::AsteroidExplosion,
        EffectKind::RocketExplosion,
        EffectKind::EnemyBossExplosion,
        EffectKind::CrystalExplosion,
        EffectKind::Hit,
        EffectKind::EnemyBossHit,
    ];

    /// Columns and rows of the sheet.
    pub fn grid(self) -> (u8, u8) {
        match self {
            EffectKind::Explosion => (5, 4),
            EffectKind::AsteroidExplosion => (8, 7),
            EffectKind::RocketExplosion => (4, 7),
            EffectKind::EnemyBossExplosion => (4, 7),
            EffectKind::CrystalExplosion => (4, 7),
            EffectKind::Hit | EffectKind::EnemyBossHit => (5, 2),
            EffectKind::ShipExplosion => (8, 6),
        }
    }
}

/// Row-major cursor over a sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCounter {
    pub frame_x: u8,
    pub frame_y: u8,
    pub max_x: u8,
    pub max_y: u8,
}

impl FrameCounter {
    pub fn new(max_x: u8, max_y: u8) -> Self {
        debug_assert!(max_x > 0 && max_y > 0, "sprite sheet needs at least one cell");
        FrameCounter { frame_x: 0, frame_y: 0, max_x, max_y }
    }

    pub fn for_kind(kind: EffectKind) -> Self {
        let (max_x, max_y) = kind.grid();
        FrameCounter::new(max_x, max_y)
    }

    /// Step one cell. Returns `true` when the last cell has been shown and the
    /// counter wrapped back to (0, 0).
    pub fn advance(&mut self) -> bool {
        self.frame_x += 1;
        if self.frame_x < self.max_x {
            return false;
        }
        self.frame_x = 0;
        self.frame_y += 1;
        if self.frame_y < self.max_y {
            return false;
        }
        self.frame_y = 0;
        true
    }

    pub fn reset(&mut self) {
        self.frame_x = 0;
        self.frame_y = 0;
    }
}

/// A queued one-shot animation drifting with the object that spawned it.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    /// Top-left corner of the destination rectangle.
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub scale: f64,
    pub frames: FrameCounter,
}

impl Effect {
    pub fn new(kind: EffectKind, x: f64, y: f64, vx: f64, vy: f64, scale: f64) -> Self {
        Effect {
            kind,
            x,
            y,
            vx,
            vy,
            scale,
            frames: FrameCounter::for_kind(kind),
        }
    }

    /// Drift and step the animation; `true` once it has played out.
    pub fn advance(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.frames.advance()
    }
}
