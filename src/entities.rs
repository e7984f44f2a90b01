//! Every entity kind in the play field: its data and its per-tick rules.
//!
//! `advance` methods move an entity one tick and *report* whether it expired.
//! Acting on that (respawning a pooled slot, purging a collection entry) is the
//! simulation step's job. All randomness comes through an injected `Rng`.

use rand::Rng;

use crate::geometry::{circles_overlap, max_extent, Bounds, Circle};
use crate::sprites::{Size, SpriteSet, BOSS_TIERS};

// ── Tuning ────────────────────────────────────────────────────────────────────

pub const VELOCITY_FACTOR_X: f64 = 0.7;
pub const VELOCITY_FACTOR_Y: f64 = 0.6;
pub const VELOCITY_FACTOR_R: f64 = 1.0;
pub const TORPEDO_SPEED: f64 = 6.0 * VELOCITY_FACTOR_Y;
pub const ROCKET_SPEED: f64 = 4.0 * VELOCITY_FACTOR_Y;
pub const ENEMY_TORPEDO_SPEED: f64 = 5.0 * VELOCITY_FACTOR_Y;
pub const ENEMY_BOSS_TORPEDO_SPEED: f64 = 6.0 * VELOCITY_FACTOR_Y;
/// Ship speed per tick while a direction is held.
pub const SHIP_SPEED: f64 = 5.0;
/// Half-width of the band around the ship's x in which enemies open fire.
pub const ENEMY_FIRE_SENSITIVITY: f64 = 10.0;
/// Vertical distance an enemy must descend between two shots.
pub const ENEMY_FIRE_SPACING: f64 = 15.0;
pub const BOSS_HIT_POINTS: u32 = 5;

const ASTEROID_MAX_VALUE: f64 = 10.0;
const ENEMY_MAX_VALUE: u32 = 49;
const BOSS_MAX_VALUE: u32 = 99;

// ── Shared motion helpers ─────────────────────────────────────────────────────

/// Spin by `vr` degrees, snapping to the opposite end on wrap-around.
fn spin(rot: f64, vr: f64, rotate_right: bool) -> f64 {
    if rotate_right {
        let next = rot + vr;
        if next > 360.0 {
            0.0
        } else {
            next
        }
    } else {
        let next = rot - vr;
        if next < 0.0 {
            360.0
        } else {
            next
        }
    }
}

/// Descent speed multiplier in [0.2, 0.7).
fn descent_variation(rng: &mut impl Rng) -> f64 {
    rng.gen::<f64>() * 0.5 + 0.2
}

/// Horizontal velocity for objects entering at `x`: those spawning in the
/// outer quarters drift back toward the centre.
fn inward_drift(x: f64, bounds: &Bounds, edge: f64, spread: f64, rng: &mut impl Rng) -> f64 {
    if x < bounds.first_quarter() {
        rng.gen::<f64>() * edge * VELOCITY_FACTOR_X
    } else if x > bounds.last_quarter() {
        -rng.gen::<f64>() * edge * VELOCITY_FACTOR_X
    } else {
        (rng.gen::<f64>() * spread - spread * 0.5) * VELOCITY_FACTOR_X
    }
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub width: f64,
    pub height: f64,
    /// Hull collision radius.
    pub radius: f64,
    pub shield_active: bool,
    /// Monotonic timestamp (ns) of the last shield activation.
    pub shield_activated_at: u64,
}

impl Ship {
    pub fn new(size: Size, bounds: &Bounds) -> Self {
        let mut ship = Ship {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            width: size.width,
            height: size.height,
            radius: max_extent(size.width, size.height) * 0.5,
            shield_active: false,
            shield_activated_at: 0,
        };
        ship.reset(bounds);
        ship
    }

    /// Back to the spawn point, standing still.
    pub fn reset(&mut self, bounds: &Bounds) {
        self.x = bounds.width * 0.5;
        self.y = bounds.height - 2.0 * self.height;
        self.vx = 0.0;
        self.vy = 0.0;
    }

    pub fn advance(&mut self, bounds: &Bounds) {
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        self.x = (self.x + self.vx).max(half_w).min(bounds.width - half_w);
        self.y = (self.y + self.vy).max(half_h).min(bounds.height - half_h);
    }

    pub fn is_thrusting(&self) -> bool {
        self.vx != 0.0 || self.vy != 0.0
    }

    /// Collision circle: the deflector while shielded, otherwise the hull.
    pub fn effective_circle(&self, shield_radius: f64) -> Circle {
        let radius = if self.shield_active { shield_radius } else { self.radius };
        Circle::new(self.x, self.y, radius)
    }
}

// ── Star (background decoration) ──────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Star {
    const X_VARIATION: f64 = 0.0;
    const MIN_SPEED_Y: f64 = 4.0;

    /// A star just above the top edge.
    pub fn new(bounds: &Bounds, rng: &mut impl Rng) -> Self {
        let size = rng.gen_range(0..2) as f64 + 1.0;
        let variation = descent_variation(rng);
        let vx = ((rng.gen::<f64>() * Self::X_VARIATION - Self::X_VARIATION * 0.5).round()
            * VELOCITY_FACTOR_X)
            .trunc();
        let vy = (((rng.gen::<f64>() * 1.5 + Self::MIN_SPEED_Y) * variation).round()
            * VELOCITY_FACTOR_Y)
            .trunc();
        Star {
            x: (rng.gen::<f64>() * bounds.width).trunc(),
            y: -size,
            size,
            vx,
            vy,
        }
    }

    /// Re-enter at a random column above the top edge, keeping size and speed.
    pub fn respawn(&mut self, bounds: &Bounds, rng: &mut impl Rng) {
        self.x = (rng.gen::<f64>() * bounds.width).trunc();
        self.y = -self.size;
    }

    pub fn advance(&mut self, bounds: &Bounds) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.y > bounds.height + self.size
    }
}

// ── Asteroid (pooled) ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Asteroid {
    /// Index into `SpriteSet::asteroids`.
    pub variant: u8,
    /// Top-left of the unscaled image.
    pub x: f64,
    pub y: f64,
    /// Scaled extents.
    pub width: f64,
    pub height: f64,
    pub size: f64,
    pub radius: f64,
    pub img_center_x: f64,
    pub img_center_y: f64,
    /// Centre of rotation and of the collision circle.
    pub cx: f64,
    pub cy: f64,
    pub rot: f64,
    pub vx: f64,
    pub vy: f64,
    pub vr: f64,
    pub rotate_right: bool,
    pub scale: f64,
    pub hit_points: u32,
    pub score_value: u32,
}

impl Asteroid {
    const X_VARIATION: f64 = 2.0;
    const MIN_SPEED_Y: f64 = 2.0;
    const MIN_ROTATION_R: f64 = 0.1;

    pub fn spawn(sprites: &SpriteSet, bounds: &Bounds, rng: &mut impl Rng) -> Self {
        let variant = rng.gen_range(0..sprites.asteroids.len());
        let image = sprites.asteroids[variant];
        let scale = rng.gen::<f64>() * 0.6 + 0.2;
        let hit_points = (scale * 5.0).round() as u32;
        let score_value = (ASTEROID_MAX_VALUE / scale).round() as u32;
        debug_assert!(scale > 0.0 && hit_points >= 1 && score_value >= 1);

        let variation = descent_variation(rng);
        let width = image.width * scale;
        let height = image.height * scale;
        let size = max_extent(width, height);
        let x = rng.gen::<f64>() * bounds.width;
        let y = -image.height;
        let img_center_x = image.width * 0.5;
        let img_center_y = image.height * 0.5;

        Asteroid {
            variant: variant as u8,
            x,
            y,
            width,
            height,
            size,
            radius: size * 0.5,
            img_center_x,
            img_center_y,
            cx: x + img_center_x,
            cy: y + img_center_y,
            rot: 0.0,
            vx: (rng.gen::<f64>() * Self::X_VARIATION - Self::X_VARIATION * 0.5)
                * VELOCITY_FACTOR_X,
            vy: ((rng.gen::<f64>() * 1.5 + Self::MIN_SPEED_Y / scale) * variation)
                * VELOCITY_FACTOR_Y,
            vr: (rng.gen::<f64>() * 0.5 + Self::MIN_ROTATION_R) * VELOCITY_FACTOR_R,
            rotate_right: rng.gen_bool(0.5),
            scale,
            hit_points,
            score_value,
        }
    }

    /// Reinitialise this slot in place with a fresh random asteroid.
    pub fn respawn(&mut self, sprites: &SpriteSet, bounds: &Bounds, rng: &mut impl Rng) {
        *self = Asteroid::spawn(sprites, bounds, rng);
    }

    pub fn advance(&mut self, bounds: &Bounds) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.cx = self.x + self.img_center_x;
        self.cy = self.y + self.img_center_y;
        self.rot = spin(self.rot, self.vr, self.rotate_right);

        self.x < -self.size || self.x - self.radius > bounds.width || self.y - self.height > bounds.height
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.cx, self.cy, self.radius)
    }
}

// ── Enemies: drones (pooled) and bosses (collection) ──────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Drone,
    Boss,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Index into `SpriteSet::enemies`; always 0 for bosses.
    pub variant: u8,
    /// Centre of the sprite and of the collision circle.
    pub x: f64,
    pub y: f64,
    /// Heading in degrees, 0 pointing down the screen.
    pub rot: f64,
    pub width: f64,
    pub height: f64,
    pub size: f64,
    pub radius: f64,
    pub vx: f64,
    pub vy: f64,
    pub score_value: u32,
    /// y at the last shot; firing is spaced by descent, not by time.
    pub last_shot_y: f64,
    pub hit_points: u32,
}

impl Enemy {
    const X_VARIATION: f64 = 1.0;
    const MIN_SPEED_Y: f64 = 3.0;

    pub fn drone(sprites: &SpriteSet, bounds: &Bounds, rng: &mut impl Rng) -> Self {
        let variant = rng.gen_range(0..sprites.enemies.len());
        let score_value = rng.gen_range(1..=ENEMY_MAX_VALUE);
        Enemy::enter(EnemyKind::Drone, variant as u8, sprites.enemies[variant], score_value, 1, bounds, rng)
    }

    pub fn boss(sprites: &SpriteSet, bounds: &Bounds, rng: &mut impl Rng) -> Self {
        let score_value = rng.gen_range(1..=BOSS_MAX_VALUE);
        Enemy::enter(EnemyKind::Boss, 0, sprites.boss, score_value, BOSS_HIT_POINTS, bounds, rng)
    }

    fn enter(
        kind: EnemyKind,
        variant: u8,
        image: Size,
        score_value: u32,
        hit_points: u32,
        bounds: &Bounds,
        rng: &mut impl Rng,
    ) -> Self {
        let x = rng.gen::<f64>() * bounds.width;
        let variation = descent_variation(rng);
        let size = max_extent(image.width, image.height);
        let vx = inward_drift(x, bounds, 0.5, Self::X_VARIATION, rng);
        let vy = ((rng.gen::<f64>() * 1.5 + Self::MIN_SPEED_Y) * variation) * VELOCITY_FACTOR_Y;

        Enemy {
            kind,
            variant,
            x,
            y: -image.height,
            rot: vy.atan2(vx).to_degrees() - 90.0,
            width: image.width,
            height: image.height,
            size,
            radius: size * 0.5,
            vx,
            vy,
            score_value,
            last_shot_y: 0.0,
            hit_points,
        }
    }

    /// Reinitialise a pooled drone slot.
    pub fn respawn(&mut self, sprites: &SpriteSet, bounds: &Bounds, rng: &mut impl Rng) {
        *self = match self.kind {
            EnemyKind::Drone => Enemy::drone(sprites, bounds, rng),
            EnemyKind::Boss => Enemy::boss(sprites, bounds, rng),
        };
    }

    pub fn advance(&mut self, bounds: &Bounds) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.x < -self.size || self.x > bounds.width + self.size || self.y > bounds.height + self.size
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.x, self.y, self.radius)
    }

    /// Damage tier for the boss hull image: 4 when intact, 0 on its last hit point.
    pub fn tier(&self) -> u8 {
        (self.hit_points.clamp(1, BOSS_TIERS as u32) - 1) as u8
    }

    /// Open fire on a ship at (`ship_x`, `ship_y`) when lined up with it.
    /// Drones only shoot downward at a ship below them; bosses ignore height.
    pub fn try_fire(&mut self, ship_x: f64, ship_y: f64, sprites: &SpriteSet) -> Option<Bullet> {
        if self.kind == EnemyKind::Drone && self.y >= ship_y {
            return None;
        }
        if self.x <= ship_x - ENEMY_FIRE_SENSITIVITY || self.x >= ship_x + ENEMY_FIRE_SENSITIVITY {
            return None;
        }
        if self.y - self.last_shot_y <= ENEMY_FIRE_SPACING {
            return None;
        }
        // Shots are rescaled from the shooter's velocity; no descent, no heading.
        if self.vy == 0.0 {
            return None;
        }
        self.last_shot_y = self.y;
        let shot = match self.kind {
            EnemyKind::Drone => Bullet::aimed(
                ShotKind::EnemyTorpedo,
                sprites.enemy_torpedo,
                self.x,
                self.y,
                self.vx,
                self.vy,
                ENEMY_TORPEDO_SPEED,
            ),
            EnemyKind::Boss => Bullet::aimed(
                ShotKind::EnemyBossTorpedo,
                sprites.enemy_boss_torpedo,
                self.x,
                self.y,
                self.vx,
                self.vy,
                ENEMY_BOSS_TORPEDO_SPEED,
            ),
        };
        Some(shot)
    }
}

// ── Crystal (shield pickup) ───────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Crystal {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub size: f64,
    pub radius: f64,
    pub img_center_x: f64,
    pub img_center_y: f64,
    pub cx: f64,
    pub cy: f64,
    pub rot: f64,
    pub vx: f64,
    pub vy: f64,
    pub vr: f64,
    pub rotate_right: bool,
}

impl Crystal {
    const X_VARIATION: f64 = 2.0;
    const MIN_SPEED_Y: f64 = 2.0;
    const MIN_ROTATION_R: f64 = 0.1;

    pub fn spawn(sprites: &SpriteSet, bounds: &Bounds, rng: &mut impl Rng) -> Self {
        let image = sprites.crystal;
        let x = rng.gen::<f64>() * bounds.width;
        let y = -image.height;
        let variation = descent_variation(rng);
        let size = max_extent(image.width, image.height);
        let img_center_x = image.width * 0.5;
        let img_center_y = image.height * 0.5;

        Crystal {
            x,
            y,
            width: image.width,
            height: image.height,
            size,
            radius: size * 0.5,
            img_center_x,
            img_center_y,
            cx: x + img_center_x,
            cy: y + img_center_y,
            rot: 0.0,
            vx: inward_drift(x, bounds, 1.0, Self::X_VARIATION, rng),
            vy: ((rng.gen::<f64>() * 1.5 + Self::MIN_SPEED_Y) * variation) * VELOCITY_FACTOR_Y,
            vr: (rng.gen::<f64>() * 0.5 + Self::MIN_ROTATION_R) * VELOCITY_FACTOR_R,
            rotate_right: rng.gen_bool(0.5),
        }
    }

    pub fn advance(&mut self, bounds: &Bounds) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.cx = self.x + self.img_center_x;
        self.cy = self.y + self.img_center_y;
        self.rot = spin(self.rot, self.vr, self.rotate_right);

        self.x < -self.size || self.x - self.radius > bounds.width || self.y - self.height > bounds.height
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.cx, self.cy, self.radius)
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShotKind {
    Torpedo,
    Rocket,
    EnemyTorpedo,
    EnemyBossTorpedo,
}

impl ShotKind {
    pub fn is_player(self) -> bool {
        matches!(self, ShotKind::Torpedo | ShotKind::Rocket)
    }
}

/// What the ship looks like to an enemy shot this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShipTarget {
    /// Effective circle: deflector radius while shielded.
    pub circle: Circle,
    pub shielded: bool,
    /// Ship already destroyed this life; shots can no longer touch it.
    pub has_been_hit: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotFate {
    Flying,
    /// Left the play field.
    Expired,
    /// Touched the deflector; the ship is unharmed.
    Absorbed,
    /// Touched the bare hull.
    Struck,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub kind: ShotKind,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub width: f64,
    pub height: f64,
    pub size: f64,
    pub radius: f64,
}

impl Bullet {
    fn sized(kind: ShotKind, image: Size, x: f64, y: f64, vx: f64, vy: f64) -> Self {
        let size = max_extent(image.width, image.height);
        Bullet {
            kind,
            x,
            y,
            vx,
            vy,
            width: image.width,
            height: image.height,
            size,
            radius: size * 0.5,
        }
    }

    /// A player torpedo launched from the ship's nose at (`x`, `y`).
    pub fn torpedo(sprites: &SpriteSet, x: f64, y: f64) -> Self {
        let image = sprites.torpedo;
        Bullet::sized(ShotKind::Torpedo, image, x, y - image.height, 0.0, -TORPEDO_SPEED)
    }

    pub fn rocket(sprites: &SpriteSet, x: f64, y: f64) -> Self {
        let image = sprites.rocket;
        Bullet::sized(ShotKind::Rocket, image, x, y - image.height, 0.0, -ROCKET_SPEED)
    }

    /// An enemy shot keeping the shooter's heading at a fixed `speed`.
    pub fn aimed(kind: ShotKind, image: Size, x: f64, y: f64, vx: f64, vy: f64, speed: f64) -> Self {
        let magnitude = (vx * vx + vy * vy).sqrt();
        debug_assert!(magnitude > 0.0, "aimed shot needs a heading");
        let factor = speed / magnitude;
        Bullet::sized(kind, image, x - image.width / 2.0, y, vx * factor, vy * factor)
    }

    /// Player shots fly straight up and expire above the top edge.
    pub fn advance(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.y < -self.size
    }

    /// Enemy shots test the ship themselves. Once the ship is down they only
    /// check whether they left the screen.
    pub fn advance_toward(&mut self, bounds: &Bounds, target: &ShipTarget) -> ShotFate {
        self.x += self.vx;
        self.y += self.vy;

        if !target.has_been_hit && circles_overlap(&self.circle(), &target.circle) {
            return if target.shielded { ShotFate::Absorbed } else { ShotFate::Struck };
        }
        if self.y > bounds.height {
            ShotFate::Expired
        } else {
            ShotFate::Flying
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.x, self.y, self.radius)
    }
}
