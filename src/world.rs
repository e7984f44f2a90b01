//! The whole mutable state of one run.

use rand::Rng;

use crate::config::GameConfig;
use crate::effects::{Effect, EffectKind, FrameCounter};
use crate::entities::{Asteroid, Bullet, Crystal, Enemy, Ship, ShipTarget, Star};
use crate::geometry::Bounds;
use crate::sprites::SpriteSet;

/// Scroll offset the stock background starts from and wraps back to.
pub const BACKGROUND_TOP: f64 = 1039.5;
pub const BACKGROUND_SCROLL: f64 = 0.5;

/// Owns every entity collection plus the run counters. Entities never
/// reference the world; the simulation step hands them what they need.
#[derive(Clone, Debug)]
pub struct World {
    pub bounds: Bounds,
    pub sprites: SpriteSet,
    pub lives_max: u32,
    pub shields_max: u32,
    pub shield_duration_ns: u64,
    pub max_rockets: usize,

    pub background_y: f64,
    pub stars: Vec<Star>,
    /// Fixed pools: a slot is always occupied and respawns in place.
    pub asteroids: Box<[Asteroid]>,
    pub enemies: Box<[Enemy]>,
    pub bosses: Vec<Enemy>,
    pub crystals: Vec<Crystal>,
    pub torpedoes: Vec<Bullet>,
    pub rockets: Vec<Bullet>,
    pub enemy_torpedoes: Vec<Bullet>,
    pub enemy_boss_torpedoes: Vec<Bullet>,
    pub effects: Vec<Effect>,

    pub ship: Ship,
    pub ship_explosion: FrameCounter,
    /// Ship destroyed and playing its explosion; blocks further damage.
    pub has_been_hit: bool,
    pub score: u64,
    pub lives: u32,
    pub shields: u32,
    /// Simulation steps run since the world was created.
    pub tick: u64,
}

impl World {
    pub fn new(config: &GameConfig, sprites: SpriteSet, rng: &mut impl Rng) -> Self {
        debug_assert!(sprites.has_variants(), "sprite set needs asteroid and enemy variants");
        let bounds = config.bounds();
        let stars = (0..config.star_count)
            .map(|_| {
                let mut star = Star::new(&bounds, rng);
                star.y = rng.gen::<f64>() * bounds.height;
                star
            })
            .collect();
        let asteroids = (0..config.asteroid_count)
            .map(|_| Asteroid::spawn(&sprites, &bounds, rng))
            .collect();
        let enemies = (0..config.enemy_count)
            .map(|_| Enemy::drone(&sprites, &bounds, rng))
            .collect();
        let ship = Ship::new(sprites.ship, &bounds);

        World {
            bounds,
            lives_max: config.lives,
            shields_max: config.shields,
            shield_duration_ns: config.shield_duration_ns(),
            max_rockets: config.max_rockets,
            background_y: BACKGROUND_TOP * sprites.scale_factor(),
            stars,
            asteroids,
            enemies,
            bosses: Vec::new(),
            crystals: Vec::new(),
            torpedoes: Vec::new(),
            rockets: Vec::new(),
            enemy_torpedoes: Vec::new(),
            enemy_boss_torpedoes: Vec::new(),
            effects: Vec::new(),
            ship,
            ship_explosion: FrameCounter::for_kind(EffectKind::ShipExplosion),
            has_been_hit: false,
            score: 0,
            lives: config.lives,
            shields: config.shields,
            tick: 0,
            sprites,
        }
    }

    /// Back to a fresh run: counters restored, pools respawned, everything
    /// dynamic cleared.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        for asteroid in self.asteroids.iter_mut() {
            asteroid.respawn(&self.sprites, &self.bounds, rng);
        }
        for enemy in self.enemies.iter_mut() {
            enemy.respawn(&self.sprites, &self.bounds, rng);
        }
        self.bosses.clear();
        self.crystals.clear();
        self.torpedoes.clear();
        self.rockets.clear();
        self.enemy_torpedoes.clear();
        self.enemy_boss_torpedoes.clear();
        self.effects.clear();

        self.ship.reset(&self.bounds);
        self.ship.shield_active = false;
        self.ship_explosion.reset();
        self.has_been_hit = false;
        self.score = 0;
        self.lives = self.lives_max;
        self.shields = self.shields_max;
    }

    /// Background offset for this sprite set's scale.
    pub fn background_top(&self) -> f64 {
        BACKGROUND_TOP * self.sprites.scale_factor()
    }

    pub fn shield_radius(&self) -> f64 {
        self.sprites.shield_radius()
    }

    pub fn ship_target(&self) -> ShipTarget {
        ShipTarget {
            circle: self.ship.effective_circle(self.shield_radius()),
            shielded: self.ship.shield_active,
            has_been_hit: self.has_been_hit,
        }
    }

    /// Fraction of the active shield still left at `now`, 0 when down.
    pub fn shield_remaining(&self, now: u64) -> f64 {
        if !self.ship.shield_active {
            return 0.0;
        }
        let elapsed = now.saturating_sub(self.ship.shield_activated_at);
        1.0 - (elapsed as f64 / self.shield_duration_ns as f64).min(1.0)
    }

    pub fn spawn_boss(&mut self, rng: &mut impl Rng) {
        let boss = Enemy::boss(&self.sprites, &self.bounds, rng);
        log::debug!("boss enters at x={:.1} worth {}", boss.x, boss.score_value);
        self.bosses.push(boss);
    }

    pub fn spawn_crystal(&mut self, rng: &mut impl Rng) {
        let crystal = Crystal::spawn(&self.sprites, &self.bounds, rng);
        log::debug!("crystal enters at x={:.1}", crystal.x);
        self.crystals.push(crystal);
    }

    pub fn effect_count(&self, kind: EffectKind) -> usize {
        self.effects.iter().filter(|e| e.kind == kind).count()
    }

    /// Shift every wall-clock timestamp held by the world, used after a pause.
    pub fn shift_timestamps(&mut self, delta: u64) {
        if self.ship.shield_active {
            self.ship.shield_activated_at += delta;
        }
    }
}
