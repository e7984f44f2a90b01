//! Sprite identities and their natural sizes.
//!
//! Images themselves live with the presentation layer. The core only needs
//! their dimensions: collision radii and animation frame rectangles derive
//! from them.

use crate::effects::EffectKind;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }

    pub const fn square(side: f64) -> Self {
        Size { width: side, height: side }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Size { width: self.width * factor, height: self.height * factor }
    }
}

/// Every image the scene can ask a surface to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    StartScreen,
    GameOverScreen,
    Background,
    Asteroid(u8),
    Enemy(u8),
    /// Boss hull by damage tier, 0 (nearly destroyed) to 4 (intact).
    Boss(u8),
    Ship,
    ShipThrust,
    MiniShip,
    Shield,
    MiniShield,
    Torpedo,
    Rocket,
    EnemyTorpedo,
    EnemyBossTorpedo,
    Crystal,
    /// Full sprite sheet of an animated effect.
    Sheet(EffectKind),
}

pub const BOSS_TIERS: u8 = 5;

/// Viewport width the stock sizes are drawn for.
pub const STANDARD_WIDTH: f64 = 350.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SpriteSet {
    pub screen: Size,
    pub background: Size,
    pub asteroids: Vec<Size>,
    pub enemies: Vec<Size>,
    pub boss: Size,
    pub ship: Size,
    pub mini_ship: Size,
    pub shield: Size,
    pub mini_shield: Size,
    pub torpedo: Size,
    pub rocket: Size,
    pub enemy_torpedo: Size,
    pub enemy_boss_torpedo: Size,
    pub crystal: Size,
    pub explosion_frame: Size,
    pub asteroid_explosion_frame: Size,
    pub rocket_explosion_frame: Size,
    pub enemy_boss_explosion_frame: Size,
    pub crystal_explosion_frame: Size,
    pub hit_frame: Size,
    pub ship_explosion_frame: Size,
}

impl Default for SpriteSet {
    fn default() -> Self {
        SpriteSet::standard()
    }
}

impl SpriteSet {
    /// The stock artwork at half of its 700 x 900 design resolution.
    pub fn standard() -> Self {
        SpriteSet {
            screen: Size::new(350.0, 450.0),
            background: Size::new(350.0, 1689.5),
            asteroids: [70.0, 70.0, 70.0, 55.0, 50.0, 60.0, 55.0, 50.0, 65.0, 60.0, 70.0]
                .iter()
                .map(|&side| Size::square(side))
                .collect(),
            enemies: vec![Size::square(28.0), Size::square(25.0), Size::square(34.0)],
            boss: Size::square(50.0),
            ship: Size::square(24.0),
            mini_ship: Size::square(8.0),
            shield: Size::square(50.0),
            mini_shield: Size::square(8.0),
            torpedo: Size::new(8.5, 10.0),
            rocket: Size::new(8.5, 25.0),
            enemy_torpedo: Size::square(10.5),
            enemy_boss_torpedo: Size::square(13.0),
            crystal: Size::square(50.0),
            explosion_frame: Size::square(96.0),
            asteroid_explosion_frame: Size::square(128.0),
            rocket_explosion_frame: Size::square(64.0),
            enemy_boss_explosion_frame: Size::square(100.0),
            crystal_explosion_frame: Size::square(50.0),
            hit_frame: Size::square(40.0),
            ship_explosion_frame: Size::square(50.0),
        }
    }

    /// The stock artwork resized so it covers a `width` x `height` viewport
    /// the way it covers the standard one.
    pub fn for_viewport(width: f64, height: f64) -> Self {
        let factor = width / STANDARD_WIDTH;
        let mut set = SpriteSet::standard();
        set.screen = Size::new(width, height);
        let fixed = [
            &mut set.background,
            &mut set.boss,
            &mut set.ship,
            &mut set.mini_ship,
            &mut set.shield,
            &mut set.mini_shield,
            &mut set.torpedo,
            &mut set.rocket,
            &mut set.enemy_torpedo,
            &mut set.enemy_boss_torpedo,
            &mut set.crystal,
            &mut set.explosion_frame,
            &mut set.asteroid_explosion_frame,
            &mut set.rocket_explosion_frame,
            &mut set.enemy_boss_explosion_frame,
            &mut set.crystal_explosion_frame,
            &mut set.hit_frame,
            &mut set.ship_explosion_frame,
        ];
        for size in fixed.into_iter().chain(set.asteroids.iter_mut()).chain(set.enemies.iter_mut()) {
            *size = size.scaled(factor);
        }
        set
    }

    /// How much larger than the stock artwork this set is.
    pub fn scale_factor(&self) -> f64 {
        self.background.width / STANDARD_WIDTH
    }

    /// Both variant lists hold at least one size.
    pub fn has_variants(&self) -> bool {
        !self.asteroids.is_empty() && !self.enemies.is_empty()
    }

    pub fn frame_size(&self, kind: EffectKind) -> Size {
        match kind {
            EffectKind::Explosion => self.explosion_frame,
            EffectKind::AsteroidExplosion => self.asteroid_explosion_frame,
            EffectKind::RocketExplosion => self.rocket_explosion_frame,
            EffectKind::EnemyBossExplosion => self.enemy_boss_explosion_frame,
            EffectKind::CrystalExplosion => self.crystal_explosion_frame,
            EffectKind::Hit | EffectKind::EnemyBossHit => self.hit_frame,
            EffectKind::ShipExplosion => self.ship_explosion_frame,
        }
    }

    /// Radius of the deflector shield around the ship.
    pub fn shield_radius(&self) -> f64 {
        self.shield.width * 0.5
    }

    pub fn size(&self, sprite: Sprite) -> Size {
        match sprite {
            Sprite::StartScreen | Sprite::GameOverScreen => self.screen,
            Sprite::Background => self.background,
            Sprite::Asteroid(i) => variant(&self.asteroids, i),
            Sprite::Enemy(i) => variant(&self.enemies, i),
            Sprite::Boss(_) => self.boss,
            Sprite::Ship | Sprite::ShipThrust => self.ship,
            Sprite::MiniShip => self.mini_ship,
            Sprite::Shield => self.shield,
            Sprite::MiniShield => self.mini_shield,
            Sprite::Torpedo => self.torpedo,
            Sprite::Rocket => self.rocket,
            Sprite::EnemyTorpedo => self.enemy_torpedo,
            Sprite::EnemyBossTorpedo => self.enemy_boss_torpedo,
            Sprite::Crystal => self.crystal,
            Sprite::Sheet(kind) => {
                let frame = self.frame_size(kind);
                let (columns, rows) = kind.grid();
                Size::new(frame.width * columns as f64, frame.height * rows as f64)
            }
        }
    }
}

fn variant(sizes: &[Size], index: u8) -> Size {
    match sizes.len() {
        0 => Size::square(0.0),
        len => sizes[usize::from(index) % len],
    }
}
