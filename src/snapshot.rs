//! A read-only picture of one frame, detached from the world's collections.

use crate::effects::{Effect, EffectKind};
use crate::entities::{Bullet, EnemyKind, ShotKind};
use crate::game::Phase;
use crate::leaderboard::{Leaderboard, NameEntry, PlayerScore};
use crate::sprites::Sprite;
use crate::world::World;

/// A sprite to draw centred on (`x`, `y`), rotated by `rotation` degrees and
/// scaled uniformly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityView {
    pub sprite: Sprite,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale: f64,
}

/// One cell of an effect's sprite sheet, placed by its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectView {
    pub kind: EffectKind,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub frame_x: u8,
    pub frame_y: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarView {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShipView {
    pub x: f64,
    pub y: f64,
    pub thrusting: bool,
    pub shielded: bool,
    /// Fraction of the running shield left, 0 when down.
    pub shield_remaining: f64,
    /// Sheet cell of the death animation while the ship is down.
    pub explosion_frame: Option<(u8, u8)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub phase: Phase,
    pub tick: u64,
    pub background_y: f64,
    pub stars: Vec<StarView>,
    /// Back to front: asteroids, drones, bosses, crystals, then shots.
    pub entities: Vec<EntityView>,
    /// Already in draw order.
    pub effects: Vec<EffectView>,
    pub ship: ShipView,
    pub score: u64,
    pub lives: u32,
    pub shields: u32,
    pub leaderboard: Vec<PlayerScore>,
    /// Initials being typed, placeholders included.
    pub name_entry: Option<String>,
}

impl Snapshot {
    pub fn capture(
        world: &World,
        phase: Phase,
        leaderboard: &Leaderboard,
        name_entry: Option<&NameEntry>,
        now: u64,
    ) -> Self {
        let mut entities = Vec::with_capacity(
            world.asteroids.len()
                + world.enemies.len()
                + world.bosses.len()
                + world.crystals.len()
                + world.torpedoes.len()
                + world.rockets.len()
                + world.enemy_torpedoes.len()
                + world.enemy_boss_torpedoes.len(),
        );

        entities.extend(world.asteroids.iter().map(|a| EntityView {
            sprite: Sprite::Asteroid(a.variant),
            x: a.cx,
            y: a.cy,
            rotation: a.rot,
            scale: a.scale,
        }));
        entities.extend(world.enemies.iter().chain(world.bosses.iter()).map(|e| EntityView {
            sprite: match e.kind {
                EnemyKind::Drone => Sprite::Enemy(e.variant),
                EnemyKind::Boss => Sprite::Boss(e.tier()),
            },
            x: e.x,
            y: e.y,
            rotation: e.rot,
            scale: 1.0,
        }));
        entities.extend(world.crystals.iter().map(|c| EntityView {
            sprite: Sprite::Crystal,
            x: c.cx,
            y: c.cy,
            rotation: c.rot,
            scale: 1.0,
        }));
        let shots = world
            .torpedoes
            .iter()
            .chain(&world.rockets)
            .chain(&world.enemy_torpedoes)
            .chain(&world.enemy_boss_torpedoes);
        entities.extend(shots.map(shot_view));

        let mut effects = Vec::with_capacity(world.effects.len());
        for kind in EffectKind::DRAW_ORDER {
            effects.extend(world.effects.iter().filter(|e| e.kind == kind).map(effect_view));
        }

        let ship = ShipView {
            x: world.ship.x,
            y: world.ship.y,
            thrusting: world.ship.is_thrusting(),
            shielded: world.ship.shield_active,
            shield_remaining: world.shield_remaining(now),
            explosion_frame: world
                .has_been_hit
                .then_some((world.ship_explosion.frame_x, world.ship_explosion.frame_y)),
        };

        Snapshot {
            phase,
            tick: world.tick,
            background_y: world.background_y,
            stars: world
                .stars
                .iter()
                .map(|s| StarView { x: s.x, y: s.y, size: s.size })
                .collect(),
            entities,
            effects,
            ship,
            score: world.score,
            lives: world.lives,
            shields: world.shields,
            leaderboard: leaderboard.entries().to_vec(),
            name_entry: name_entry.map(|entry| entry.text().to_string()),
        }
    }
}

fn shot_view(shot: &Bullet) -> EntityView {
    let sprite = match shot.kind {
        ShotKind::Torpedo => Sprite::Torpedo,
        ShotKind::Rocket => Sprite::Rocket,
        ShotKind::EnemyTorpedo => Sprite::EnemyTorpedo,
        ShotKind::EnemyBossTorpedo => Sprite::EnemyBossTorpedo,
    };
    // Enemy shots point along their flight path.
    let rotation = if shot.kind.is_player() {
        0.0
    } else {
        shot.vy.atan2(shot.vx).to_degrees() - 90.0
    };
    EntityView { sprite, x: shot.x, y: shot.y, rotation, scale: 1.0 }
}

fn effect_view(effect: &Effect) -> EffectView {
    EffectView {
        kind: effect.kind,
        x: effect.x,
        y: effect.y,
        scale: effect.scale,
        frame_x: effect.frames.frame_x,
        frame_y: effect.frames.frame_y,
    }
}
