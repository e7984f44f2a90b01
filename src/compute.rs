//! Game-logic functions: player commands and the per-tick simulation step.
//!
//! Everything operates on an explicit `&mut World`. All randomness comes
//! through an injected `Rng`, so tests drive it with a seeded generator.

use rand::Rng;

use crate::effects::{Effect, EffectKind};
use crate::entities::{Bullet, ShotFate, ShotKind, SHIP_SPEED};
use crate::geometry::circles_overlap;
use crate::input::Action;
use crate::sprites::Size;
use crate::world::{World, BACKGROUND_SCROLL};

/// Something that happened during a step, for logging and for callers that
/// want to react (sound, statistics, tests).
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    ScoreAwarded(u32),
    EffectSpawned(EffectKind),
    EnemyFired(ShotKind),
    /// An obstacle or shot broke on the deflector.
    ShieldAbsorbed,
    ShipHit { lives_left: u32 },
    ShipRespawned,
    CrystalCollected { shields: u32 },
    ShieldExpired,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
    /// The last life was lost during this step.
    pub game_over: bool,
}

impl TickReport {
    pub fn count(&self, wanted: &GameEvent) -> usize {
        self.events.iter().filter(|e| *e == wanted).count()
    }

    pub fn points(&self) -> u64 {
        self.events
            .iter()
            .map(|e| match e {
                GameEvent::ScoreAwarded(points) => u64::from(*points),
                _ => 0,
            })
            .sum()
    }
}

// ── Input-driven commands ─────────────────────────────────────────────────────

/// Apply a direction key. Velocity is set, not accumulated; releasing a key
/// stops that axis.
pub fn steer(world: &mut World, action: Action, pressed: bool) {
    if world.has_been_hit {
        return;
    }
    let speed = if pressed { SHIP_SPEED } else { 0.0 };
    match action {
        Action::Up => world.ship.vy = -speed,
        Action::Down => world.ship.vy = speed,
        Action::Left => world.ship.vx = -speed,
        Action::Right => world.ship.vx = speed,
        _ => {}
    }
}

pub fn fire_torpedo(world: &mut World) -> bool {
    if world.has_been_hit {
        return false;
    }
    let torpedo = Bullet::torpedo(&world.sprites, world.ship.x, world.ship.y);
    world.torpedoes.push(torpedo);
    true
}

/// Fire a rocket unless `max_rockets` are already in flight.
pub fn fire_rocket(world: &mut World) -> bool {
    if world.has_been_hit || world.rockets.len() >= world.max_rockets {
        return false;
    }
    let rocket = Bullet::rocket(&world.sprites, world.ship.x, world.ship.y);
    world.rockets.push(rocket);
    true
}

/// Raise the deflector. The charge is only consumed when it times out.
pub fn activate_shield(world: &mut World, now: u64) -> bool {
    if world.has_been_hit || world.shields == 0 || world.ship.shield_active {
        return false;
    }
    world.ship.shield_active = true;
    world.ship.shield_activated_at = now;
    log::debug!("shield up, {} charges", world.shields);
    true
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Top-left corner that centres a `frame` drawn at `scale` on (`cx`, `cy`).
fn centred(frame: Size, cx: f64, cy: f64, scale: f64) -> (f64, f64) {
    (cx - frame.width * 0.5 * scale, cy - frame.height * 0.5 * scale)
}

fn spawn_effect(
    world: &mut World,
    report: &mut TickReport,
    kind: EffectKind,
    (cx, cy): (f64, f64),
    (vx, vy): (f64, f64),
    scale: f64,
) {
    let (x, y) = centred(world.sprites.frame_size(kind), cx, cy, scale);
    world.effects.push(Effect::new(kind, x, y, vx, vy, scale));
    report.events.push(GameEvent::EffectSpawned(kind));
}

/// Spark where a torpedo struck without destroying its target.
fn spawn_hit(world: &mut World, report: &mut TickReport, kind: EffectKind, at: (f64, f64), v: (f64, f64)) {
    let frame = world.sprites.frame_size(kind);
    let x = at.0 - frame.width * 0.5;
    let y = at.1 - frame.height;
    world.effects.push(Effect::new(kind, x, y, v.0, v.1, 1.0));
    report.events.push(GameEvent::EffectSpawned(kind));
}

fn award(world: &mut World, report: &mut TickReport, points: u32) {
    world.score += u64::from(points);
    report.events.push(GameEvent::ScoreAwarded(points));
}

/// Unshielded damage. Callers check `has_been_hit` first.
fn strike_ship(world: &mut World, report: &mut TickReport) {
    debug_assert!(!world.has_been_hit);
    world.has_been_hit = true;
    world.lives = world.lives.saturating_sub(1);
    world.ship_explosion.reset();
    log::debug!("ship hit, {} lives left", world.lives);
    report.events.push(GameEvent::ShipHit { lives_left: world.lives });
    if world.lives == 0 {
        report.game_over = true;
    }
}

fn purge<T>(items: &mut Vec<T>, marks: &[bool]) {
    *items = items
        .drain(..)
        .enumerate()
        .filter(|(i, _)| !marks[*i])
        .map(|(_, item)| item)
        .collect();
}

// ── Per-tick step ─────────────────────────────────────────────────────────────

/// Advance the simulation by one tick. `now` is the monotonic clock in ns,
/// used for the shield timer only.
pub fn tick(world: &mut World, now: u64, rng: &mut impl Rng) -> TickReport {
    let mut report = TickReport::default();
    let bounds = world.bounds;
    world.tick += 1;

    // ── 1. Fresh removal marks ───────────────────────────────────────────────
    let mut spent_torpedoes = vec![false; world.torpedoes.len()];
    let mut spent_rockets = vec![false; world.rockets.len()];

    // The ship only moves in step 8, so its collision circle holds until then.
    let ship_circle = world.ship.effective_circle(world.shield_radius());
    let shielded = world.ship.shield_active;

    // ── 2. Background and stars ──────────────────────────────────────────────
    world.background_y -= BACKGROUND_SCROLL;
    if world.background_y <= 0.0 {
        world.background_y = world.background_top();
    }
    for star in world.stars.iter_mut() {
        if star.advance(&bounds) {
            star.respawn(&bounds, rng);
        }
    }

    // ── 3. Asteroids ─────────────────────────────────────────────────────────
    for i in 0..world.asteroids.len() {
        if world.asteroids[i].advance(&bounds) {
            world.asteroids[i].respawn(&world.sprites, &bounds, rng);
        }

        for t in 0..world.torpedoes.len() {
            if spent_torpedoes[t]
                || !circles_overlap(&world.torpedoes[t].circle(), &world.asteroids[i].circle())
            {
                continue;
            }
            spent_torpedoes[t] = true;
            let asteroid = &mut world.asteroids[i];
            asteroid.hit_points = asteroid.hit_points.saturating_sub(1);
            let (centre, velocity) = ((asteroid.cx, asteroid.cy), (asteroid.vx, asteroid.vy));
            if asteroid.hit_points == 0 {
                let (scale, points) = (asteroid.scale, asteroid.score_value);
                spawn_effect(world, &mut report, EffectKind::AsteroidExplosion, centre, velocity, scale);
                award(world, &mut report, points);
                world.asteroids[i].respawn(&world.sprites, &bounds, rng);
            } else {
                let at = (world.torpedoes[t].x, world.torpedoes[t].y);
                spawn_hit(world, &mut report, EffectKind::Hit, at, velocity);
            }
        }

        for r in 0..world.rockets.len() {
            if spent_rockets[r] || !circles_overlap(&world.rockets[r].circle(), &world.asteroids[i].circle()) {
                continue;
            }
            spent_rockets[r] = true;
            let asteroid = &world.asteroids[i];
            let (centre, velocity) = ((asteroid.cx, asteroid.cy), (asteroid.vx, asteroid.vy));
            let (scale, points) = (asteroid.scale, asteroid.score_value);
            spawn_effect(world, &mut report, EffectKind::RocketExplosion, centre, velocity, scale);
            award(world, &mut report, points);
            world.asteroids[i].respawn(&world.sprites, &bounds, rng);
        }

        if !world.has_been_hit && circles_overlap(&ship_circle, &world.asteroids[i].circle()) {
            if shielded {
                let asteroid = &world.asteroids[i];
                let (centre, velocity) = ((asteroid.cx, asteroid.cy), (asteroid.vx, asteroid.vy));
                let scale = asteroid.scale;
                spawn_effect(world, &mut report, EffectKind::AsteroidExplosion, centre, velocity, scale);
                report.events.push(GameEvent::ShieldAbsorbed);
            } else {
                strike_ship(world, &mut report);
            }
            world.asteroids[i].respawn(&world.sprites, &bounds, rng);
        }
    }

    // ── 4a. Drones ───────────────────────────────────────────────────────────
    for i in 0..world.enemies.len() {
        if world.enemies[i].advance(&bounds) {
            world.enemies[i].respawn(&world.sprites, &bounds, rng);
        }

        if let Some(shot) = world.enemies[i].try_fire(world.ship.x, world.ship.y, &world.sprites) {
            report.events.push(GameEvent::EnemyFired(shot.kind));
            world.enemy_torpedoes.push(shot);
        }

        for t in 0..world.torpedoes.len() {
            if spent_torpedoes[t] || !circles_overlap(&world.torpedoes[t].circle(), &world.enemies[i].circle()) {
                continue;
            }
            spent_torpedoes[t] = true;
            let enemy = &world.enemies[i];
            let (centre, velocity, points) = ((enemy.x, enemy.y), (enemy.vx, enemy.vy), enemy.score_value);
            spawn_effect(world, &mut report, EffectKind::Explosion, centre, velocity, 0.5);
            award(world, &mut report, points);
            world.enemies[i].respawn(&world.sprites, &bounds, rng);
        }

        for r in 0..world.rockets.len() {
            if spent_rockets[r] || !circles_overlap(&world.rockets[r].circle(), &world.enemies[i].circle()) {
                continue;
            }
            spent_rockets[r] = true;
            let enemy = &world.enemies[i];
            let (centre, velocity, points) = ((enemy.x, enemy.y), (enemy.vx, enemy.vy), enemy.score_value);
            spawn_effect(world, &mut report, EffectKind::RocketExplosion, centre, velocity, 0.5);
            award(world, &mut report, points);
            world.enemies[i].respawn(&world.sprites, &bounds, rng);
        }

        if !world.has_been_hit && circles_overlap(&ship_circle, &world.enemies[i].circle()) {
            if shielded {
                let enemy = &world.enemies[i];
                let (centre, velocity) = ((enemy.x, enemy.y), (enemy.vx, enemy.vy));
                spawn_effect(world, &mut report, EffectKind::Explosion, centre, velocity, 0.5);
                report.events.push(GameEvent::ShieldAbsorbed);
            } else {
                strike_ship(world, &mut report);
            }
            world.enemies[i].respawn(&world.sprites, &bounds, rng);
        }
    }

    // ── 4b. Bosses ───────────────────────────────────────────────────────────
    let mut fallen_bosses = vec![false; world.bosses.len()];
    for b in 0..world.bosses.len() {
        if world.bosses[b].advance(&bounds) {
            fallen_bosses[b] = true;
            continue;
        }

        if let Some(shot) = world.bosses[b].try_fire(world.ship.x, world.ship.y, &world.sprites) {
            report.events.push(GameEvent::EnemyFired(shot.kind));
            world.enemy_boss_torpedoes.push(shot);
        }

        for t in 0..world.torpedoes.len() {
            if spent_torpedoes[t] || !circles_overlap(&world.torpedoes[t].circle(), &world.bosses[b].circle()) {
                continue;
            }
            spent_torpedoes[t] = true;
            let boss = &mut world.bosses[b];
            boss.hit_points = boss.hit_points.saturating_sub(1);
            let (centre, velocity) = ((boss.x, boss.y), (boss.vx, boss.vy));
            if boss.hit_points == 0 {
                let points = boss.score_value;
                spawn_effect(world, &mut report, EffectKind::EnemyBossExplosion, centre, velocity, 0.5);
                award(world, &mut report, points);
                fallen_bosses[b] = true;
                break;
            }
            let at = (world.torpedoes[t].x, world.torpedoes[t].y);
            spawn_hit(world, &mut report, EffectKind::EnemyBossHit, at, velocity);
        }
        if fallen_bosses[b] {
            continue;
        }

        for r in 0..world.rockets.len() {
            if spent_rockets[r] || !circles_overlap(&world.rockets[r].circle(), &world.bosses[b].circle()) {
                continue;
            }
            spent_rockets[r] = true;
            let boss = &world.bosses[b];
            let (centre, velocity, points) = ((boss.x, boss.y), (boss.vx, boss.vy), boss.score_value);
            spawn_effect(world, &mut report, EffectKind::EnemyBossExplosion, centre, velocity, 0.5);
            award(world, &mut report, points);
            fallen_bosses[b] = true;
            break;
        }
        if fallen_bosses[b] {
            continue;
        }

        if !world.has_been_hit && circles_overlap(&ship_circle, &world.bosses[b].circle()) {
            if shielded {
                let boss = &world.bosses[b];
                let (centre, velocity) = ((boss.x, boss.y), (boss.vx, boss.vy));
                spawn_effect(world, &mut report, EffectKind::Explosion, centre, velocity, 0.5);
                report.events.push(GameEvent::ShieldAbsorbed);
            } else {
                strike_ship(world, &mut report);
            }
            fallen_bosses[b] = true;
        }
    }
    purge(&mut world.bosses, &fallen_bosses);

    // ── 5. Crystals ──────────────────────────────────────────────────────────
    let mut gone_crystals = vec![false; world.crystals.len()];
    for c in 0..world.crystals.len() {
        if world.crystals[c].advance(&bounds) {
            gone_crystals[c] = true;
            continue;
        }
        if !circles_overlap(&ship_circle, &world.crystals[c].circle()) {
            continue;
        }
        world.shields = (world.shields + 1).min(world.shields_max);
        report.events.push(GameEvent::CrystalCollected { shields: world.shields });
        let crystal = &world.crystals[c];
        let (centre, velocity) = ((crystal.cx, crystal.cy), (crystal.vx, crystal.vy));
        spawn_effect(world, &mut report, EffectKind::CrystalExplosion, centre, velocity, 1.0);
        gone_crystals[c] = true;
    }
    purge(&mut world.crystals, &gone_crystals);

    // ── 6. Projectiles ───────────────────────────────────────────────────────
    for (t, torpedo) in world.torpedoes.iter_mut().enumerate() {
        if torpedo.advance() {
            spent_torpedoes[t] = true;
        }
    }
    purge(&mut world.torpedoes, &spent_torpedoes);

    for (r, rocket) in world.rockets.iter_mut().enumerate() {
        if rocket.advance() {
            spent_rockets[r] = true;
        }
    }
    purge(&mut world.rockets, &spent_rockets);

    // Enemy shots check the ship themselves, one after another, so only the
    // first one to connect can take a life.
    let mut spent_enemy_shots = vec![false; world.enemy_torpedoes.len()];
    for s in 0..world.enemy_torpedoes.len() {
        let target = world.ship_target();
        let fate = world.enemy_torpedoes[s].advance_toward(&bounds, &target);
        spent_enemy_shots[s] = resolve_shot(world, &mut report, fate);
    }
    purge(&mut world.enemy_torpedoes, &spent_enemy_shots);

    let mut spent_boss_shots = vec![false; world.enemy_boss_torpedoes.len()];
    for s in 0..world.enemy_boss_torpedoes.len() {
        let target = world.ship_target();
        let fate = world.enemy_boss_torpedoes[s].advance_toward(&bounds, &target);
        spent_boss_shots[s] = resolve_shot(world, &mut report, fate);
    }
    purge(&mut world.enemy_boss_torpedoes, &spent_boss_shots);

    // ── 7. Effects ───────────────────────────────────────────────────────────
    world.effects.retain_mut(|effect| !effect.advance());

    // ── 8. Ship, its explosion and the shield timer ──────────────────────────
    if world.lives > 0 {
        if world.has_been_hit {
            if world.ship_explosion.advance() {
                world.has_been_hit = false;
                world.ship.reset(&bounds);
                report.events.push(GameEvent::ShipRespawned);
            }
        } else {
            world.ship.advance(&bounds);
        }

        if world.ship.shield_active
            && now.saturating_sub(world.ship.shield_activated_at) > world.shield_duration_ns
        {
            world.ship.shield_active = false;
            world.shields = world.shields.saturating_sub(1);
            log::debug!("shield down, {} charges left", world.shields);
            report.events.push(GameEvent::ShieldExpired);
        }
    }

    debug_assert!(world.lives <= world.lives_max && world.shields <= world.shields_max);
    report
}

/// Apply an enemy shot's own verdict. Returns whether the shot is spent.
fn resolve_shot(world: &mut World, report: &mut TickReport, fate: ShotFate) -> bool {
    match fate {
        ShotFate::Flying => false,
        ShotFate::Expired => true,
        ShotFate::Absorbed => {
            report.events.push(GameEvent::ShieldAbsorbed);
            true
        }
        ShotFate::Struck => {
            strike_ship(world, report);
            true
        }
    }
}
