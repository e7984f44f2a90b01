use space_raid::compute::*;
use space_raid::config::GameConfig;
use space_raid::effects::*;
use space_raid::entities::*;
use space_raid::input::Action;
use space_raid::sprites::SpriteSet;
use space_raid::world::{World, BACKGROUND_SCROLL, BACKGROUND_TOP};

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A fresh world with every pooled asteroid and drone parked far above the
/// viewport, motionless, so scenarios only involve what a test places.
fn make_world(rng: &mut StdRng) -> World {
    let mut world = World::new(&GameConfig::default(), SpriteSet::standard(), rng);
    for asteroid in world.asteroids.iter_mut() {
        asteroid.x = 175.0;
        asteroid.y = -1_000.0;
        asteroid.vx = 0.0;
        asteroid.vy = 0.0;
    }
    for enemy in world.enemies.iter_mut() {
        enemy.x = 10.0;
        enemy.y = -1_000.0;
        enemy.vx = 0.0;
        enemy.vy = 0.0;
    }
    world
}

/// Put asteroid `slot` at rest with its centre on (`cx`, `cy`).
fn place_asteroid(world: &mut World, slot: usize, cx: f64, cy: f64) {
    let asteroid = &mut world.asteroids[slot];
    asteroid.x = cx - asteroid.img_center_x;
    asteroid.y = cy - asteroid.img_center_y;
    asteroid.vx = 0.0;
    asteroid.vy = 0.0;
}

fn place_boss(world: &mut World, rng: &mut StdRng, x: f64, y: f64) {
    world.spawn_boss(rng);
    let boss = world.bosses.last_mut().expect("just spawned");
    boss.x = x;
    boss.y = y;
    boss.vx = 0.0;
    boss.vy = 0.0;
}

fn enemy_shot_on_ship(world: &World) -> Bullet {
    let sprites = &world.sprites;
    let speed = ENEMY_TORPEDO_SPEED;
    let mut shot = Bullet::aimed(
        ShotKind::EnemyTorpedo,
        sprites.enemy_torpedo,
        world.ship.x,
        world.ship.y - speed,
        0.0,
        1.0,
        speed,
    );
    shot.x = world.ship.x;
    shot
}

fn spawned(reports: &[TickReport], kind: EffectKind) -> usize {
    reports
        .iter()
        .map(|r| r.count(&GameEvent::EffectSpawned(kind)))
        .sum()
}

// ── Player commands ───────────────────────────────────────────────────────────

#[test]
fn steer_sets_and_clears_velocity() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    steer(&mut world, Action::Left, true);
    steer(&mut world, Action::Up, true);
    assert_eq!((world.ship.vx, world.ship.vy), (-SHIP_SPEED, -SHIP_SPEED));
    steer(&mut world, Action::Left, false);
    assert_eq!((world.ship.vx, world.ship.vy), (0.0, -SHIP_SPEED));
}

#[test]
fn fourth_rocket_is_rejected() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    assert!(fire_rocket(&mut world));
    assert!(fire_rocket(&mut world));
    assert!(fire_rocket(&mut world));
    assert!(!fire_rocket(&mut world));
    assert_eq!(world.rockets.len(), 3);

    // Once one leaves the screen a slot frees up.
    world.rockets[0].y = -100.0;
    tick(&mut world, 1, &mut rng);
    assert_eq!(world.rockets.len(), 2);
    assert!(fire_rocket(&mut world));
}

#[test]
fn torpedoes_are_unlimited() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    for _ in 0..10 {
        assert!(fire_torpedo(&mut world));
    }
    assert_eq!(world.torpedoes.len(), 10);
    assert_eq!(world.torpedoes[0].x, world.ship.x);
}

#[test]
fn shield_needs_a_charge() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    world.shields = 0;
    assert!(!activate_shield(&mut world, 5));
    world.shields = 1;
    assert!(activate_shield(&mut world, 5));
    assert!(world.ship.shield_active);
    assert_eq!(world.ship.shield_activated_at, 5);
    // Already up: a second press changes nothing.
    assert!(!activate_shield(&mut world, 9));
    assert_eq!(world.ship.shield_activated_at, 5);
}

#[test]
fn downed_ship_cannot_act() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    world.has_been_hit = true;
    assert!(!fire_torpedo(&mut world));
    assert!(!fire_rocket(&mut world));
    assert!(!activate_shield(&mut world, 1));
    steer(&mut world, Action::Right, true);
    assert_eq!(world.ship.vx, 0.0);
}

// ── tick: asteroids ───────────────────────────────────────────────────────────

#[test]
fn unshielded_asteroid_contact_costs_a_life() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    let (x, y) = (world.ship.x, world.ship.y);
    place_asteroid(&mut world, 0, x, y);

    let report = tick(&mut world, 1, &mut rng);

    assert!(world.has_been_hit);
    assert_eq!(world.lives, 4);
    assert!(world.asteroids[0].y < 0.0, "asteroid respawned off-screen");
    assert_eq!(report.count(&GameEvent::ShipHit { lives_left: 4 }), 1);
    assert!(!report.game_over);
}

#[test]
fn shielded_asteroid_contact_is_absorbed() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    activate_shield(&mut world, 0);
    let (x, y) = (world.ship.x, world.ship.y);
    place_asteroid(&mut world, 0, x, y);

    let report = tick(&mut world, 1, &mut rng);

    assert!(!world.has_been_hit);
    assert_eq!(world.lives, 5);
    assert_eq!(world.shields, 10);
    assert!(world.asteroids[0].y < 0.0);
    assert_eq!(world.effect_count(EffectKind::AsteroidExplosion), 1);
    assert_eq!(report.count(&GameEvent::ShieldAbsorbed), 1);
    assert_eq!(world.score, 0);
}

#[test]
fn shield_catches_asteroid_beyond_hull_radius() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    let (x, y) = (world.ship.x, world.ship.y);
    let reach = world.ship.radius + world.asteroids[0].radius;
    place_asteroid(&mut world, 0, x + reach + 5.0, y);

    tick(&mut world, 1, &mut rng);
    assert!(!world.has_been_hit, "out of hull reach");

    activate_shield(&mut world, 1);
    let (x, y) = (world.ship.x, world.ship.y);
    place_asteroid(&mut world, 0, x + reach + 5.0, y);
    tick(&mut world, 2, &mut rng);
    assert_eq!(world.effect_count(EffectKind::AsteroidExplosion), 1);
}

#[test]
fn torpedo_chips_asteroid_then_destroys_it() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    place_asteroid(&mut world, 0, 100.0, 200.0);
    world.asteroids[0].hit_points = 2;
    let points = world.asteroids[0].score_value;

    world.torpedoes.push(Bullet::torpedo(&world.sprites, 100.0, 210.0));
    let first = tick(&mut world, 1, &mut rng);
    assert_eq!(world.asteroids[0].hit_points, 1);
    assert!(world.torpedoes.is_empty(), "non-lethal hits still consume the torpedo");
    assert_eq!(first.count(&GameEvent::EffectSpawned(EffectKind::Hit)), 1);
    assert_eq!(world.score, 0);

    world.torpedoes.push(Bullet::torpedo(&world.sprites, 100.0, 210.0));
    let second = tick(&mut world, 2, &mut rng);
    assert_eq!(second.count(&GameEvent::EffectSpawned(EffectKind::AsteroidExplosion)), 1);
    assert_eq!(world.score, u64::from(points));
    assert!(world.asteroids[0].y < 0.0);
}

#[test]
fn rocket_destroys_asteroid_outright() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    place_asteroid(&mut world, 3, 100.0, 200.0);
    world.asteroids[3].hit_points = 4;
    let points = world.asteroids[3].score_value;
    world.rockets.push(Bullet::rocket(&world.sprites, 100.0, 225.0));

    let report = tick(&mut world, 1, &mut rng);

    assert!(world.rockets.is_empty());
    assert_eq!(report.count(&GameEvent::EffectSpawned(EffectKind::RocketExplosion)), 1);
    assert_eq!(report.points(), u64::from(points));
    assert_eq!(world.score, u64::from(points));
}

#[test]
fn asteroid_explosion_is_centred_on_the_asteroid() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    place_asteroid(&mut world, 0, 100.0, 200.0);
    world.asteroids[0].hit_points = 1;
    let scale = world.asteroids[0].scale;
    world.torpedoes.push(Bullet::torpedo(&world.sprites, 100.0, 210.0));

    tick(&mut world, 1, &mut rng);

    let blast = &world.effects[0];
    let frame = world.sprites.asteroid_explosion_frame;
    assert_abs_diff_eq!(blast.x + frame.width * scale * 0.5, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(blast.y + frame.height * scale * 0.5, 200.0, epsilon = 1e-9);
    assert_eq!(blast.scale, scale);
}

// ── tick: drones and bosses ───────────────────────────────────────────────────

#[test]
fn torpedo_kills_drone_in_one_hit() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    world.enemies[1].x = 60.0;
    world.enemies[1].y = 150.0;
    let points = world.enemies[1].score_value;
    world.torpedoes.push(Bullet::torpedo(&world.sprites, 60.0, 160.0));

    let report = tick(&mut world, 1, &mut rng);

    assert_eq!(report.count(&GameEvent::EffectSpawned(EffectKind::Explosion)), 1);
    assert_eq!(world.score, u64::from(points));
    assert!(world.enemies[1].y < 0.0, "drone respawned above the viewport");
    assert!(world.torpedoes.is_empty());
}

#[test]
fn boss_takes_five_torpedoes() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    place_boss(&mut world, &mut rng, 100.0, 200.0);
    let points = world.bosses[0].score_value;

    let mut reports = Vec::new();
    for now in 1..=5 {
        assert_eq!(world.bosses.len(), 1, "boss alive before hit {now}");
        world.torpedoes.push(Bullet::torpedo(&world.sprites, 100.0, 210.0));
        reports.push(tick(&mut world, now, &mut rng));
    }

    assert!(world.bosses.is_empty());
    assert_eq!(spawned(&reports, EffectKind::EnemyBossHit), 4);
    assert_eq!(spawned(&reports, EffectKind::EnemyBossExplosion), 1);
    assert_eq!(world.score, u64::from(points));
    let awards: usize = reports.iter().filter(|r| r.points() > 0).count();
    assert_eq!(awards, 1);
}

#[test]
fn rocket_kills_boss_outright() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    place_boss(&mut world, &mut rng, 100.0, 200.0);
    world.rockets.push(Bullet::rocket(&world.sprites, 100.0, 225.0));

    let report = tick(&mut world, 1, &mut rng);

    assert!(world.bosses.is_empty());
    assert_eq!(report.count(&GameEvent::EffectSpawned(EffectKind::EnemyBossExplosion)), 1);
}

#[test]
fn boss_leaves_when_it_exits_the_viewport() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    place_boss(&mut world, &mut rng, 100.0, 450.0 + 60.0);
    world.bosses[0].vy = 1.0;

    let report = tick(&mut world, 1, &mut rng);

    assert!(world.bosses.is_empty());
    assert!(report.events.iter().all(|e| !matches!(e, GameEvent::EffectSpawned(_))));
}

#[test]
fn lined_up_drone_opens_fire() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    let ship_x = world.ship.x;
    let drone = &mut world.enemies[0];
    drone.x = ship_x;
    drone.y = 100.0;
    drone.vx = 0.0;
    drone.vy = 1.0;
    drone.last_shot_y = 0.0;

    let report = tick(&mut world, 1, &mut rng);

    assert_eq!(report.count(&GameEvent::EnemyFired(ShotKind::EnemyTorpedo)), 1);
    assert_eq!(world.enemy_torpedoes.len(), 1);
}

// ── tick: the one-hit-per-tick gate ───────────────────────────────────────────

#[test]
fn at_most_one_life_lost_per_tick() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    let (x, y) = (world.ship.x, world.ship.y);
    for slot in 0..4 {
        place_asteroid(&mut world, slot, x, y);
    }
    world.enemies[0].x = x;
    world.enemies[0].y = y;
    place_boss(&mut world, &mut rng, x, y);
    let shot = enemy_shot_on_ship(&world);
    world.enemy_torpedoes.push(shot);

    let report = tick(&mut world, 1, &mut rng);

    assert_eq!(world.lives, 4);
    assert_eq!(
        report.events.iter().filter(|e| matches!(e, GameEvent::ShipHit { .. })).count(),
        1
    );
}

#[test]
fn only_first_enemy_shot_registers() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    let shot = enemy_shot_on_ship(&world);
    world.enemy_torpedoes.push(shot.clone());
    world.enemy_torpedoes.push(shot);

    tick(&mut world, 1, &mut rng);

    assert_eq!(world.lives, 4);
    assert!(world.has_been_hit);
    // The second shot found the ship already down and keeps flying.
    assert_eq!(world.enemy_torpedoes.len(), 1);
}

#[test]
fn shielded_ship_absorbs_enemy_shots() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    activate_shield(&mut world, 0);
    let shot = enemy_shot_on_ship(&world);
    world.enemy_torpedoes.push(shot.clone());
    world.enemy_torpedoes.push(shot);

    let report = tick(&mut world, 1, &mut rng);

    assert_eq!(world.lives, 5);
    assert!(world.enemy_torpedoes.is_empty());
    assert_eq!(report.count(&GameEvent::ShieldAbsorbed), 2);
}

#[test]
fn last_life_ends_the_game() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    world.lives = 1;
    let (x, y) = (world.ship.x, world.ship.y);
    place_asteroid(&mut world, 0, x, y);

    let report = tick(&mut world, 1, &mut rng);

    assert!(report.game_over);
    assert_eq!(world.lives, 0);
}

// ── tick: ship explosion and respawn ──────────────────────────────────────────

#[test]
fn ship_respawns_when_explosion_finishes() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    world.ship.x = 40.0;
    world.ship.vx = 0.0;
    let (x, y) = (world.ship.x, world.ship.y);
    place_asteroid(&mut world, 0, x, y);

    // 8 x 6 sheet: the hit tick shows the first cell, 47 more finish it.
    tick(&mut world, 1, &mut rng);
    for now in 2..=47 {
        tick(&mut world, now, &mut rng);
        assert!(world.has_been_hit, "still exploding at tick {now}");
    }
    let report = tick(&mut world, 48, &mut rng);

    assert!(!world.has_been_hit);
    assert_eq!(report.count(&GameEvent::ShipRespawned), 1);
    assert_eq!((world.ship.x, world.ship.y), (175.0, 450.0 - 48.0));
    assert_eq!((world.ship.vx, world.ship.vy), (0.0, 0.0));
}

// ── tick: crystals and the shield timer ───────────────────────────────────────

fn crystal_on_ship(world: &mut World, rng: &mut StdRng) {
    world.spawn_crystal(rng);
    let (x, y) = (world.ship.x, world.ship.y);
    let crystal = world.crystals.last_mut().expect("just spawned");
    crystal.x = x - crystal.img_center_x;
    crystal.y = y - crystal.img_center_y;
    crystal.vx = 0.0;
    crystal.vy = 0.0;
}

#[test]
fn crystal_adds_a_shield_charge() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    world.shields = 3;
    crystal_on_ship(&mut world, &mut rng);

    let report = tick(&mut world, 1, &mut rng);

    assert_eq!(world.shields, 4);
    assert!(world.crystals.is_empty());
    assert_eq!(report.count(&GameEvent::EffectSpawned(EffectKind::CrystalExplosion)), 1);
}

#[test]
fn shield_charges_never_exceed_cap() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    crystal_on_ship(&mut world, &mut rng);
    crystal_on_ship(&mut world, &mut rng);
    crystal_on_ship(&mut world, &mut rng);

    tick(&mut world, 1, &mut rng);

    assert_eq!(world.shields, world.shields_max);
    assert!(world.crystals.is_empty());
}

#[test]
fn crystal_leaving_the_screen_spawns_nothing() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    world.spawn_crystal(&mut rng);
    world.crystals[0].x = 100.0;
    world.crystals[0].vx = 0.0;
    world.crystals[0].y = 450.0 + world.crystals[0].height;

    let report = tick(&mut world, 1, &mut rng);

    assert!(world.crystals.is_empty());
    assert!(report.events.is_empty());
}

#[test]
fn shield_consumes_a_charge_on_expiry() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    activate_shield(&mut world, 0);
    let duration = world.shield_duration_ns;

    tick(&mut world, duration, &mut rng);
    assert!(world.ship.shield_active);
    assert_eq!(world.shields, 10);

    let report = tick(&mut world, duration + 1, &mut rng);
    assert!(!world.ship.shield_active);
    assert_eq!(world.shields, 9);
    assert_eq!(report.count(&GameEvent::ShieldExpired), 1);
}

// ── tick: decoration and effects ──────────────────────────────────────────────

#[test]
fn background_scrolls_and_wraps() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    tick(&mut world, 1, &mut rng);
    assert_abs_diff_eq!(world.background_y, BACKGROUND_TOP - BACKGROUND_SCROLL);

    world.background_y = BACKGROUND_SCROLL;
    tick(&mut world, 2, &mut rng);
    assert_eq!(world.background_y, BACKGROUND_TOP);
}

#[test]
fn hit_effect_removed_after_ten_ticks() {
    let mut rng = seeded_rng();
    let mut world = make_world(&mut rng);
    world.effects.push(Effect::new(EffectKind::Hit, 50.0, 50.0, 0.0, 0.0, 1.0));
    for now in 1..=9 {
        tick(&mut world, now, &mut rng);
        assert_eq!(world.effects.len(), 1, "still playing after {now} ticks");
    }
    tick(&mut world, 10, &mut rng);
    assert!(world.effects.is_empty());
}

#[test]
fn counters_stay_in_range_over_a_long_run() {
    let mut rng = seeded_rng();
    let mut world = World::new(&GameConfig::default(), SpriteSet::standard(), &mut rng);
    for now in 1..=3_000u64 {
        if now % 40 == 0 {
            fire_torpedo(&mut world);
        }
        if now % 200 == 0 {
            world.spawn_boss(&mut rng);
            world.spawn_crystal(&mut rng);
            activate_shield(&mut world, now);
        }
        let before = world.lives;
        tick(&mut world, now, &mut rng);
        assert!(world.lives <= world.lives_max);
        assert!(world.shields <= world.shields_max);
        assert!(before - world.lives <= 1);
        if world.lives == 0 {
            break;
        }
    }
    assert!(world.tick > 0);
}
