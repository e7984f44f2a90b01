use space_raid::clock::*;
use space_raid::config::{ConfigError, GameConfig};
use space_raid::director::Director;
use space_raid::game::{Game, Phase};
use space_raid::input::{Action, InputEvent};
use space_raid::leaderboard::*;
use space_raid::sprites::{Size, Sprite, SpriteSet};
use space_raid::world::{World, BACKGROUND_TOP};

use rand::rngs::StdRng;
use rand::SeedableRng;

const MS: u64 = 1_000_000;
const SECOND: u64 = 1_000 * MS;

fn make_game() -> Game {
    Game::with_rng(&GameConfig::default(), SpriteSet::standard(), StdRng::seed_from_u64(42), 0)
}

fn park_pools(world: &mut World) {
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
}

/// Last life, and an asteroid sitting on the ship.
fn doom_ship(world: &mut World) {
    park_pools(world);
    world.lives = 1;
    let (x, y) = (world.ship.x, world.ship.y);
    let asteroid = &mut world.asteroids[0];
    asteroid.x = x - asteroid.img_center_x;
    asteroid.y = y - asteroid.img_center_y;
}

fn press(game: &mut Game, action: Action, now: u64) {
    game.handle_input(InputEvent::Pressed(action), now);
}

/// Run a game into its game-over screen; returns when it was revealed.
fn play_to_game_over(game: &mut Game, score: u64) -> u64 {
    press(game, Action::Start, 1);
    doom_ship(game.world_mut());
    game.world_mut().score = score;
    let report = game.frame(10).expect("first callback runs a step");
    assert!(report.game_over);
    let reveal = 10 + SECOND;
    game.frame(reveal);
    reveal
}

// ── State machine ─────────────────────────────────────────────────────────────

#[test]
fn start_leaves_the_menu() {
    let mut game = make_game();
    assert_eq!(game.phase(), Phase::AtMenu);
    assert!(game.frame(SECOND).is_none(), "menu runs no steps");
    press(&mut game, Action::Start, 1);
    assert_eq!(game.phase(), Phase::Running);
}

#[test]
fn controls_ignored_outside_a_run() {
    let mut game = make_game();
    press(&mut game, Action::Left, 1);
    press(&mut game, Action::FireTorpedo, 1);
    press(&mut game, Action::Shield, 1);
    assert_eq!(game.world().ship.vx, 0.0);
    assert!(game.world().torpedoes.is_empty());
    assert!(!game.world().ship.shield_active);
}

#[test]
fn controls_reach_the_world_while_running() {
    let mut game = make_game();
    press(&mut game, Action::Start, 1);
    press(&mut game, Action::Right, 2);
    press(&mut game, Action::FireRocket, 2);
    assert_eq!(game.world().ship.vx, 5.0);
    assert_eq!(game.world().rockets.len(), 1);
    game.handle_input(InputEvent::Released(Action::Right), 3);
    assert_eq!(game.world().ship.vx, 0.0);
}

#[test]
fn steps_follow_the_fixed_cadence() {
    let mut game = make_game();
    press(&mut game, Action::Start, 1);
    assert!(game.frame(10).is_some());
    assert!(game.frame(10 + 16 * MS).is_none());
    assert!(game.frame(10 + 33_333_333).is_none());
    assert!(game.frame(10 + 33_333_334).is_some());
    assert_eq!(game.world().tick, 2);
}

#[test]
fn game_over_reveal_and_return_to_menu() {
    let mut game = make_game();
    press(&mut game, Action::Start, 1);
    doom_ship(game.world_mut());

    let report = game.frame(10).expect("step runs");
    assert!(report.game_over);
    assert_eq!(game.phase(), Phase::GameOverPending { since: 10 });

    game.frame(10 + SECOND - 1);
    assert!(matches!(game.phase(), Phase::GameOverPending { .. }));
    game.frame(10 + SECOND);
    assert_eq!(game.phase(), Phase::GameOverShown { since: 10 + SECOND });
    assert!(game.name_entry().is_none(), "a zero score does not beat the prefill");

    game.frame(10 + 6 * SECOND - 1);
    assert!(matches!(game.phase(), Phase::GameOverShown { .. }));
    game.frame(10 + 6 * SECOND);
    assert_eq!(game.phase(), Phase::AtMenu);

    let world = game.world();
    assert_eq!(world.lives, 5);
    assert_eq!(world.shields, 10);
    assert_eq!(world.score, 0);
    assert!(world.bosses.is_empty() && world.effects.is_empty());
}

#[test]
fn start_ignored_during_game_over() {
    let mut game = make_game();
    let reveal = play_to_game_over(&mut game, 0);
    press(&mut game, Action::Start, reveal + 1);
    assert!(matches!(game.phase(), Phase::GameOverShown { .. }));
}

#[test]
fn qualifying_score_opens_name_entry() {
    let mut game = make_game();
    let reveal = play_to_game_over(&mut game, 120);
    assert!(game.accepts_text());
    assert_eq!(game.leaderboard().entries()[0].score, 120);
    assert_eq!(game.snapshot(reveal).name_entry.as_deref(), Some("__"));

    game.handle_input(InputEvent::Typed('a'), reveal + 1);
    assert_eq!(game.name_entry().map(|e| e.text()), Some("A_"));
    game.handle_input(InputEvent::Typed('z'), reveal + 2);
    assert!(!game.accepts_text());
    assert_eq!(game.leaderboard().entries()[0].name, "AZ");

    // Further typing goes nowhere.
    game.handle_input(InputEvent::Typed('q'), reveal + 3);
    assert_eq!(game.leaderboard().entries()[0].name, "AZ");
}

#[test]
fn start_waits_for_the_name() {
    let mut game = make_game();
    let reveal = play_to_game_over(&mut game, 50);
    game.frame(reveal + 5 * SECOND);
    assert_eq!(game.phase(), Phase::AtMenu);
    assert!(game.accepts_text());

    press(&mut game, Action::Start, reveal + 5 * SECOND + 1);
    assert_eq!(game.phase(), Phase::AtMenu);

    game.handle_input(InputEvent::Typed('x'), reveal + 5 * SECOND + 2);
    game.handle_input(InputEvent::Typed('y'), reveal + 5 * SECOND + 3);
    press(&mut game, Action::Start, reveal + 5 * SECOND + 4);
    assert_eq!(game.phase(), Phase::Running);
}

// ── Director ──────────────────────────────────────────────────────────────────

#[test]
fn director_spawns_on_wall_clock() {
    let mut game = make_game();
    press(&mut game, Action::Start, 1);
    park_pools(game.world_mut());
    game.frame(20 * SECOND);
    assert!(game.world().bosses.is_empty());
    game.frame(20 * SECOND + 1);
    assert_eq!(game.world().bosses.len(), 1);
    assert!(game.world().crystals.is_empty());
    game.frame(25 * SECOND + 1);
    assert_eq!(game.world().crystals.len(), 1);
}

#[test]
fn director_runs_between_steps() {
    let mut director = Director::new(20 * SECOND, 25 * SECOND, 0);
    assert!(!director.poll(20 * SECOND).boss);
    let cues = director.poll(20 * SECOND + 1);
    assert!(cues.boss && !cues.crystal);
    assert_eq!(director.last_boss, 20 * SECOND + 1);
    assert!(!director.poll(40 * SECOND).boss);
    assert!(director.poll(25 * SECOND + 1).crystal);
}

// ── Pause ─────────────────────────────────────────────────────────────────────

#[test]
fn pause_freezes_the_run() {
    let mut game = make_game();
    press(&mut game, Action::Start, 1);
    park_pools(game.world_mut());
    game.frame(10);
    press(&mut game, Action::Shield, 20);
    press(&mut game, Action::Pause, 30);
    assert_eq!(game.phase(), Phase::Paused { since: 30 });

    assert!(game.frame(SECOND).is_none());
    press(&mut game, Action::FireTorpedo, SECOND);
    assert!(game.world().torpedoes.is_empty());

    // Ten paused seconds do not count against the shield.
    press(&mut game, Action::Pause, 30 + 10 * SECOND);
    assert_eq!(game.phase(), Phase::Running);
    game.frame(30 + 14 * SECOND);
    assert!(game.world().ship.shield_active);
    assert_eq!(game.world().ship.shield_activated_at, 20 + 10 * SECOND);
}

// ── Clocks and the step gate ──────────────────────────────────────────────────

#[test]
fn fixed_step_accepts_once_per_interval() {
    let mut step = FixedStep::new(100);
    assert!(step.accept(1));
    assert_eq!(step.next_due, 101);
    assert!(!step.accept(50));
    assert!(!step.accept(101));
    assert!(step.accept(102));
    step.shift(1_000);
    assert!(!step.accept(500));
}

#[test]
fn pump_reads_the_clock() {
    let clock = ManualClock::starting_at(0);
    let mut game = make_game();
    press(&mut game, Action::Start, 0);
    clock.set(5);
    assert!(game.pump(&clock).is_some());
    clock.advance(MS);
    assert!(game.pump(&clock).is_none());
    clock.advance(40 * MS);
    assert!(game.pump(&clock).is_some());
}

#[test]
fn monotonic_clock_never_goes_back() {
    let clock = MonotonicClock::new();
    let a = clock.now_nanos();
    let b = clock.now_nanos();
    assert!(b >= a);
}

// ── Leaderboard ───────────────────────────────────────────────────────────────

#[test]
fn leaderboard_starts_prefilled() {
    let board = Leaderboard::prefilled();
    let entries = board.entries();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.name == "--" && e.score == 0));
    assert!(!board.qualifies(0));
    assert!(board.qualifies(1));
}

#[test]
fn leaderboard_keeps_top_three_descending() {
    let mut board = Leaderboard::prefilled();
    for score in [40, 10, 70, 25, 90, 5] {
        if board.qualifies(score) {
            board.insert("AA", score);
        }
    }
    let scores: Vec<u64> = board.entries().iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![90, 70, 40]);
}

#[test]
fn leaderboard_rejects_a_tie_with_third() {
    let mut board = Leaderboard::empty();
    board.insert("A", 30);
    board.insert("B", 20);
    board.insert("C", 10);
    assert!(!board.qualifies(10));
    assert!(board.qualifies(11));
    // Inserted anyway, the newcomer loses the tie.
    assert_eq!(board.insert("D", 10), None);
    assert_eq!(board.entries()[2].name, "C");
}

#[test]
fn leaderboard_ties_keep_insertion_order() {
    let mut board = Leaderboard::empty();
    let first = board.insert("A", 50).expect("room on the board");
    let second = board.insert("B", 50).expect("room on the board");
    assert_eq!(board.entries()[0].id, first);
    assert_eq!(board.entries()[1].id, second);
    assert!(board.set_name(second, "ZZ"));
    assert_eq!(board.entries()[1].name, "ZZ");
    assert!(!board.set_name(999, "NO"));
}

#[test]
fn name_entry_fills_two_upper_case_slots() {
    let mut entry = NameEntry::new(7);
    assert_eq!(entry.text(), "__");
    assert!(!entry.type_char('\n'));
    assert!(!entry.type_char('k'));
    assert_eq!(entry.text(), "K_");
    assert!(entry.type_char('9'));
    assert_eq!(entry.text(), "K9");
    assert!(entry.type_char('x'));
    assert_eq!(entry.text(), "K9");
}

#[test]
fn name_entry_skips_letters_that_upper_case_to_several() {
    let mut entry = NameEntry::new(0);
    assert!(!entry.type_char('ß'));
    assert_eq!(entry.text(), "__");
    assert!(!entry.type_char('é'));
    assert!(entry.type_char('a'));
    assert_eq!(entry.text(), "ÉA");
    assert_eq!(entry.text().chars().count(), NAME_LENGTH);
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[test]
fn config_defaults_match_the_arcade_tuning() {
    let config = GameConfig::default();
    assert_eq!((config.width, config.height), (350.0, 450.0));
    assert_eq!((config.asteroid_count, config.enemy_count), (15, 5));
    assert_eq!((config.lives, config.shields, config.max_rockets), (5, 10, 3));
    assert_eq!(config.tick_interval_ns, 33_333_333);
    assert_eq!(config.boss_interval_ns(), 20 * SECOND);
    assert_eq!(config.crystal_interval_ns(), 25 * SECOND);
    assert!(config.validate().is_ok());
}

#[test]
fn config_partial_ron_overrides_named_fields() {
    let config = GameConfig::from_ron("(lives: 3, seed: Some(7))").expect("valid RON");
    assert_eq!(config.lives, 3);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.shields, 10);
}

#[test]
fn config_rejects_zero_sizes() {
    match GameConfig::from_ron("(width: 0.0)") {
        Err(ConfigError::NotPositive { field }) => assert_eq!(field, "width"),
        other => panic!("expected NotPositive, got {other:?}"),
    }
}

#[test]
fn config_rejects_a_zero_shield_cap() {
    match GameConfig::from_ron("(shields: 0)") {
        Err(ConfigError::NotPositive { field }) => assert_eq!(field, "shields"),
        other => panic!("expected NotPositive, got {other:?}"),
    }
}

#[test]
fn config_reports_parse_errors() {
    assert!(matches!(GameConfig::from_ron("(lives: \"many\")"), Err(ConfigError::Parse(_))));
}

#[test]
fn seeded_games_are_reproducible() {
    let config = GameConfig { seed: Some(9), ..GameConfig::default() };
    let mut a = Game::new(&config, SpriteSet::standard(), 0);
    let mut b = Game::new(&config, SpriteSet::standard(), 0);
    for game in [&mut a, &mut b] {
        press(game, Action::Start, 0);
        for i in 1..=60u64 {
            game.frame(i * 34 * MS);
        }
    }
    assert_eq!(a.snapshot(0), b.snapshot(0));
}

// ── Sprite sets ───────────────────────────────────────────────────────────────

#[test]
fn sprites_follow_a_larger_viewport() {
    let stock = SpriteSet::standard();
    let doubled = SpriteSet::for_viewport(700.0, 900.0);
    assert_eq!(doubled.screen, Size::new(700.0, 900.0));
    assert_eq!(doubled.ship, stock.ship.scaled(2.0));
    assert_eq!(doubled.asteroids[0], stock.asteroids[0].scaled(2.0));
    assert_eq!(doubled.hit_frame, stock.hit_frame.scaled(2.0));
    assert_eq!(doubled.scale_factor(), 2.0);
    assert_eq!(SpriteSet::for_viewport(350.0, 450.0), stock);

    let config = GameConfig { width: 700.0, height: 900.0, ..GameConfig::default() };
    let world = World::new(&config, doubled, &mut StdRng::seed_from_u64(3));
    assert_eq!(world.background_y, BACKGROUND_TOP * 2.0);
    assert_eq!(world.background_top(), BACKGROUND_TOP * 2.0);
}

#[test]
fn missing_variants_have_no_size() {
    let mut sprites = SpriteSet::standard();
    sprites.enemies.clear();
    assert!(!sprites.has_variants());
    assert_eq!(sprites.size(Sprite::Enemy(2)), Size::square(0.0));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "sprite set needs asteroid and enemy variants")]
fn world_refuses_a_sprite_set_without_variants() {
    let mut sprites = SpriteSet::standard();
    sprites.asteroids.clear();
    World::new(&GameConfig::default(), sprites, &mut StdRng::seed_from_u64(3));
}
