//! Menu / running / game-over state machine and the per-callback driver.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::{Clock, FixedStep};
use crate::compute::{self, TickReport};
use crate::config::GameConfig;
use crate::director::Director;
use crate::input::{Action, InputEvent};
use crate::leaderboard::{Leaderboard, NameEntry};
use crate::snapshot::Snapshot;
use crate::sprites::SpriteSet;
use crate::world::World;

/// Where the game is. Timestamps are monotonic nanoseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AtMenu,
    Running,
    Paused { since: u64 },
    /// Last life lost; the game-over screen is revealed after a delay.
    GameOverPending { since: u64 },
    GameOverShown { since: u64 },
}

impl Phase {
    pub fn in_game_over(self) -> bool {
        matches!(self, Phase::GameOverPending { .. } | Phase::GameOverShown { .. })
    }
}

pub struct Game {
    world: World,
    rng: StdRng,
    phase: Phase,
    leaderboard: Leaderboard,
    name_entry: Option<NameEntry>,
    step: FixedStep,
    director: Director,
    game_over_delay: u64,
    game_over_display: u64,
}

impl Game {
    /// Seeds from `config.seed`, or from entropy when unset.
    pub fn new(config: &GameConfig, sprites: SpriteSet, now: u64) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Game::with_rng(config, sprites, rng, now)
    }

    pub fn with_rng(config: &GameConfig, sprites: SpriteSet, mut rng: StdRng, now: u64) -> Self {
        let world = World::new(config, sprites, &mut rng);
        Game {
            world,
            rng,
            phase: Phase::AtMenu,
            leaderboard: Leaderboard::prefilled(),
            name_entry: None,
            step: FixedStep::new(config.tick_interval_ns),
            director: Director::new(config.boss_interval_ns(), config.crystal_interval_ns(), now),
            game_over_delay: config.game_over_delay_ns(),
            game_over_display: config.game_over_display_ns(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn name_entry(&self) -> Option<&NameEntry> {
        self.name_entry.as_ref()
    }

    /// Whether typed characters are currently wanted.
    pub fn accepts_text(&self) -> bool {
        self.name_entry.is_some()
    }

    pub fn handle_input(&mut self, event: InputEvent, now: u64) {
        match event {
            InputEvent::Typed(c) => self.type_name(c),
            InputEvent::Pressed(Action::Start) => self.start(),
            InputEvent::Pressed(Action::Pause) => self.toggle_pause(now),
            InputEvent::Pressed(action) | InputEvent::Released(action)
                if action.is_direction() && self.phase == Phase::Running =>
            {
                let pressed = matches!(event, InputEvent::Pressed(_));
                compute::steer(&mut self.world, action, pressed);
            }
            InputEvent::Pressed(action) if self.phase == Phase::Running => match action {
                Action::FireTorpedo => {
                    compute::fire_torpedo(&mut self.world);
                }
                Action::FireRocket => {
                    compute::fire_rocket(&mut self.world);
                }
                Action::Shield => {
                    compute::activate_shield(&mut self.world, now);
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn start(&mut self) {
        if self.phase != Phase::AtMenu || self.name_entry.is_some() {
            return;
        }
        self.phase = Phase::Running;
        log::info!(
            "run started with {} lives and {} shields",
            self.world.lives,
            self.world.shields
        );
    }

    fn toggle_pause(&mut self, now: u64) {
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused { since: now };
                log::debug!("paused");
            }
            Phase::Paused { since } => {
                let paused_for = now.saturating_sub(since);
                self.step.shift(paused_for);
                self.director.shift(paused_for);
                self.world.shift_timestamps(paused_for);
                self.phase = Phase::Running;
                log::debug!("resumed after {} ms", paused_for / 1_000_000);
            }
            _ => {}
        }
    }

    fn type_name(&mut self, c: char) {
        let Some(entry) = self.name_entry.as_mut() else {
            return;
        };
        let done = entry.type_char(c);
        self.leaderboard.set_name(entry.record_id, entry.text());
        if done {
            log::info!("leaderboard entry named {}", entry.text());
            self.name_entry = None;
        }
    }

    /// One driver callback. Runs the simulation step when the fixed cadence
    /// allows it and returns its report; also advances the game-over timers.
    pub fn frame(&mut self, now: u64) -> Option<TickReport> {
        match self.phase {
            Phase::Running => self.run_callback(now),
            Phase::GameOverPending { since } if now >= since + self.game_over_delay => {
                self.reveal_game_over(now);
                None
            }
            Phase::GameOverShown { since } if now >= since + self.game_over_display => {
                self.back_to_menu();
                None
            }
            _ => None,
        }
    }

    pub fn pump(&mut self, clock: &impl Clock) -> Option<TickReport> {
        self.frame(clock.now_nanos())
    }

    fn run_callback(&mut self, now: u64) -> Option<TickReport> {
        let report = if self.step.accept(now) {
            let report = compute::tick(&mut self.world, now, &mut self.rng);
            if report.game_over {
                self.phase = Phase::GameOverPending { since: now };
                log::info!("game over with score {}", self.world.score);
            }
            Some(report)
        } else {
            None
        };

        if self.phase == Phase::Running {
            let cues = self.director.poll(now);
            if cues.boss {
                self.world.spawn_boss(&mut self.rng);
            }
            if cues.crystal {
                self.world.spawn_crystal(&mut self.rng);
            }
        }
        report
    }

    fn reveal_game_over(&mut self, now: u64) {
        self.phase = Phase::GameOverShown { since: now };
        let score = self.world.score;
        if !self.leaderboard.qualifies(score) {
            return;
        }
        if let Some(id) = self.leaderboard.insert("__", score) {
            log::info!("score {} enters the leaderboard", score);
            self.name_entry = Some(NameEntry::new(id));
        }
    }

    fn back_to_menu(&mut self) {
        self.world.reset(&mut self.rng);
        self.phase = Phase::AtMenu;
    }

    pub fn snapshot(&self, now: u64) -> Snapshot {
        Snapshot::capture(
            &self.world,
            self.phase,
            &self.leaderboard,
            self.name_entry.as_ref(),
            now,
        )
    }
}
