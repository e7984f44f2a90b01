mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, ErrorKind, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::Rng;

use display::TerminalSurface;
use space_raid::clock::{Clock, MonotonicClock};
use space_raid::config::GameConfig;
use space_raid::game::Game;
use space_raid::input::{Action, InputEvent};
use space_raid::scene;
use space_raid::sprites::SpriteSet;

const FRAME: Duration = Duration::from_millis(16); // display refresh, ≈60 Hz
const CONFIG_PATH: &str = "space_raid.ron";

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// Without release events a direction key counts as held if its last
/// press/repeat event arrived within this many frames. The window outlasts
/// the keyboard's initial auto-repeat delay (up to ~600 ms).
const HOLD_WINDOW: u64 = 40;

/// Frame each held direction was last seen on.
struct HeldKeys {
    last_seen: HashMap<Action, u64>,
    /// Terminal reports real releases, so nothing ever goes stale.
    releases_reported: bool,
}

impl HeldKeys {
    fn new(releases_reported: bool) -> Self {
        HeldKeys { last_seen: HashMap::new(), releases_reported }
    }

    /// Returns `true` when the key was not already held.
    fn press(&mut self, action: Action, frame: u64) -> bool {
        self.last_seen.insert(action, frame).is_none()
    }

    fn release(&mut self, action: Action) -> bool {
        self.last_seen.remove(&action).is_some()
    }

    fn expire(&mut self, frame: u64) -> Vec<Action> {
        if self.releases_reported {
            return Vec::new();
        }
        let stale: Vec<Action> = self
            .last_seen
            .iter()
            .filter(|(_, last)| frame.saturating_sub(**last) > HOLD_WINDOW)
            .map(|(action, _)| *action)
            .collect();
        for action in &stale {
            self.last_seen.remove(action);
        }
        stale
    }
}

fn key_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Up => Some(Action::Up),
        KeyCode::Down => Some(Action::Down),
        KeyCode::Left => Some(Action::Left),
        KeyCode::Right => Some(Action::Right),
        KeyCode::Char(' ') => Some(Action::FireTorpedo),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::FireRocket),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::Shield),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::Start),
        KeyCode::Tab => Some(Action::Pause),
        _ => None,
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

fn load_config(path: &Path) -> GameConfig {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("no {} found, using defaults", path.display());
            return GameConfig::default();
        }
        Err(e) => {
            log::warn!("cannot read {}: {e}; using defaults", path.display());
            return GameConfig::default();
        }
    };
    match GameConfig::from_ron(&text) {
        Ok(config) => {
            log::info!("loaded {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("rejected {}: {e}; using defaults", path.display());
            GameConfig::default()
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Direction keys are tracked in `HeldKeys` so a press turns into `Pressed`
/// once and a release (or, on terminals without release events, silence for
/// `HOLD_WINDOW` frames) into `Released`. One-shot keys fire on every press.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    game: &mut Game,
    surface: &mut TerminalSurface,
    sprites: &SpriteSet,
    clock: &MonotonicClock,
    keyboard_enhanced: bool,
) -> std::io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut held = HeldKeys::new(keyboard_enhanced);
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let now = clock.now_nanos();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let (code, kind, modifiers) = match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => (code, kind, modifiers),
                Event::Resize(cols, rows) => {
                    surface.resize(cols, rows);
                    continue;
                }
                _ => continue,
            };

            let ctrl_c = code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL);
            if kind == KeyEventKind::Press && (ctrl_c || code == KeyCode::Esc) {
                return Ok(());
            }

            // Initials swallow every character key while being typed.
            if game.accepts_text() {
                if let (KeyCode::Char(c), KeyEventKind::Press) = (code, kind) {
                    game.handle_input(InputEvent::Typed(c), now);
                }
                continue;
            }
            if kind == KeyEventKind::Press && matches!(code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                return Ok(());
            }

            let Some(action) = key_action(code) else {
                continue;
            };
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat if action.is_direction() => {
                    if held.press(action, frame) {
                        game.handle_input(InputEvent::Pressed(action), now);
                    }
                }
                KeyEventKind::Press => game.handle_input(InputEvent::Pressed(action), now),
                KeyEventKind::Repeat => {}
                KeyEventKind::Release => {
                    if held.release(action) {
                        game.handle_input(InputEvent::Released(action), now);
                    }
                }
            }
        }

        for action in held.expire(frame) {
            game.handle_input(InputEvent::Released(action), now);
        }

        // ── Drive the simulation and draw ─────────────────────────────────────
        if let Some(report) = game.pump(clock) {
            if !report.events.is_empty() {
                log::trace!("tick {}: {:?}", game.world().tick, report.events);
            }
        }

        let snapshot = game.snapshot(clock.now_nanos());
        scene::render(&snapshot, sprites, surface, rng.gen::<f64>());
        surface.present(out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = load_config(Path::new(CONFIG_PATH));
    let sprites = SpriteSet::for_viewport(config.width, config.height);
    let clock = MonotonicClock::new();
    let mut game = Game::new(&config, sprites.clone(), clock.now_nanos());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();

    // Blocking event reads get their own thread so the loop never waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = terminal::size().and_then(|(cols, rows)| {
        let mut surface = TerminalSurface::new(cols, rows, sprites.screen);
        game_loop(&mut out, &rx, &mut game, &mut surface, &sprites, &clock, keyboard_enhanced)
    });

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    log::info!("final score {}", game.world().score);
    result?;
    Ok(())
}
