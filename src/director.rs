//! Wall-clock spawn triggers for bosses and shield crystals.
//!
//! Polled on every driver callback, whether or not a simulation step was
//! accepted on that callback.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectorCues {
    pub boss: bool,
    pub crystal: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Director {
    pub boss_interval: u64,
    pub crystal_interval: u64,
    pub last_boss: u64,
    pub last_crystal: u64,
}

impl Director {
    /// Both timers start counting from `now`.
    pub fn new(boss_interval: u64, crystal_interval: u64, now: u64) -> Self {
        Director {
            boss_interval,
            crystal_interval,
            last_boss: now,
            last_crystal: now,
        }
    }

    /// Which spawns are due at `now`. A fired trigger restarts from `now`.
    pub fn poll(&mut self, now: u64) -> DirectorCues {
        let mut cues = DirectorCues::default();
        if now > self.last_boss + self.boss_interval {
            self.last_boss = now;
            cues.boss = true;
        }
        if now > self.last_crystal + self.crystal_interval {
            self.last_crystal = now;
            cues.crystal = true;
        }
        cues
    }

    /// Push both timers forward, e.g. by the length of a pause.
    pub fn shift(&mut self, delta: u64) {
        self.last_boss += delta;
        self.last_crystal += delta;
    }
}
