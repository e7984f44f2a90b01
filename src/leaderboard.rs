//! In-memory hall of fame: the three best runs.

pub const LEADERBOARD_SIZE: usize = 3;
pub const NAME_LENGTH: usize = 2;
const PLACEHOLDER: char = '_';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerScore {
    pub id: u64,
    pub name: String,
    pub score: u64,
}

/// Ordered by descending score; equal scores keep insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<PlayerScore>,
    next_id: u64,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Leaderboard::prefilled()
    }
}

impl Leaderboard {
    pub fn empty() -> Self {
        Leaderboard { entries: Vec::with_capacity(LEADERBOARD_SIZE + 1), next_id: 0 }
    }

    /// Three anonymous zero scores, so there is always a third place to beat.
    pub fn prefilled() -> Self {
        let mut board = Leaderboard::empty();
        for _ in 0..LEADERBOARD_SIZE {
            board.insert("--", 0);
        }
        board
    }

    pub fn entries(&self) -> &[PlayerScore] {
        &self.entries
    }

    /// Strictly better than the current third place. While the board is not
    /// full any score gets in.
    pub fn qualifies(&self, score: u64) -> bool {
        match self.entries.get(LEADERBOARD_SIZE - 1) {
            Some(third) => score > third.score,
            None => true,
        }
    }

    /// Add a record and drop whatever falls below third place. Returns the
    /// new record's id, or `None` when it did not make the cut.
    pub fn insert(&mut self, name: &str, score: u64) -> Option<u64> {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(PlayerScore { id, name: name.to_string(), score });
        // stable: ties keep insertion order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_SIZE);
        self.entries.iter().any(|e| e.id == id).then_some(id)
    }

    pub fn set_name(&mut self, id: u64, name: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.name = name.to_string();
                true
            }
            None => false,
        }
    }
}

/// Two-character initials typed one key at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameEntry {
    pub record_id: u64,
    buffer: String,
}

impl NameEntry {
    pub fn new(record_id: u64) -> Self {
        NameEntry {
            record_id,
            buffer: PLACEHOLDER.to_string().repeat(NAME_LENGTH),
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn is_complete(&self) -> bool {
        !self.buffer.contains(PLACEHOLDER)
    }

    /// Fill the first placeholder with `c` upper-cased. Returns `true` once
    /// the name is complete. Control characters, underscores and letters
    /// whose upper case spans several characters (`ß` → `SS`) are ignored.
    pub fn type_char(&mut self, c: char) -> bool {
        if c.is_control() || c.is_whitespace() || c == PLACEHOLDER {
            return self.is_complete();
        }
        let mut upper = c.to_uppercase();
        let (Some(letter), None) = (upper.next(), upper.next()) else {
            return self.is_complete();
        };
        if let Some(slot) = self.buffer.find(PLACEHOLDER) {
            let mut encoded = [0u8; 4];
            self.buffer
                .replace_range(slot..slot + PLACEHOLDER.len_utf8(), letter.encode_utf8(&mut encoded));
        }
        self.is_complete()
    }
}
