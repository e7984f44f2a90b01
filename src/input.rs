//! Abstract player input, independent of any keyboard or window system.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    FireTorpedo,
    FireRocket,
    Shield,
    Start,
    Pause,
}

impl Action {
    pub fn is_direction(self) -> bool {
        matches!(self, Action::Up | Action::Down | Action::Left | Action::Right)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Action),
    Released(Action),
    /// A character for name entry.
    Typed(char),
}
