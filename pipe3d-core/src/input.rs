//! Keyboard snapshots and edge detection
/// Logical keys the demo reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
    Exit,
}

impl Key {
    pub const COUNT: usize = 5;
    pub const ALL: [Key; Key::COUNT] = [
        Key::Forward,
        Key::Backward,
        Key::Left,
        Key::Right,
        Key::Exit,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Pressed/released state of every [`Key`] at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pressed: [bool; Key::COUNT],
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with exactly `keys` held
    pub fn with_pressed(keys: &[Key]) -> Self {
        let mut state = Self::new();
        for &key in keys {
            state.set(key, true);
        }
        state
    }

    pub fn set(&mut self, key: Key, pressed: bool) {
        self.pressed[key.index()] = pressed;
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed[key.index()]
    }
}

/// The current keyboard snapshot paired with the previous frame's
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub previous: KeyboardState,
    pub current: KeyboardState,
}

impl InputFrame {
    /// Shift `current` into `previous` and record a new snapshot
    pub fn advance(&mut self, next: KeyboardState) {
        self.previous = self.current;
        self.current = next;
    }

    pub fn held(&self, key: Key) -> bool {
        self.current.is_pressed(key)
    }

    /// Released last frame, pressed this frame
    pub fn just_pressed(&self, key: Key) -> bool {
        !self.previous.is_pressed(key) && self.current.is_pressed(key)
    }
}
