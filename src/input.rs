//! Host-side key state shared by all engines
//!
//! The host maps raw key events onto `Control`s and keeps a `Controls`
//! snapshot of what is currently held. Each engine reads the snapshot
//! through its own input struct.

use crate::geometry::Direction;

/// Logical keys understood by the engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    /// Pong left paddle up
    W,
    /// Pong left paddle down
    S,
    /// Shoot / hard drop
    Fire,
}

impl Control {
    pub const ALL: [Control; 7] = [
        Control::Up,
        Control::Down,
        Control::Left,
        Control::Right,
        Control::W,
        Control::S,
        Control::Fire,
    ];

    pub fn direction(self) -> Option<Direction> {
        match self {
            Control::Up => Some(Direction::Up),
            Control::Down => Some(Direction::Down),
            Control::Left => Some(Direction::Left),
            Control::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Snapshot of held controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub w: bool,
    pub s: bool,
    pub fire: bool,
}

impl Controls {
    pub fn set(&mut self, control: Control, held: bool) {
        match control {
            Control::Up => self.up = held,
            Control::Down => self.down = held,
            Control::Left => self.left = held,
            Control::Right => self.right = held,
            Control::W => self.w = held,
            Control::S => self.s = held,
            Control::Fire => self.fire = held,
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        match control {
            Control::Up => self.up,
            Control::Down => self.down,
            Control::Left => self.left,
            Control::Right => self.right,
            Control::W => self.w,
            Control::S => self.s,
            Control::Fire => self.fire,
        }
    }

    pub fn clear(&mut self) {
        *self = Controls::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut c = Controls::default();
        for control in Control::ALL {
            assert!(!c.is_held(control));
            c.set(control, true);
            assert!(c.is_held(control));
        }
        c.clear();
        assert_eq!(c, Controls::default());
    }

    #[test]
    fn test_arrow_directions() {
        assert_eq!(Control::Left.direction(), Some(Direction::Left));
        assert_eq!(Control::W.direction(), None);
        assert_eq!(Control::Fire.direction(), None);
    }
}
