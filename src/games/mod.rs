pub mod breakout;
pub mod pacman;
pub mod pong;
pub mod snake;
pub mod space_invaders;
pub mod tetris;

use crate::input::{Control, Controls};
use crate::scene::Scene;

/// Pong player side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
    /// Two-player result
    Winner(Side),
}

impl Outcome {
    pub fn is_win(&self) -> bool {
        !matches!(self, Outcome::Lost)
    }
}

/// Something the host should react to, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScoreAwarded { points: u32 },
    LifeLost,
    GameOver { outcome: Outcome },
}

pub trait Engine {
    type Input: for<'a> From<&'a Controls>;

    /// Advance exactly one logical step.
    fn tick(&mut self, input: &Self::Input) -> Vec<GameEvent>;

    /// Discrete key press, applied immediately between ticks.
    fn press(&mut self, _control: Control) -> Vec<GameEvent> {
        Vec::new()
    }

    fn scene(&self) -> Scene;
    fn is_over(&self) -> bool;
}

/// Sum of all `ScoreAwarded` points in `events`.
pub fn points(events: &[GameEvent]) -> u32 {
    events
        .iter()
        .map(|e| match e {
            GameEvent::ScoreAwarded { points } => *points,
            _ => 0,
        })
        .sum()
}

/// The first `GameOver` outcome in `events`, if any.
pub fn outcome(events: &[GameEvent]) -> Option<Outcome> {
    events.iter().find_map(|e| match e {
        GameEvent::GameOver { outcome } => Some(*outcome),
        _ => None,
    })
}
