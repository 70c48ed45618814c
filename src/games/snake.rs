use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::games::{Engine, GameEvent, Outcome};
use crate::geometry::{Cell, Direction, Rect};
use crate::input::{Control, Controls};
use crate::scene::{Rgb, Scene};
use crate::GameRng;

const FOOD_POINTS: u32 = 10;
const START_SEGMENTS: [Cell; 3] = [Cell::new(3, 1), Cell::new(2, 1), Cell::new(1, 1)];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    pub cols: i32,
    pub rows: i32,
    pub tick_ms: u64,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            cols: 20,
            rows: 20,
            tick_ms: 150,
        }
    }
}

impl SnakeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols < 5 || self.rows < 2 {
            return Err(ConfigError::invalid("snake", "grid must be at least 5x2"));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::invalid("snake", "tick_ms must be positive"));
        }
        Ok(())
    }
}

/// Turns arrive through `press`, so a tick needs nothing from held keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeInput;

impl From<&Controls> for SnakeInput {
    fn from(_: &Controls) -> Self {
        SnakeInput
    }
}

pub struct Snake {
    /// Head first
    segments: VecDeque<Cell>,
    food: Cell,
    direction: Direction,
    next_direction: Direction,
    cols: i32,
    rows: i32,
    game_over: bool,
    rng: GameRng,
}

impl Snake {
    pub fn new(config: &SnakeConfig, rng: GameRng) -> Self {
        let mut s = Self {
            segments: START_SEGMENTS.into_iter().collect(),
            food: Cell::new(0, 0),
            direction: Direction::Right,
            next_direction: Direction::Right,
            cols: config.cols,
            rows: config.rows,
            game_over: false,
            rng,
        };
        // A fresh board always has free cells
        if let Some(food) = s.random_free_cell() {
            s.food = food;
        }
        s
    }

    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Queue a turn for the next tick. Reversing onto the body is refused.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() {
            return false;
        }
        self.next_direction = dir;
        true
    }

    fn random_free_cell(&mut self) -> Option<Cell> {
        let free: Vec<Cell> = (0..self.rows)
            .flat_map(|y| (0..self.cols).map(move |x| Cell::new(x, y)))
            .filter(|c| !self.segments.contains(c))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.gen_range(0..free.len())])
    }

    fn collides(&self, cell: Cell) -> bool {
        !cell.in_bounds(self.cols, self.rows) || self.segments.contains(&cell)
    }
}

impl Engine for Snake {
    type Input = SnakeInput;

    fn tick(&mut self, _input: &SnakeInput) -> Vec<GameEvent> {
        if self.game_over {
            return Vec::new();
        }

        self.direction = self.next_direction;
        let head = self.head().step(self.direction);

        if self.collides(head) {
            log::debug!("snake crashed at {:?} with length {}", head, self.segments.len());
            self.game_over = true;
            return vec![GameEvent::GameOver { outcome: Outcome::Lost }];
        }

        self.segments.push_front(head);

        if head != self.food {
            self.segments.pop_back();
            return Vec::new();
        }

        let mut events = vec![GameEvent::ScoreAwarded { points: FOOD_POINTS }];
        match self.random_free_cell() {
            Some(food) => self.food = food,
            None => {
                // Board is full
                self.game_over = true;
                events.push(GameEvent::GameOver { outcome: Outcome::Won });
            }
        }
        events
    }

    fn press(&mut self, control: Control) -> Vec<GameEvent> {
        if let Some(dir) = control.direction() {
            self.steer(dir);
        }
        Vec::new()
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new(self.cols as f32, self.rows as f32);
        let cell = |c: Cell| Rect::square(Vec2::new(c.x as f32, c.y as f32), 1.0);
        for (i, seg) in self.segments.iter().enumerate() {
            let color = if i == 0 { Rgb(120, 255, 120) } else { Rgb::GREEN };
            scene.rect(cell(*seg), color);
        }
        scene.rect(cell(self.food), Rgb::RED);
        scene
    }

    fn is_over(&self) -> bool {
        self.game_over
    }
}
