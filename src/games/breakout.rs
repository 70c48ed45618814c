use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::games::{Engine, GameEvent, Outcome};
use crate::geometry::Rect;
use crate::input::Controls;
use crate::scene::{Rgb, Scene};
use crate::GameRng;

const BRICK_POINTS: u32 = 10;

const BRICK_COLORS: [Rgb; 7] = [
    Rgb::hex(0xff0000), // Red
    Rgb::hex(0xff7f00), // Orange
    Rgb::hex(0xffff00), // Yellow
    Rgb::hex(0x00ff00), // Green
    Rgb::hex(0x0000ff), // Blue
    Rgb::hex(0x4b0082), // Indigo
    Rgb::hex(0x8f00ff), // Violet
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub ball_size: f32,
    pub ball_speed: f32,
    pub brick_rows: usize,
    pub brick_cols: usize,
    pub brick_height: f32,
    pub brick_padding: f32,
    /// Gap between the top wall and the first brick row
    pub brick_top: f32,
    pub lives: u32,
    pub tick_ms: u64,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            paddle_width: 100.0,
            paddle_height: 20.0,
            paddle_speed: 7.0,
            ball_size: 10.0,
            ball_speed: 5.0,
            brick_rows: 7,
            brick_cols: 8,
            brick_height: 20.0,
            brick_padding: 10.0,
            brick_top: 50.0,
            lives: 3,
            tick_ms: 16,
        }
    }
}

impl BreakoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.brick_rows == 0 || self.brick_cols == 0 {
            return Err(ConfigError::invalid("breakout", "need at least one brick"));
        }
        if self.paddle_width <= 0.0 || self.paddle_width >= self.width {
            return Err(ConfigError::invalid("breakout", "paddle must fit the court"));
        }
        if self.lives == 0 {
            return Err(ConfigError::invalid("breakout", "lives must be positive"));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::invalid("breakout", "tick_ms must be positive"));
        }
        Ok(())
    }

    fn paddle_y(&self) -> f32 {
        self.height - self.paddle_height - 10.0
    }

    fn serve_y(&self) -> f32 {
        self.paddle_y() - self.ball_size
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BreakoutInput {
    pub left: bool,
    pub right: bool,
}

impl From<&Controls> for BreakoutInput {
    fn from(c: &Controls) -> Self {
        Self {
            left: c.left,
            right: c.right,
        }
    }
}

/// Bricks stay in the wall after a hit; only `active` flips.
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub rect: Rect,
    pub color: Rgb,
    pub active: bool,
}

pub struct Breakout {
    config: BreakoutConfig,
    paddle_x: f32,
    ball_pos: Vec2,
    ball_vel: Vec2,
    bricks: Vec<Brick>,
    lives: u32,
    outcome: Option<Outcome>,
    rng: GameRng,
}

impl Breakout {
    pub fn new(config: &BreakoutConfig, rng: GameRng) -> Self {
        let mut b = Self {
            config: config.clone(),
            paddle_x: config.width / 2.0 - config.paddle_width / 2.0,
            ball_pos: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            bricks: Vec::new(),
            lives: config.lives,
            outcome: None,
            rng,
        };
        b.init_bricks();
        b.reset_ball();
        b
    }

    fn init_bricks(&mut self) {
        let c = &self.config;
        let brick_width = (c.width - c.brick_padding * c.brick_cols as f32) / c.brick_cols as f32;
        self.bricks = (0..c.brick_rows)
            .flat_map(|row| (0..c.brick_cols).map(move |col| (row, col)))
            .map(|(row, col)| Brick {
                rect: Rect::new(
                    col as f32 * (brick_width + c.brick_padding) + c.brick_padding,
                    row as f32 * (c.brick_height + c.brick_padding) + c.brick_padding + c.brick_top,
                    brick_width,
                    c.brick_height,
                ),
                color: BRICK_COLORS[row % BRICK_COLORS.len()],
                active: true,
            })
            .collect();
    }

    fn reset_ball(&mut self) {
        let sx = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        self.ball_pos = Vec2::new(self.config.width / 2.0, self.config.serve_y());
        self.ball_vel = Vec2::new(self.config.ball_speed * sx, -self.config.ball_speed);
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn active_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn paddle_x(&self) -> f32 {
        self.paddle_x
    }

    pub fn ball(&self) -> (Vec2, Vec2) {
        (self.ball_pos, self.ball_vel)
    }

    fn ball_rect(&self) -> Rect {
        Rect::square(self.ball_pos, self.config.ball_size)
    }

    fn bounce_off_paddle(&mut self) {
        let c = &self.config;
        let paddle_y = c.paddle_y();
        if self.ball_vel.y > 0.0
            && self.ball_pos.y >= paddle_y - c.ball_size
            && self.ball_pos.y <= paddle_y + c.paddle_height
            && self.ball_pos.x >= self.paddle_x
            && self.ball_pos.x <= self.paddle_x + c.paddle_width
        {
            self.ball_vel.y = -self.ball_vel.y.abs();
            self.ball_pos.y = paddle_y - c.ball_size;
            // Steer by where the ball met the paddle
            let hit = ((self.ball_pos.x - self.paddle_x) / c.paddle_width).clamp(0.0, 1.0);
            self.ball_vel.x = c.ball_speed * (hit - 0.5) * 2.0;
        }
    }

    fn hit_bricks(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let ball = self.ball_rect();
        let mut hits = 0;
        for brick in self.bricks.iter_mut().filter(|b| b.active) {
            if brick.rect.overlaps(&ball) {
                brick.active = false;
                hits += 1;
                events.push(GameEvent::ScoreAwarded { points: BRICK_POINTS });
            }
        }
        if hits > 0 {
            self.ball_vel.y = -self.ball_vel.y;
        }
        hits > 0
    }
}

impl Engine for Breakout {
    type Input = BreakoutInput;

    fn tick(&mut self, input: &BreakoutInput) -> Vec<GameEvent> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        let mut events = Vec::new();
        let c = &self.config;

        if input.left {
            self.paddle_x = (self.paddle_x - c.paddle_speed).max(0.0);
        }
        if input.right {
            self.paddle_x = (self.paddle_x + c.paddle_speed).min(c.width - c.paddle_width);
        }

        self.ball_pos += self.ball_vel;

        // Wall collisions
        if self.ball_pos.x <= 0.0 {
            self.ball_vel.x = self.ball_vel.x.abs();
        } else if self.ball_pos.x >= c.width - c.ball_size {
            self.ball_vel.x = -self.ball_vel.x.abs();
        }
        if self.ball_pos.y <= 0.0 {
            self.ball_vel.y = self.ball_vel.y.abs();
        }

        self.bounce_off_paddle();

        if self.hit_bricks(&mut events) && self.active_bricks() == 0 {
            log::debug!("wall cleared with {} lives left", self.lives);
            self.outcome = Some(Outcome::Won);
            events.push(GameEvent::GameOver { outcome: Outcome::Won });
            return events;
        }

        // Ball fell past the paddle
        if self.ball_pos.y >= self.config.height {
            self.lives = self.lives.saturating_sub(1);
            events.push(GameEvent::LifeLost);
            if self.lives == 0 {
                self.outcome = Some(Outcome::Lost);
                events.push(GameEvent::GameOver { outcome: Outcome::Lost });
            } else {
                self.reset_ball();
            }
        }
        events
    }

    fn scene(&self) -> Scene {
        let c = &self.config;
        let mut scene = Scene::new(c.width, c.height);
        for brick in self.bricks.iter().filter(|b| b.active) {
            scene.rect(brick.rect, brick.color);
        }
        scene.rect(
            Rect::new(self.paddle_x, c.paddle_y(), c.paddle_width, c.paddle_height),
            Rgb::GREEN,
        );
        let r = c.ball_size / 2.0;
        scene.circle(self.ball_pos + Vec2::splat(r), r, Rgb::WHITE);
        scene.text(Vec2::new(10.0, 10.0), format!("Lives: {}", self.lives), Rgb::WHITE);
        scene
    }

    fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}
