use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::games::{Engine, GameEvent, Outcome, Side};
use crate::geometry::Rect;
use crate::input::Controls;
use crate::scene::{Rgb, Scene};
use crate::GameRng;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongConfig {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub ball_size: f32,
    pub paddle_speed: f32,
    pub ball_speed: f32,
    pub max_score: u32,
    pub tick_ms: u64,
}

impl Default for PongConfig {
    fn default() -> Self {
        // Proportions from a 2:1 court: paddle h/4 tall, w/40 wide
        Self {
            width: 800.0,
            height: 400.0,
            paddle_width: 20.0,
            paddle_height: 100.0,
            ball_size: 10.0,
            paddle_speed: 5.0,
            ball_speed: 5.0,
            max_score: 5,
            tick_ms: 16,
        }
    }
}

impl PongConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 2.0 * self.paddle_width + self.ball_size {
            return Err(ConfigError::invalid("pong", "court too narrow for paddles"));
        }
        if self.paddle_height <= 0.0 || self.height < self.paddle_height {
            return Err(ConfigError::invalid("pong", "paddle must fit the court height"));
        }
        if self.max_score == 0 {
            return Err(ConfigError::invalid("pong", "max_score must be positive"));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::invalid("pong", "tick_ms must be positive"));
        }
        Ok(())
    }
}

/// Left player on W/S, right player on the arrows.
#[derive(Debug, Clone, Copy, Default)]
pub struct PongInput {
    pub left_up: bool,
    pub left_down: bool,
    pub right_up: bool,
    pub right_down: bool,
}

impl From<&Controls> for PongInput {
    fn from(c: &Controls) -> Self {
        Self {
            left_up: c.w,
            left_down: c.s,
            right_up: c.up,
            right_down: c.down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub y: f32,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

pub struct Pong {
    config: PongConfig,
    left: Paddle,
    right: Paddle,
    ball: Ball,
    winner: Option<Side>,
    rng: GameRng,
}

impl Pong {
    pub fn new(config: &PongConfig, mut rng: GameRng) -> Self {
        let paddle_y = config.height / 2.0 - config.paddle_height / 2.0;
        let ball = Self::serve(config, &mut rng);
        Self {
            config: config.clone(),
            left: Paddle { y: paddle_y, score: 0 },
            right: Paddle { y: paddle_y, score: 0 },
            ball,
            winner: None,
            rng,
        }
    }

    pub fn left(&self) -> &Paddle {
        &self.left
    }

    pub fn right(&self) -> &Paddle {
        &self.right
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Center ball, random diagonal.
    fn serve(config: &PongConfig, rng: &mut GameRng) -> Ball {
        let sx = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let sy = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        Ball {
            pos: Vec2::new(config.width / 2.0, config.height / 2.0),
            vel: Vec2::new(config.ball_speed * sx, config.ball_speed * sy),
        }
    }

    fn move_paddle(paddle: &mut Paddle, up: bool, down: bool, speed: f32, max_y: f32) {
        if up {
            paddle.y = (paddle.y - speed).max(0.0);
        }
        if down {
            paddle.y = (paddle.y + speed).min(max_y);
        }
    }

    fn spans(&self, paddle: &Paddle) -> bool {
        self.ball.pos.y >= paddle.y && self.ball.pos.y <= paddle.y + self.config.paddle_height
    }

    fn move_ball(&mut self) -> Option<Side> {
        let c = &self.config;
        self.ball.pos += self.ball.vel;

        // Top and bottom walls
        if self.ball.pos.y <= 0.0 {
            self.ball.vel.y = self.ball.vel.y.abs();
        } else if self.ball.pos.y >= c.height {
            self.ball.vel.y = -self.ball.vel.y.abs();
        }

        // Paddle faces
        if self.ball.vel.x < 0.0 && self.ball.pos.x <= c.paddle_width && self.spans(&self.left) {
            self.ball.vel.x = self.ball.vel.x.abs();
            self.ball.pos.x = c.paddle_width;
        }
        let right_face = c.width - c.paddle_width - c.ball_size;
        if self.ball.vel.x > 0.0 && self.ball.pos.x >= right_face && self.spans(&self.right) {
            self.ball.vel.x = -self.ball.vel.x.abs();
            self.ball.pos.x = right_face;
        }

        if self.ball.pos.x <= 0.0 {
            Some(Side::Right)
        } else if self.ball.pos.x >= c.width - c.ball_size {
            Some(Side::Left)
        } else {
            None
        }
    }
}

impl Engine for Pong {
    type Input = PongInput;

    fn tick(&mut self, input: &PongInput) -> Vec<GameEvent> {
        if self.winner.is_some() {
            return Vec::new();
        }
        let max_y = self.config.height - self.config.paddle_height;
        let speed = self.config.paddle_speed;
        Self::move_paddle(&mut self.left, input.left_up, input.left_down, speed, max_y);
        Self::move_paddle(&mut self.right, input.right_up, input.right_down, speed, max_y);

        let Some(scorer) = self.move_ball() else {
            return Vec::new();
        };

        let paddle = match scorer {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        paddle.score += 1;
        let score = paddle.score;
        log::debug!("{:?} scores ({} - {})", scorer, self.left.score, self.right.score);
        self.ball = Self::serve(&self.config, &mut self.rng);

        if score >= self.config.max_score {
            self.winner = Some(scorer);
            return vec![GameEvent::GameOver {
                outcome: Outcome::Winner(scorer),
            }];
        }
        Vec::new()
    }

    fn scene(&self) -> Scene {
        let c = &self.config;
        let mut scene = Scene::new(c.width, c.height);
        scene.rect(Rect::new(0.0, self.left.y, c.paddle_width, c.paddle_height), Rgb::WHITE);
        scene.rect(
            Rect::new(c.width - c.paddle_width, self.right.y, c.paddle_width, c.paddle_height),
            Rgb::WHITE,
        );
        scene.rect(Rect::square(self.ball.pos, c.ball_size), Rgb::WHITE);

        // Dashed center line
        let mut y = 0.0;
        while y < c.height {
            scene.rect(Rect::new(c.width / 2.0 - 1.0, y, 2.0, 5.0), Rgb(120, 120, 120));
            y += 20.0;
        }

        scene.text(Vec2::new(c.width / 4.0, 10.0), self.left.score.to_string(), Rgb::WHITE);
        scene.text(Vec2::new(3.0 * c.width / 4.0, 10.0), self.right.score.to_string(), Rgb::WHITE);
        scene
    }

    fn is_over(&self) -> bool {
        self.winner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn pong() -> Pong {
        Pong::new(&PongConfig::default(), GameRng::seed_from_u64(11))
    }

    /// Park the ball just past the left edge, clear of the left paddle.
    fn force_left_miss(p: &mut Pong) {
        p.left.y = 0.0;
        p.ball.pos = Vec2::new(-10.0, 300.0);
        p.ball.vel = Vec2::new(-5.0, 5.0);
    }

    #[test]
    fn test_serve_is_diagonal_from_center() {
        for seed in 0..20 {
            let p = Pong::new(&PongConfig::default(), GameRng::seed_from_u64(seed));
            assert_eq!(p.ball().pos, Vec2::new(400.0, 200.0));
            assert_eq!(p.ball().vel.x.abs(), 5.0);
            assert_eq!(p.ball().vel.y.abs(), 5.0);
        }
    }

    #[test]
    fn test_paddles_clamp_to_court() {
        let mut p = pong();
        let up = PongInput { left_up: true, right_down: true, ..Default::default() };
        for _ in 0..200 {
            p.ball.pos = Vec2::new(400.0, 200.0);
            p.tick(&up);
        }
        assert_eq!(p.left().y, 0.0);
        assert_eq!(p.right().y, 300.0);
    }

    #[test]
    fn test_wall_bounce_reflects_dy() {
        let mut p = pong();
        p.ball.pos = Vec2::new(400.0, 2.0);
        p.ball.vel = Vec2::new(5.0, -5.0);
        p.tick(&PongInput::default());
        assert!(p.ball().vel.y > 0.0);
    }

    #[test]
    fn test_left_paddle_bounce_clamps_to_face() {
        let mut p = pong();
        p.left.y = 150.0;
        p.ball.pos = Vec2::new(22.0, 200.0);
        p.ball.vel = Vec2::new(-5.0, 0.0);
        let events = p.tick(&PongInput::default());
        assert!(events.is_empty());
        assert_eq!(p.ball().pos.x, 20.0);
        assert!(p.ball().vel.x > 0.0);
        assert_eq!(p.left().score + p.right().score, 0);
    }

    #[test]
    fn test_right_paddle_bounce() {
        let mut p = pong();
        p.right.y = 150.0;
        p.ball.pos = Vec2::new(768.0, 200.0);
        p.ball.vel = Vec2::new(5.0, 0.0);
        p.tick(&PongInput::default());
        assert_eq!(p.ball().pos.x, 770.0);
        assert!(p.ball().vel.x < 0.0);
    }

    #[test]
    fn test_miss_scores_for_opponent_and_recenters() {
        let mut p = pong();
        force_left_miss(&mut p);
        let events = p.tick(&PongInput::default());
        assert!(events.is_empty());
        assert_eq!(p.right().score, 1);
        assert_eq!(p.left().score, 0);
        assert_eq!(p.ball().pos, Vec2::new(400.0, 200.0));
    }

    #[test]
    fn test_first_to_five_scenario() {
        let mut p = pong();
        let mut game_overs = 0;
        for _ in 0..5 {
            force_left_miss(&mut p);
            for e in p.tick(&PongInput::default()) {
                if e == (GameEvent::GameOver { outcome: Outcome::Winner(Side::Right) }) {
                    game_overs += 1;
                }
            }
        }
        assert_eq!(p.right().score, 5);
        assert_eq!(game_overs, 1);
        assert!(p.is_over());

        force_left_miss(&mut p);
        assert!(p.tick(&PongInput::default()).is_empty());
        assert_eq!(p.right().score, 5);
    }

    #[test]
    fn test_no_score_while_rallying() {
        let mut p = pong();
        p.left.y = 150.0;
        p.right.y = 150.0;
        p.ball.pos = Vec2::new(400.0, 200.0);
        p.ball.vel = Vec2::new(5.0, 0.0);
        for _ in 0..1000 {
            p.tick(&PongInput::default());
        }
        assert_eq!(p.left().score + p.right().score, 0);
    }
}
