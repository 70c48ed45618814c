use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::games::{Engine, GameEvent, Outcome};
use crate::geometry::Rect;
use crate::input::Controls;
use crate::scene::{Rgb, Scene};
use crate::GameRng;

const ENEMY_POINTS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvadersConfig {
    pub width: f32,
    pub height: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub bullet_size: f32,
    pub bullet_speed: f32,
    pub max_player_bullets: usize,
    pub enemy_size: f32,
    pub enemy_speed: f32,
    pub enemy_drop: f32,
    /// Per-enemy, per-tick chance to fire
    pub enemy_shoot_chance: f64,
    pub enemy_rows: usize,
    pub enemy_cols: usize,
    pub enemy_spacing: f32,
    pub formation_x: f32,
    pub formation_y: f32,
    pub lives: u32,
    pub tick_ms: u64,
}

impl Default for InvadersConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            player_width: 50.0,
            player_height: 30.0,
            player_speed: 5.0,
            bullet_size: 5.0,
            bullet_speed: 7.0,
            max_player_bullets: 3,
            enemy_size: 40.0,
            enemy_speed: 2.0,
            enemy_drop: 20.0,
            enemy_shoot_chance: 0.01,
            enemy_rows: 5,
            enemy_cols: 10,
            enemy_spacing: 60.0,
            formation_x: 100.0,
            formation_y: 50.0,
            lives: 3,
            tick_ms: 16,
        }
    }
}

impl InvadersConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.enemy_shoot_chance) {
            return Err(ConfigError::invalid("space invaders", "enemy_shoot_chance must be within [0, 1]"));
        }
        if self.enemy_rows == 0 || self.enemy_cols == 0 {
            return Err(ConfigError::invalid("space invaders", "formation needs at least one enemy"));
        }
        let formation_right =
            self.formation_x + (self.enemy_cols - 1) as f32 * self.enemy_spacing + self.enemy_size;
        if self.formation_x < 0.0 || formation_right > self.width {
            return Err(ConfigError::invalid("space invaders", "formation does not fit the court"));
        }
        if self.lives == 0 {
            return Err(ConfigError::invalid("space invaders", "lives must be positive"));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::invalid("space invaders", "tick_ms must be positive"));
        }
        Ok(())
    }

    fn player_y(&self) -> f32 {
        self.height - self.player_height - 10.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InvadersInput {
    pub left: bool,
    pub right: bool,
    /// Fires once per press
    pub fire: bool,
}

impl From<&Controls> for InvadersInput {
    fn from(c: &Controls) -> Self {
        Self {
            left: c.left,
            right: c.right,
            fire: c.fire,
        }
    }
}

pub struct SpaceInvaders {
    config: InvadersConfig,
    player: Rect,
    player_bullets: Vec<Rect>,
    enemy_bullets: Vec<Rect>,
    enemies: Vec<Rect>,
    /// +1 right, -1 left; shared by the whole formation
    direction: f32,
    lives: u32,
    fire_held: bool,
    outcome: Option<Outcome>,
    rng: GameRng,
}

impl SpaceInvaders {
    pub fn new(config: &InvadersConfig, rng: GameRng) -> Self {
        let c = config;
        let enemies = (0..c.enemy_rows)
            .flat_map(|row| (0..c.enemy_cols).map(move |col| (row, col)))
            .map(|(row, col)| {
                Rect::new(
                    col as f32 * c.enemy_spacing + c.formation_x,
                    row as f32 * c.enemy_spacing + c.formation_y,
                    c.enemy_size,
                    c.enemy_size,
                )
            })
            .collect();
        Self {
            config: config.clone(),
            player: Rect::new(
                c.width / 2.0 - c.player_width / 2.0,
                c.player_y(),
                c.player_width,
                c.player_height,
            ),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies,
            direction: 1.0,
            lives: c.lives,
            fire_held: false,
            outcome: None,
            rng,
        }
    }

    pub fn player(&self) -> &Rect {
        &self.player
    }

    pub fn enemies(&self) -> &[Rect] {
        &self.enemies
    }

    pub fn player_bullets(&self) -> &[Rect] {
        &self.player_bullets
    }

    pub fn enemy_bullets(&self) -> &[Rect] {
        &self.enemy_bullets
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    fn update_player(&mut self, input: &InvadersInput) {
        let c = &self.config;
        if input.left {
            self.player.x = (self.player.x - c.player_speed).max(0.0);
        }
        if input.right {
            self.player.x = (self.player.x + c.player_speed).min(c.width - c.player_width);
        }

        let pressed = input.fire && !self.fire_held;
        self.fire_held = input.fire;
        if pressed && self.player_bullets.len() < c.max_player_bullets {
            self.player_bullets.push(Rect::new(
                self.player.x + c.player_width / 2.0 - c.bullet_size / 2.0,
                self.player.y,
                c.bullet_size,
                c.bullet_size,
            ));
        }
    }

    fn update_bullets(&mut self) {
        let speed = self.config.bullet_speed;
        let height = self.config.height;
        for b in &mut self.player_bullets {
            b.y -= speed;
        }
        self.player_bullets.retain(|b| b.y >= 0.0);

        for b in &mut self.enemy_bullets {
            b.y += speed;
        }
        self.enemy_bullets.retain(|b| b.y <= height);
    }

    /// Lockstep sweep; any enemy leaving the court flips and drops everyone.
    fn update_enemies(&mut self) {
        let c = &self.config;
        let dx = c.enemy_speed * self.direction;
        let mut hit_edge = false;
        for enemy in &mut self.enemies {
            enemy.x += dx;
            if enemy.x < 0.0 || enemy.x + c.enemy_size > c.width {
                hit_edge = true;
            }
        }
        if hit_edge {
            self.direction = -self.direction;
            for enemy in &mut self.enemies {
                enemy.y += c.enemy_drop;
            }
            log::debug!("formation flipped, now heading {}", self.direction);
        }

        for enemy in &self.enemies {
            if self.rng.gen_bool(c.enemy_shoot_chance) {
                self.enemy_bullets.push(Rect::new(
                    enemy.x + c.enemy_size / 2.0 - c.bullet_size / 2.0,
                    enemy.bottom(),
                    c.bullet_size,
                    c.bullet_size,
                ));
            }
        }
    }

    fn shoot_enemies(&mut self, events: &mut Vec<GameEvent>) {
        let enemies = &mut self.enemies;
        self.player_bullets.retain(|bullet| {
            match enemies.iter().rposition(|e| e.overlaps(bullet)) {
                Some(i) => {
                    enemies.remove(i);
                    events.push(GameEvent::ScoreAwarded { points: ENEMY_POINTS });
                    false
                }
                None => true,
            }
        });
    }

    fn finish(&mut self, outcome: Outcome, events: &mut Vec<GameEvent>) {
        log::debug!("invaders over: {:?}, {} enemies left", outcome, self.enemies.len());
        self.outcome = Some(outcome);
        events.push(GameEvent::GameOver { outcome });
    }
}

impl Engine for SpaceInvaders {
    type Input = InvadersInput;

    fn tick(&mut self, input: &InvadersInput) -> Vec<GameEvent> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        let mut events = Vec::new();

        self.update_player(input);
        self.update_bullets();
        self.update_enemies();

        self.shoot_enemies(&mut events);

        // Enemy bullets vs player
        let player = self.player;
        let before = self.enemy_bullets.len();
        self.enemy_bullets.retain(|b| !b.overlaps(&player));
        for _ in self.enemy_bullets.len()..before {
            self.lives = self.lives.saturating_sub(1);
            events.push(GameEvent::LifeLost);
            if self.lives == 0 {
                self.finish(Outcome::Lost, &mut events);
                return events;
            }
        }

        // Invasion
        if self.enemies.iter().any(|e| e.bottom() > player.y) {
            self.finish(Outcome::Lost, &mut events);
            return events;
        }

        if self.enemies.is_empty() {
            self.finish(Outcome::Won, &mut events);
        }
        events
    }

    fn scene(&self) -> Scene {
        let c = &self.config;
        let mut scene = Scene::new(c.width, c.height);
        scene.rect(self.player, Rgb::GREEN);
        for b in &self.player_bullets {
            scene.rect(*b, Rgb::WHITE);
        }
        for b in &self.enemy_bullets {
            scene.rect(*b, Rgb::RED);
        }
        for e in &self.enemies {
            scene.rect(*e, Rgb::MAGENTA);
        }
        scene.text(Vec2::new(10.0, 10.0), format!("Lives: {}", self.lives), Rgb::WHITE);
        scene
    }

    fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}
