use std::collections::HashSet;

use glam::Vec2;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::games::{Engine, GameEvent, Outcome};
use crate::geometry::{points_within, Cell, Direction, Rect};
use crate::input::{Control, Controls};
use crate::scene::{Rgb, Scene};
use crate::GameRng;

const DOT_POINTS: u32 = 10;
const POWER_DOT_POINTS: u32 = 50;
const GHOST_POINTS: u32 = 200;

const GHOST_COLORS: [Rgb; 4] = [
    Rgb::hex(0xff0000),
    Rgb::hex(0x00ffff),
    Rgb::hex(0xffb8ff),
    Rgb::hex(0xffb852),
];
const FRIGHTENED: Rgb = Rgb(33, 33, 255);

/// `#` wall, `.` dot, `o` power dot, `P` player start, `G` ghost spawn.
const MAZE: [&str; 13] = [
    "#####################",
    "#o........#........o#",
    "#.###.###.#.###.###.#",
    "#...................#",
    "#.###.#.#####.#.###.#",
    "#.....#...#...#.....#",
    "#####.### # ###.#####",
    "#####.#  GGGG #.#####",
    "#####.# ##### #.#####",
    "#.........P.........#",
    "#.###.###.#.###.###.#",
    "#o..#...........#..o#",
    "#####################",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacmanConfig {
    /// One grid step per tick
    pub tick_ms: u64,
    pub power_mode_ms: u64,
    pub lives: u32,
}

impl Default for PacmanConfig {
    fn default() -> Self {
        Self {
            tick_ms: 120,
            power_mode_ms: 10_000,
            lives: 3,
        }
    }
}

impl PacmanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::invalid("pac-man", "tick_ms must be positive"));
        }
        if self.lives == 0 {
            return Err(ConfigError::invalid("pac-man", "lives must be positive"));
        }
        Ok(())
    }

    /// Power mode length in whole ticks, rounded up.
    pub fn power_ticks(&self) -> u32 {
        self.power_mode_ms.div_ceil(self.tick_ms) as u32
    }
}

/// Turns are queued by `press`; nothing is read from held keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacmanInput;

impl From<&Controls> for PacmanInput {
    fn from(_: &Controls) -> Self {
        PacmanInput
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ghost {
    pub pos: Cell,
    pub spawn: Cell,
    pub direction: Direction,
    pub color: Rgb,
}

/// Static layout parsed from the maze rows.
struct Maze {
    walls: HashSet<Cell>,
    cols: i32,
    rows: i32,
    player_start: Cell,
    ghost_spawns: Vec<Cell>,
    dots: HashSet<Cell>,
    power_dots: HashSet<Cell>,
}

impl Maze {
    fn parse(rows: &[&str]) -> Self {
        let mut maze = Maze {
            walls: HashSet::new(),
            cols: rows.iter().map(|r| r.len()).max().unwrap_or(0) as i32,
            rows: rows.len() as i32,
            player_start: Cell::new(0, 0),
            ghost_spawns: Vec::new(),
            dots: HashSet::new(),
            power_dots: HashSet::new(),
        };
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let cell = Cell::new(x as i32, y as i32);
                match ch {
                    '#' => {
                        maze.walls.insert(cell);
                    }
                    '.' => {
                        maze.dots.insert(cell);
                    }
                    'o' => {
                        maze.power_dots.insert(cell);
                    }
                    'P' => maze.player_start = cell,
                    'G' => maze.ghost_spawns.push(cell),
                    _ => {}
                }
            }
        }
        maze
    }

    fn is_open(&self, cell: Cell) -> bool {
        cell.in_bounds(self.cols, self.rows) && !self.walls.contains(&cell)
    }
}

pub struct Pacman {
    maze: Maze,
    player: Cell,
    direction: Direction,
    queued: Direction,
    ghosts: Vec<Ghost>,
    dots: HashSet<Cell>,
    power_dots: HashSet<Cell>,
    /// Ticks of power mode left; zero means off
    power_ticks: u32,
    power_duration: u32,
    lives: u32,
    outcome: Option<Outcome>,
    rng: GameRng,
}

impl Pacman {
    pub fn new(config: &PacmanConfig, rng: GameRng) -> Self {
        let maze = Maze::parse(&MAZE);
        let ghosts = maze
            .ghost_spawns
            .iter()
            .zip(GHOST_COLORS)
            .map(|(&spawn, color)| Ghost {
                pos: spawn,
                spawn,
                direction: Direction::Right,
                color,
            })
            .collect();
        Self {
            player: maze.player_start,
            direction: Direction::Right,
            queued: Direction::Right,
            ghosts,
            dots: maze.dots.clone(),
            power_dots: maze.power_dots.clone(),
            power_ticks: 0,
            power_duration: config.power_ticks(),
            lives: config.lives,
            outcome: None,
            maze,
            rng,
        }
    }

    pub fn player(&self) -> Cell {
        self.player
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn dots_left(&self) -> usize {
        self.dots.len() + self.power_dots.len()
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_powered(&self) -> bool {
        self.power_ticks > 0
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        !self.maze.is_open(cell)
    }

    /// Queue a turn; reversing straight back is refused.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() {
            return false;
        }
        self.queued = dir;
        true
    }

    fn move_player(&mut self) {
        let queued = self.player.step(self.queued);
        if self.maze.is_open(queued) {
            self.player = queued;
            self.direction = self.queued;
            return;
        }
        let ahead = self.player.step(self.direction);
        if self.maze.is_open(ahead) {
            self.player = ahead;
        }
    }

    fn eat(&mut self, events: &mut Vec<GameEvent>) {
        if self.dots.remove(&self.player) {
            events.push(GameEvent::ScoreAwarded { points: DOT_POINTS });
        } else if self.power_dots.remove(&self.player) {
            events.push(GameEvent::ScoreAwarded { points: POWER_DOT_POINTS });
            self.power_ticks = self.power_duration;
            log::debug!("power mode for {} ticks", self.power_duration);
        }
    }

    fn move_ghosts(&mut self) {
        for ghost in &mut self.ghosts {
            let Some(&dir) = Direction::ALL.choose(&mut self.rng) else {
                continue;
            };
            let next = ghost.pos.step(dir);
            if self.maze.is_open(next) {
                ghost.pos = next;
                ghost.direction = dir;
            }
        }
    }

    /// Everyone back to their start cell. Dots stay eaten.
    fn reset_positions(&mut self) {
        self.player = self.maze.player_start;
        self.direction = Direction::Right;
        self.queued = Direction::Right;
        self.power_ticks = 0;
        for ghost in &mut self.ghosts {
            ghost.pos = ghost.spawn;
            ghost.direction = Direction::Right;
        }
    }

    fn check_ghosts(&mut self, events: &mut Vec<GameEvent>) {
        let player = self.player.as_vec2();
        for i in 0..self.ghosts.len() {
            if !points_within(player, self.ghosts[i].pos.as_vec2(), 1.0) {
                continue;
            }
            if self.is_powered() {
                let ghost = &mut self.ghosts[i];
                ghost.pos = ghost.spawn;
                events.push(GameEvent::ScoreAwarded { points: GHOST_POINTS });
                continue;
            }

            self.lives = self.lives.saturating_sub(1);
            events.push(GameEvent::LifeLost);
            if self.lives == 0 {
                self.finish(Outcome::Lost, events);
            } else {
                log::debug!("pac-man caught, {} lives left", self.lives);
                self.reset_positions();
            }
            return;
        }
    }

    fn finish(&mut self, outcome: Outcome, events: &mut Vec<GameEvent>) {
        log::debug!("pac-man over: {:?}, {} dots left", outcome, self.dots_left());
        self.outcome = Some(outcome);
        events.push(GameEvent::GameOver { outcome });
    }
}

impl Engine for Pacman {
    type Input = PacmanInput;

    fn tick(&mut self, _input: &PacmanInput) -> Vec<GameEvent> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        let mut events = Vec::new();

        // Resolve power expiry once, before anything moves
        self.power_ticks = self.power_ticks.saturating_sub(1);

        self.move_player();
        self.eat(&mut events);
        // Checked on both sides of the ghost move so a swap still collides
        self.check_ghosts(&mut events);
        if self.outcome.is_none() {
            self.move_ghosts();
            self.check_ghosts(&mut events);
        }

        if self.outcome.is_none() && self.dots_left() == 0 {
            self.finish(Outcome::Won, &mut events);
        }
        events
    }

    fn press(&mut self, control: Control) -> Vec<GameEvent> {
        if self.outcome.is_none() {
            if let Some(dir) = control.direction() {
                self.steer(dir);
            }
        }
        Vec::new()
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new(self.maze.cols as f32, self.maze.rows as f32);
        let center = |c: Cell| c.as_vec2() + Vec2::splat(0.5);

        let mut walls: Vec<&Cell> = self.maze.walls.iter().collect();
        walls.sort();
        for wall in walls {
            scene.rect(Rect::square(wall.as_vec2(), 1.0), Rgb::BLUE);
        }

        let mut dots: Vec<&Cell> = self.dots.iter().collect();
        dots.sort();
        for dot in dots {
            scene.circle(center(*dot), 0.2, Rgb::WHITE);
        }
        let mut power: Vec<&Cell> = self.power_dots.iter().collect();
        power.sort();
        for dot in power {
            scene.circle(center(*dot), 0.4, Rgb::WHITE);
        }

        for ghost in &self.ghosts {
            let color = if self.is_powered() { FRIGHTENED } else { ghost.color };
            scene.rect(Rect::square(ghost.pos.as_vec2(), 1.0), color);
        }
        scene.circle(center(self.player), 0.5, Rgb::YELLOW);
        scene.text(Vec2::new(0.0, 0.0), format!("Lives: {}", self.lives), Rgb::WHITE);
        scene
    }

    fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn pacman() -> Pacman {
        Pacman::new(&PacmanConfig::default(), GameRng::seed_from_u64(3))
    }

    /// Park the ghosts in the pen, out of the way.
    fn pen_ghosts(p: &mut Pacman) {
        for ghost in &mut p.ghosts {
            ghost.pos = Cell::new(8, 7);
            ghost.spawn = Cell::new(8, 7);
        }
    }

    #[test]
    fn test_maze_layout() {
        let p = pacman();
        assert_eq!(p.player(), Cell::new(10, 9));
        assert_eq!(p.ghosts().len(), 4);
        assert_eq!(p.ghosts()[0].color, Rgb::hex(0xff0000));
        assert_eq!(p.power_dots.len(), 4);
        assert!(p.is_wall(Cell::new(0, 0)));
        assert!(p.is_wall(Cell::new(-1, 3)));
        assert!(!p.is_wall(Cell::new(1, 3)));
    }

    #[test]
    fn test_power_ticks_round_up() {
        let config = PacmanConfig {
            tick_ms: 120,
            power_mode_ms: 10_000,
            lives: 3,
        };
        assert_eq!(config.power_ticks(), 84);
    }

    #[test]
    fn test_moves_and_eats_dot() {
        let mut p = pacman();
        pen_ghosts(&mut p);
        let events = p.tick(&PacmanInput::default());
        assert_eq!(p.player(), Cell::new(11, 9));
        assert_eq!(events, vec![GameEvent::ScoreAwarded { points: 10 }]);
    }

    #[test]
    fn test_blocked_queue_keeps_current_direction() {
        let mut p = pacman();
        pen_ghosts(&mut p);
        // (10,8) is wall, so keep heading right
        p.steer(Direction::Up);
        p.tick(&PacmanInput);
        assert_eq!(p.player(), Cell::new(11, 9));
        assert_eq!(p.direction(), Direction::Right);
    }

    #[test]
    fn test_queued_turn_taken_when_open() {
        let mut p = pacman();
        pen_ghosts(&mut p);
        p.player = Cell::new(9, 9);
        p.steer(Direction::Down);
        p.tick(&PacmanInput);
        assert_eq!(p.player(), Cell::new(9, 10));
        assert_eq!(p.direction(), Direction::Down);
    }

    #[test]
    fn test_reverse_refused() {
        let mut p = pacman();
        assert!(!p.steer(Direction::Left));
        assert!(p.steer(Direction::Up));
    }

    #[test]
    fn test_stops_at_wall() {
        let mut p = pacman();
        pen_ghosts(&mut p);
        p.player = Cell::new(19, 9);
        p.tick(&PacmanInput::default());
        assert_eq!(p.player(), Cell::new(19, 9));
    }

    #[test]
    fn test_power_dot_and_countdown() {
        let mut p = pacman();
        pen_ghosts(&mut p);
        p.player = Cell::new(18, 11);
        let events = p.tick(&PacmanInput::default());
        assert_eq!(events, vec![GameEvent::ScoreAwarded { points: 50 }]);
        assert!(p.is_powered());

        for _ in 0..83 {
            p.tick(&PacmanInput::default());
        }
        assert!(p.is_powered());
        p.tick(&PacmanInput::default());
        assert!(!p.is_powered());
    }

    #[test]
    fn test_powered_eats_ghost() {
        let mut p = pacman();
        pen_ghosts(&mut p);
        p.power_ticks = 10;
        p.ghosts[0].pos = p.player();
        let mut events = Vec::new();
        p.check_ghosts(&mut events);
        assert_eq!(events, vec![GameEvent::ScoreAwarded { points: 200 }]);
        assert_eq!(p.ghosts()[0].pos, p.ghosts()[0].spawn);
        assert_eq!(p.lives(), 3);
    }

    #[test]
    fn test_caught_loses_life_and_resets() {
        let mut p = pacman();
        pen_ghosts(&mut p);
        p.dots.remove(&Cell::new(1, 3));
        p.player = Cell::new(1, 3);
        p.power_ticks = 0;
        p.ghosts[0].pos = Cell::new(1, 3);
        let mut events = Vec::new();
        p.check_ghosts(&mut events);
        assert_eq!(events, vec![GameEvent::LifeLost]);
        assert_eq!(p.lives(), 2);
        assert_eq!(p.player(), Cell::new(10, 9));
        assert_eq!(p.ghosts()[0].pos, p.ghosts()[0].spawn);
        assert!(!p.dots.contains(&Cell::new(1, 3)));
        assert!(!p.is_over());
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut p = pacman();
        pen_ghosts(&mut p);
        p.lives = 1;
        p.ghosts[1].pos = p.player();
        let mut events = Vec::new();
        p.check_ghosts(&mut events);
        assert_eq!(
            events,
            vec![GameEvent::LifeLost, GameEvent::GameOver { outcome: Outcome::Lost }]
        );
        assert!(p.is_over());
        assert!(p.tick(&PacmanInput::default()).is_empty());
    }

    /// Player at (2,3) heading right into ghost 0 at (3,3).
    fn head_on(p: &mut Pacman) {
        pen_ghosts(p);
        p.player = Cell::new(2, 3);
        p.ghosts[0].pos = Cell::new(3, 3);
    }

    #[test]
    fn test_walking_into_ghost_is_caught() {
        for seed in 0..20 {
            let mut p = Pacman::new(&PacmanConfig::default(), GameRng::seed_from_u64(seed));
            head_on(&mut p);
            let events = p.tick(&PacmanInput);
            assert!(events.contains(&GameEvent::LifeLost), "seed {seed}: {events:?}");
            assert_eq!(p.lives(), 2);
            assert_eq!(p.player(), Cell::new(10, 9));
        }
    }

    #[test]
    fn test_power_ending_on_contact_tick_costs_life() {
        let mut p = pacman();
        head_on(&mut p);
        p.power_ticks = 1;
        let events = p.tick(&PacmanInput);
        assert_eq!(
            events,
            vec![GameEvent::ScoreAwarded { points: 10 }, GameEvent::LifeLost]
        );
        assert!(!p.is_powered());
        assert_eq!(p.lives(), 2);
    }

    #[test]
    fn test_powered_contact_through_tick() {
        let mut p = pacman();
        head_on(&mut p);
        p.power_ticks = 10;
        let events = p.tick(&PacmanInput);
        assert_eq!(
            events,
            vec![
                GameEvent::ScoreAwarded { points: 10 },
                GameEvent::ScoreAwarded { points: 200 }
            ]
        );
        assert_eq!(p.lives(), 3);
        assert_eq!(p.player(), Cell::new(3, 3));
        assert_ne!(p.ghosts()[0].pos, Cell::new(3, 3));
        assert!(p.is_powered());
    }

    #[test]
    fn test_clearing_dots_wins() {
        let mut p = pacman();
        pen_ghosts(&mut p);
        p.dots.clear();
        p.power_dots.clear();
        p.dots.insert(Cell::new(11, 9));
        let events = p.tick(&PacmanInput::default());
        assert_eq!(
            events,
            vec![
                GameEvent::ScoreAwarded { points: 10 },
                GameEvent::GameOver { outcome: Outcome::Won }
            ]
        );
    }

    #[test]
    fn test_ghosts_never_enter_walls() {
        let mut p = pacman();
        for _ in 0..500 {
            p.move_ghosts();
            for ghost in p.ghosts() {
                assert!(!p.is_wall(ghost.pos));
            }
        }
    }

    #[test]
    fn test_scene_has_lives_text() {
        let p = pacman();
        assert!(p.scene().texts().any(|t| t == "Lives: 3"));
    }
}
