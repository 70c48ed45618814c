use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::games::{Engine, GameEvent, Outcome};
use crate::geometry::Rect;
use crate::input::{Control, Controls};
use crate::scene::{Rgb, Scene};
use crate::GameRng;

const LINE_POINTS: u32 = 100;

/// Filled/empty cells of a piece, row-major.
pub type Matrix = Vec<Vec<bool>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tetromino {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::O,
        Tetromino::T,
        Tetromino::S,
        Tetromino::Z,
        Tetromino::J,
        Tetromino::L,
    ];

    pub fn shape(self) -> Matrix {
        let rows: &[&[u8]] = match self {
            Tetromino::I => &[&[1, 1, 1, 1]],
            Tetromino::O => &[&[1, 1], &[1, 1]],
            Tetromino::T => &[&[0, 1, 0], &[1, 1, 1]],
            Tetromino::S => &[&[0, 1, 1], &[1, 1, 0]],
            Tetromino::Z => &[&[1, 1, 0], &[0, 1, 1]],
            Tetromino::J => &[&[1, 0, 0], &[1, 1, 1]],
            Tetromino::L => &[&[0, 0, 1], &[1, 1, 1]],
        };
        rows.iter()
            .map(|row| row.iter().map(|&v| v == 1).collect())
            .collect()
    }

    pub fn color(self) -> Rgb {
        match self {
            Tetromino::I => Rgb::hex(0x00f0f0),
            Tetromino::O => Rgb::hex(0xf0f000),
            Tetromino::T => Rgb::hex(0xa000f0),
            Tetromino::S => Rgb::hex(0x00f000),
            Tetromino::Z => Rgb::hex(0xf00000),
            Tetromino::J => Rgb::hex(0x0000f0),
            Tetromino::L => Rgb::hex(0xf0a000),
        }
    }
}

/// Clockwise quarter turn: transpose, then reverse each row.
pub fn rotate_clockwise(shape: &Matrix) -> Matrix {
    let h = shape.len();
    let w = shape.first().map_or(0, |r| r.len());
    (0..w)
        .map(|i| (0..h).map(|j| shape[h - 1 - j][i]).collect())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub kind: Tetromino,
    pub shape: Matrix,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    pub fn new(kind: Tetromino, x: i32, y: i32) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            x,
            y,
        }
    }

    /// Absolute (col, row) of every filled cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        cells_at(&self.shape, self.x, self.y)
    }
}

fn cells_at(shape: &Matrix, x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
    shape.iter().enumerate().flat_map(move |(row, line)| {
        line.iter()
            .enumerate()
            .filter(|&(_, &filled)| filled)
            .map(move |(col, _)| (x + col as i32, y + row as i32))
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetrisConfig {
    pub cols: usize,
    pub rows: usize,
    /// Gravity interval
    pub tick_ms: u64,
}

impl Default for TetrisConfig {
    fn default() -> Self {
        Self {
            cols: 10,
            rows: 20,
            tick_ms: 1000,
        }
    }
}

impl TetrisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols < 4 || self.rows < 4 {
            return Err(ConfigError::invalid("tetris", "grid must be at least 4x4"));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::invalid("tetris", "tick_ms must be positive"));
        }
        Ok(())
    }
}

/// Gravity needs no held keys; moves arrive through `press`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TetrisInput;

impl From<&Controls> for TetrisInput {
    fn from(_: &Controls) -> Self {
        TetrisInput
    }
}

pub struct Tetris {
    grid: Vec<Vec<Option<Tetromino>>>,
    piece: Piece,
    cols: usize,
    rows: usize,
    lines: u32,
    game_over: bool,
    rng: GameRng,
}

impl Tetris {
    pub fn new(config: &TetrisConfig, rng: GameRng) -> Self {
        let mut t = Self {
            grid: vec![vec![None; config.cols]; config.rows],
            piece: Piece::new(Tetromino::O, 0, 0),
            cols: config.cols,
            rows: config.rows,
            lines: 0,
            game_over: false,
            rng,
        };
        t.spawn_piece();
        t
    }

    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    /// Locked block at `col`, `row`; `None` when empty or off the grid.
    pub fn cell(&self, col: usize, row: usize) -> Option<Tetromino> {
        *self.grid.get(row)?.get(col)?
    }

    pub fn row_count(&self) -> usize {
        self.grid.len()
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    fn collides(&self, shape: &Matrix, x: i32, y: i32) -> bool {
        cells_at(shape, x, y).any(|(cx, cy)| {
            cx < 0
                || cx >= self.cols as i32
                || cy >= self.rows as i32
                || (cy >= 0 && self.grid[cy as usize][cx as usize].is_some())
        })
    }

    /// Shift the piece. A blocked downward move locks it in place.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> Vec<GameEvent> {
        if self.game_over {
            return Vec::new();
        }
        if !self.collides(&self.piece.shape, self.piece.x + dx, self.piece.y + dy) {
            self.piece.x += dx;
            self.piece.y += dy;
            return Vec::new();
        }
        if dy > 0 {
            return self.lock_piece();
        }
        Vec::new()
    }

    /// Rotate clockwise; discarded if the result collides (no wall kicks).
    pub fn rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let rotated = rotate_clockwise(&self.piece.shape);
        if self.collides(&rotated, self.piece.x, self.piece.y) {
            return false;
        }
        self.piece.shape = rotated;
        true
    }

    pub fn hard_drop(&mut self) -> Vec<GameEvent> {
        if self.game_over {
            return Vec::new();
        }
        while !self.collides(&self.piece.shape, self.piece.x, self.piece.y + 1) {
            self.piece.y += 1;
        }
        self.lock_piece()
    }

    fn lock_piece(&mut self) -> Vec<GameEvent> {
        let kind = self.piece.kind;
        let cells: Vec<(i32, i32)> = self.piece.cells().collect();
        for (x, y) in cells {
            // Cells still above the visible grid are dropped
            if y >= 0 {
                self.grid[y as usize][x as usize] = Some(kind);
            }
        }

        let mut events = Vec::new();
        let cleared = self.clear_lines();
        if cleared > 0 {
            log::debug!("cleared {} line(s)", cleared);
            self.lines += cleared;
            events.push(GameEvent::ScoreAwarded {
                points: cleared * LINE_POINTS,
            });
        }
        events.extend(self.spawn_piece());
        events
    }

    /// Remove full rows bottom-up, refilling from the top. Returns rows removed.
    fn clear_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = self.rows as isize - 1;
        while y >= 0 {
            if self.grid[y as usize].iter().all(|c| c.is_some()) {
                self.grid.remove(y as usize);
                self.grid.insert(0, vec![None; self.cols]);
                cleared += 1;
                // Same index now holds the row from above
            } else {
                y -= 1;
            }
        }
        cleared
    }

    fn spawn_piece(&mut self) -> Vec<GameEvent> {
        let kind = Tetromino::ALL[self.rng.gen_range(0..Tetromino::ALL.len())];
        let width = kind.shape()[0].len() as i32;
        self.piece = Piece::new(kind, self.cols as i32 / 2 - width / 2, 0);

        if self.collides(&self.piece.shape, self.piece.x, self.piece.y) {
            log::debug!("stack topped out after {} lines", self.lines);
            self.game_over = true;
            return vec![GameEvent::GameOver { outcome: Outcome::Lost }];
        }
        Vec::new()
    }
}

impl Engine for Tetris {
    type Input = TetrisInput;

    fn tick(&mut self, _input: &TetrisInput) -> Vec<GameEvent> {
        self.move_piece(0, 1)
    }

    fn press(&mut self, control: Control) -> Vec<GameEvent> {
        match control {
            Control::Left => self.move_piece(-1, 0),
            Control::Right => self.move_piece(1, 0),
            Control::Down => self.move_piece(0, 1),
            Control::Up => {
                self.rotate();
                Vec::new()
            }
            Control::Fire => self.hard_drop(),
            _ => Vec::new(),
        }
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new(self.cols as f32, self.rows as f32);
        let block = |x: i32, y: i32| Rect::square(Vec2::new(x as f32, y as f32), 1.0);

        for (y, row) in self.grid.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(kind) = cell {
                    scene.rect(block(x as i32, y as i32), kind.color());
                }
            }
        }
        if !self.game_over {
            for (x, y) in self.piece.cells().filter(|&(_, y)| y >= 0) {
                scene.rect(block(x, y), self.piece.kind.color());
            }
        }
        scene.text(Vec2::new(0.0, 0.0), format!("Lines: {}", self.lines), Rgb::WHITE);
        scene
    }

    fn is_over(&self) -> bool {
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn tetris() -> Tetris {
        Tetris::new(&TetrisConfig::default(), GameRng::seed_from_u64(3))
    }

    fn fill_row(t: &mut Tetris, row: usize, cols: std::ops::Range<usize>) {
        for col in cols {
            t.grid[row][col] = Some(Tetromino::Z);
        }
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for kind in Tetromino::ALL {
            let original = kind.shape();
            let mut shape = original.clone();
            for _ in 0..4 {
                shape = rotate_clockwise(&shape);
            }
            assert_eq!(shape, original, "{:?}", kind);
        }
    }

    #[test]
    fn test_rotate_t_clockwise() {
        let rotated = rotate_clockwise(&Tetromino::T.shape());
        let expected = vec![
            vec![true, false],
            vec![true, true],
            vec![true, false],
        ];
        assert_eq!(rotated, expected);
    }

    #[test]
    fn test_spawn_is_centered_on_top_row() {
        let t = tetris();
        let width = t.piece().shape[0].len() as i32;
        assert_eq!(t.piece().y, 0);
        assert_eq!(t.piece().x, 5 - width / 2);
    }

    #[test]
    fn test_move_outside_walls_is_rejected() {
        let mut t = tetris();
        t.piece = Piece::new(Tetromino::O, 0, 5);
        assert!(t.move_piece(-1, 0).is_empty());
        assert_eq!(t.piece().x, 0);
        t.piece = Piece::new(Tetromino::O, 8, 5);
        t.move_piece(1, 0);
        assert_eq!(t.piece().x, 8);
    }

    #[test]
    fn test_rows_above_grid_are_passable() {
        let mut t = tetris();
        t.piece = Piece::new(Tetromino::I, 3, -1);
        assert!(!t.collides(&t.piece.shape, 3, -1));
        t.move_piece(1, 0);
        assert_eq!(t.piece().x, 4);
    }

    #[test]
    fn test_blocked_rotation_is_discarded() {
        let mut t = tetris();
        // Horizontal I resting on the floor cannot stand up
        t.piece = Piece::new(Tetromino::I, 3, 19);
        let before = t.piece().shape.clone();
        assert!(!t.rotate());
        assert_eq!(t.piece().shape, before);
    }

    #[test]
    fn test_gravity_locks_on_landing() {
        let mut t = tetris();
        t.piece = Piece::new(Tetromino::O, 4, 18);
        let events = t.tick(&TetrisInput);
        assert!(events.is_empty());
        for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert_eq!(t.cell(x, y), Some(Tetromino::O));
        }
        assert_eq!(t.piece().y, 0);
    }

    #[test]
    fn test_single_line_clear() {
        let mut t = tetris();
        fill_row(&mut t, 19, 0..6);
        t.piece = Piece::new(Tetromino::I, 6, 0);
        let events = t.hard_drop();
        assert_eq!(events, vec![GameEvent::ScoreAwarded { points: 100 }]);
        assert_eq!(t.row_count(), 20);
        assert!((0..10).all(|x| t.cell(x, 19).is_none()));
        assert_eq!(t.lines(), 1);
    }

    #[test]
    fn test_double_clear_scores_once_and_shifts_rows() {
        let mut t = tetris();
        fill_row(&mut t, 19, 0..8);
        fill_row(&mut t, 18, 0..8);
        t.grid[17][0] = Some(Tetromino::T);
        t.piece = Piece::new(Tetromino::O, 8, 0);
        let events = t.hard_drop();
        assert_eq!(events, vec![GameEvent::ScoreAwarded { points: 200 }]);
        assert_eq!(t.row_count(), 20);
        assert_eq!(t.cell(0, 19), Some(Tetromino::T));
        assert!((1..10).all(|x| t.cell(x, 19).is_none()));
        assert!((0..10).all(|x| t.cell(x, 18).is_none()));
    }

    #[test]
    fn test_cell_off_grid_is_empty() {
        let mut t = tetris();
        fill_row(&mut t, 19, 0..10);
        assert_eq!(t.cell(9, 19), Some(Tetromino::Z));
        assert_eq!(t.cell(10, 19), None);
        assert_eq!(t.cell(0, 20), None);
        assert_eq!(t.cell(usize::MAX, usize::MAX), None);
    }

    #[test]
    fn test_topped_out_spawn_ends_game() {
        let mut t = tetris();
        for row in 0..20 {
            fill_row(&mut t, row, 1..10);
        }
        let events = t.spawn_piece();
        assert_eq!(events, vec![GameEvent::GameOver { outcome: Outcome::Lost }]);
        assert!(t.is_over());
        assert!(t.tick(&TetrisInput).is_empty());
        assert!(t.press(Control::Fire).is_empty());
    }

    #[test]
    fn test_press_routes_actions() {
        let mut t = tetris();
        t.piece = Piece::new(Tetromino::T, 4, 2);
        t.press(Control::Left);
        assert_eq!(t.piece().x, 3);
        t.press(Control::Down);
        assert_eq!(t.piece().y, 3);
        t.press(Control::Up);
        assert_eq!(t.piece().shape, rotate_clockwise(&Tetromino::T.shape()));
    }
}
