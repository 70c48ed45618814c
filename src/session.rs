use std::fmt;
use std::time::Duration;

use rand::{Rng, SeedableRng};

use crate::config::ArcadeConfig;
use crate::error::SessionError;
use crate::games::breakout::Breakout;
use crate::games::pacman::Pacman;
use crate::games::pong::Pong;
use crate::games::snake::Snake;
use crate::games::space_invaders::SpaceInvaders;
use crate::games::tetris::Tetris;
use crate::games::{self, Engine, GameEvent, Outcome};
use crate::input::{Control, Controls};
use crate::scene::Scene;
use crate::GameRng;

/// Catch-up limit for one `advance` call. A longer stall drops the backlog.
const MAX_STEPS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Snake,
    Tetris,
    Pong,
    Breakout,
    SpaceInvaders,
    Pacman,
}

impl GameKind {
    pub fn all() -> &'static [GameKind] {
        &[
            GameKind::Snake,
            GameKind::Tetris,
            GameKind::Pong,
            GameKind::Breakout,
            GameKind::SpaceInvaders,
            GameKind::Pacman,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Snake => "Snake",
            GameKind::Tetris => "Tetris",
            GameKind::Pong => "Pong",
            GameKind::Breakout => "Breakout",
            GameKind::SpaceInvaders => "Space Invaders",
            GameKind::Pacman => "Pac-Man",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            GameKind::Snake => 0,
            GameKind::Tetris => 1,
            GameKind::Pong => 2,
            GameKind::Breakout => 3,
            GameKind::SpaceInvaders => 4,
            GameKind::Pacman => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<GameKind> {
        Self::all().get(index).copied()
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// The one live engine.
enum ActiveGame {
    Snake(Snake),
    Tetris(Tetris),
    Pong(Pong),
    Breakout(Breakout),
    SpaceInvaders(SpaceInvaders),
    Pacman(Pacman),
}

fn tick_engine<E: Engine>(engine: &mut E, controls: &Controls) -> Vec<GameEvent> {
    engine.tick(&E::Input::from(controls))
}

impl ActiveGame {
    fn new(kind: GameKind, config: &ArcadeConfig, rng: GameRng) -> Self {
        match kind {
            GameKind::Snake => ActiveGame::Snake(Snake::new(&config.snake, rng)),
            GameKind::Tetris => ActiveGame::Tetris(Tetris::new(&config.tetris, rng)),
            GameKind::Pong => ActiveGame::Pong(Pong::new(&config.pong, rng)),
            GameKind::Breakout => ActiveGame::Breakout(Breakout::new(&config.breakout, rng)),
            GameKind::SpaceInvaders => {
                ActiveGame::SpaceInvaders(SpaceInvaders::new(&config.invaders, rng))
            }
            GameKind::Pacman => ActiveGame::Pacman(Pacman::new(&config.pacman, rng)),
        }
    }

    fn tick(&mut self, controls: &Controls) -> Vec<GameEvent> {
        match self {
            ActiveGame::Snake(g) => tick_engine(g, controls),
            ActiveGame::Tetris(g) => tick_engine(g, controls),
            ActiveGame::Pong(g) => tick_engine(g, controls),
            ActiveGame::Breakout(g) => tick_engine(g, controls),
            ActiveGame::SpaceInvaders(g) => tick_engine(g, controls),
            ActiveGame::Pacman(g) => tick_engine(g, controls),
        }
    }

    fn press(&mut self, control: Control) -> Vec<GameEvent> {
        match self {
            ActiveGame::Snake(g) => g.press(control),
            ActiveGame::Tetris(g) => g.press(control),
            ActiveGame::Pong(g) => g.press(control),
            ActiveGame::Breakout(g) => g.press(control),
            ActiveGame::SpaceInvaders(g) => g.press(control),
            ActiveGame::Pacman(g) => g.press(control),
        }
    }

    fn scene(&self) -> Scene {
        match self {
            ActiveGame::Snake(g) => g.scene(),
            ActiveGame::Tetris(g) => g.scene(),
            ActiveGame::Pong(g) => g.scene(),
            ActiveGame::Breakout(g) => g.scene(),
            ActiveGame::SpaceInvaders(g) => g.scene(),
            ActiveGame::Pacman(g) => g.scene(),
        }
    }

    fn is_over(&self) -> bool {
        match self {
            ActiveGame::Snake(g) => g.is_over(),
            ActiveGame::Tetris(g) => g.is_over(),
            ActiveGame::Pong(g) => g.is_over(),
            ActiveGame::Breakout(g) => g.is_over(),
            ActiveGame::SpaceInvaders(g) => g.is_over(),
            ActiveGame::Pacman(g) => g.is_over(),
        }
    }
}

/// Host-side state around one engine: the clock, pause, held keys and score.
pub struct Session {
    config: ArcadeConfig,
    kind: Option<GameKind>,
    game: Option<ActiveGame>,
    controls: Controls,
    /// Pressed since the last tick
    fresh: Controls,
    /// Released before any tick saw the press
    releasing: Controls,
    score: u32,
    started: bool,
    paused: bool,
    outcome: Option<Outcome>,
    /// Time owed to the engine since the last whole tick
    pending: Duration,
    master: GameRng,
}

impl Session {
    pub fn new(config: ArcadeConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            config,
            kind: None,
            game: None,
            controls: Controls::default(),
            fresh: Controls::default(),
            releasing: Controls::default(),
            score: 0,
            started: false,
            paused: false,
            outcome: None,
            pending: Duration::ZERO,
            master: GameRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &ArcadeConfig {
        &self.config
    }

    /// Tear down whatever is running and load a fresh `kind`, not yet started.
    pub fn select(&mut self, kind: GameKind) -> Result<(), SessionError> {
        self.teardown();
        self.config
            .validate(kind)
            .map_err(|source| SessionError::EngineUnavailable { kind, source })?;

        let rng = GameRng::seed_from_u64(self.master.gen());
        self.game = Some(ActiveGame::new(kind, &self.config, rng));
        self.kind = Some(kind);
        log::info!("selected {kind}");
        Ok(())
    }

    /// Start the clock. No-op when already running.
    pub fn start(&mut self) -> Result<(), SessionError> {
        let kind = self.kind.ok_or(SessionError::NoGameSelected)?;
        if !self.started {
            self.started = true;
            self.paused = false;
            self.pending = Duration::ZERO;
            log::info!("started {kind}");
        }
        Ok(())
    }

    /// Fresh engine of the current kind, started immediately.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        let kind = self.kind.ok_or(SessionError::NoGameSelected)?;
        self.select(kind)?;
        self.start()
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    pub fn set_paused(&mut self, paused: bool) {
        if !self.started || self.is_over() || self.paused == paused {
            return;
        }
        self.paused = paused;
        self.pending = Duration::ZERO;
        // Keys released while paused never reach us
        self.clear_controls();
        log::info!("{}", if paused { "paused" } else { "resumed" });
    }

    pub fn teardown(&mut self) {
        if let Some(kind) = self.kind.take() {
            log::debug!("tearing down {kind}");
        }
        self.game = None;
        self.clear_controls();
        self.score = 0;
        self.started = false;
        self.paused = false;
        self.outcome = None;
        self.pending = Duration::ZERO;
    }

    /// Mark `control` held and deliver it as a discrete press.
    pub fn press(&mut self, control: Control) -> Vec<GameEvent> {
        self.controls.set(control, true);
        if !self.is_running() {
            return Vec::new();
        }
        self.fresh.set(control, true);
        self.releasing.set(control, false);
        let events = match self.game.as_mut() {
            Some(game) => game.press(control),
            None => Vec::new(),
        };
        self.record(&events);
        events
    }

    /// A tap released before the next tick stays held for that one tick.
    pub fn release(&mut self, control: Control) {
        if self.is_running() && self.fresh.is_held(control) {
            self.releasing.set(control, true);
        } else {
            self.controls.set(control, false);
        }
    }

    fn clear_controls(&mut self) {
        self.controls.clear();
        self.fresh.clear();
        self.releasing.clear();
    }

    /// Exactly one engine tick, unless paused, stopped or over.
    pub fn step(&mut self) -> Vec<GameEvent> {
        if !self.is_running() {
            return Vec::new();
        }
        let events = match self.game.as_mut() {
            Some(game) => game.tick(&self.controls),
            None => Vec::new(),
        };
        for control in Control::ALL {
            if self.releasing.is_held(control) {
                self.controls.set(control, false);
            }
        }
        self.fresh.clear();
        self.releasing.clear();
        self.record(&events);
        events
    }

    /// Feed wall-clock time; runs as many whole ticks as it covers.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        let Some(kind) = self.kind else {
            return Vec::new();
        };
        if !self.is_running() {
            return Vec::new();
        }
        let interval = self.config.tick_interval(kind);
        self.pending += elapsed;

        let mut events = Vec::new();
        let mut steps = 0;
        while self.pending >= interval && steps < MAX_STEPS {
            self.pending -= interval;
            events.extend(self.step());
            steps += 1;
            if !self.is_running() {
                break;
            }
        }
        if steps == MAX_STEPS && self.pending >= interval {
            log::debug!("dropping {:?} of backlog", self.pending);
            self.pending = Duration::ZERO;
        }
        events
    }

    fn record(&mut self, events: &[GameEvent]) {
        self.score += games::points(events);
        if let Some(outcome) = games::outcome(events) {
            self.outcome = Some(outcome);
            if let Some(kind) = self.kind {
                log::info!("{kind} over: {outcome:?}, score {}", self.score);
            }
        }
        if events.contains(&GameEvent::LifeLost) {
            log::debug!("life lost");
        }
    }

    pub fn scene(&self) -> Option<Scene> {
        self.game.as_ref().map(ActiveGame::scene)
    }

    pub fn kind(&self) -> Option<GameKind> {
        self.kind
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_over(&self) -> bool {
        self.game.as_ref().is_some_and(ActiveGame::is_over)
    }

    pub fn is_running(&self) -> bool {
        self.started && !self.paused && self.game.is_some() && !self.is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Session {
        Session::new(ArcadeConfig {
            seed: Some(42),
            ..ArcadeConfig::default()
        })
    }

    #[test]
    fn test_kind_index_roundtrip() {
        for kind in GameKind::all() {
            assert_eq!(GameKind::from_index(kind.index()), Some(*kind));
        }
        assert_eq!(GameKind::from_index(6), None);
        assert_eq!(GameKind::SpaceInvaders.to_string(), "Space Invaders");
    }

    #[test]
    fn test_start_without_game() {
        let mut s = seeded();
        assert!(matches!(s.start(), Err(SessionError::NoGameSelected)));
        assert!(matches!(s.restart(), Err(SessionError::NoGameSelected)));
        assert!(s.step().is_empty());
        assert!(s.scene().is_none());
    }

    #[test]
    fn test_not_started_does_not_tick() {
        let mut s = seeded();
        s.select(GameKind::Snake).unwrap();
        let before = s.scene();
        assert!(s.step().is_empty());
        assert!(s.advance(Duration::from_secs(1)).is_empty());
        assert_eq!(s.scene(), before);
    }

    #[test]
    fn test_advance_runs_whole_ticks() {
        let mut s = seeded();
        s.select(GameKind::Snake).unwrap();
        s.start().unwrap();
        let before = s.scene();
        s.advance(Duration::from_millis(100));
        assert_eq!(s.scene(), before);
        // 100 + 60 crosses one 150 ms boundary
        s.advance(Duration::from_millis(60));
        assert_ne!(s.scene(), before);
    }

    #[test]
    fn test_advance_caps_catch_up() {
        let mut s = seeded();
        s.select(GameKind::Pong).unwrap();
        s.start().unwrap();
        s.advance(Duration::from_secs(10));
        assert_eq!(s.pending, Duration::ZERO);
    }

    #[test]
    fn test_pause_freezes_scene() {
        let mut s = seeded();
        s.select(GameKind::Pong).unwrap();
        s.start().unwrap();
        s.toggle_pause();
        assert!(s.is_paused());
        let before = s.scene();
        for _ in 0..10 {
            s.step();
        }
        s.advance(Duration::from_secs(1));
        assert_eq!(s.scene(), before);
        s.toggle_pause();
        s.step();
        assert_ne!(s.scene(), before);
    }

    #[test]
    fn test_pause_before_start_ignored() {
        let mut s = seeded();
        s.select(GameKind::Tetris).unwrap();
        s.toggle_pause();
        assert!(!s.is_paused());
    }

    #[test]
    fn test_invalid_config_is_unavailable() {
        let mut config = ArcadeConfig::default();
        config.pacman.tick_ms = 0;
        let mut s = Session::new(config);
        let err = s.select(GameKind::Pacman).unwrap_err();
        assert!(matches!(err, SessionError::EngineUnavailable { kind: GameKind::Pacman, .. }));
        assert!(s.kind().is_none());
        assert!(s.select(GameKind::Snake).is_ok());
    }

    #[test]
    fn test_press_and_release_track_controls() {
        let mut s = seeded();
        s.select(GameKind::Breakout).unwrap();
        s.press(Control::Left);
        assert!(s.controls().left);
        s.release(Control::Left);
        assert!(!s.controls().left);
    }

    #[test]
    fn test_tap_survives_one_tick() {
        let mut s = seeded();
        s.select(GameKind::SpaceInvaders).unwrap();
        s.start().unwrap();
        s.press(Control::Fire);
        s.release(Control::Fire);
        assert!(s.controls().fire);
        s.step();
        assert!(!s.controls().fire);
    }

    #[test]
    fn test_held_key_stays_held() {
        let mut s = seeded();
        s.select(GameKind::Pong).unwrap();
        s.start().unwrap();
        s.press(Control::W);
        s.step();
        s.step();
        assert!(s.controls().w);
        s.release(Control::W);
        assert!(!s.controls().w);
    }

    #[test]
    fn test_select_resets_score() {
        let mut s = seeded();
        s.select(GameKind::Tetris).unwrap();
        s.start().unwrap();
        s.score = 500;
        s.select(GameKind::Tetris).unwrap();
        assert_eq!(s.score(), 0);
        assert!(!s.is_started());
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = seeded();
        let mut b = seeded();
        for s in [&mut a, &mut b] {
            s.select(GameKind::Pacman).unwrap();
            s.start().unwrap();
            for _ in 0..30 {
                s.step();
            }
        }
        assert_eq!(a.scene(), b.scene());
    }
}
