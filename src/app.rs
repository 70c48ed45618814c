use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use hexcade::{ArcadeConfig, Control, GameKind, Session};

/// Without release events a key counts as held until repeats stop arriving.
const HOLD_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, PartialEq)]
pub enum Tab {
    Home,
    Game(GameKind),
}

const TABS: [Tab; 7] = [
    Tab::Home,
    Tab::Game(GameKind::Snake),
    Tab::Game(GameKind::Tetris),
    Tab::Game(GameKind::Pong),
    Tab::Game(GameKind::Breakout),
    Tab::Game(GameKind::SpaceInvaders),
    Tab::Game(GameKind::Pacman),
];

impl Tab {
    pub fn all() -> &'static [Tab] {
        &TABS
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Home => " Home ",
            Tab::Game(GameKind::Snake) => " Snake ",
            Tab::Game(GameKind::Tetris) => " Tetris ",
            Tab::Game(GameKind::Pong) => " Pong ",
            Tab::Game(GameKind::Breakout) => " Breakout ",
            Tab::Game(GameKind::SpaceInvaders) => " Invaders ",
            Tab::Game(GameKind::Pacman) => " Pac-Man ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Game(kind) => kind.index() + 1,
        }
    }
}

fn control_for(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Up => Some(Control::Up),
        KeyCode::Down => Some(Control::Down),
        KeyCode::Left => Some(Control::Left),
        KeyCode::Right => Some(Control::Right),
        KeyCode::Char('w') | KeyCode::Char('W') => Some(Control::W),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Control::S),
        KeyCode::Char(' ') => Some(Control::Fire),
        _ => None,
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize, // 0-5 for home screen game selection
    pub session: Session,
    /// Last error shown in the game status bar
    pub status: Option<String>,
    /// Terminal reports key releases
    enhanced: bool,
    /// Last press or repeat per control, for the repeat-timeout fallback
    last_seen: [Option<Instant>; Control::ALL.len()],
    last_tick: Instant,
}

impl App {
    pub fn new(config: ArcadeConfig, enhanced: bool) -> Self {
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            session: Session::new(config),
            status: None,
            enhanced,
            last_seen: [None; Control::ALL.len()],
            last_tick: Instant::now(),
        }
    }

    pub fn on_tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;

        if !self.enhanced {
            self.expire_held(now);
        }
        if matches!(self.current_tab, Tab::Game(_)) {
            self.session.advance(elapsed);
        }
    }

    fn expire_held(&mut self, now: Instant) {
        for (i, control) in Control::ALL.into_iter().enumerate() {
            if let Some(seen) = self.last_seen[i] {
                if now.duration_since(seen) > HOLD_TIMEOUT {
                    self.last_seen[i] = None;
                    self.session.release(control);
                }
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                if matches!(self.current_tab, Tab::Home) {
                    self.should_quit = true;
                    return;
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc => {
                if !matches!(self.current_tab, Tab::Home) {
                    self.open_tab(Tab::Home);
                    return;
                }
            }
            _ => {}
        }

        match self.current_tab {
            Tab::Home => self.on_home_key(key),
            Tab::Game(_) => self.on_game_key(key),
        }
    }

    fn on_home_key(&mut self, key: KeyEvent) {
        if !key.modifiers.is_empty() {
            return;
        }
        let count = GameKind::all().len();
        match key.code {
            KeyCode::Char(c @ '1'..='6') => {
                let idx = c as usize - '1' as usize;
                if let Some(kind) = GameKind::from_index(idx) {
                    self.selected_game = idx;
                    self.open_tab(Tab::Game(kind));
                }
            }
            // Arrow key navigation for game tile selection (2 rows: 3 + 3)
            KeyCode::Right => self.selected_game = (self.selected_game + 1) % count,
            KeyCode::Left => self.selected_game = (self.selected_game + count - 1) % count,
            KeyCode::Down | KeyCode::Up => self.selected_game = (self.selected_game + 3) % count,
            // Enter launches the selected game
            KeyCode::Enter => {
                if let Some(kind) = GameKind::from_index(self.selected_game) {
                    self.open_tab(Tab::Game(kind));
                }
            }
            _ => {}
        }
    }

    fn on_game_key(&mut self, key: KeyEvent) {
        if let Some(control) = control_for(key.code) {
            if let Some(i) = Control::ALL.iter().position(|c| *c == control) {
                self.last_seen[i] = Some(Instant::now());
            }
            // Repeats refresh the hold without re-triggering the press
            if key.kind != KeyEventKind::Repeat {
                self.session.press(control);
            }
            // Without releases every Fire is a tap so repeats keep shooting
            if control == Control::Fire && !self.enhanced {
                self.session.release(control);
            }
            return;
        }

        match key.code {
            KeyCode::Enter => {
                let result = if self.session.is_over() {
                    self.session.restart()
                } else {
                    self.session.start()
                };
                self.report(result);
            }
            KeyCode::Char('p') | KeyCode::Char('P') => self.session.toggle_pause(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let result = self.session.restart();
                self.report(result);
            }
            _ => {}
        }
    }

    pub fn on_key_up(&mut self, key: KeyEvent) {
        if let Some(control) = control_for(key.code) {
            if let Some(i) = Control::ALL.iter().position(|c| *c == control) {
                self.last_seen[i] = None;
            }
            self.session.release(control);
        }
    }

    fn report(&mut self, result: Result<(), hexcade::SessionError>) {
        match result {
            Ok(()) => self.status = None,
            Err(e) => {
                log::error!("{e}");
                self.status = Some(e.to_string());
            }
        }
    }

    /// Switching tabs tears down the old game and loads the new one.
    fn open_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
        self.last_seen = [None; Control::ALL.len()];
        match tab {
            Tab::Home => {
                self.session.teardown();
                self.status = None;
            }
            Tab::Game(kind) => {
                self.selected_game = kind.index();
                let result = self.session.select(kind);
                self.report(result);
            }
        }
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.open_tab(tabs[(idx + 1) % tabs.len()]);
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.open_tab(tabs[(idx + tabs.len() - 1) % tabs.len()]);
    }
}
