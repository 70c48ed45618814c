//! hexcade - six arcade engines behind one session
//!
//! Core modules:
//! - `games`: per-game simulation (state, tick, collision, events)
//! - `geometry`: AABB and grid helpers shared by the engines
//! - `scene`: renderer-agnostic draw list produced by each engine
//! - `session`: owns the active engine, the clock and the score
//! - `config`: JSON-backed tuning for every game

pub mod config;
pub mod error;
pub mod games;
pub mod geometry;
pub mod input;
pub mod scene;
pub mod session;

pub use config::ArcadeConfig;
pub use error::{ConfigError, SessionError};
pub use games::{Engine, GameEvent, Outcome, Side};
pub use input::{Control, Controls};
pub use scene::{Rgb, Scene, Shape};
pub use session::{GameKind, Session};

/// Seedable random source injected into every engine.
pub type GameRng = rand_pcg::Pcg32;
