//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and
//! simulation logic. It has **zero dependencies** on UI or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Timing is logical (elapsed milliseconds), never wall-clock
//! - **Portable**: Can run in any environment (terminal, headless)
//!
//! # Module Structure
//!
//! - [`board`]: the mutable grid with merge and line-collapse primitives
//! - [`catalog`]: canonical shape matrices for the 7 piece kinds
//! - [`motion`]: pure collision and rotation transforms
//! - [`rng`]: seeded LCG and uniform piece draws
//! - [`scoring`]: line scores, leveling, and the gravity speed curve
//! - [`session`]: the game session driving gravity, locking, and clears
//!
//! # Game Rules
//!
//! The ruleset is deliberately simple (no kick tables, no hold, no
//! combo chains):
//!
//! - **Uniform randomizer**: every spawn draws independently from the 7 kinds
//! - **Matrix rotation**: transpose + reversal of the shape matrix
//! - **Best-effort wall kick**: oscillating horizontal probes, reverted
//!   when no offset within the piece width fits
//! - **Scoring**: 100/300/500/800 points for 1-4 lines, times the level
//! - **Leveling**: one level per 10 lines; gravity speeds up 20% per level
//!
//! # Example
//!
//! ```
//! use blockfall_core::Game;
//! use blockfall_types::{Command, GameConfig, RunState};
//!
//! let mut game = Game::new(GameConfig::immediate(), 12345);
//! assert_eq!(game.run_state(), RunState::Paused);
//!
//! game.apply(Command::TogglePause);
//! game.apply(Command::MoveLeft);
//! game.apply(Command::HardDrop);
//! assert!(game.piece().is_some()); // next piece spawned at the top
//! ```
//!
//! Call [`Game::tick`] every frame with the elapsed milliseconds.

pub mod board;
pub mod catalog;
pub mod motion;
pub mod rng;
pub mod scoring;
pub mod session;

pub use blockfall_types as types;

// Re-export commonly used items for convenience
pub use board::Board;
pub use catalog::Shape;
pub use motion::{collides, rotated};
pub use rng::SimpleRng;
pub use scoring::{drop_interval_ms, level_for, score_for};
pub use session::Game;
