//! Terminal rendering for blockfall.
//!
//! Rendering is split into a pure view ([`GameView`] draws into a
//! [`FrameBuffer`]) and an I/O layer ([`TerminalRenderer`] diffs and
//! flushes frames to the terminal). The split keeps layout and colors
//! unit-testable without a tty.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, ScoreLine, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
