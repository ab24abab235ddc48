//! Core types shared across the application
//! This module contains pure data types with no external dependencies

/// Default board dimensions (cells)
pub const DEFAULT_BOARD_WIDTH: usize = 10;
pub const DEFAULT_BOARD_HEIGHT: usize = 20;

/// Game timing constants (in milliseconds)
pub const TICK_MS: u32 = 16;
pub const BASE_DROP_MS: u32 = 1000;
pub const FLASH_MS: u32 = 100;
pub const RESPAWN_DELAY_MS: u32 = 150;

/// Gravity speeds up by this factor per level: `base * 0.8^(level-1)`.
pub const SPEED_FACTOR: f64 = 0.8;

/// The computed drop interval never goes below this.
/// The speed curve alone would eventually reach zero.
pub const DROP_INTERVAL_FLOOR_MS: u32 = 10;

/// A level-up every this many cleared lines.
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per simultaneous clear count, multiplied by the current level.
/// A piece spans at most 4 rows, so index 4 is the ceiling.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// How many score records the store keeps.
pub const TOP_SCORES_CAP: usize = 5;

/// Board cell contents.
///
/// `0` is empty, `1..=7` map to piece kinds, and [`FLASH_CELL`] is a
/// transient highlight painted on rows about to be cleared.
pub type CellValue = u8;

pub const EMPTY_CELL: CellValue = 0;
pub const FLASH_CELL: CellValue = 8;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

/// All kinds, in cell-value order.
pub const ALL_KINDS: [PieceKind; 7] = [
    PieceKind::I,
    PieceKind::J,
    PieceKind::L,
    PieceKind::O,
    PieceKind::S,
    PieceKind::T,
    PieceKind::Z,
];

impl PieceKind {
    /// The cell value stamped into the board for this kind.
    pub fn cell_value(self) -> CellValue {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::T => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::cell_value`]; `None` for empty or the
    /// flash sentinel.
    pub fn from_cell_value(v: CellValue) -> Option<Self> {
        match v {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::J),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::O),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::T),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::T => "T",
            PieceKind::Z => "Z",
        }
    }
}

/// Rotation direction for the transform engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Cw,
    Ccw,
}

/// Discrete player commands delivered between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateCw,
    HardDrop,
    TogglePause,
    Reset,
}

/// Run state of a game session.
///
/// `Paused -> Playing` via [`Command::TogglePause`], `Playing -> GameOver`
/// on a blocked spawn, and `GameOver -> Playing` only via [`Command::Reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Playing,
    Paused,
    GameOver,
}

/// Top-left offset of the active piece in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Engine configuration.
///
/// The flash effect and the board dimensions are options, not code
/// paths; zeroing the delays makes every lock resolve synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Drop interval at level 1, in milliseconds.
    pub base_drop_ms: u32,
    /// Paint cleared rows with [`FLASH_CELL`] and collapse after `flash_ms`.
    pub flash_enabled: bool,
    pub flash_ms: u32,
    /// Delay between a lock and the next spawn. Zero spawns synchronously.
    pub respawn_delay_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            base_drop_ms: BASE_DROP_MS,
            flash_enabled: true,
            flash_ms: FLASH_MS,
            respawn_delay_ms: RESPAWN_DELAY_MS,
        }
    }
}

impl GameConfig {
    /// A configuration with no deferred effects. Locks collapse rows and
    /// respawn in the same call, which keeps tests single-step.
    pub fn immediate() -> Self {
        Self {
            flash_enabled: false,
            flash_ms: 0,
            respawn_delay_ms: 0,
            ..Self::default()
        }
    }
}

/// Events surfaced by the session for observers (renderer, score store).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A piece merged into the board; `cleared` rows were (or are about
    /// to be) removed.
    Locked { cleared: u32 },
    /// The run ended with this final score.
    GameOver { score: u32 },
}
