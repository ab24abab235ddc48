//! GameView: maps a [`Game`] into a terminal framebuffer.
//!
//! This module is pure (no I/O), so layout and colors can be
//! unit-tested against framebuffer contents.

use blockfall_core::Game;
use blockfall_types::{CellValue, RunState, FLASH_CELL};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// One line of the top-score panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLine {
    pub score: u32,
    /// `YYYY-MM-DD`.
    pub date: String,
}

/// Renders the board, the active and next pieces, and the side panel.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    /// Render into an existing framebuffer.
    ///
    /// The hot path: callers reuse one framebuffer across frames and
    /// only resize when the terminal size changes.
    pub fn render_into(
        &self,
        game: &Game,
        top_scores: &[ScoreLine],
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let board_w = game.board().width() as u16;
        let board_h = game.board().height() as u16;
        let board_px_w = board_w * self.cell_w;
        let board_px_h = board_h * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w + PANEL_WIDTH) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let well = CellStyle {
            fg: Rgb::new(90, 90, 100),
            bg: Rgb::new(20, 20, 28),
            bold: false,
            dim: true,
        };
        let border = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };

        fb.fill_rect(start_x + 1, start_y + 1, board_px_w, board_px_h, '·', well);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        // Locked cells and the line-clear flash.
        for y in 0..board_h {
            for x in 0..board_w {
                let value = game
                    .board()
                    .get(x as i32, y as i32)
                    .unwrap_or_default();
                if let Some(color) = cell_color(value) {
                    self.draw_board_cell(fb, start_x, start_y, x, y, color);
                }
            }
        }

        // Active piece. Cells above the top edge stay invisible.
        if let Some(shape) = game.piece() {
            let pos = game.pos();
            for (dx, dy, value) in shape.occupied() {
                let x = pos.x + dx as i32;
                let y = pos.y + dy as i32;
                if x < 0 || x >= board_w as i32 || y < 0 || y >= board_h as i32 {
                    continue;
                }
                if let Some(color) = cell_color(value) {
                    self.draw_board_cell(fb, start_x, start_y, x as u16, y as u16, color);
                }
            }
        }

        self.draw_side_panel(fb, game, top_scores, viewport, start_x, start_y, frame_w);

        match game.run_state() {
            RunState::Paused => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PAUSED")
            }
            RunState::GameOver => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "GAME OVER")
            }
            RunState::Playing => {}
        }
    }

    /// Convenience helper that allocates a fresh framebuffer.
    pub fn render(&self, game: &Game, top_scores: &[ScoreLine], viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, top_scores, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_board_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        x: u16,
        y: u16,
        color: Rgb,
    ) {
        let style = CellStyle {
            fg: color,
            bg: Rgb::new(20, 20, 28),
            bold: true,
            dim: false,
        };
        let px = start_x + 1 + x * self.cell_w;
        let py = start_y + 1 + y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        game: &Game,
        top_scores: &[ScoreLine],
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        let value = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };
        let dim = CellStyle { dim: true, ..value };

        let mut y = start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, game.score(), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LINES", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, game.lines(), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LEVEL", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, game.level(), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        y = self.draw_next_preview(fb, game, panel_x, y);
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "TOP SCORES", label);
        y = y.saturating_add(1);
        for (i, line) in top_scores.iter().enumerate() {
            if y >= viewport.height {
                break;
            }
            fb.put_u32(panel_x, y, (i as u32) + 1, dim);
            fb.put_char(panel_x + 1, y, '.', dim);
            fb.put_u32(panel_x + 3, y, line.score, value);
            fb.put_str(panel_x + 10, y, &line.date, dim);
            y = y.saturating_add(1);
        }
        if top_scores.is_empty() {
            fb.put_str(panel_x, y, "-", dim);
        }
    }

    /// Draw the next piece as a mini matrix; returns the row below it.
    fn draw_next_preview(&self, fb: &mut FrameBuffer, game: &Game, panel_x: u16, y: u16) -> u16 {
        let shape = game.next_piece();
        for (dx, dy, value) in shape.occupied() {
            if let Some(color) = cell_color(value) {
                let style = CellStyle {
                    fg: color,
                    bg: Rgb::new(0, 0, 0),
                    bold: true,
                    dim: false,
                };
                fb.fill_rect(
                    panel_x + (dx as u16) * self.cell_w,
                    y + dy as u16,
                    self.cell_w,
                    1,
                    '█',
                    style,
                );
            }
        }
        y.saturating_add(shape.height() as u16)
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        fb.put_str(x, mid_y, text, style);
    }
}

/// Room reserved to the right of the board for the side panel.
const PANEL_WIDTH: u16 = 24;

/// Display color for a board cell value. Empty cells have none; the
/// flash sentinel renders white.
fn cell_color(value: CellValue) -> Option<Rgb> {
    match value {
        1 => Some(Rgb::new(255, 51, 102)),
        2 => Some(Rgb::new(51, 204, 255)),
        3 => Some(Rgb::new(102, 255, 153)),
        4 => Some(Rgb::new(204, 51, 255)),
        5 => Some(Rgb::new(255, 153, 51)),
        6 => Some(Rgb::new(255, 255, 51)),
        7 => Some(Rgb::new(51, 102, 255)),
        FLASH_CELL => Some(Rgb::new(255, 255, 255)),
        _ => None,
    }
}
