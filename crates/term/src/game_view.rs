//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::particles::CELL_PX;
use crate::core::{GameSnapshot, Particle};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const PLAY_BG: Rgb = Rgb::new(38, 34, 30);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const FLASH_BG: Rgb = Rgb::new(245, 238, 220);

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Where the board frame landed in the framebuffer.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with_particles(snap, &[], viewport, fb);
    }

    /// Render a snapshot plus line-clear particles.
    ///
    /// Particles live in pixel space (one board cell is `CELL_PX` pixels) and
    /// only show on empty board cells.
    pub fn render_into_with_particles(
        &self,
        snap: &GameSnapshot,
        particles: &[Particle],
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let board_px_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_px_h = (BOARD_HEIGHT as u16) * self.cell_h;
        let frame = Frame {
            x: viewport.width.saturating_sub(board_px_w + 2) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(board_px_h + 2) / 2,
                AnchorY::Top => 0,
            },
            w: board_px_w + 2,
            h: board_px_h + 2,
        };

        let bg = CellStyle::new(Rgb::new(90, 84, 76), PLAY_BG);
        fb.fill_rect(frame.x + 1, frame.y + 1, board_px_w, board_px_h, ' ', bg);
        self.draw_border(fb, frame, CellStyle::new(Rgb::new(184, 170, 150), PANEL_BG));

        for y in 0..BOARD_HEIGHT as u16 {
            let flashing = snap.is_flashing(y as usize);
            for x in 0..BOARD_WIDTH as u16 {
                match snap.board[y as usize][x as usize] {
                    Some(_) if flashing => {
                        let style = CellStyle {
                            bold: true,
                            ..CellStyle::new(FLASH_BG, FLASH_BG)
                        };
                        self.fill_cell_rect(fb, frame, x, y, '▓', style);
                    }
                    Some(kind) => self.draw_block(fb, frame, x, y, kind),
                    None => self.draw_empty_cell(fb, frame, x, y),
                }
            }
        }

        for p in particles {
            self.draw_particle(fb, frame, snap, p);
        }

        if let Some(current) = &snap.current {
            for &(x, y) in current.blocks.iter() {
                if x >= 0 && x < BOARD_WIDTH as i32 && y >= 0 && y < BOARD_HEIGHT as i32 {
                    self.draw_block(fb, frame, x as u16, y as u16, current.kind);
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if snap.game_over {
            self.draw_overlay_text(fb, frame, "GAME OVER", Some("R restart  Q quit"));
        } else if snap.paused {
            self.draw_overlay_text(fb, frame, "PAUSED", Some("P resume"));
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
        let Frame { x, y, w, h } = frame;
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

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16) {
        let style = CellStyle {
            dim: true,
            ..CellStyle::new(Rgb::new(88, 80, 72), PLAY_BG)
        };
        self.fill_cell_rect(fb, frame, x, y, '·', style);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16, kind: PieceKind) {
        let style = CellStyle {
            bold: true,
            ..CellStyle::new(kind.color(), PLAY_BG)
        };
        self.fill_cell_rect(fb, frame, x, y, '█', style);
    }

    fn draw_particle(&self, fb: &mut FrameBuffer, frame: Frame, snap: &GameSnapshot, p: &Particle) {
        if p.x < 0.0 || p.y < 0.0 {
            return;
        }
        let cx = (p.x / CELL_PX) as usize;
        let cy = (p.y / CELL_PX) as usize;
        if cx >= BOARD_WIDTH as usize || cy >= BOARD_HEIGHT as usize {
            return;
        }
        if snap.board[cy][cx].is_some() {
            return;
        }
        let style = CellStyle {
            dim: p.alpha() < 128,
            ..CellStyle::new(p.color, PLAY_BG)
        };
        let ch = if p.size >= 4.0 { '✦' } else { '∙' };
        self.fill_cell_rect(fb, frame, cx as u16, cy as u16, ch, style);
    }

    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = frame.x + 1 + cell_x * self.cell_w;
        let py = frame.y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::new(Rgb::new(210, 180, 140), PANEL_BG)
        };
        let value = CellStyle::new(Rgb::new(220, 215, 205), PANEL_BG);

        let mut y = frame.y;
        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if let Some(next) = &snap.next {
            let style = CellStyle {
                bold: true,
                ..CellStyle::new(next.kind.color(), PANEL_BG)
            };
            for &(dx, dy) in next.blocks.iter() {
                let px = panel_x.saturating_add(dx as u16 * self.cell_w);
                let py = y.saturating_add(dy as u16 * self.cell_h);
                fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', style);
            }
        }
        y = y.saturating_add(3 * self.cell_h);

        for (name, n) in [("SCORE", snap.score), ("LEVEL", snap.level), ("LINES", snap.lines)] {
            fb.put_str(panel_x, y, name, label);
            y = y.saturating_add(1);
            fb.put_u32(panel_x, y, n, value);
            y = y.saturating_add(2);
        }

        if snap.combo > 1 {
            fb.put_str(panel_x, y, "COMBO x", label);
            fb.put_u32(panel_x + 7, y, snap.combo, label);
        }
        y = y.saturating_add(2);

        let dim = CellStyle { dim: true, ..value };
        let hints = [
            "←→ move  ↓ drop",
            "↑ rotate",
            "space hard drop",
            "P pause  R restart",
        ];
        for line in hints {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, dim);
            y = y.saturating_add(1);
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        text: &str,
        hint: Option<&str>,
    ) {
        let style = CellStyle {
            bold: true,
            ..CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG)
        };
        let mid_y = frame.y.saturating_add(frame.h / 2);
        let center = |s: &str| {
            let w = s.chars().count() as u16;
            frame.x.saturating_add(frame.w.saturating_sub(w) / 2)
        };
        fb.put_str(center(text), mid_y, text, style);
        if let Some(hint) = hint {
            let dim = CellStyle { dim: true, bold: false, ..style };
            fb.put_str(center(hint), mid_y.saturating_add(1), hint, dim);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameEngine;

    fn find(fb: &FrameBuffer, text: &str) -> bool {
        (0..fb.height()).any(|y| fb.row_text(y).contains(text))
    }

    #[test]
    fn renders_panel_labels() {
        let snap = GameEngine::new(1).snapshot();
        let fb = GameView::default().render(&snap, Viewport::new(60, 24));
        assert!(find(&fb, "SCORE"));
        assert!(find(&fb, "LEVEL"));
        assert!(find(&fb, "NEXT"));
        assert!(!find(&fb, "PAUSED"));
    }

    #[test]
    fn paused_overlay() {
        let mut game = GameEngine::new(1);
        game.apply_action(crate::types::GameAction::Pause);
        let fb = GameView::default().render(&game.snapshot(), Viewport::new(60, 24));
        assert!(find(&fb, "PAUSED"));
    }

    #[test]
    fn flashing_rows_use_flash_glyph() {
        let mut snap = GameSnapshot::default();
        snap.board[19] = [Some(PieceKind::I); BOARD_WIDTH as usize];
        snap.flash_lines.push(19);
        let fb = GameView::default()
            .with_anchor_y(AnchorY::Top)
            .render(&snap, Viewport::new(60, 24));
        // Row 19 sits below the top border.
        assert!(fb.row_text(20).contains("▓▓▓▓"));
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let snap = GameEngine::new(1).snapshot();
        let fb = GameView::default().render(&snap, Viewport::new(5, 3));
        assert_eq!(fb.width(), 5);
    }
}
