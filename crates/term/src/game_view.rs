//! GameView: maps engine state into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested. Sprites are painted
//! at their current world positions, so mid-animation tiles land between
//! cells; everything is clipped to the play area so spawn points above the
//! grid stay invisible until tiles drop in.

use tui_blast_core::EngineSnapshot;
use tui_blast_types::TileKind;

use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::sprites::TileSprites;

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

/// Session numbers shown in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionView {
    pub score: u32,
    pub moves_left: u32,
    pub game_over: bool,
}

/// Adapter status shown in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterStatusView {
    pub client_count: u16,
    pub controller_id: Option<usize>,
}

/// A lightweight terminal renderer for the tile grid.
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    /// Grid cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 4x2 keeps tiles roughly square under typical glyph aspect ratios.
        Self {
            cell_w: 4,
            cell_h: 2,
        }
    }
}

struct Layout {
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self { cell_w, cell_h }
    }

    fn layout(&self, grid_w: u8, grid_h: u8, viewport: Viewport) -> Layout {
        let frame_w = (grid_w as u16) * self.cell_w + 2;
        let frame_h = (grid_h as u16) * self.cell_h + 2;
        Layout {
            start_x: viewport.width.saturating_sub(frame_w) / 2,
            start_y: viewport.height.saturating_sub(frame_h) / 2,
            frame_w,
            frame_h,
        }
    }

    /// Render into an existing framebuffer (the allocation-free hot path).
    pub fn render_into(
        &self,
        snap: &EngineSnapshot,
        sprites: &TileSprites,
        session: &SessionView,
        cursor: Option<(u8, u8)>,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let layout = self.layout(snap.width, snap.height, viewport);

        let bg = CellStyle {
            fg: Rgb::new(90, 90, 100),
            bg: Rgb::new(25, 25, 35),
            bold: false,
            dim: true,
        };
        let border = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };

        // Background with a dot per cell center.
        fb.fill_rect(
            layout.start_x + 1,
            layout.start_y + 1,
            layout.frame_w - 2,
            layout.frame_h - 2,
            ' ',
            bg,
        );
        for gy in 0..snap.height {
            for gx in 0..snap.width {
                let (px, py) = self.cell_origin(&layout, snap.height, gx, gy);
                fb.put_char(px + self.cell_w / 2, py + self.cell_h / 2, '·', bg);
            }
        }

        self.draw_border(fb, &layout, border);

        // Sprites at their live world positions.
        for (_, sprite) in sprites.iter() {
            let style = CellStyle {
                fg: kind_color(sprite.kind),
                bg: Rgb::new(25, 25, 35),
                bold: sprite.scale > 1.0,
                dim: false,
            };
            self.draw_sprite_rect(fb, &layout, snap.height, sprite.position.x, sprite.position.y, style);
        }

        // Cursor: re-tint the backgrounds of the hovered cell.
        if let Some((cx, cy)) = cursor {
            if cx < snap.width && cy < snap.height {
                let (px, py) = self.cell_origin(&layout, snap.height, cx, cy);
                self.highlight_rect(fb, px, py);
            }
        }

        self.draw_side_panel(fb, snap, session, adapter, viewport, &layout);

        if session.game_over {
            self.draw_overlay_text(fb, &layout, "OUT OF MOVES");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &EngineSnapshot,
        sprites: &TileSprites,
        session: &SessionView,
        cursor: Option<(u8, u8)>,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, sprites, session, cursor, adapter, viewport, &mut fb);
        fb
    }

    /// Map a terminal mouse position back to grid coordinates.
    ///
    /// Returns `None` outside the play area. This is the pointer-input
    /// translation path; the caller forwards the result as an activation.
    pub fn hit_test(
        &self,
        grid_w: u8,
        grid_h: u8,
        viewport: Viewport,
        col: u16,
        row: u16,
    ) -> Option<(i16, i16)> {
        let layout = self.layout(grid_w, grid_h, viewport);
        let inner_x = col.checked_sub(layout.start_x + 1)?;
        let inner_y = row.checked_sub(layout.start_y + 1)?;
        if inner_x >= layout.frame_w - 2 || inner_y >= layout.frame_h - 2 {
            return None;
        }
        let gx = (inner_x / self.cell_w) as i16;
        let gy_from_top = (inner_y / self.cell_h) as i16;
        Some((gx, grid_h as i16 - 1 - gy_from_top))
    }

    /// Terminal origin of a grid cell (row 0 at the bottom of the frame).
    fn cell_origin(&self, layout: &Layout, grid_h: u8, gx: u8, gy: u8) -> (u16, u16) {
        let px = layout.start_x + 1 + (gx as u16) * self.cell_w;
        let py = layout.start_y + 1 + ((grid_h - 1 - gy) as u16) * self.cell_h;
        (px, py)
    }

    /// Paint a cell-sized rect at a world position, clipped to the play area.
    fn draw_sprite_rect(
        &self,
        fb: &mut FrameBuffer,
        layout: &Layout,
        grid_h: u8,
        wx: f32,
        wy: f32,
        style: CellStyle,
    ) {
        let top = grid_h as f32 - 1.0;
        let px = (layout.start_x + 1) as i32 + (wx * self.cell_w as f32).round() as i32;
        let py = (layout.start_y + 1) as i32 + ((top - wy) * self.cell_h as f32).round() as i32;

        let min_x = (layout.start_x + 1) as i32;
        let min_y = (layout.start_y + 1) as i32;
        let max_x = (layout.start_x + layout.frame_w - 1) as i32;
        let max_y = (layout.start_y + layout.frame_h - 1) as i32;

        for dy in 0..self.cell_h as i32 {
            for dx in 0..self.cell_w as i32 {
                let x = px + dx;
                let y = py + dy;
                if x >= min_x && x < max_x && y >= min_y && y < max_y {
                    fb.put_char(x as u16, y as u16, '█', style);
                }
            }
        }
    }

    fn highlight_rect(&self, fb: &mut FrameBuffer, px: u16, py: u16) {
        let highlight = Rgb::new(90, 90, 130);
        for dy in 0..self.cell_h {
            for dx in 0..self.cell_w {
                if let Some(mut cell) = fb.get(px + dx, py + dy) {
                    cell.style.bg = highlight;
                    cell.style.bold = true;
                    fb.set(px + dx, py + dy, cell);
                }
            }
        }
    }

    fn draw_border(&self, fb: &mut FrameBuffer, layout: &Layout, style: CellStyle) {
        let (x, y, w, h) = (layout.start_x, layout.start_y, layout.frame_w, layout.frame_h);
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

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &EngineSnapshot,
        session: &SessionView,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        layout: &Layout,
    ) {
        let panel_x = layout.start_x.saturating_add(layout.frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        let value = CellStyle {
            fg: Rgb::new(190, 190, 190),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };

        let mut y = layout.start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, session.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "MOVES", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, session.moves_left, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "STATE", label);
        y = y.saturating_add(1);
        let state = if session.game_over {
            "over"
        } else {
            snap.phase.as_str()
        };
        fb.put_str(panel_x, y, state, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "AI", label);
        y = y.saturating_add(1);
        match adapter {
            Some(status) => {
                fb.put_str(panel_x, y, "ON", value);
                y = y.saturating_add(1);
                fb.put_char(panel_x, y, 'C', value);
                fb.put_u32(panel_x + 2, y, status.client_count as u32, value);
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "CTRL", value);
                match status.controller_id {
                    Some(id) => fb.put_u32(panel_x + 5, y, id as u32, value),
                    None => fb.put_char(panel_x + 5, y, '-', value),
                }
            }
            None => {
                fb.put_str(panel_x, y, "OFF", value);
            }
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, layout: &Layout, text: &str) {
        let mid_y = layout.start_y.saturating_add(layout.frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = layout
            .start_x
            .saturating_add(layout.frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        fb.put_str(x, mid_y, text, style);
    }
}

fn kind_color(kind: TileKind) -> Rgb {
    match kind {
        TileKind::Red => Rgb::new(220, 80, 80),
        TileKind::Blue => Rgb::new(80, 120, 220),
        TileKind::Green => Rgb::new(100, 220, 120),
        TileKind::Yellow => Rgb::new(240, 220, 80),
        TileKind::Magenta => Rgb::new(200, 120, 220),
    }
}
