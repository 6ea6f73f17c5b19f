//! Terminal cell surface.
//!
//! Rasterizes [`Surface`] draw calls onto a grid of terminal cells, each
//! covering `cell_width x cell_height` virtual pixels, then writes the grid
//! into a Ratatui buffer. Glyph ink and background tints are kept apart so a
//! particle's glow and the static overlay show through text drawn later.

use neonfx_core::{Bounds, Ink, PixelBuffer, Point, Rgb, Surface};
use ratatui::{buffer::Buffer, layout::Rect};

use crate::chars::{LINE_CHAR, STAR_CHARS};

/// Inks fainter than this are not drawn.
const MIN_ALPHA: f32 = 0.01;
/// Strength of a glow halo relative to the particle's own opacity.
const GLOW_STRENGTH: f32 = 0.35;

/// What a single cell shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellInk {
    pub ch: char,
    pub ink: Ink,
}

/// A cell grid implementing [`Surface`].
#[derive(Debug, Clone)]
pub struct CellSurface {
    cols: u16,
    rows: u16,
    cell_width: f32,
    cell_height: f32,
    glyphs: Vec<Option<CellInk>>,
    glow: Vec<Option<Ink>>,
    overlay: Vec<Option<Ink>>,
}

impl CellSurface {
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cols: 0,
            rows: 0,
            cell_width,
            cell_height,
            glyphs: Vec::new(),
            glow: Vec::new(),
            overlay: Vec::new(),
        }
    }

    /// Resize the grid, discarding anything drawn.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        let len = cols as usize * rows as usize;
        self.glyphs = vec![None; len];
        self.glow = vec![None; len];
        self.overlay = vec![None; len];
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Virtual-pixel centre of a cell.
    pub fn center_of(&self, col: u16, row: u16) -> Point {
        Point::new(
            (col as f32 + 0.5) * self.cell_width,
            (row as f32 + 0.5) * self.cell_height,
        )
    }

    /// Cell containing a virtual-pixel point, if it is on the grid.
    pub fn cell_of(&self, p: Point) -> Option<(u16, u16)> {
        if !p.is_finite() || p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let col = (p.x / self.cell_width) as u32;
        let row = (p.y / self.cell_height) as u32;
        if col < self.cols as u32 && row < self.rows as u32 {
            Some((col as u16, row as u16))
        } else {
            None
        }
    }

    pub fn glyph(&self, col: u16, row: u16) -> Option<CellInk> {
        self.index(col, row).and_then(|i| self.glyphs[i])
    }

    pub fn glow(&self, col: u16, row: u16) -> Option<Ink> {
        self.index(col, row).and_then(|i| self.glow[i])
    }

    pub fn overlay(&self, col: u16, row: u16) -> Option<Ink> {
        self.index(col, row).and_then(|i| self.overlay[i])
    }

    fn index(&self, col: u16, row: u16) -> Option<usize> {
        if col < self.cols && row < self.rows {
            Some(row as usize * self.cols as usize + col as usize)
        } else {
            None
        }
    }

    /// Put a glyph, keeping whichever of old and new is more opaque.
    fn plot(&mut self, col: u16, row: u16, ch: char, ink: Ink) {
        if ink.alpha < MIN_ALPHA {
            return;
        }
        if let Some(i) = self.index(col, row) {
            match self.glyphs[i] {
                Some(existing) if existing.ink.alpha > ink.alpha => {}
                _ => self.glyphs[i] = Some(CellInk { ch, ink }),
            }
        }
    }

    fn tint(&mut self, col: u16, row: u16, ink: Ink) {
        if ink.alpha < MIN_ALPHA {
            return;
        }
        if let Some(i) = self.index(col, row) {
            match self.glow[i] {
                Some(existing) if existing.alpha > ink.alpha => {}
                _ => self.glow[i] = Some(ink),
            }
        }
    }

    /// Write the grid into `buf`, with the grid's origin at `area`'s corner.
    pub fn flush(&self, buf: &mut Buffer, area: Rect) {
        let cols = self.cols.min(area.width);
        let rows = self.rows.min(area.height);

        for row in 0..rows {
            for col in 0..cols {
                let Some(i) = self.index(col, row) else {
                    continue;
                };
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };

                if let Some(glyph) = self.glyphs[i] {
                    let fg = Rgb::BACKGROUND.lerp(glyph.ink.rgb, glyph.ink.alpha);
                    cell.set_char(glyph.ch).set_fg(fg.into());
                }

                let mut bg = None;
                if let Some(glow) = self.glow[i] {
                    bg = Some(Rgb::BACKGROUND.lerp(glow.rgb, glow.alpha));
                }
                if let Some(overlay) = self.overlay[i] {
                    let base = bg.unwrap_or(Rgb::BACKGROUND);
                    bg = Some(base.lerp(overlay.rgb, overlay.alpha));
                }
                if let Some(bg) = bg {
                    cell.set_bg(bg.into());
                }
            }
        }
    }
}

impl Surface for CellSurface {
    fn bounds(&self) -> Bounds {
        Bounds::new(
            self.cols as f32 * self.cell_width,
            self.rows as f32 * self.cell_height,
        )
    }

    fn clear(&mut self) {
        self.glyphs.fill(None);
        self.glow.fill(None);
        self.overlay.fill(None);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, glow: f32, ink: Ink) {
        let Some((cc, cr)) = self.cell_of(center) else {
            return;
        };

        let ch = if radius < 1.5 {
            STAR_CHARS[0]
        } else if radius < 2.5 {
            STAR_CHARS[1]
        } else {
            STAR_CHARS[2]
        };
        self.plot(cc, cr, ch, ink);

        let reach = radius + glow.max(0.0);
        let span_cols = (reach / self.cell_width).ceil() as i32;
        let span_rows = (reach / self.cell_height).ceil() as i32;

        for dr in -span_rows..=span_rows {
            for dc in -span_cols..=span_cols {
                let col = cc as i32 + dc;
                let row = cr as i32 + dr;
                if col < 0 || row < 0 {
                    continue;
                }
                let (col, row) = (col as u16, row as u16);
                let d = self.center_of(col, row).distance(center);

                if d <= radius && (dc, dr) != (0, 0) {
                    self.plot(col, row, ch, ink);
                } else if d <= reach {
                    let falloff = if glow > 0.0 {
                        1.0 - (d - radius).max(0.0) / glow
                    } else {
                        1.0
                    };
                    self.tint(col, row, ink.with_alpha(ink.alpha * falloff * GLOW_STRENGTH));
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, start: Ink, end: Ink) {
        let length = from.distance(to);
        let step = self.cell_width.min(self.cell_height) / 2.0;
        let samples = ((length / step).ceil() as usize).max(1);

        for s in 0..=samples {
            let t = s as f32 / samples as f32;
            let p = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            if let Some((col, row)) = self.cell_of(p) {
                let ink = Ink::new(
                    start.rgb.lerp(end.rgb, t),
                    start.alpha + (end.alpha - start.alpha) * t,
                );
                self.plot(col, row, LINE_CHAR, ink);
            }
        }
    }

    fn composite(&mut self, layer: &PixelBuffer, opacity: f32) {
        if layer.width() == 0 || layer.height() == 0 || self.cols == 0 || self.rows == 0 {
            return;
        }

        for row in 0..self.rows {
            for col in 0..self.cols {
                let lx = col as usize * layer.width() / self.cols as usize;
                let ly = row as usize * layer.height() / self.rows as usize;
                let Some([r, g, b, a]) = layer.get(lx, ly) else {
                    continue;
                };
                if let Some(i) = self.index(col, row) {
                    let alpha = opacity * a as f32 / 255.0;
                    self.overlay[i] = Some(Ink::new(Rgb::new(r, g, b), alpha));
                }
            }
        }
    }
}
