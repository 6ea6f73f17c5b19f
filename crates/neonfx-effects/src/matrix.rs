//! Matrix rain backdrop (stateful).
//!
//! Each column has a drop that writes a random glyph at its row every step
//! and moves down one row. Glyphs already written fade out over the
//! following steps, which leaves a trail behind each drop. Once a drop is
//! past the bottom edge it restarts at the top with a small chance per step.

use neonfx_config::DisplayConfig;
use neonfx_core::{FrameClock, Rgb};
use ratatui::{buffer::Buffer, layout::Rect};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::chars::MATRIX_CHARS;

/// Glyphs are double width, so drops sit on every other column.
const COLUMN_SPAN: u16 = 2;
/// Fraction of brightness kept by a trail glyph per step.
const TRAIL_DECAY: f32 = 0.9;
/// Trail glyphs fainter than this are dropped.
const TRAIL_CUTOFF: f32 = 0.05;

const HEAD: Rgb = Rgb::new(200, 255, 200);
const RAIN: Rgb = Rgb::new(0, 255, 0);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Trail {
    ch: char,
    intensity: f32,
}

#[derive(Debug, Clone)]
pub struct MatrixRain {
    cols: u16,
    rows: u16,
    /// Row of the next glyph of each drop.
    drops: Vec<u32>,
    trail: Vec<Option<Trail>>,
    clock: FrameClock,
    restart_chance: f64,
}

impl MatrixRain {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            cols: 0,
            rows: 0,
            drops: Vec::new(),
            trail: Vec::new(),
            clock: FrameClock::new(config.rain_interval_ms),
            restart_chance: config.rain_restart_chance,
        }
    }

    /// Rebuild for a new grid. All drops start again from the top.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.drops = vec![0; cols.div_ceil(COLUMN_SPAN) as usize];
        self.trail = vec![None; cols as usize * rows as usize];
    }

    pub fn is_initialized(&self) -> bool {
        !self.drops.is_empty()
    }

    pub fn start(&mut self, now_ms: u64) {
        self.clock.start(now_ms);
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn drops(&self) -> &[u32] {
        &self.drops
    }

    /// Advance one step if one is due.
    pub fn tick<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) {
        if self.clock.poll(now_ms) {
            self.step(rng);
        }
    }

    fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for slot in &mut self.trail {
            if let Some(t) = slot {
                t.intensity *= TRAIL_DECAY;
                if t.intensity < TRAIL_CUTOFF {
                    *slot = None;
                }
            }
        }

        let rows = self.rows as u32;
        for (i, drop) in self.drops.iter_mut().enumerate() {
            let col = i as u16 * COLUMN_SPAN;
            if *drop < rows {
                let ch = MATRIX_CHARS.choose(rng).copied().unwrap_or('0');
                let idx = *drop as usize * self.cols as usize + col as usize;
                if let Some(slot) = self.trail.get_mut(idx) {
                    *slot = Some(Trail { ch, intensity: 1.0 });
                }
            }

            if *drop >= rows && rng.random::<f64>() < self.restart_chance {
                *drop = 0;
            } else {
                *drop = drop.saturating_add(1);
            }
        }
    }

    pub fn render(&self, buf: &mut Buffer, area: Rect) {
        let cols = self.cols.min(area.width);
        let rows = self.rows.min(area.height);

        for row in 0..rows {
            for col in 0..cols {
                let idx = row as usize * self.cols as usize + col as usize;
                let Some(Some(t)) = self.trail.get(idx) else {
                    continue;
                };
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };

                let color = if t.intensity >= 1.0 {
                    HEAD
                } else {
                    Rgb::BACKGROUND.lerp(RAIN, t.intensity)
                };
                cell.set_char(t.ch).set_fg(color.into());
            }
        }
    }
}
