//! Backdrop state management.

use neonfx_config::Config;
use neonfx_core::{Backdrop, FrameClock, Point, Surface};
use ratatui::{buffer::Buffer, layout::Rect};
use rand::Rng;

use crate::matrix::MatrixRain;
use crate::nebula::Nebula;
use crate::noise::NoiseOverlay;
use crate::particles::ParticleField;
use crate::surface::CellSurface;
use crate::vignette;

/// Everything drawn behind the page content: the selected backdrop and the
/// static overlay.
#[derive(Debug)]
pub struct BackdropState {
    field: ParticleField,
    particle_count: usize,
    rain: MatrixRain,
    nebula: Nebula,
    noise: NoiseOverlay,
    surface: CellSurface,
    clock: FrameClock,
    cell: (f32, f32),
    /// Last known terminal width.
    last_width: u16,
    /// Last known terminal height.
    last_height: u16,
    pointer: Option<Point>,
}

impl BackdropState {
    pub fn new(config: &Config) -> Self {
        let display = &config.display;
        Self {
            field: ParticleField::new(config.particles.clone()),
            particle_count: config.particles.count,
            rain: MatrixRain::new(display),
            nebula: Nebula::new(),
            noise: NoiseOverlay::new(&config.noise),
            surface: CellSurface::new(display.cell_width, display.cell_height),
            clock: FrameClock::from_fps(display.fps),
            cell: (display.cell_width, display.cell_height),
            last_width: 0,
            last_height: 0,
            pointer: None,
        }
    }

    /// Start the frame clock. Matrix rain keeps its own clock, which runs
    /// only while the rain is on screen.
    pub fn start(&mut self, now_ms: u64) {
        self.clock.start(now_ms);
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn noise(&self) -> &NoiseOverlay {
        &self.noise
    }

    pub fn noise_mut(&mut self) -> &mut NoiseOverlay {
        &mut self.noise
    }

    /// Virtual pixels per cell.
    pub fn cell_size(&self) -> (f32, f32) {
        self.cell
    }

    /// Track the pointer from a terminal cell position.
    pub fn set_pointer_cell(&mut self, col: u16, row: u16) {
        self.pointer = Some(self.surface.center_of(col, row));
    }

    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Advance and draw the backdrop into `area` of `buf`.
    pub fn render<R: Rng + ?Sized>(
        &mut self,
        buf: &mut Buffer,
        area: Rect,
        backdrop: Backdrop,
        now_ms: u64,
        rng: &mut R,
    ) {
        let dimensions_changed = area.width != self.last_width || area.height != self.last_height;
        if dimensions_changed {
            self.resize(area.width, area.height, rng);
        }
        if backdrop == Backdrop::MatrixRain && !self.rain.is_initialized() {
            self.rain.resize(area.width, area.height);
        }

        if self.clock.poll(now_ms) {
            if backdrop.has_particles() {
                self.field.tick(self.pointer);
            }
            if backdrop == Backdrop::Nebula {
                self.nebula.tick();
            }
        }
        if backdrop == Backdrop::MatrixRain {
            if !self.rain.is_running() {
                self.rain.start(now_ms);
            }
            self.rain.tick(now_ms, rng);
        } else if self.rain.is_running() {
            self.rain.stop();
        }
        self.noise.tick(now_ms, rng);

        match backdrop {
            Backdrop::Nebula => self.nebula.render(buf, area, self.cell),
            Backdrop::MatrixRain => self.rain.render(buf, area),
            Backdrop::Starfield => vignette::render(buf, area, self.cell),
            Backdrop::None => {}
        }

        self.surface.clear();
        if backdrop.has_particles() {
            self.field.render(&mut self.surface, rng);
        }
        self.noise.render(&mut self.surface);
        self.surface.flush(buf, area);
    }

    fn resize<R: Rng + ?Sized>(&mut self, width: u16, height: u16, rng: &mut R) {
        self.last_width = width;
        self.last_height = height;
        self.surface.resize(width, height);

        let bounds = self.surface.bounds();
        if self.field.is_initialized() {
            self.field.resize(bounds);
        } else {
            self.field.initialize(self.particle_count, bounds, rng);
        }
        // The static is sampled once per cell
        self.noise.resize(self.surface.cols() as usize, self.surface.rows() as usize);

        // Matrix drops are laid out per column, so they restart on resize
        if self.rain.is_initialized() {
            self.rain.resize(width, height);
        }
        log::debug!("backdrop resized to {width}x{height} cells");
    }
}
