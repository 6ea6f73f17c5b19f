//! Transient glitch pulses on text and whole-screen distortion.
//!
//! Both work as post-passes over an already rendered Ratatui buffer, so they
//! apply to whatever was drawn underneath: typing text, backdrops, overlays.

use neonfx_config::GlitchConfig;
use neonfx_core::{FrameClock, Rgb};
use ratatui::{buffer::Buffer, layout::Rect, style::Color};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use crate::color::hue_rotate;

/// Keyframes of (progress, value), interpolated linearly.
type Keyframes = &'static [(f32, f32)];

const FLICKER_OPACITY: Keyframes = &[(0.0, 1.0), (0.5, 0.3), (1.0, 1.0)];
const SLIDE_X: Keyframes = &[(0.0, 0.0), (0.25, -10.0), (0.75, 10.0), (1.0, 0.0)];
const SHAKE_Y: Keyframes = &[(0.0, 0.0), (0.25, -5.0), (0.75, 5.0), (1.0, 0.0)];
const RGB_HUE: Keyframes = &[
    (0.0, 0.0),
    (0.25, 90.0),
    (0.5, 180.0),
    (0.75, 270.0),
    (1.0, 0.0),
];
/// Diagonal jitter played when the pointer enters a title.
const INTENSE_X: Keyframes = &[
    (0.0, 0.0),
    (0.1, -5.0),
    (0.2, 5.0),
    (0.3, -5.0),
    (0.4, 5.0),
    (0.5, -5.0),
    (0.6, 5.0),
    (0.7, -5.0),
    (0.8, 5.0),
    (0.9, -5.0),
    (1.0, 0.0),
];
const INTENSE_Y: Keyframes = &[
    (0.0, 0.0),
    (0.1, -5.0),
    (0.2, 5.0),
    (0.3, 5.0),
    (0.4, -5.0),
    (0.5, -5.0),
    (0.6, 5.0),
    (0.7, 5.0),
    (0.8, -5.0),
    (0.9, -5.0),
    (1.0, 0.0),
];

const DISTORT_HUE: Keyframes = &[(0.0, 0.0), (1.0, 360.0)];
const DISTORT_CONTRAST: Keyframes = &[
    (0.0, 1.0),
    (0.25, 1.2),
    (0.5, 0.8),
    (0.75, 1.1),
    (1.0, 1.0),
];
const DISTORT_BRIGHTNESS: Keyframes = &[
    (0.0, 1.0),
    (0.25, 1.1),
    (0.5, 0.9),
    (0.75, 1.2),
    (1.0, 1.0),
];
/// One full distortion cycle; a distortion shows only its opening part.
const DISTORT_CYCLE_MS: f32 = 10_000.0;

fn sample(frames: Keyframes, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    for pair in frames.windows(2) {
        let (t0, v0) = pair[0];
        let (t1, v1) = pair[1];
        if t <= t1 {
            let span = t1 - t0;
            let k = if span > 0.0 { (t - t0) / span } else { 1.0 };
            return v0 + (v1 - v0) * k;
        }
    }
    frames.last().map_or(0.0, |&(_, v)| v)
}

/// A per-channel colour transform, like a chain of CSS filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorFilter {
    pub hue_degrees: f32,
    pub contrast: f32,
    pub brightness: f32,
    /// Blend towards the page background; 1.0 leaves colours untouched.
    pub opacity: f32,
}

impl Default for ColorFilter {
    fn default() -> Self {
        Self {
            hue_degrees: 0.0,
            contrast: 1.0,
            brightness: 1.0,
            opacity: 1.0,
        }
    }
}

impl ColorFilter {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, c: Rgb) -> Rgb {
        let c = if self.hue_degrees == 0.0 {
            c
        } else {
            hue_rotate(c, self.hue_degrees)
        };
        let channel = |v: u8| {
            let v = v as f32 * self.brightness;
            let v = (v - 128.0) * self.contrast + 128.0;
            v.round().clamp(0.0, 255.0) as u8
        };
        let c = Rgb::new(channel(c.r), channel(c.g), channel(c.b));
        Rgb::BACKGROUND.lerp(c, self.opacity)
    }

    /// Filter the RGB colours of every cell in `area`. Named colours are left
    /// alone.
    pub fn apply_to(&self, buf: &mut Buffer, area: Rect) {
        if self.is_identity() {
            return;
        }
        let area = area.intersection(buf.area);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    if let Color::Rgb(r, g, b) = cell.fg {
                        cell.fg = self.apply(Rgb::new(r, g, b)).into();
                    }
                    if let Color::Rgb(r, g, b) = cell.bg {
                        cell.bg = self.apply(Rgb::new(r, g, b)).into();
                    }
                }
            }
        }
    }
}

/// The short glitch animations a text element can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlitchKind {
    /// Fade down to 30% and back.
    Flicker,
    /// Jump left then right.
    Slide,
    /// Jump up then down.
    Shake,
    /// Spin the hue around the colour wheel.
    Rgb,
    /// Jitter diagonally; played on hover rather than at random.
    Intense,
}

impl GlitchKind {
    /// Kinds the random pulses choose from.
    pub const ALL: [GlitchKind; 4] = [
        GlitchKind::Flicker,
        GlitchKind::Slide,
        GlitchKind::Shake,
        GlitchKind::Rgb,
    ];

    /// Displacement in virtual pixels at `progress` (0..=1).
    pub fn offset(self, progress: f32) -> (f32, f32) {
        match self {
            GlitchKind::Slide => (sample(SLIDE_X, progress), 0.0),
            GlitchKind::Shake => (0.0, sample(SHAKE_Y, progress)),
            GlitchKind::Intense => (sample(INTENSE_X, progress), sample(INTENSE_Y, progress)),
            GlitchKind::Flicker | GlitchKind::Rgb => (0.0, 0.0),
        }
    }

    pub fn filter(self, progress: f32) -> ColorFilter {
        match self {
            GlitchKind::Flicker => ColorFilter {
                opacity: sample(FLICKER_OPACITY, progress),
                ..ColorFilter::default()
            },
            GlitchKind::Rgb => ColorFilter {
                hue_degrees: sample(RGB_HUE, progress),
                ..ColorFilter::default()
            },
            GlitchKind::Slide | GlitchKind::Shake | GlitchKind::Intense => {
                ColorFilter::default()
            }
        }
    }
}

/// A glitch playing on one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlitchPulse {
    pub kind: GlitchKind,
    /// Index of the glitch-text element playing it.
    pub target: usize,
    pub started_ms: u64,
    pub duration_ms: u64,
}

impl GlitchPulse {
    /// Progress through the animation, or `None` once it has ended.
    pub fn progress(&self, now_ms: u64) -> Option<f32> {
        let elapsed = now_ms.checked_sub(self.started_ms)?;
        if elapsed >= self.duration_ms {
            return None;
        }
        Some(elapsed as f32 / self.duration_ms as f32)
    }

    /// Play the pulse over `area` of an already rendered buffer.
    ///
    /// Offsets are converted to whole cells, rounding away from zero so any
    /// movement is visible. The moved region reaches past `area` by the
    /// offset, so a one-row title stays on screen while it jumps.
    pub fn apply(&self, buf: &mut Buffer, area: Rect, now_ms: u64, cell: (f32, f32)) {
        let Some(progress) = self.progress(now_ms) else {
            return;
        };
        let (dx, dy) = self.kind.offset(progress);
        let shift = (to_cells(dx, cell.0), to_cells(dy, cell.1));
        if shift != (0, 0) {
            let (rx, ry) = (shift.0.unsigned_abs() as u16, shift.1.unsigned_abs() as u16);
            let reach = Rect::new(
                area.x.saturating_sub(rx),
                area.y.saturating_sub(ry),
                area.width.saturating_add(rx.saturating_mul(2)),
                area.height.saturating_add(ry.saturating_mul(2)),
            );
            shift_area(buf, reach, shift);
        }
        self.kind.filter(progress).apply_to(buf, area);
    }
}

fn to_cells(px: f32, cell: f32) -> i32 {
    if px == 0.0 || cell <= 0.0 {
        0
    } else {
        (px.abs() / cell).ceil().copysign(px) as i32
    }
}

/// Move the contents of `area` by `(dx, dy)` cells, clipped to `area`.
fn shift_area(buf: &mut Buffer, area: Rect, (dx, dy): (i32, i32)) {
    let area = area.intersection(buf.area);
    if area.is_empty() {
        return;
    }

    let mut snapshot = Vec::with_capacity(area.area() as usize);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            snapshot.push(buf[(x, y)].clone());
        }
    }

    let width = area.width as i32;
    let height = area.height as i32;
    for row in 0..height {
        for col in 0..width {
            let (sc, sr) = (col - dx, row - dy);
            let source = (0..width).contains(&sc) && (0..height).contains(&sr);
            let target = (area.x + col as u16, area.y + row as u16);
            if let Some(cell) = buf.cell_mut(target) {
                if source {
                    *cell = snapshot[(sr * width + sc) as usize].clone();
                } else {
                    cell.reset();
                }
            }
        }
    }
}

/// Every `pulse_interval_ms`, with probability `pulse_chance`, starts a
/// random glitch on a random target.
#[derive(Debug, Clone)]
pub struct GlitchPulses {
    targets: usize,
    chance: f64,
    duration_ms: u64,
    hover_ms: u64,
    clock: FrameClock,
    active: Option<GlitchPulse>,
}

impl GlitchPulses {
    pub fn new(config: &GlitchConfig, targets: usize) -> Self {
        Self {
            targets,
            chance: config.pulse_chance,
            duration_ms: config.pulse_ms,
            hover_ms: config.hover_ms,
            clock: FrameClock::new(config.pulse_interval_ms),
            active: None,
        }
    }

    /// Begin rolling; the first roll comes one interval after `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        self.clock.start(now_ms.saturating_add(self.clock.interval_ms()));
    }

    pub fn stop(&mut self) {
        self.clock.stop();
        self.active = None;
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn tick(&mut self, now_ms: u64, rng: &mut dyn RngCore) {
        if self
            .active
            .is_some_and(|pulse| pulse.progress(now_ms).is_none())
        {
            self.active = None;
        }

        if !self.clock.poll(now_ms) || self.targets == 0 {
            return;
        }
        if rng.random::<f64>() < self.chance {
            let target = rng.random_range(0..self.targets);
            let kind = GlitchKind::ALL
                .choose(rng)
                .copied()
                .unwrap_or(GlitchKind::Flicker);
            self.trigger(now_ms, target, kind);
        }
    }

    /// Start a glitch now, replacing any that is playing.
    pub fn trigger(&mut self, now_ms: u64, target: usize, kind: GlitchKind) {
        self.play(now_ms, target, kind, self.duration_ms);
    }

    /// Play the short intense glitch on a target the pointer just entered.
    pub fn hover(&mut self, now_ms: u64, target: usize) {
        self.play(now_ms, target, GlitchKind::Intense, self.hover_ms);
    }

    fn play(&mut self, now_ms: u64, target: usize, kind: GlitchKind, duration_ms: u64) {
        log::debug!("glitch pulse {kind:?} on target {target} for {duration_ms}ms");
        self.active = Some(GlitchPulse {
            kind,
            target,
            started_ms: now_ms,
            duration_ms,
        });
    }

    /// The pulse playing on `target`, if any.
    pub fn active_on(&self, target: usize, now_ms: u64) -> Option<GlitchPulse> {
        self.active
            .filter(|p| p.target == target && p.progress(now_ms).is_some())
    }
}

/// Every `distortion_interval_ms`, with probability `distortion_chance`,
/// hue-rotates the whole frame for `distortion_ms`.
#[derive(Debug, Clone)]
pub struct ScreenDistortion {
    chance: f64,
    duration_ms: u64,
    clock: FrameClock,
    started_ms: Option<u64>,
}

impl ScreenDistortion {
    pub fn new(config: &GlitchConfig) -> Self {
        Self {
            chance: config.distortion_chance,
            duration_ms: config.distortion_ms,
            clock: FrameClock::new(config.distortion_interval_ms),
            started_ms: None,
        }
    }

    pub fn start(&mut self, now_ms: u64) {
        self.clock.start(now_ms.saturating_add(self.clock.interval_ms()));
    }

    pub fn stop(&mut self) {
        self.clock.stop();
        self.started_ms = None;
    }

    pub fn tick(&mut self, now_ms: u64, rng: &mut dyn RngCore) {
        if self
            .started_ms
            .is_some_and(|t| now_ms >= t.saturating_add(self.duration_ms))
        {
            self.started_ms = None;
        }
        if self.clock.poll(now_ms) && self.started_ms.is_none() && rng.random::<f64>() < self.chance
        {
            self.trigger(now_ms);
        }
    }

    pub fn trigger(&mut self, now_ms: u64) {
        log::debug!("screen distortion for {}ms", self.duration_ms);
        self.started_ms = Some(now_ms);
    }

    pub fn is_active(&self, now_ms: u64) -> bool {
        self.filter(now_ms).is_some()
    }

    /// The filter for `now_ms`, or `None` outside a distortion.
    pub fn filter(&self, now_ms: u64) -> Option<ColorFilter> {
        let started = self.started_ms?;
        let elapsed = now_ms.checked_sub(started)?;
        if elapsed >= self.duration_ms {
            return None;
        }
        let t = elapsed as f32 / DISTORT_CYCLE_MS;
        Some(ColorFilter {
            hue_degrees: sample(DISTORT_HUE, t),
            contrast: sample(DISTORT_CONTRAST, t),
            brightness: sample(DISTORT_BRIGHTNESS, t),
            opacity: 1.0,
        })
    }

    pub fn apply(&self, buf: &mut Buffer, area: Rect, now_ms: u64) {
        if let Some(filter) = self.filter(now_ms) {
            filter.apply_to(buf, area);
        }
    }
}
